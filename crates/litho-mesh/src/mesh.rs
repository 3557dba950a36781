//! Mesh container and geometry-type dispatch.

use std::fmt;
use std::str::FromStr;

use litho_raster::LuminanceGrid;

use crate::MeshVertex;

/// Geometry build errors.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// A product carried a geometry tag this engine does not implement.
    #[error("unsupported geometry type \"{tag}\"")]
    UnsupportedKind { tag: String },
}

/// The four base geometries a product can render as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProductKind {
    Flat,
    Curved,
    Cylinder,
    Sphere,
}

impl ProductKind {
    pub const ALL: [ProductKind; 4] = [
        ProductKind::Flat,
        ProductKind::Curved,
        ProductKind::Cylinder,
        ProductKind::Sphere,
    ];

    /// The catalog tag for this geometry.
    pub fn tag(self) -> &'static str {
        match self {
            ProductKind::Flat => "flat",
            ProductKind::Curved => "curved",
            ProductKind::Cylinder => "cylinder",
            ProductKind::Sphere => "sphere",
        }
    }

    /// Build the displaced mesh for this geometry from a luminance grid.
    pub fn build(self, grid: &LuminanceGrid) -> LithoMesh {
        match self {
            ProductKind::Flat => crate::build_flat(grid),
            ProductKind::Curved => crate::build_curved(grid),
            ProductKind::Cylinder => crate::build_cylinder(grid),
            ProductKind::Sphere => crate::build_sphere(grid),
        }
    }
}

impl FromStr for ProductKind {
    type Err = GeometryError;

    /// Parse a catalog geometry tag. Unknown tags are an error; they must
    /// fail the rebuild rather than silently fall back to a panel.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "flat" => Ok(ProductKind::Flat),
            "curved" => Ok(ProductKind::Curved),
            "cylinder" => Ok(ProductKind::Cylinder),
            "sphere" => Ok(ProductKind::Sphere),
            other => Err(GeometryError::UnsupportedKind {
                tag: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A fully built preview mesh: displaced vertices, triangle-list indices,
/// and the geometry tag it was built as.
///
/// Replaced wholesale when the image or product changes; never mutated in
/// place after the build finishes.
#[derive(Debug, Clone)]
pub struct LithoMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub kind: ProductKind,
    /// Angular radius of the image region on the unit sphere. `Some` only
    /// for [`ProductKind::Sphere`].
    pub image_radius: Option<f32>,
}

impl LithoMesh {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex data as bytes for GPU upload (zero-copy).
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as bytes for GPU upload (zero-copy).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
