//! Open cylinder shell builder.

use litho_raster::LuminanceGrid;

use crate::mesh::{LithoMesh, ProductKind};
use crate::normals::recompute_normals;
use crate::vertex::MeshVertex;

/// Shell radius before displacement, object units.
pub const CYLINDER_RADIUS: f32 = 0.4;

/// Shell height, object units.
pub const CYLINDER_HEIGHT: f32 = 1.0;

/// Radial displacement depth. Thinner than the panels to match the thin
/// shell of the physical product.
pub const CYLINDER_DEPTH: f32 = 0.08;

const RADIAL_SEGMENTS: u32 = 64;
const HEIGHT_SEGMENTS: u32 = 80;

/// Build the open shell: no caps, image wrapped around the outside,
/// displacement radially outward.
pub fn build_cylinder(grid: &LuminanceGrid) -> LithoMesh {
    let rows = HEIGHT_SEGMENTS;
    let cols = RADIAL_SEGMENTS;
    let mut vertices = Vec::with_capacity(((cols + 1) * (rows + 1)) as usize);

    for iy in 0..=rows {
        let t = iy as f32 / rows as f32;
        let y = CYLINDER_HEIGHT / 2.0 - t * CYLINDER_HEIGHT;
        for ix in 0..=cols {
            let theta = ix as f32 / cols as f32 * std::f32::consts::TAU;
            let x = CYLINDER_RADIUS * theta.sin();
            let z = CYLINDER_RADIUS * theta.cos();

            // the horizontal coordinate comes from the angular position,
            // not the segment index, mirroring how shading resolves it
            let u = 0.5 + z.atan2(x) / std::f32::consts::TAU;
            let v = (CYLINDER_HEIGHT / 2.0 - y) / CYLINDER_HEIGHT;

            let luminance = grid.sample(u, v);
            let disp = (1.0 - luminance) * CYLINDER_DEPTH;
            let radial = (CYLINDER_RADIUS + disp) / CYLINDER_RADIUS;

            vertices.push(MeshVertex {
                position: [x * radial, y, z * radial],
                normal: [0.0; 3],
                uv: [u, v],
                surface: [1.0, 0.0, 0.0],
            });
        }
    }

    let mut indices = Vec::with_capacity((cols * rows * 6) as usize);
    let stride = cols + 1;
    for iy in 0..rows {
        for ix in 0..cols {
            let a = iy * stride + ix;
            let b = (iy + 1) * stride + ix;
            let c = b + 1;
            let d = a + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    recompute_normals(&mut vertices, &indices);
    LithoMesh {
        vertices,
        indices,
        kind: ProductKind::Cylinder,
        image_radius: None,
    }
}
