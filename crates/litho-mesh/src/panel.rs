//! Flat and curved panel builders.
//!
//! Both panels are dense rectangular grids displaced along +z by inverted
//! luminance (darker pixels sit higher, matching the thicker printed
//! material). The curved variant bends the displaced grid onto a circular
//! arc afterwards.

use litho_raster::LuminanceGrid;

use crate::mesh::{LithoMesh, ProductKind};
use crate::normals::recompute_normals;
use crate::vertex::MeshVertex;

/// Displacement depth for both panel shapes, object units.
pub const PANEL_DEPTH: f32 = 0.12;

/// Fraction of a half-turn the curved panel bends through.
pub const CURVED_CURVATURE: f32 = 0.4;

const FLAT_WIDTH: f32 = 2.0;
const FLAT_HEIGHT: f32 = 2.5;
const FLAT_COLS: u32 = 100;
const FLAT_ROWS: u32 = 125;

const CURVED_WIDTH: f32 = 2.5;
const CURVED_HEIGHT: f32 = 3.0;
const CURVED_COLS: u32 = 120;
const CURVED_ROWS: u32 = 150;

/// Build the flat panel.
pub fn build_flat(grid: &LuminanceGrid) -> LithoMesh {
    let (mut vertices, indices) =
        displaced_grid(grid, FLAT_WIDTH, FLAT_HEIGHT, FLAT_COLS, FLAT_ROWS);
    recompute_normals(&mut vertices, &indices);
    LithoMesh {
        vertices,
        indices,
        kind: ProductKind::Flat,
        image_radius: None,
    }
}

/// Build the curved panel: displace first, then bend around the y axis.
///
/// Displacement happens along the pre-bend z axis (the local surface
/// normal), so the bend carries the relief with it instead of shearing it.
pub fn build_curved(grid: &LuminanceGrid) -> LithoMesh {
    let (mut vertices, indices) =
        displaced_grid(grid, CURVED_WIDTH, CURVED_HEIGHT, CURVED_COLS, CURVED_ROWS);

    let bend_radius = CURVED_WIDTH / (std::f32::consts::PI * CURVED_CURVATURE);
    for vertex in &mut vertices {
        let [x, y, z] = vertex.position;
        let angle = (x / CURVED_WIDTH) * std::f32::consts::PI * CURVED_CURVATURE;
        let r = bend_radius + z;
        vertex.position = [
            r * angle.sin(),
            y,
            r * angle.cos() - bend_radius,
        ];
    }

    recompute_normals(&mut vertices, &indices);
    LithoMesh {
        vertices,
        indices,
        kind: ProductKind::Curved,
        image_radius: None,
    }
}

/// A `cols` x `rows` grid in the xy plane, centered at the origin, displaced
/// along +z by `(1 - luminance) * PANEL_DEPTH`. Row 0 is the top edge; the
/// stored uv runs with the image (v down).
fn displaced_grid(
    grid: &LuminanceGrid,
    width: f32,
    height: f32,
    cols: u32,
    rows: u32,
) -> (Vec<MeshVertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(((cols + 1) * (rows + 1)) as usize);
    for iy in 0..=rows {
        let v = iy as f32 / rows as f32;
        let y = height / 2.0 - v * height;
        for ix in 0..=cols {
            let u = ix as f32 / cols as f32;
            let x = -width / 2.0 + u * width;
            let luminance = grid.sample(u, v);
            vertices.push(MeshVertex {
                position: [x, y, (1.0 - luminance) * PANEL_DEPTH],
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

    (vertices, indices)
}
