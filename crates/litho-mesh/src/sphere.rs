//! Blended sphere builder: a front image region faded into a procedural
//! lunar surface.
//!
//! Every vertex evaluates the shared noise fields exactly once; the result
//! drives the radial displacement AND is baked into the `surface` vertex
//! attributes the fragment shader colors from. The image-region mask used
//! for displacement blending is the same value the shader blends color
//! with, so the two regions coincide exactly.

use glam::Vec3;
use litho_math::{lerp, smoothstep};
use litho_noise::{SurfaceSample, maria_mask, surface_sample_dir};
use litho_raster::LuminanceGrid;

use crate::mesh::{LithoMesh, ProductKind};
use crate::normals::recompute_normals;
use crate::vertex::MeshVertex;

/// Sphere radius before displacement, object units.
pub const SPHERE_RADIUS: f32 = 1.5;

/// Radius of the image region on the unit sphere, measured as distance from
/// the front (+z) pole in the xy plane.
pub const IMAGE_RADIUS: f32 = 0.75;

/// Image-region displacement depth, object units.
pub const IMAGE_DEPTH: f32 = 0.12;

/// Object units of radial offset per unit of terrain noise.
const TERRAIN_DISPLACEMENT_SCALE: f32 = 0.025;

/// Scales the baked relief attribute so the shader-visible crater contrast
/// matches the displacement-visible one.
const RELIEF_TERRAIN_GAIN: f32 = 0.3;
const RELIEF_CRATER_GAIN: f32 = 3.0;

const SEGMENTS: u32 = 128;

/// Everything one sphere direction bakes to.
struct BakedPoint {
    displacement: f32,
    mask: f32,
    uv: [f32; 2],
    relief: f32,
    maria: f32,
}

/// Build the blended sphere.
pub fn build_sphere(grid: &LuminanceGrid) -> LithoMesh {
    let stride = SEGMENTS + 1;
    let mut vertices = Vec::with_capacity((stride * stride) as usize);

    for iy in 0..=SEGMENTS {
        let polar = iy as f32 / SEGMENTS as f32 * std::f32::consts::PI;
        for ix in 0..=SEGMENTS {
            let azimuth = ix as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
            let dir = Vec3::new(
                polar.sin() * azimuth.cos(),
                polar.cos(),
                polar.sin() * azimuth.sin(),
            );

            let baked = bake_point(dir, grid);
            let position = dir * (SPHERE_RADIUS + baked.displacement);
            vertices.push(MeshVertex {
                position: position.to_array(),
                normal: [0.0; 3],
                uv: baked.uv,
                surface: [baked.mask, baked.relief, baked.maria],
            });
        }
    }

    // polar rows collapse to a point, so each pole quad is one triangle
    let mut indices = Vec::with_capacity((SEGMENTS * SEGMENTS * 6) as usize);
    for iy in 0..SEGMENTS {
        for ix in 0..SEGMENTS {
            let a = iy * stride + ix;
            let b = (iy + 1) * stride + ix;
            let c = b + 1;
            let d = a + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, d, b]);
            }
            if iy != SEGMENTS - 1 {
                indices.extend_from_slice(&[d, c, b]);
            }
        }
    }

    recompute_normals(&mut vertices, &indices);
    LithoMesh {
        vertices,
        indices,
        kind: ProductKind::Sphere,
        image_radius: Some(IMAGE_RADIUS),
    }
}

/// Evaluate displacement, mask, uv and the baked color attributes for one
/// unit direction.
///
/// Inside the image region the displacement is the mask-weighted blend of
/// the image field and the surface field, so approaching the region rim
/// from either side converges to the same value. Noise is evaluated for
/// every direction so interpolated relief stays valid across the rim band.
fn bake_point(dir: Vec3, grid: &LuminanceGrid) -> BakedPoint {
    let sample = surface_sample_dir(dir);
    let relief = relief_value(&sample);
    let maria = maria_mask(dir);
    let surface_disp = surface_displacement(&sample);

    let dist_front = (dir.x * dir.x + dir.y * dir.y).sqrt();
    if dir.z > 0.0 && dist_front < IMAGE_RADIUS {
        let u = 0.5 + (dir.x / IMAGE_RADIUS) * 0.5;
        let v = 0.5 - (dir.y / IMAGE_RADIUS) * 0.5;
        let fade = image_fade(dist_front);
        let image_disp = (1.0 - grid.sample(u, v)) * IMAGE_DEPTH;
        BakedPoint {
            displacement: lerp(surface_disp, image_disp, fade),
            mask: fade,
            uv: [u, v],
            relief,
            maria,
        }
    } else {
        let u = 0.5 + dir.z.atan2(dir.x) / std::f32::consts::TAU;
        let v = 0.5 - dir.y.asin() / std::f32::consts::PI;
        BakedPoint {
            displacement: surface_disp,
            mask: 0.0,
            uv: [u, v],
            relief,
            maria,
        }
    }
}

/// Radial fade of the image field: 1 at the front pole, 0 at the region
/// rim. Also the color mask.
fn image_fade(dist_front: f32) -> f32 {
    1.0 - smoothstep(0.7 * IMAGE_RADIUS, IMAGE_RADIUS, dist_front)
}

fn surface_displacement(sample: &SurfaceSample) -> f32 {
    sample.terrain * TERRAIN_DISPLACEMENT_SCALE + sample.crater
}

fn relief_value(sample: &SurfaceSample) -> f32 {
    sample.terrain * RELIEF_TERRAIN_GAIN + sample.crater * RELIEF_CRATER_GAIN
}
