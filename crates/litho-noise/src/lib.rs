//! Deterministic 2D value noise and the composed terrain/crater fields.
//!
//! These functions are the single source of truth for the sphere's procedural
//! surface: the geometry builder evaluates them for vertex displacement and
//! bakes the same values into vertex attributes for the fragment shader, so
//! the shaded craters always sit exactly on the geometric ones.

use glam::Vec3;
use litho_math::{lerp, smoothstep};

/// Terrain octave amplitudes (frequency doubles per octave from
/// [`TERRAIN_BASE_FREQUENCY`]).
pub const TERRAIN_AMPLITUDES: [f32; 4] = [0.5, 0.25, 0.125, 0.0625];

/// Base lattice frequency of the first terrain octave.
pub const TERRAIN_BASE_FREQUENCY: f32 = 4.0;

/// Direction-space frequency the sphere surface is sampled at.
pub const SURFACE_SAMPLE_FREQUENCY: f32 = 4.0;

/// One crater layer: a lattice frequency, a shift that decorrelates it from
/// the other layers, the basin threshold, and its depth weight.
struct CraterLayer {
    frequency: f32,
    lattice_shift: f32,
    threshold: f32,
    weight: f32,
    rim: bool,
}

/// Smaller craters get higher frequency and lower weight; only the two
/// larger layers produce a visible raised rim.
const CRATER_LAYERS: [CraterLayer; 3] = [
    CraterLayer { frequency: 3.0, lattice_shift: 0.0, threshold: 0.15, weight: 0.3, rim: true },
    CraterLayer { frequency: 6.0, lattice_shift: 10.0, threshold: 0.12, weight: 0.2, rim: true },
    CraterLayer { frequency: 12.0, lattice_shift: 20.0, threshold: 0.10, weight: 0.1, rim: false },
];

/// Rim height relative to the layer's maximum basin depth.
const RIM_GAIN: f32 = 0.65;

/// How strongly the z component of a direction folds into the 2D lattice,
/// as a fraction of the layer frequency (terrain folds into y, craters
/// into x).
const TERRAIN_Z_FOLD: f32 = 0.75;
const CRATER_Z_FOLD: f32 = 2.0 / 3.0;

/// GLSL-style fract; unlike `f32::fract` it stays in [0, 1) for negative
/// inputs, which the lattice hash depends on.
fn unit_fract(x: f32) -> f32 {
    x - x.floor()
}

fn lattice_hash(x: f32, y: f32) -> f32 {
    unit_fract((x * 127.1 + y * 311.7).sin() * 43758.5453)
}

/// Smooth 2D value noise in [-1, 1]. Deterministic: no seed, no state.
///
/// Hermite-weighted bilinear interpolation of the sine-hash lattice, so
/// both the value and its first derivative are continuous across cell
/// boundaries.
pub fn noise2(x: f32, y: f32) -> f32 {
    let xi = x.floor();
    let yi = y.floor();
    let fx = x - xi;
    let fy = y - yi;
    let u = fx * fx * (3.0 - 2.0 * fx);
    let v = fy * fy * (3.0 - 2.0 * fy);

    let a = lattice_hash(xi, yi);
    let b = lattice_hash(xi + 1.0, yi);
    let c = lattice_hash(xi, yi + 1.0);
    let d = lattice_hash(xi + 1.0, yi + 1.0);

    lerp(lerp(a, b, u), lerp(c, d, u), v) * 2.0 - 1.0
}

/// Four-octave fractal terrain over a 2D coordinate. Output stays within
/// the sum of the octave amplitudes (±0.9375).
pub fn terrain_noise(x: f32, y: f32) -> f32 {
    let mut value = 0.0;
    let mut frequency = TERRAIN_BASE_FREQUENCY;
    for amplitude in TERRAIN_AMPLITUDES {
        value += noise2(x * frequency, y * frequency) * amplitude;
        frequency *= 2.0;
    }
    value
}

/// Terrain over a direction on the unit sphere. The z component folds into
/// the lattice y coordinate per octave instead of going through an
/// equirectangular projection, so there is no seam at the date line.
pub fn terrain_noise_dir(p: Vec3) -> f32 {
    let mut value = 0.0;
    let mut frequency = TERRAIN_BASE_FREQUENCY;
    for amplitude in TERRAIN_AMPLITUDES {
        value += noise2(
            p.x * frequency,
            p.y * frequency + p.z * frequency * TERRAIN_Z_FOLD,
        ) * amplitude;
        frequency *= 2.0;
    }
    value
}

impl CraterLayer {
    /// Signed contribution of this layer given the folded noise magnitude.
    ///
    /// Inside the threshold the layer is a smoothstep basin reaching
    /// `-threshold * weight` at the center; straddling the threshold a rim
    /// band rises to `RIM_GAIN` of that depth.
    fn evaluate(&self, magnitude: f32) -> f32 {
        let peak_depth = self.threshold * self.weight;
        let basin = 1.0 - smoothstep(0.0, self.threshold, magnitude);
        let mut value = -basin * peak_depth;
        if self.rim {
            let rim = smoothstep(0.8 * self.threshold, self.threshold, magnitude)
                * smoothstep(self.threshold * 4.0 / 3.0, self.threshold, magnitude);
            value += rim * peak_depth * RIM_GAIN;
        }
        value
    }
}

/// Signed crater field over a 2D coordinate: depressions negative, rims
/// positive, in the same units as the caller's displacement scale.
pub fn crater_field(x: f32, y: f32) -> f32 {
    let mut value = 0.0;
    for layer in &CRATER_LAYERS {
        let magnitude = noise2(
            x * layer.frequency,
            y * layer.frequency + layer.lattice_shift,
        )
        .abs();
        value += layer.evaluate(magnitude);
    }
    value
}

/// Crater field over a unit-sphere direction, z folded into the lattice x
/// coordinate per layer. Reduces to [`crater_field`] when `p.z == 0`.
pub fn crater_field_dir(p: Vec3) -> f32 {
    let mut value = 0.0;
    for layer in &CRATER_LAYERS {
        let magnitude = noise2(
            p.x * layer.frequency + p.z * layer.frequency * CRATER_Z_FOLD,
            p.y * layer.frequency + layer.lattice_shift,
        )
        .abs();
        value += layer.evaluate(magnitude);
    }
    value
}

/// Lunar maria mask in [0, 1] over a unit-sphere direction: 1 in the bright
/// highlands, 0 in the dark basins.
pub fn maria_mask(p: Vec3) -> f32 {
    smoothstep(-0.1, 0.2, noise2(p.x * 2.0 + p.z * 1.5, p.y * 2.0))
}

/// The two independent surface fields evaluated at one direction. The
/// sphere builder turns one of these into both the radial displacement and
/// the baked color attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub terrain: f32,
    pub crater: f32,
}

/// Evaluate terrain and craters for a unit-sphere direction.
pub fn surface_sample_dir(dir: Vec3) -> SurfaceSample {
    SurfaceSample {
        terrain: terrain_noise_dir(dir * SURFACE_SAMPLE_FREQUENCY),
        crater: crater_field_dir(dir),
    }
}

/// Largest possible crater depression (all basins at full depth).
pub fn max_crater_depth() -> f32 {
    CRATER_LAYERS.iter().map(|l| l.threshold * l.weight).sum()
}

/// Largest possible crater rim height (both rim bands at their peak).
pub fn max_crater_rim() -> f32 {
    CRATER_LAYERS
        .iter()
        .filter(|l| l.rim)
        .map(|l| l.threshold * l.weight * RIM_GAIN)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_noise2_deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..1000 {
            let x: f32 = rng.random_range(-100.0..100.0);
            let y: f32 = rng.random_range(-100.0..100.0);
            let first = noise2(x, y);
            let second = noise2(x, y);
            assert_eq!(
                first.to_bits(),
                second.to_bits(),
                "noise2({x}, {y}) not bit-identical across calls"
            );
        }
    }

    #[test]
    fn test_noise2_stays_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..10_000 {
            let x: f32 = rng.random_range(-100.0..100.0);
            let y: f32 = rng.random_range(-100.0..100.0);
            let n = noise2(x, y);
            assert!(
                (-1.0..=1.0).contains(&n),
                "noise2({x}, {y}) = {n} outside [-1, 1]"
            );
        }
    }

    #[test]
    fn test_noise2_not_constant() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for _ in 0..1000 {
            let n = noise2(rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0));
            min = min.min(n);
            max = max.max(n);
        }
        assert!(
            max - min > 0.5,
            "noise spread only [{min}, {max}], lattice looks degenerate"
        );
    }

    #[test]
    fn test_noise2_continuous_across_cell_boundary() {
        // value noise must not jump at integer lattice lines
        for k in -5..5 {
            let edge = k as f32;
            let before = noise2(edge - 1e-4, 0.37);
            let after = noise2(edge + 1e-4, 0.37);
            assert!(
                (before - after).abs() < 1e-2,
                "jump at lattice x={edge}: {before} vs {after}"
            );
        }
    }

    #[test]
    fn test_noise2_negative_coordinates_in_range() {
        // the GLSL-style fract keeps the hash in [0,1) for negative lattice
        // coordinates; a trunc-based fract would push output past the range
        for i in 0..100 {
            let x = -37.5 - i as f32 * 0.013;
            let y = -11.25 - i as f32 * 0.029;
            let n = noise2(x, y);
            assert!((-1.0..=1.0).contains(&n), "noise2({x}, {y}) = {n}");
        }
    }

    #[test]
    fn test_terrain_noise_bounded_by_amplitude_sum() {
        let bound: f32 = TERRAIN_AMPLITUDES.iter().sum();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..5000 {
            let x: f32 = rng.random_range(-10.0..10.0);
            let y: f32 = rng.random_range(-10.0..10.0);
            let t = terrain_noise(x, y);
            assert!(
                t.abs() <= bound,
                "terrain_noise({x}, {y}) = {t} exceeds amplitude sum {bound}"
            );
        }
    }

    #[test]
    fn test_terrain_noise_dir_matches_2d_in_plane() {
        // with z = 0 the fold vanishes and the direction variant must agree
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        for _ in 0..500 {
            let x: f32 = rng.random_range(-4.0..4.0);
            let y: f32 = rng.random_range(-4.0..4.0);
            let flat = terrain_noise(x, y);
            let dir = terrain_noise_dir(Vec3::new(x, y, 0.0));
            assert_eq!(
                flat.to_bits(),
                dir.to_bits(),
                "in-plane mismatch at ({x}, {y}): {flat} vs {dir}"
            );
        }
    }

    #[test]
    fn test_crater_field_dir_matches_2d_in_plane() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for _ in 0..500 {
            let x: f32 = rng.random_range(-4.0..4.0);
            let y: f32 = rng.random_range(-4.0..4.0);
            let flat = crater_field(x, y);
            let dir = crater_field_dir(Vec3::new(x, y, 0.0));
            assert_eq!(
                flat.to_bits(),
                dir.to_bits(),
                "in-plane mismatch at ({x}, {y}): {flat} vs {dir}"
            );
        }
    }

    #[test]
    fn test_crater_field_within_depth_and_rim_bounds() {
        let depth = max_crater_depth();
        let rim = max_crater_rim();
        let mut rng = ChaCha8Rng::seed_from_u64(19);
        for _ in 0..10_000 {
            let x: f32 = rng.random_range(-8.0..8.0);
            let y: f32 = rng.random_range(-8.0..8.0);
            let c = crater_field(x, y);
            assert!(
                c >= -depth - 1e-6 && c <= rim + 1e-6,
                "crater_field({x}, {y}) = {c} outside [-{depth}, {rim}]"
            );
        }
    }

    #[test]
    fn test_crater_field_produces_depressions_and_rims() {
        // scan a patch and confirm both signs actually occur
        let mut saw_depression = false;
        let mut saw_rim = false;
        for i in 0..200 {
            for j in 0..200 {
                let c = crater_field(i as f32 * 0.05, j as f32 * 0.05);
                if c < -0.005 {
                    saw_depression = true;
                }
                if c > 0.005 {
                    saw_rim = true;
                }
            }
        }
        assert!(saw_depression, "no crater depressions found in scan");
        assert!(saw_rim, "no crater rims found in scan");
    }

    #[test]
    fn test_crater_layer_basin_profile() {
        let layer = &CRATER_LAYERS[0];
        // dead center of a basin: full depth
        let center = layer.evaluate(0.0);
        assert!(
            (center + layer.threshold * layer.weight).abs() < 1e-6,
            "basin center {center} is not -threshold*weight"
        );
        // far outside: no contribution
        assert_eq!(layer.evaluate(0.5), 0.0);
        // at the threshold midpoint of the rim band: positive
        assert!(layer.evaluate(layer.threshold) > 0.0);
    }

    #[test]
    fn test_smallest_crater_layer_has_no_rim() {
        let layer = &CRATER_LAYERS[2];
        assert!(layer.evaluate(layer.threshold) <= 0.0 + 1e-6);
    }

    #[test]
    fn test_maria_mask_in_unit_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        for _ in 0..2000 {
            let dir = Vec3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            )
            .normalize_or_zero();
            let m = maria_mask(dir);
            assert!((0.0..=1.0).contains(&m), "maria_mask({dir:?}) = {m}");
        }
    }

    #[test]
    fn test_surface_sample_deterministic() {
        let dir = Vec3::new(0.3, -0.5, 0.81).normalize();
        let a = surface_sample_dir(dir);
        let b = surface_sample_dir(dir);
        assert_eq!(a, b, "surface sample not reproducible for {dir:?}");
    }
}
