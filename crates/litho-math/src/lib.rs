//! Scalar interpolation and easing curves shared across the litho crates.

/// Linear interpolation between `a` and `b` by `t`.
///
/// `t` is not clamped; callers that need clamping do it at the call site.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// GLSL-style smoothstep: 0 at `edge0`, 1 at `edge1`, Hermite in between.
///
/// Works with `edge0 > edge1` as well, in which case the ramp descends
/// (this mirrors how GPU shading languages evaluate it and the crater rim
/// profile relies on it).
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Cubic ease-out: fast start, settling finish. Maps [0, 1] to [0, 1].
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Convert a per-frame exponential approach factor into one scaled by the
/// actual frame time, referenced to `reference_fps`.
///
/// At exactly `1 / reference_fps` seconds per frame this returns
/// `per_frame_factor`; longer frames return proportionally larger factors so
/// the approach speed stays constant in wall-clock terms.
pub fn frame_rate_scaled_factor(per_frame_factor: f32, dt: f32, reference_fps: f32) -> f32 {
    let retained = 1.0 - per_frame_factor.clamp(0.0, 1.0);
    1.0 - retained.powf(dt.max(0.0) * reference_fps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
    }

    #[test]
    fn test_smoothstep_edges_and_midpoint() {
        assert_eq!(smoothstep(0.0, 1.0, -0.5), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 1.5), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_smoothstep_is_monotonic() {
        let mut prev = smoothstep(0.2, 0.8, 0.0);
        for i in 1..=100 {
            let x = i as f32 / 100.0;
            let v = smoothstep(0.2, 0.8, x);
            assert!(
                v >= prev,
                "smoothstep decreased at x={x}: {v} < {prev}"
            );
            prev = v;
        }
    }

    #[test]
    fn test_smoothstep_descending_edges() {
        // edge0 > edge1 flips the ramp, used by the crater rim falloff
        assert_eq!(smoothstep(1.0, 0.0, 1.5), 0.0);
        assert_eq!(smoothstep(1.0, 0.0, -0.5), 1.0);
        assert!((smoothstep(1.0, 0.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        // beyond the unit interval it saturates rather than overshooting
        assert_eq!(ease_out_cubic(1.5), 1.0);
        assert_eq!(ease_out_cubic(-0.5), 0.0);
    }

    #[test]
    fn test_ease_out_cubic_front_loaded() {
        // ease-out covers more than half the distance before t = 0.5
        assert!(ease_out_cubic(0.5) > 0.5);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn test_frame_rate_scaled_factor_matches_at_reference() {
        let f = frame_rate_scaled_factor(0.1, 1.0 / 60.0, 60.0);
        assert!((f - 0.1).abs() < 1e-6, "at 60 fps the factor is unchanged, got {f}");
    }

    #[test]
    fn test_frame_rate_scaled_factor_doubles_frame_time() {
        // two reference frames' worth of time: 1 - 0.9^2 = 0.19
        let f = frame_rate_scaled_factor(0.1, 2.0 / 60.0, 60.0);
        assert!((f - 0.19).abs() < 1e-6, "got {f}");
    }

    #[test]
    fn test_frame_rate_scaled_factor_zero_dt() {
        assert_eq!(frame_rate_scaled_factor(0.1, 0.0, 60.0), 0.0);
    }
}
