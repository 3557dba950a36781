//! Per-geometry shading constants.
//!
//! The two profiles differ because the sphere fights more ambient fill from
//! its lunar surround: a gentler contrast power, stronger absorption and a
//! wider transmission window keep its image region readable. The values are
//! tuned, not derived; keep them as data.

use litho_mesh::ProductKind;

/// Fixed key light direction for the panel shapes, shading space.
pub const KEY_LIGHT_DIR: [f32; 3] = [0.2, 0.3, 1.0];

/// All tunable constants of the translucency model for one geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadeProfile {
    /// Unlit porcelain tint.
    pub base_color: [f32; 3],
    /// Exponent of the contrast curve `L^p * (3 - 2L)`.
    pub contrast_power: f32,
    /// Beer-Lambert absorption coefficient.
    pub absorption: f32,
    pub transmission_floor: f32,
    pub transmission_ceil: f32,
    /// Gain on the backlight term.
    pub backlight_gain: f32,
    /// Gain on the subsurface-scatter approximation.
    pub sss_gain: f32,
    /// Ambient floor of the surface term.
    pub ambient_floor: f32,
    /// Gain on the Lambertian diffuse term.
    pub diffuse_gain: f32,
    /// Gain on the Fresnel rim term.
    pub rim_gain: f32,
    /// How much of the surface term survives in the lit blend.
    pub lit_surface_mix: f32,
    /// Extra darkening of thick areas after the blend.
    pub thickness_darken: f32,
}

/// Flat, curved and cylinder shells share one profile.
pub const PANEL_PROFILE: ShadeProfile = ShadeProfile {
    base_color: [0.95, 0.93, 0.90],
    contrast_power: 2.0,
    absorption: 2.5,
    transmission_floor: 0.02,
    transmission_ceil: 0.95,
    backlight_gain: 0.9,
    sss_gain: 0.15,
    ambient_floor: 0.25,
    diffuse_gain: 0.2,
    rim_gain: 0.12,
    lit_surface_mix: 0.3,
    thickness_darken: 0.08,
};

/// The sphere's image region.
pub const SPHERE_PROFILE: ShadeProfile = ShadeProfile {
    base_color: [0.98, 0.96, 0.93],
    contrast_power: 1.5,
    absorption: 3.5,
    transmission_floor: 0.01,
    transmission_ceil: 0.98,
    backlight_gain: 1.1,
    sss_gain: 0.2,
    ambient_floor: 0.2,
    diffuse_gain: 0.25,
    rim_gain: 0.15,
    lit_surface_mix: 0.25,
    thickness_darken: 0.12,
};

impl ShadeProfile {
    /// The profile a geometry shades with.
    pub fn for_kind(kind: ProductKind) -> &'static ShadeProfile {
        match kind {
            ProductKind::Flat | ProductKind::Curved | ProductKind::Cylinder => &PANEL_PROFILE,
            ProductKind::Sphere => &SPHERE_PROFILE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_kinds_share_a_profile() {
        assert_eq!(
            ShadeProfile::for_kind(ProductKind::Flat),
            ShadeProfile::for_kind(ProductKind::Curved)
        );
        assert_eq!(
            ShadeProfile::for_kind(ProductKind::Flat),
            ShadeProfile::for_kind(ProductKind::Cylinder)
        );
    }

    #[test]
    fn test_sphere_profile_is_distinct() {
        let sphere = ShadeProfile::for_kind(ProductKind::Sphere);
        assert_ne!(sphere, &PANEL_PROFILE);
        assert_eq!(sphere.contrast_power, 1.5);
        assert_eq!(sphere.absorption, 3.5);
    }

    #[test]
    fn test_transmission_windows_are_sane() {
        for profile in [&PANEL_PROFILE, &SPHERE_PROFILE] {
            assert!(profile.transmission_floor < profile.transmission_ceil);
            assert!(profile.transmission_floor > 0.0);
            assert!(profile.transmission_ceil <= 1.0);
        }
    }
}
