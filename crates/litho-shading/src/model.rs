//! Reference implementation of the shading formulas.
//!
//! Shading space is whatever space the caller keeps `normal` and `view_dir`
//! in, as long as both agree; the key light directions are constants in that
//! same space, so the key light rides along with the camera.

use glam::Vec3;

use crate::profile::{KEY_LIGHT_DIR, ShadeProfile};

/// Unlit lunar surface tint.
pub const MOON_BASE_COLOR: Vec3 = Vec3::new(0.82, 0.80, 0.78);

/// Tint of the darker maria basins.
pub const MARIA_COLOR: Vec3 = Vec3::new(0.65, 0.63, 0.60);

/// Key light for the lunar surface, offset from the image key so the
/// terminator does not cut through the image region.
pub const MOON_KEY_LIGHT_DIR: Vec3 = Vec3::new(0.3, 0.5, 0.8);

/// Rim tint of the lunar limb.
pub const MOON_FRESNEL_COLOR: Vec3 = Vec3::new(0.9, 0.88, 0.85);

/// Monotonic-ish contrast curve `L^p * (3 - 2L)`.
///
/// For p = 2 this is the smoothstep polynomial and stays in [0, 1]. For the
/// sphere's p = 1.5 it overshoots 1 slightly below L = 1; the transmission
/// ceiling clamp absorbs the overshoot.
pub fn contrast_curve(luminance: f32, power: f32) -> f32 {
    luminance.powf(power) * (3.0 - 2.0 * luminance)
}

/// Beer-Lambert transmission through material whose thickness is inverted
/// contrast, clamped to the profile's window.
pub fn transmission(luminance: f32, profile: &ShadeProfile) -> f32 {
    let thickness = 1.0 - contrast_curve(luminance, profile.contrast_power);
    (-thickness * profile.absorption)
        .exp()
        .clamp(profile.transmission_floor, profile.transmission_ceil)
}

/// Reversible range compression, per channel.
pub fn tonemap(color: Vec3) -> Vec3 {
    color / (color + Vec3::ONE)
}

/// Image-region color before the region blend and tonemap.
pub fn shade_litho(
    luminance: f32,
    normal: Vec3,
    view_dir: Vec3,
    light_color: Vec3,
    light_on: f32,
    profile: &ShadeProfile,
) -> Vec3 {
    let base = Vec3::from_array(profile.base_color);
    let thickness = 1.0 - contrast_curve(luminance, profile.contrast_power);
    let trans = transmission(luminance, profile);

    let backlight = light_color * trans * profile.backlight_gain;
    let sss = trans * profile.sss_gain;

    let diffuse = normal
        .dot(Vec3::from_array(KEY_LIGHT_DIR).normalize())
        .max(0.0);
    let surface = base * (profile.ambient_floor + diffuse * profile.diffuse_gain);

    let fresnel = (1.0 - normal.dot(view_dir).max(0.0)).powf(3.0);
    let rim = base * fresnel * profile.rim_gain;

    let lit = backlight + base * sss + surface * profile.lit_surface_mix + rim;
    let unlit = surface + rim * 0.5;
    let color = unlit.lerp(lit, light_on);

    color * (1.0 - thickness * profile.thickness_darken)
}

/// Lunar-surface color from the baked relief and maria attributes, before
/// the region blend and tonemap.
pub fn shade_moon(
    relief: f32,
    maria: f32,
    normal: Vec3,
    view_dir: Vec3,
    light_color: Vec3,
    light_on: f32,
) -> Vec3 {
    let moon_color = MARIA_COLOR.lerp(MOON_BASE_COLOR, maria) + Vec3::splat(relief * 0.2);

    let diffuse = normal.dot(MOON_KEY_LIGHT_DIR.normalize()).max(0.0);
    let mut lit = moon_color * (0.15 + diffuse * 0.7);
    // crater self-shadowing: depressions darken, rims catch light
    lit *= 1.0 + relief * 0.3;
    lit += light_color * 0.08 * light_on;

    let fresnel = (1.0 - normal.dot(view_dir).max(0.0)).powf(2.5);
    lit + MOON_FRESNEL_COLOR * fresnel * 0.12
}

/// Full fragment color: both region colors blended by the baked image mask,
/// then tonemapped once.
pub fn shade_fragment(
    luminance: f32,
    normal: Vec3,
    view_dir: Vec3,
    surface: [f32; 3],
    light_color: Vec3,
    light_on: f32,
    profile: &ShadeProfile,
) -> Vec3 {
    let [mask, relief, maria] = surface;
    let litho = shade_litho(luminance, normal, view_dir, light_color, light_on, profile);
    let moon = shade_moon(relief, maria, normal, view_dir, light_color, light_on);
    tonemap(moon.lerp(litho, mask))
}
