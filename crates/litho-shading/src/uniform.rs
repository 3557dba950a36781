//! GPU-side mirror of a [`ShadeProfile`] plus the live light state.

use bytemuck::{Pod, Zeroable};

use crate::light::LightColor;
use crate::profile::{KEY_LIGHT_DIR, ShadeProfile};

/// Shading uniform uploaded once per frame.
///
/// Field order matches the WGSL `ShadeParams` struct; every row is 16 bytes
/// so std140 and std430 agree on the layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ShadeUniform {
    pub light_color: [f32; 3],
    /// Eased lamp intensity in [0, 1], not a bool, so transitions can ramp it.
    pub light_on: f32,
    pub base_color: [f32; 3],
    pub contrast_power: f32,
    pub key_light_dir: [f32; 3],
    pub absorption: f32,
    pub transmission_floor: f32,
    pub transmission_ceil: f32,
    pub backlight_gain: f32,
    pub sss_gain: f32,
    pub ambient_floor: f32,
    pub diffuse_gain: f32,
    pub rim_gain: f32,
    pub lit_surface_mix: f32,
    pub thickness_darken: f32,
    _pad: [f32; 3],
}

static_assertions::assert_eq_size!(ShadeUniform, [u8; 96]);

const _: () = assert!(
    std::mem::align_of::<ShadeUniform>() == 4,
    "ShadeUniform must stay tightly packed f32s"
);

impl ShadeUniform {
    pub fn new(profile: &ShadeProfile, light_color: LightColor, light_on: f32) -> Self {
        Self {
            light_color: light_color.rgb().to_array(),
            light_on,
            base_color: profile.base_color,
            contrast_power: profile.contrast_power,
            key_light_dir: KEY_LIGHT_DIR,
            absorption: profile.absorption,
            transmission_floor: profile.transmission_floor,
            transmission_ceil: profile.transmission_ceil,
            backlight_gain: profile.backlight_gain,
            sss_gain: profile.sss_gain,
            ambient_floor: profile.ambient_floor,
            diffuse_gain: profile.diffuse_gain,
            rim_gain: profile.rim_gain,
            lit_surface_mix: profile.lit_surface_mix,
            thickness_darken: profile.thickness_darken,
            _pad: [0.0; 3],
        }
    }
}
