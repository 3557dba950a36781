//! The lit/unlit translucency shading model.
//!
//! The GPU evaluates these formulas per fragment; the functions here are the
//! reference the WGSL is written against, kept on the CPU so the model has
//! host-side tests and a single place its constants live.

mod light;
mod model;
mod profile;
mod uniform;

pub use light::LightColor;
pub use model::{
    MARIA_COLOR, MOON_BASE_COLOR, MOON_FRESNEL_COLOR, MOON_KEY_LIGHT_DIR, contrast_curve,
    shade_fragment, shade_litho, shade_moon, tonemap, transmission,
};
pub use profile::{KEY_LIGHT_DIR, PANEL_PROFILE, SPHERE_PROFILE, ShadeProfile};
pub use uniform::ShadeUniform;
