//! User actions as discrete commands.

use std::path::PathBuf;

use litho_catalog::{ProductId, VariantId};
use litho_shading::LightColor;

/// A user action queued into the scene and applied at the start of the next
/// update step.
///
/// Input adapters never touch scene state directly; everything funnels
/// through this enum so the update step stays the single writer.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Switch to another catalog product. Rebuilds the mesh if an image is
    /// loaded; selects the product's first variant.
    SelectProduct(ProductId),
    /// Switch to another size of the current product. Only changes the
    /// transform scale, never the geometry.
    SelectVariant(VariantId),
    /// Change the backlight color. No rebuild, no light transition restart.
    SetLightColor(LightColor),
    /// Switch the lamp on or off. Switching on plays the fade-in show.
    SetLightOn(bool),
    /// Decode an image file off-thread and rebuild once it arrives.
    LoadImage(PathBuf),
    /// Discard the uploaded image and the mesh built from it.
    ClearImage,
    /// Orbit the view by the given yaw/pitch deltas in radians.
    Orbit { yaw: f32, pitch: f32 },
    /// Move the camera distance by the given delta.
    Zoom(f32),
    /// Ease the view back to the home orientation and distance.
    ResetView,
}
