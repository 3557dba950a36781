//! Translates window input into scene commands.
//!
//! Keyboard and mouse handlers never touch [`SceneState`] directly; they
//! produce [`Command`]s for the update step to consume, keeping the scene
//! single-writer.

use litho_catalog::{Catalog, ProductId, VariantId};
use litho_mesh::ProductKind;
use litho_scene::{Command, SceneState};
use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::KeyCode;

/// One wheel notch counts as this many scrolled pixels.
const LINE_HEIGHT_PX: f32 = 100.0;

/// What a key press asks the host to do.
///
/// Everything except `Snapshot` resolves to scene commands via
/// [`commands_for_action`]; the snapshot is a render-host concern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    SelectKind(ProductKind),
    ToggleLight,
    CycleColor,
    NextVariant,
    PreviousVariant,
    ResetView,
    Snapshot,
}

/// Key bindings: 1-4 pick the geometry, L switches the lamp, C cycles its
/// color, S/A step through sizes, R recenters the view, P saves a PNG.
pub fn key_action(code: KeyCode) -> Option<KeyAction> {
    match code {
        KeyCode::Digit1 => Some(KeyAction::SelectKind(ProductKind::Flat)),
        KeyCode::Digit2 => Some(KeyAction::SelectKind(ProductKind::Curved)),
        KeyCode::Digit3 => Some(KeyAction::SelectKind(ProductKind::Cylinder)),
        KeyCode::Digit4 => Some(KeyAction::SelectKind(ProductKind::Sphere)),
        KeyCode::KeyL => Some(KeyAction::ToggleLight),
        KeyCode::KeyC => Some(KeyAction::CycleColor),
        KeyCode::KeyS => Some(KeyAction::NextVariant),
        KeyCode::KeyA => Some(KeyAction::PreviousVariant),
        KeyCode::KeyR => Some(KeyAction::ResetView),
        KeyCode::KeyP => Some(KeyAction::Snapshot),
        _ => None,
    }
}

/// Resolves a key action against the current scene into commands.
///
/// Returns nothing when the action has no target: no catalog product with
/// the requested geometry, or a single-size product asked to change size.
pub fn commands_for_action(action: KeyAction, scene: &SceneState) -> Vec<Command> {
    match action {
        KeyAction::SelectKind(kind) => product_of_kind(scene.catalog(), kind)
            .map(Command::SelectProduct)
            .into_iter()
            .collect(),
        KeyAction::ToggleLight => vec![Command::SetLightOn(!scene.lamp_on())],
        KeyAction::CycleColor => vec![Command::SetLightColor(scene.light_color().next())],
        KeyAction::NextVariant => variant_step(scene, 1)
            .map(Command::SelectVariant)
            .into_iter()
            .collect(),
        KeyAction::PreviousVariant => variant_step(scene, -1)
            .map(Command::SelectVariant)
            .into_iter()
            .collect(),
        KeyAction::ResetView => vec![Command::ResetView],
        KeyAction::Snapshot => Vec::new(),
    }
}

/// First catalog product with the given geometry, if any.
pub fn product_of_kind(catalog: &Catalog, kind: ProductKind) -> Option<ProductId> {
    catalog
        .products()
        .iter()
        .find(|p| p.kind().is_ok_and(|k| k == kind))
        .map(|p| p.id)
}

/// The variant `step` places away from the current one, wrapping at both
/// ends. `None` when the product has nothing to cycle to.
fn variant_step(scene: &SceneState, step: isize) -> Option<VariantId> {
    let product = scene.selected_product()?;
    if product.variants.len() < 2 {
        return None;
    }
    let current = scene.variant_id()?;
    let index = product.variants.iter().position(|v| v.id == current)?;
    let next = (index as isize + step).rem_euclid(product.variants.len() as isize) as usize;
    Some(product.variants[next].id)
}

/// Left-button drag tracking for the orbit control.
///
/// Cursor events carry absolute positions; orbiting wants per-event
/// deltas, so the previous position is remembered here.
#[derive(Debug, Default)]
pub struct PointerState {
    dragging: bool,
    last_position: Option<(f64, f64)>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.dragging = state == ElementState::Pressed;
        }
    }

    /// Feeds a cursor position; returns the orbit command while dragging.
    ///
    /// Dragging right spins the object to the right and dragging down tips
    /// its face downward, which in camera terms is a negative yaw step and
    /// a positive pitch step.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64, sensitivity: f32) -> Option<Command> {
        let last = self.last_position.replace((x, y));
        if !self.dragging {
            return None;
        }
        let (last_x, last_y) = last?;
        let dx = (x - last_x) as f32;
        let dy = (y - last_y) as f32;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        Some(Command::Orbit {
            yaw: -dx * sensitivity,
            pitch: dy * sensitivity,
        })
    }
}

/// Wheel scroll to camera distance change. Scrolling up moves in.
pub fn zoom_command(delta: MouseScrollDelta, sensitivity: f32) -> Command {
    let pixels = match delta {
        MouseScrollDelta::LineDelta(_, lines) => lines * LINE_HEIGHT_PX,
        MouseScrollDelta::PixelDelta(position) => position.y as f32,
    };
    Command::Zoom(-pixels * sensitivity)
}
