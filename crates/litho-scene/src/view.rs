//! Orbit camera state with eased targets.

use litho_math::frame_rate_scaled_factor;

/// Per-frame easing factor toward the target values.
pub const EASE_FACTOR: f32 = 0.1;

/// Pitch stays within this many radians of level.
pub const PITCH_LIMIT: f32 = 0.8;

pub const ZOOM_MIN: f32 = 3.0;
pub const ZOOM_MAX: f32 = 15.0;

const HOME_PITCH: f32 = 0.1;
const HOME_YAW: f32 = 0.0;
const HOME_ZOOM: f32 = 6.0;

/// Orbit angles and camera distance.
///
/// Input updates the targets instantly; the displayed values ease toward
/// them every frame. The stock easing is per-frame, so feel depends on the
/// display refresh rate; [`ViewState::step_scaled`] is the opt-in
/// frame-rate-independent variant.
#[derive(Clone, Debug)]
pub struct ViewState {
    pitch: f32,
    yaw: f32,
    zoom: f32,
    target_pitch: f32,
    target_yaw: f32,
    target_zoom: f32,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            pitch: HOME_PITCH,
            yaw: HOME_YAW,
            zoom: HOME_ZOOM,
            target_pitch: HOME_PITCH,
            target_yaw: HOME_YAW,
            target_zoom: HOME_ZOOM,
        }
    }

    /// Adds orbit deltas in radians. Pitch clamps so the object can never
    /// be viewed from underneath or flipped over.
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        self.target_yaw += yaw;
        self.target_pitch = (self.target_pitch + pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn zoom_by(&mut self, delta: f32) {
        self.target_zoom = (self.target_zoom + delta).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Eases back to the home orientation; the displayed values follow over
    /// the next frames.
    pub fn reset(&mut self) {
        self.target_pitch = HOME_PITCH;
        self.target_yaw = HOME_YAW;
        self.target_zoom = HOME_ZOOM;
    }

    /// One frame of stock easing.
    pub fn step(&mut self) {
        self.ease(EASE_FACTOR);
    }

    /// One frame of easing scaled to the elapsed frame time, matching the
    /// stock feel at 60 Hz.
    pub fn step_scaled(&mut self, dt: f32) {
        self.ease(frame_rate_scaled_factor(EASE_FACTOR, dt, 60.0));
    }

    fn ease(&mut self, factor: f32) {
        self.pitch += (self.target_pitch - self.pitch) * factor;
        self.yaw += (self.target_yaw - self.yaw) * factor;
        self.zoom += (self.target_zoom - self.zoom) * factor;
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn target_pitch(&self) -> f32 {
        self.target_pitch
    }

    pub fn target_yaw(&self) -> f32 {
        self.target_yaw
    }

    pub fn target_zoom(&self) -> f32 {
        self.target_zoom
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}
