//! Preview scene state and the per-frame update step.
//!
//! All user actions enter as [`Command`]s and are consumed by
//! [`SceneState::update`] in a fixed phase order, so the single active mesh
//! and light state have exactly one writer. Image decoding is the only
//! off-thread work; results come back through the [`DecodePipeline`] and are
//! applied atomically before the next render.

mod command;
mod decode;
mod particles;
mod scene;
mod transition;
mod view;

pub use command::Command;
pub use decode::{DecodePipeline, DecodeResult, DecodeSource};
pub use particles::{PARTICLE_COUNT, Particle, ParticleField};
pub use scene::{RebuildOutcome, SceneOptions, SceneState};
pub use transition::{LightTransition, RAMP_DURATION_S, TRIGGER_DELAY_S};
pub use view::{PITCH_LIMIT, ViewState, ZOOM_MAX, ZOOM_MIN};
