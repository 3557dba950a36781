//! wgpu presentation of the preview: surface and device management, the
//! displaced-mesh and dust pipelines, grid upload, and frame readback for
//! snapshots.

pub mod buffer;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod particle_pipeline;
pub mod pass;
pub mod pipeline;
pub mod snapshot;
pub mod texture;

pub use buffer::MeshBuffer;
pub use camera::{CAMERA_FAR, CAMERA_NEAR, OrbitCamera};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use particle_pipeline::{
    MAX_PARTICLES, PARTICLE_SHADER_SOURCE, ParticleInstance, ParticlePipeline,
};
pub use pass::{FrameEncoder, NIGHT_BACKDROP, RenderPassBuilder};
pub use pipeline::{LITHO_SHADER_SOURCE, LithoPipeline, SceneUniform, draw_litho};
pub use snapshot::{SnapshotError, snapshot_path, write_snapshot_png};
pub use texture::LuminanceTexture;
