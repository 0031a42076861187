pub mod camera;
pub mod frame;
pub mod gpu;
pub mod texture;

pub use camera::Trackball;
pub use frame::{FrameInputs, RenderMode, SceneSettings, compose_frame};
pub use gpu::GpuState;
pub use texture::{TextureLoader, TextureResult, TextureSource};
