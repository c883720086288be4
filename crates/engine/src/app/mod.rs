mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use metrics::LoopMetricsSnapshot;
pub use scene::{
    InputSnapshot, RenderLayer, Scene, SceneCommand, SceneWorld, SoundCue, SpriteDesc, TextLine,
    TextTone, Vec2, WorldSize,
};
pub(crate) use rendering::{OverlayData, Renderer};
