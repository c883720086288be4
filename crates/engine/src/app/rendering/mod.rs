mod overlay;
mod renderer;
mod sprites;
mod text;
mod transform;

pub(crate) use overlay::OverlayData;
pub(crate) use renderer::Renderer;
pub(crate) use transform::{Viewport, WorldFit};
