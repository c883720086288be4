use crate::app::{Vec2, WorldSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Uniform scale plus letterbox offsets that fit the world into a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WorldFit {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl WorldFit {
    pub(crate) fn new(world: WorldSize, viewport: Viewport) -> Self {
        if world.width <= 0.0 || world.height <= 0.0 || viewport.width == 0 || viewport.height == 0
        {
            return Self {
                scale: 1.0,
                offset_x: 0.0,
                offset_y: 0.0,
            };
        }

        let viewport_w = viewport.width as f32;
        let viewport_h = viewport.height as f32;
        let scale = (viewport_w / world.width).min(viewport_h / world.height);
        Self {
            scale,
            offset_x: ((viewport_w - world.width * scale) * 0.5).floor(),
            offset_y: ((viewport_h - world.height * scale) * 0.5).floor(),
        }
    }

    pub(crate) fn world_to_screen(&self, world: Vec2) -> (i32, i32) {
        (
            (world.x * self.scale + self.offset_x).round() as i32,
            (world.y * self.scale + self.offset_y).round() as i32,
        )
    }

    pub(crate) fn screen_to_world(&self, x_px: f32, y_px: f32) -> Vec2 {
        Vec2::new(
            (x_px - self.offset_x) / self.scale,
            (y_px - self.offset_y) / self.scale,
        )
    }

    pub(crate) fn scale_length(&self, length: f32) -> i32 {
        (length * self.scale).round() as i32
    }
}
