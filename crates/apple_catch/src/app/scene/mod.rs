//! Maps the gameplay session onto the engine: input to session calls,
//! session state to sprites and HUD text, events to sound cues.

use std::time::Duration;

use engine::{
    InputAction, InputSnapshot, RenderLayer, Scene, SceneCommand, SceneWorld, SoundCue,
    SpriteDesc, TextLine, TextTone, Vec2,
};
use tracing::{debug, info};

use super::config::GameConfig;
use crate::gameplay::{
    Affordability, AppleKind, ControlInput, GameError, GameEvent, GameSession, RoundPhase,
    UpgradeKind, WinReason, GROUND_Y, WORLD_HEIGHT, WORLD_WIDTH,
};

/// Pointer presses left of this x walk left.
const POINTER_LEFT_EDGE: f32 = 240.0;
/// Pointer presses right of this x walk right.
const POINTER_RIGHT_EDGE: f32 = 336.0;
/// Excess needed for the louder level-end headline.
const AMAZING_EXCESS: u32 = 8;

const SKY_COLOR: [u8; 4] = [118, 186, 235, 255];
const GROUND_COLOR: [u8; 4] = [96, 64, 38, 255];
const TREE_COLOR: [u8; 4] = [46, 120, 52, 255];
const MONKEY_COLOR: [u8; 4] = [120, 78, 40, 255];
const PLAYER_COLOR: [u8; 4] = [214, 160, 90, 255];
const APPLE_COLOR: [u8; 4] = [206, 36, 36, 255];
const GOLDEN_COLOR: [u8; 4] = [240, 200, 40, 255];
const MUSH_COLOR: [u8; 4] = [110, 70, 60, 255];
const BANANA_COLOR: [u8; 4] = [250, 230, 90, 255];
const SHOP_ICON_COLOR: [u8; 4] = [236, 226, 200, 255];
const SHOP_ICON_FIRST_X: f32 = 140.0;
const SHOP_ICON_SPACING: f32 = 150.0;
const SHOP_ICON_Y: f32 = 150.0;
const SHOP_ICON_HALF_EXTENT: f32 = 24.0;

include!("hud.rs");
include!("sprites.rs");
include!("scene_impl.rs");

pub(crate) fn build_scene(config: GameConfig) -> Box<dyn Scene> {
    Box::new(OrchardScene::new(config))
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
