use std::ops::{Add, Mul, Sub};

use super::input::{ActionStates, InputAction};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Logical play-field size in world pixels. World space is y-down with the
/// origin at the top-left corner, and is letterboxed into the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldSize {
    pub width: f32,
    pub height: f32,
}

impl WorldSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for WorldSize {
    fn default() -> Self {
        Self::new(576.0, 832.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
    pointer_down_position: Option<Vec2>,
    pointer_pressed: bool,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        quit_requested: bool,
        actions: ActionStates,
        pointer_down_position: Option<Vec2>,
        pointer_pressed: bool,
        window_width: u32,
        window_height: u32,
    ) -> Self {
        Self {
            quit_requested,
            actions,
            pointer_down_position,
            pointer_pressed,
            window_width,
            window_height,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.actions.was_pressed(action)
    }

    /// World-space position of the held pointer, if any.
    pub fn pointer_down_position(&self) -> Option<Vec2> {
        self.pointer_down_position
    }

    pub fn pointer_pressed(&self) -> bool {
        self.pointer_pressed
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_action_pressed(mut self, action: InputAction) -> Self {
        self.actions.mark_pressed(action);
        self
    }

    pub fn with_pointer_down(mut self, position: Option<Vec2>) -> Self {
        self.pointer_pressed = position.is_some() && self.pointer_down_position.is_none();
        self.pointer_down_position = position;
        self
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

/// Draw order bucket. Lower layers are drawn first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderLayer {
    Backdrop,
    Props,
    Actors,
    Pickups,
    Projectiles,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDesc {
    pub key: &'static str,
    pub center: Vec2,
    pub half_extents: Vec2,
    pub fallback_color: [u8; 4],
    pub layer: RenderLayer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTone {
    Primary,
    Dim,
    Accent,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
    pub tone: TextTone,
}

impl TextLine {
    pub fn new(text: impl Into<String>, tone: TextTone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    pub fn primary(text: impl Into<String>) -> Self {
        Self::new(text, TextTone::Primary)
    }

    pub fn dim(text: impl Into<String>) -> Self {
        Self::new(text, TextTone::Dim)
    }
}

/// Fire-and-forget audio cue name, e.g. `"collect"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundCue(pub &'static str);

/// Per-scene presentation state: the sprite list for the next frame, HUD and
/// banner text, and sound cues queued since the last drain.
#[derive(Debug, Default)]
pub struct SceneWorld {
    size: WorldSize,
    sprites: Vec<SpriteDesc>,
    hud_lines: Vec<TextLine>,
    banner_lines: Vec<TextLine>,
    pending_cues: Vec<SoundCue>,
}

impl SceneWorld {
    pub fn new(size: WorldSize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn size(&self) -> WorldSize {
        self.size
    }

    pub fn clear_sprites(&mut self) {
        self.sprites.clear();
    }

    pub fn push_sprite(&mut self, sprite: SpriteDesc) {
        self.sprites.push(sprite);
    }

    pub fn sprites(&self) -> &[SpriteDesc] {
        &self.sprites
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn set_hud_lines(&mut self, lines: Vec<TextLine>) {
        self.hud_lines = lines;
    }

    pub fn hud_lines(&self) -> &[TextLine] {
        &self.hud_lines
    }

    /// Centered panel text. An empty list hides the panel.
    pub fn set_banner_lines(&mut self, lines: Vec<TextLine>) {
        self.banner_lines = lines;
    }

    pub fn banner_lines(&self) -> &[TextLine] {
        &self.banner_lines
    }

    pub fn play_cue(&mut self, cue: SoundCue) {
        self.pending_cues.push(cue);
    }

    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.pending_cues)
    }

    pub fn pending_cues(&self) -> &[SoundCue] {
        &self.pending_cues
    }
}

pub trait Scene {
    fn load(&mut self, world: &mut SceneWorld);
    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand;
    /// Rebuilds the sprite list for the upcoming frame.
    fn render(&mut self, world: &mut SceneWorld);
    fn unload(&mut self, world: &mut SceneWorld);
    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        None
    }
}

/// Owns the single active scene and its world for the loop runner.
pub(crate) struct SceneHost {
    scene: Box<dyn Scene>,
    world: SceneWorld,
    is_loaded: bool,
}

impl SceneHost {
    pub(crate) fn new(scene: Box<dyn Scene>, size: WorldSize) -> Self {
        Self {
            scene,
            world: SceneWorld::new(size),
            is_loaded: false,
        }
    }

    pub(crate) fn load(&mut self) {
        if self.is_loaded {
            return;
        }
        self.scene.load(&mut self.world);
        self.is_loaded = true;
    }

    pub(crate) fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        self.scene.update(fixed_dt_seconds, input, &mut self.world)
    }

    pub(crate) fn render(&mut self) {
        self.scene.render(&mut self.world);
    }

    pub(crate) fn shutdown(&mut self) {
        if !self.is_loaded {
            return;
        }
        self.scene.unload(&mut self.world);
        self.is_loaded = false;
    }

    pub(crate) fn world(&self) -> &SceneWorld {
        &self.world
    }

    pub(crate) fn world_mut(&mut self) -> &mut SceneWorld {
        &mut self.world
    }

    pub(crate) fn debug_title(&self) -> Option<String> {
        self.scene.debug_title(&self.world)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Default)]
    struct CallLog {
        loads: u32,
        updates: u32,
        renders: u32,
        unloads: u32,
    }

    struct RecordingScene {
        log: Rc<RefCell<CallLog>>,
    }

    impl Scene for RecordingScene {
        fn load(&mut self, world: &mut SceneWorld) {
            self.log.borrow_mut().loads += 1;
            world.set_hud_lines(vec![TextLine::primary("loaded")]);
        }

        fn update(
            &mut self,
            _fixed_dt_seconds: f32,
            input: &InputSnapshot,
            world: &mut SceneWorld,
        ) -> SceneCommand {
            self.log.borrow_mut().updates += 1;
            world.play_cue(SoundCue("select"));
            if input.quit_requested() {
                SceneCommand::Quit
            } else {
                SceneCommand::None
            }
        }

        fn render(&mut self, world: &mut SceneWorld) {
            self.log.borrow_mut().renders += 1;
            world.clear_sprites();
            world.push_sprite(SpriteDesc {
                key: "player/b0",
                center: Vec2::new(10.0, 10.0),
                half_extents: Vec2::new(4.0, 4.0),
                fallback_color: [255, 0, 0, 255],
                layer: RenderLayer::Actors,
            });
        }

        fn unload(&mut self, _world: &mut SceneWorld) {
            self.log.borrow_mut().unloads += 1;
        }
    }

    fn host_with_log() -> (SceneHost, Rc<RefCell<CallLog>>) {
        let log = Rc::new(RefCell::new(CallLog::default()));
        let scene = RecordingScene {
            log: Rc::clone(&log),
        };
        (SceneHost::new(Box::new(scene), WorldSize::default()), log)
    }

    #[test]
    fn load_is_idempotent_until_shutdown() {
        let (mut host, log) = host_with_log();
        host.load();
        host.load();
        assert_eq!(log.borrow().loads, 1);
        assert_eq!(host.world().hud_lines()[0].text, "loaded");

        host.shutdown();
        host.shutdown();
        assert_eq!(log.borrow().unloads, 1);
    }

    #[test]
    fn update_forwards_quit_command_and_queues_cues() {
        let (mut host, log) = host_with_log();
        host.load();

        let quiet = host.update(1.0 / 60.0, &InputSnapshot::empty());
        let quit = host.update(
            1.0 / 60.0,
            &InputSnapshot::empty().with_quit_requested(true),
        );

        assert_eq!(quiet, SceneCommand::None);
        assert_eq!(quit, SceneCommand::Quit);
        assert_eq!(log.borrow().updates, 2);
        assert_eq!(host.world_mut().drain_cues().len(), 2);
        assert!(host.world().pending_cues().is_empty());
    }

    #[test]
    fn render_rebuilds_sprite_list_each_frame() {
        let (mut host, log) = host_with_log();
        host.render();
        host.render();

        assert_eq!(log.borrow().renders, 2);
        assert_eq!(host.world().sprite_count(), 1);
    }

    #[test]
    fn pointer_press_edge_only_on_first_down() {
        let first = InputSnapshot::empty().with_pointer_down(Some(Vec2::new(100.0, 700.0)));
        assert!(first.pointer_pressed());

        let held = first.with_pointer_down(Some(Vec2::new(110.0, 700.0)));
        assert!(!held.pointer_pressed());
        assert_eq!(held.pointer_down_position(), Some(Vec2::new(110.0, 700.0)));
    }

    #[test]
    fn vec2_arithmetic() {
        let a = Vec2::new(3.0, -2.0);
        let b = Vec2::new(1.0, 4.0);
        assert_eq!(a + b, Vec2::new(4.0, 2.0));
        assert_eq!(a - b, Vec2::new(2.0, -6.0));
        assert_eq!(a * 2.0, Vec2::new(6.0, -4.0));
    }
}
