enum Screen {
    Title,
    InGame(Box<GameSession>),
}

struct OrchardScene {
    config: GameConfig,
    screen: Screen,
}

impl OrchardScene {
    fn new(config: GameConfig) -> Self {
        Self {
            config,
            screen: Screen::Title,
        }
    }

    fn start_game(&mut self, world: &mut SceneWorld) {
        let session =
            GameSession::new(self.config.progression, self.config.rules, self.config.seed);
        info!(seed = ?self.config.seed, "game_started");
        world.play_cue(SoundCue("game-start"));
        self.screen = Screen::InGame(Box::new(session));
    }

    fn session(&self) -> Option<&GameSession> {
        match &self.screen {
            Screen::InGame(session) => Some(session.as_ref()),
            Screen::Title => None,
        }
    }

    fn refresh_text(&self, world: &mut SceneWorld) {
        match self.session() {
            Some(session) => {
                world.set_hud_lines(hud_lines(session));
                world.set_banner_lines(banner_lines(session));
            }
            None => {
                world.set_hud_lines(Vec::new());
                world.set_banner_lines(title_banner());
            }
        }
    }
}

/// What a key press or click asked the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionRequest {
    TogglePause,
    Confirm,
    Buy(UpgradeKind),
    Restart,
    QuitToMenu,
}

impl SessionRequest {
    /// Clicks only buy while the shop icons are on screen.
    fn pressed(input: &InputSnapshot, shop_open: bool) -> Vec<SessionRequest> {
        let mut requests = Vec::new();
        if input.was_pressed(InputAction::Pause) {
            requests.push(SessionRequest::TogglePause);
        }
        if input.was_pressed(InputAction::Confirm) {
            requests.push(SessionRequest::Confirm);
        }
        for (action, kind) in [
            (InputAction::BuySpeed, UpgradeKind::Speed),
            (InputAction::BuyLuck, UpgradeKind::Luck),
            (InputAction::BuyBasket, UpgradeKind::Basket),
        ] {
            if input.was_pressed(action) {
                requests.push(SessionRequest::Buy(kind));
            }
        }
        if shop_open && input.pointer_pressed() {
            if let Some(kind) = input.pointer_down_position().and_then(shop_icon_at) {
                requests.push(SessionRequest::Buy(kind));
            }
        }
        if input.was_pressed(InputAction::Restart) {
            requests.push(SessionRequest::Restart);
        }
        if input.was_pressed(InputAction::Menu) {
            requests.push(SessionRequest::QuitToMenu);
        }
        requests
    }

    fn name(self) -> &'static str {
        match self {
            SessionRequest::TogglePause => "toggle_pause",
            SessionRequest::Confirm => "confirm",
            SessionRequest::Buy(_) => "buy",
            SessionRequest::Restart => "restart",
            SessionRequest::QuitToMenu => "quit_to_menu",
        }
    }
}

/// Returns `true` when the session asked to go back to the title screen.
fn apply_request(session: &mut GameSession, request: SessionRequest) -> Result<bool, GameError> {
    match request {
        SessionRequest::TogglePause if session.round().paused => session.resume().map(|()| false),
        SessionRequest::TogglePause => session.pause().map(|()| false),
        SessionRequest::Confirm => match session.phase() {
            RoundPhase::Playing if session.round().paused => session.resume().map(|()| false),
            RoundPhase::LevelComplete => session.continue_to_next_level().map(|()| false),
            RoundPhase::GameWin(_) => session.continue_after_win().map(|()| false),
            RoundPhase::GameOver => session.restart().map(|()| false),
            RoundPhase::Playing => Ok(false),
        },
        SessionRequest::Buy(kind) => session.purchase(kind).map(|_| false),
        SessionRequest::Restart => session.restart().map(|()| false),
        SessionRequest::QuitToMenu => session.quit_to_menu().map(|()| true),
    }
}

fn controls_from_input(input: &InputSnapshot) -> ControlInput {
    let mut controls = ControlInput {
        left: input.is_down(InputAction::MoveLeft),
        right: input.is_down(InputAction::MoveRight),
        jump: input.is_down(InputAction::Jump),
    };
    if let Some(pointer) = input.pointer_down_position() {
        if pointer.x < POINTER_LEFT_EDGE {
            controls.left = true;
        } else if pointer.x > POINTER_RIGHT_EDGE {
            controls.right = true;
        } else if pointer.y > GROUND_Y {
            controls.jump = true;
        }
    }
    controls
}

fn cue_for_event(event: &GameEvent) -> Option<SoundCue> {
    let name = match event {
        GameEvent::AppleCaught {
            kind: AppleKind::Golden,
            ..
        } => "golden-collect",
        GameEvent::AppleCaught { .. } => "collect",
        GameEvent::PlayerHit { .. } => "banana-hit",
        GameEvent::BananaDeflected { .. } => "banana-deflect",
        GameEvent::MonkeyTaunted { .. } => "monkey-laugh",
        GameEvent::GameOver => "gameover",
        GameEvent::GameWon { .. } => "gamewin",
        GameEvent::UpgradePurchased { .. } => "upgrade",
        GameEvent::Paused | GameEvent::Resumed => "select",
        GameEvent::RoundStarted { .. }
        | GameEvent::CountdownTick { .. }
        | GameEvent::AppleMushed
        | GameEvent::BananaThrown { .. }
        | GameEvent::MonkeyAppeared { .. }
        | GameEvent::MonkeyHidden { .. }
        | GameEvent::LevelEnded { .. } => return None,
    };
    Some(SoundCue(name))
}

fn forward_events(session: &mut GameSession, world: &mut SceneWorld) {
    for event in session.drain_events() {
        if let GameEvent::LevelEnded { .. } = event {
            if session.phase() == RoundPhase::LevelComplete {
                world.play_cue(SoundCue("stinger"));
            }
        }
        if let Some(cue) = cue_for_event(&event) {
            world.play_cue(cue);
        }
    }
}

impl Scene for OrchardScene {
    fn load(&mut self, world: &mut SceneWorld) {
        self.screen = Screen::Title;
        self.refresh_text(world);
        info!(
            world_width = world.size().width,
            world_height = world.size().height,
            "scene_loaded"
        );
    }

    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand {
        if input.quit_requested() {
            return SceneCommand::Quit;
        }

        if matches!(self.screen, Screen::Title) {
            if input.was_pressed(InputAction::Confirm) || input.pointer_pressed() {
                self.start_game(world);
            } else if input.was_pressed(InputAction::Pause) {
                return SceneCommand::Quit;
            }
            self.refresh_text(world);
            return SceneCommand::None;
        }
        let Screen::InGame(session) = &mut self.screen else {
            return SceneCommand::None;
        };

        let shop_open = session.phase() == RoundPhase::LevelComplete;
        let mut back_to_title = false;
        for request in SessionRequest::pressed(input, shop_open) {
            match apply_request(session, request) {
                Ok(true) => {
                    back_to_title = true;
                    break;
                }
                Ok(false) => {}
                Err(error) => debug!(
                    request = request.name(),
                    error = %error,
                    "transition_refused"
                ),
            }
        }
        if !back_to_title {
            session.tick(
                Duration::from_secs_f32(fixed_dt_seconds),
                controls_from_input(input),
            );
        }
        forward_events(session, world);

        if back_to_title {
            world.play_cue(SoundCue("select"));
            self.screen = Screen::Title;
        }
        self.refresh_text(world);
        SceneCommand::None
    }

    fn render(&mut self, world: &mut SceneWorld) {
        world.clear_sprites();
        push_backdrop(world);
        if let Some(session) = self.session() {
            push_session_sprites(session, world);
            if session.phase() == RoundPhase::LevelComplete {
                push_shop_icons(session, world);
            }
        }
    }

    fn unload(&mut self, world: &mut SceneWorld) {
        if let Screen::InGame(session) = &self.screen {
            info!(
                level = session.round().level,
                score = session.score(),
                total_apples = session.stats().total_apples,
                "scene_unloaded"
            );
        }
        self.screen = Screen::Title;
        world.clear_sprites();
    }

    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        let session = self.session()?;
        Some(format!(
            "Apple Catch | level {} | {} | apples {}",
            session.round().level,
            session.phase(),
            session.apples().live_count()
        ))
    }
}
