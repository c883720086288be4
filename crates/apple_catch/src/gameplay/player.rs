use engine::{Body, Vec2};

pub(crate) const PLAYER_SPAWN: Vec2 = Vec2::new(288.0, 500.0);
const BASE_HALF_WIDTH: f32 = 32.0;
const HALF_HEIGHT: f32 = 64.0;
const PLAYER_GRAVITY_Y: f32 = 1000.0;
const JUMP_VELOCITY_Y: f32 = -600.0;
const PLAYER_BOUNCE: f32 = 0.2;

/// Held-key view of the controls for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ControlInput {
    pub(crate) left: bool,
    pub(crate) right: bool,
    pub(crate) jump: bool,
}

/// Which basket the player carries. Armoured baskets track the deflect
/// charges still left on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlayerLook {
    Basket { degree: u32 },
    ArmoredBasket { charges: u32 },
}

impl PlayerLook {
    pub(crate) fn for_basket(degree: u32, charges: u32) -> Self {
        if degree >= 2 && charges > 0 {
            PlayerLook::ArmoredBasket { charges }
        } else {
            PlayerLook::Basket {
                degree: degree.min(2),
            }
        }
    }

    pub(crate) fn sprite_key(self) -> &'static str {
        match self {
            PlayerLook::Basket { degree: 0 } => "player/b0",
            PlayerLook::Basket { degree: 1 } => "player/b1",
            PlayerLook::Basket { .. } => "player/b2",
            PlayerLook::ArmoredBasket { charges: 0 } => "player/b2_0",
            PlayerLook::ArmoredBasket { charges: 1 } => "player/b2_1",
            PlayerLook::ArmoredBasket { .. } => "player/b2",
        }
    }

    /// One tier down after a deflect.
    pub(crate) fn downgraded(self) -> Self {
        match self {
            PlayerLook::ArmoredBasket { charges } => PlayerLook::ArmoredBasket {
                charges: charges.saturating_sub(1),
            },
            basket => basket,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Player {
    pub(crate) body: Body,
    look: PlayerLook,
    deflect_charges: u32,
    stun_ticks_left: u32,
}

impl Player {
    pub(crate) fn new(basket_degree: u32, deflect_charges: u32) -> Self {
        let half_width = BASE_HALF_WIDTH * (1 + basket_degree.min(2)) as f32;
        let body = Body::new(PLAYER_SPAWN, Vec2::new(half_width, HALF_HEIGHT))
            .with_gravity_y(PLAYER_GRAVITY_Y)
            .with_bounce(PLAYER_BOUNCE)
            .with_world_bounds(true);
        Self {
            body,
            look: PlayerLook::for_basket(basket_degree, deflect_charges),
            deflect_charges,
            stun_ticks_left: 0,
        }
    }

    pub(crate) fn look(&self) -> PlayerLook {
        self.look
    }

    pub(crate) fn deflect_charges(&self) -> u32 {
        self.deflect_charges
    }

    #[cfg(test)]
    pub(crate) fn stun_ticks_left(&self) -> u32 {
        self.stun_ticks_left
    }

    pub(crate) fn is_stunned(&self) -> bool {
        self.stun_ticks_left > 0
    }

    /// Applies one tick of input. A stunned player keeps the knock-back
    /// velocity and ignores the controls until the stun runs out.
    pub(crate) fn apply_controls(&mut self, controls: ControlInput, walk_speed: f32) {
        if self.stun_ticks_left > 0 {
            self.stun_ticks_left -= 1;
            return;
        }

        self.body.velocity.x = match (controls.left, controls.right) {
            (true, false) => -walk_speed,
            (false, true) => walk_speed,
            _ => 0.0,
        };
        if controls.jump && self.body.blocked.down {
            self.body.velocity.y = JUMP_VELOCITY_Y;
        }
    }

    pub(crate) fn knock_back(&mut self, stun_ticks: u32) {
        self.body.velocity = Vec2::new(-self.body.velocity.x, -self.body.velocity.y);
        self.stun_ticks_left = stun_ticks;
    }

    pub(crate) fn try_consume_deflect(&mut self) -> bool {
        if self.deflect_charges == 0 {
            return false;
        }
        self.deflect_charges -= 1;
        self.look = self.look.downgraded();
        true
    }
}
