//! Arcade-style bodies: axis-aligned boxes with velocity, per-body extra
//! gravity, and a bounce factor applied when the box hits the world bounds.
//! Coordinates are world pixels, y-down.

use crate::app::Vec2;

/// Vertical speed below which a bounce off the bounds settles to rest.
const REST_SPEED: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub const fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.half_extents.x
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.half_extents.x
    }

    pub fn top(&self) -> f32 {
        self.center.y - self.half_extents.y
    }

    pub fn bottom(&self) -> f32 {
        self.center.y + self.half_extents.y
    }

    /// Touching edges do not count as overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl WorldBounds {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn intersects(&self, aabb: &Aabb) -> bool {
        aabb.right() > self.min.x
            && aabb.left() < self.max.x
            && aabb.bottom() > self.min.y
            && aabb.top() < self.max.y
    }
}

/// Which bounds edges the body was pushed back from during the last step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockedFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub half_extents: Vec2,
    /// Added on top of the world gravity.
    pub gravity_y: f32,
    pub bounce: f32,
    pub collide_world_bounds: bool,
    pub blocked: BlockedFlags,
}

impl Body {
    pub fn new(position: Vec2, half_extents: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            half_extents,
            gravity_y: 0.0,
            bounce: 0.0,
            collide_world_bounds: false,
            blocked: BlockedFlags::default(),
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_gravity_y(mut self, gravity_y: f32) -> Self {
        self.gravity_y = gravity_y;
        self
    }

    pub fn with_bounce(mut self, bounce: f32) -> Self {
        self.bounce = bounce.clamp(0.0, 1.0);
        self
    }

    pub fn with_world_bounds(mut self, collide: bool) -> Self {
        self.collide_world_bounds = collide;
        self
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position, self.half_extents)
    }

    /// Semi-implicit Euler step followed by bounds resolution.
    pub fn integrate(&mut self, dt_seconds: f32, world_gravity_y: f32, bounds: &WorldBounds) {
        self.blocked = BlockedFlags::default();
        self.velocity.y += (world_gravity_y + self.gravity_y) * dt_seconds;
        self.position = self.position + self.velocity * dt_seconds;
        if self.collide_world_bounds {
            self.resolve_world_bounds(bounds);
        }
    }

    fn resolve_world_bounds(&mut self, bounds: &WorldBounds) {
        let half = self.half_extents;

        if self.position.y + half.y >= bounds.max.y {
            self.position.y = bounds.max.y - half.y;
            if self.velocity.y > 0.0 {
                self.velocity.y = settle(-self.velocity.y * self.bounce);
            }
            self.blocked.down = true;
        } else if self.position.y - half.y <= bounds.min.y {
            self.position.y = bounds.min.y + half.y;
            if self.velocity.y < 0.0 {
                self.velocity.y = settle(-self.velocity.y * self.bounce);
            }
            self.blocked.up = true;
        }

        if self.position.x - half.x <= bounds.min.x {
            self.position.x = bounds.min.x + half.x;
            if self.velocity.x < 0.0 {
                self.velocity.x = -self.velocity.x * self.bounce;
            }
            self.blocked.left = true;
        } else if self.position.x + half.x >= bounds.max.x {
            self.position.x = bounds.max.x - half.x;
            if self.velocity.x > 0.0 {
                self.velocity.x = -self.velocity.x * self.bounce;
            }
            self.blocked.right = true;
        }
    }
}

fn settle(velocity: f32) -> f32 {
    if velocity.abs() < REST_SPEED {
        0.0
    } else {
        velocity
    }
}
