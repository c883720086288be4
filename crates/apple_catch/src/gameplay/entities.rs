use engine::{Body, Vec2};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) fn perch(self) -> Vec2 {
        match self {
            Side::Left => Vec2::new(110.0, 260.0),
            Side::Right => Vec2::new(335.0, 340.0),
        }
    }

    pub(crate) fn as_token(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AppleKind {
    Normal,
    Golden,
    Mush { from_golden: bool },
}

impl AppleKind {
    pub(crate) fn is_collectable(self) -> bool {
        !matches!(self, AppleKind::Mush { .. })
    }

    pub(crate) fn to_mush(self) -> AppleKind {
        match self {
            AppleKind::Normal => AppleKind::Mush { from_golden: false },
            AppleKind::Golden => AppleKind::Mush { from_golden: true },
            mush => mush,
        }
    }

    pub(crate) fn as_token(self) -> &'static str {
        match self {
            AppleKind::Normal => "normal",
            AppleKind::Golden => "golden",
            AppleKind::Mush { .. } => "mush",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Apple {
    pub(crate) body: Body,
    pub(crate) kind: AppleKind,
    alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct AppleId(usize);

/// Slot arena for apples. Caught normal apples go to the recycle list and are
/// preferred for the next normal spawn; every other released slot goes to
/// the vacant list.
#[derive(Debug, Default)]
pub(crate) struct ApplePool {
    slots: Vec<Apple>,
    recycled: Vec<usize>,
    vacant: Vec<usize>,
}

impl ApplePool {
    pub(crate) fn spawn(&mut self, kind: AppleKind, body: Body) -> AppleId {
        let reuse = match kind {
            AppleKind::Normal => self.recycled.pop().or_else(|| self.vacant.pop()),
            _ => self.vacant.pop().or_else(|| self.recycled.pop()),
        };
        let apple = Apple {
            body,
            kind,
            alive: true,
        };
        match reuse {
            Some(index) => {
                self.slots[index] = apple;
                AppleId(index)
            }
            None => {
                self.slots.push(apple);
                AppleId(self.slots.len() - 1)
            }
        }
    }

    /// Frees the slot of a caught apple.
    pub(crate) fn release(&mut self, id: AppleId) {
        let Some(apple) = self.slots.get_mut(id.0).filter(|apple| apple.alive) else {
            return;
        };
        apple.alive = false;
        if apple.kind == AppleKind::Normal {
            self.recycled.push(id.0);
        } else {
            self.vacant.push(id.0);
        }
    }

    pub(crate) fn get(&self, id: AppleId) -> Option<&Apple> {
        self.slots.get(id.0).filter(|apple| apple.alive)
    }

    pub(crate) fn live_ids(&self) -> Vec<AppleId> {
        self.iter_live().map(|(id, _)| id).collect()
    }

    pub(crate) fn iter_live(&self) -> impl Iterator<Item = (AppleId, &Apple)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, apple)| apple.alive)
            .map(|(index, apple)| (AppleId(index), apple))
    }

    pub(crate) fn iter_live_mut(&mut self) -> impl Iterator<Item = &mut Apple> {
        self.slots.iter_mut().filter(|apple| apple.alive)
    }

    pub(crate) fn live_count(&self) -> usize {
        self.slots.iter().filter(|apple| apple.alive).count()
    }

    #[cfg(test)]
    pub(crate) fn recycled_count(&self) -> usize {
        self.recycled.len()
    }

    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.recycled.clear();
        self.vacant.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Banana {
    pub(crate) body: Body,
    pub(crate) thrown_from: Side,
    /// A deflected banana no longer strikes the player.
    pub(crate) deflected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Monkey {
    pub(crate) side: Side,
    pub(crate) visible: bool,
}

/// The two perched monkeys. At most one is active per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Troop {
    left: Monkey,
    right: Monkey,
}

impl Default for Troop {
    fn default() -> Self {
        Self {
            left: Monkey {
                side: Side::Left,
                visible: false,
            },
            right: Monkey {
                side: Side::Right,
                visible: false,
            },
        }
    }
}

impl Troop {
    pub(crate) fn get(&self, side: Side) -> &Monkey {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn get_mut(&mut self, side: Side) -> &mut Monkey {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub(crate) fn is_visible(&self, side: Side) -> bool {
        self.get(side).visible
    }

    /// Random side when both are free, the free one otherwise, `None` when
    /// both monkeys are already out.
    pub(crate) fn choose_inactive_side(&self, rng: &mut impl Rng) -> Option<Side> {
        match (self.left.visible, self.right.visible) {
            (false, false) => Some(if rng.gen_bool(0.5) {
                Side::Left
            } else {
                Side::Right
            }),
            (true, false) => Some(Side::Right),
            (false, true) => Some(Side::Left),
            (true, true) => None,
        }
    }

    pub(crate) fn show(&mut self, side: Side) {
        self.get_mut(side).visible = true;
    }

    pub(crate) fn hide(&mut self, side: Side) {
        self.get_mut(side).visible = false;
    }

    pub(crate) fn hide_all(&mut self) {
        self.left.visible = false;
        self.right.visible = false;
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Monkey> {
        [&self.left, &self.right].into_iter()
    }
}
