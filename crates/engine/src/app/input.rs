#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Jump,
    Pause,
    Confirm,
    BuySpeed,
    BuyLuck,
    BuyBasket,
    Restart,
    Menu,
}

const ACTION_COUNT: usize = 10;

/// Held state plus a one-tick press edge per action.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
    pressed: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        let index = action.index();
        if is_down && !self.down[index] {
            self.pressed[index] = true;
        }
        self.down[index] = is_down;
    }

    pub(crate) fn mark_pressed(&mut self, action: InputAction) {
        self.pressed[action.index()] = true;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    pub(crate) fn was_pressed(&self, action: InputAction) -> bool {
        self.pressed[action.index()]
    }

    pub(crate) fn clear_edges(&mut self) {
        self.pressed = [false; ACTION_COUNT];
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveLeft => 0,
            InputAction::MoveRight => 1,
            InputAction::Jump => 2,
            InputAction::Pause => 3,
            InputAction::Confirm => 4,
            InputAction::BuySpeed => 5,
            InputAction::BuyLuck => 6,
            InputAction::BuyBasket => 7,
            InputAction::Restart => 8,
            InputAction::Menu => 9,
        }
    }
}
