//! Hardcoded key bindings.

use pg_core::input::{InputState, Key};

use crate::fighter::FighterId;
use crate::physics::MoveIntent;

pub const FULLSCREEN_KEY: Key = Key::F11;
pub const DEBUG_PANEL_KEY: Key = Key::F3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    pub up: Key,
    pub down: Key,
    pub left: Key,
    pub right: Key,
    pub attack: Key,
    /// Shown in the lobby.
    pub summary: &'static str,
}

pub const FIGHTER_ONE: Bindings = Bindings {
    up: Key::W,
    down: Key::S,
    left: Key::A,
    right: Key::D,
    attack: Key::Space,
    summary: "W A S D + Space",
};

pub const FIGHTER_TWO: Bindings = Bindings {
    up: Key::Up,
    down: Key::Down,
    left: Key::Left,
    right: Key::Right,
    attack: Key::Enter,
    summary: "Arrows + Enter",
};

pub fn bindings(id: FighterId) -> &'static Bindings {
    match id {
        FighterId::One => &FIGHTER_ONE,
        FighterId::Two => &FIGHTER_TWO,
    }
}

impl Bindings {
    pub fn intent(&self, input: &InputState) -> MoveIntent {
        MoveIntent {
            left: input.is_held(self.left),
            right: input.is_held(self.right),
            up: input.is_held(self.up),
            down: input.is_held(self.down),
        }
    }

    pub fn attack_held(&self, input: &InputState) -> bool {
        input.is_held(self.attack)
    }
}
