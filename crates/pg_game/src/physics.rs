//! Per-tick fighter movement: walking, jumping, gravity, floor and walls.
//!
//! Order within a tick is fixed: horizontal step, wall clamp, jump, gravity,
//! vertical integration, floor clamp. Velocities are in pixels per tick.

use crate::constants::{FIGHTER_HEIGHT, FIGHTER_WIDTH, GRAVITY, JUMP_IMPULSE};
use crate::fighter::Fighter;
use crate::viewport::ViewportState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    /// Bound, but movement ignores it.
    #[allow(dead_code)]
    pub down: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn of(viewport: &ViewportState) -> Self {
        Self {
            width: viewport.width as f32,
            height: viewport.height as f32,
        }
    }

    fn max_x(&self) -> f32 {
        (self.width - FIGHTER_WIDTH).max(0.0)
    }
}

pub fn advance(fighter: &mut Fighter, intent: MoveIntent, bounds: Bounds) {
    if intent.left && fighter.aabb.left() > 0.0 {
        fighter.aabb.x -= fighter.speed;
    }
    if intent.right && fighter.aabb.right() < bounds.width {
        fighter.aabb.x += fighter.speed;
    }
    clamp_x(fighter, bounds);

    if intent.up && !fighter.airborne {
        fighter.velocity_y = JUMP_IMPULSE;
        fighter.airborne = true;
    }

    fighter.velocity_y += GRAVITY;
    fighter.aabb.y += fighter.velocity_y;

    if fighter.aabb.bottom() > bounds.height {
        fighter.aabb.y = bounds.height - FIGHTER_HEIGHT;
        fighter.velocity_y = 0.0;
        fighter.airborne = false;
    }
}

/// Pull a fighter back inside `[0, width - FIGHTER_WIDTH]` and onto the floor.
/// Used after the viewport shrinks.
pub fn clamp_into(fighter: &mut Fighter, bounds: Bounds) {
    clamp_x(fighter, bounds);
    if fighter.aabb.bottom() > bounds.height {
        fighter.aabb.y = bounds.height - FIGHTER_HEIGHT;
        fighter.velocity_y = 0.0;
        fighter.airborne = false;
    }
}

fn clamp_x(fighter: &mut Fighter, bounds: Bounds) {
    fighter.aabb.x = fighter.aabb.x.clamp(0.0, bounds.max_x());
}
