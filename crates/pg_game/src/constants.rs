//! Gameplay tuning. Units are logical pixels and ticks (60 per second).

pub const FIGHTER_WIDTH: f32 = 50.0;
pub const FIGHTER_HEIGHT: f32 = 50.0;
pub const FIGHTER_SPEED: f32 = 5.0;
pub const GRAVITY: f32 = 0.8;
pub const JUMP_IMPULSE: f32 = -15.0;
pub const MAX_HEALTH: u32 = 100;

pub const FIGHTER_ONE_SPAWN_X: f32 = 100.0;
/// Fighter 2 spawns this far left of the right edge.
pub const FIGHTER_TWO_SPAWN_INSET: f32 = 150.0;

pub const WEAPON_WIDTH: f32 = 10.0;
pub const WEAPON_HEIGHT: f32 = 40.0;
pub const WEAPON_DAMAGE: u32 = 5;
/// Off-stage parking spot for inactive weapons (top-left corner of the box).
pub const WEAPON_SENTINEL: (f32, f32) = (-100.0, -100.0);

pub const NAME_MAX_CHARS: usize = 12;

pub const BODY_FONT_PX: f32 = 24.0;
pub const TITLE_FONT_PX: f32 = 64.0;

pub const HEALTH_BAR_SCALE: f32 = 2.0;
pub const HEALTH_BAR_HEIGHT: f32 = 30.0;
pub const HEALTH_BAR_MARGIN: f32 = 50.0;
pub const HEALTH_BAR_TOP: f32 = 35.0;

pub const BUTTON_HOVER_LIGHTEN: u8 = 30;
/// Below this viewport width, widgets with a short label show it instead.
pub const COMPACT_VIEWPORT_WIDTH: u32 = 1024;
