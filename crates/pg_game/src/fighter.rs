//! Fighters and their weapons.

use crate::collision::Aabb;
use crate::constants::{
    FIGHTER_HEIGHT, FIGHTER_ONE_SPAWN_X, FIGHTER_SPEED, FIGHTER_TWO_SPAWN_INSET, FIGHTER_WIDTH,
    MAX_HEALTH, WEAPON_DAMAGE, WEAPON_HEIGHT, WEAPON_SENTINEL, WEAPON_WIDTH,
};
use crate::draw::{Canvas, Draw, Rgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FighterId {
    One,
    Two,
}

impl FighterId {
    pub const ALL: [FighterId; 2] = [FighterId::One, FighterId::Two];

    pub fn index(self) -> usize {
        match self {
            FighterId::One => 0,
            FighterId::Two => 1,
        }
    }

    pub fn opponent(self) -> FighterId {
        match self {
            FighterId::One => FighterId::Two,
            FighterId::Two => FighterId::One,
        }
    }

    pub fn default_name(self) -> &'static str {
        match self {
            FighterId::One => "Player 1",
            FighterId::Two => "Player 2",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            FighterId::One => Rgb::RED,
            FighterId::Two => Rgb::BLUE,
        }
    }
}

impl std::fmt::Display for FighterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fighter {}", self.index() + 1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fighter {
    pub id: FighterId,
    pub aabb: Aabb,
    pub velocity_y: f32,
    pub health: u32,
    pub airborne: bool,
    pub speed: f32,
    pub color: Rgb,
    pub name: String,
}

impl Fighter {
    pub fn new(id: FighterId, x: f32, y: f32, name: &str) -> Self {
        Self {
            id,
            aabb: Aabb::new(x, y, FIGHTER_WIDTH, FIGHTER_HEIGHT),
            velocity_y: 0.0,
            health: MAX_HEALTH,
            airborne: false,
            speed: FIGHTER_SPEED,
            color: id.color(),
            name: name.to_owned(),
        }
    }

    /// Fresh fighter at its side's spawn point: Fighter 1 near the left edge,
    /// Fighter 2 near the right, both at half height.
    pub fn spawn(id: FighterId, viewport_width: u32, viewport_height: u32, name: &str) -> Self {
        let x = match id {
            FighterId::One => FIGHTER_ONE_SPAWN_X,
            FighterId::Two => viewport_width as f32 - FIGHTER_TWO_SPAWN_INSET,
        };
        Self::new(id, x, viewport_height as f32 / 2.0, name)
    }

    pub fn center(&self) -> (f32, f32) {
        self.aabb.center()
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount).min(MAX_HEALTH);
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }
}

impl Draw for Fighter {
    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.fill_rect(self.aabb, self.color);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    pub owner: FighterId,
    pub active: bool,
    pub damage: u32,
    pub aabb: Aabb,
}

impl Weapon {
    pub fn new(owner: FighterId) -> Self {
        Self {
            owner,
            active: false,
            damage: WEAPON_DAMAGE,
            aabb: Self::stowed_aabb(),
        }
    }

    pub fn stowed_aabb() -> Aabb {
        Aabb::new(
            WEAPON_SENTINEL.0,
            WEAPON_SENTINEL.1,
            WEAPON_WIDTH,
            WEAPON_HEIGHT,
        )
    }

    pub fn is_stowed(&self) -> bool {
        self.aabb == Self::stowed_aabb()
    }

    /// Center the weapon on its owner, or park it off-stage.
    pub fn follow(&mut self, owner: &Fighter) {
        self.aabb = if self.active {
            let (cx, cy) = owner.center();
            Aabb::centered_on(cx, cy, WEAPON_WIDTH, WEAPON_HEIGHT)
        } else {
            Self::stowed_aabb()
        };
    }
}

impl Draw for Weapon {
    fn draw(&self, canvas: &mut dyn Canvas) {
        if self.active {
            canvas.fill_rect(self.aabb, self.owner.color());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawList;

    #[test]
    fn spawn_points_follow_viewport() {
        let one = Fighter::spawn(FighterId::One, 800, 600, "Player 1");
        let two = Fighter::spawn(FighterId::Two, 800, 600, "Player 2");
        assert_eq!((one.aabb.x, one.aabb.y), (100.0, 300.0));
        assert_eq!((two.aabb.x, two.aabb.y), (650.0, 300.0));
        assert_eq!(one.health, MAX_HEALTH);
        assert_eq!(one.color, Rgb::RED);
        assert_eq!(two.color, Rgb::BLUE);
        assert!(!one.airborne);
    }

    #[test]
    fn damage_saturates_at_zero() {
        let mut fighter = Fighter::spawn(FighterId::One, 800, 600, "a");
        fighter.health = 3;
        fighter.take_damage(WEAPON_DAMAGE);
        assert_eq!(fighter.health, 0);
        assert!(fighter.is_defeated());
    }

    #[test]
    fn weapon_follows_owner_center_when_active() {
        let fighter = Fighter::new(FighterId::One, 100.0, 300.0, "a");
        let mut weapon = Weapon::new(FighterId::One);
        assert!(weapon.is_stowed());

        weapon.active = true;
        weapon.follow(&fighter);
        assert_eq!(weapon.aabb.center(), (125.0, 325.0));

        weapon.active = false;
        weapon.follow(&fighter);
        assert!(weapon.is_stowed());
        assert_eq!((weapon.aabb.x, weapon.aabb.y), WEAPON_SENTINEL);
    }

    #[test]
    fn inactive_weapon_draws_nothing() {
        let mut list = DrawList::new();
        Weapon::new(FighterId::Two).draw(&mut list);
        assert!(list.commands.is_empty());
    }

    #[test]
    fn display_names_fighter_slot() {
        assert_eq!(FighterId::One.to_string(), "Fighter 1");
        assert_eq!(FighterId::Two.opponent(), FighterId::One);
    }
}
