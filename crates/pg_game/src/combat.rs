//! Weapon activation and hit resolution.
//!
//! Weapons are level-triggered: active exactly while the attack key is held,
//! and every tick of overlap deals damage again.

use crate::fighter::{Fighter, FighterId, Weapon};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub attacker: FighterId,
    pub target: FighterId,
    pub damage: u32,
}

pub fn update_weapon(weapon: &mut Weapon, owner: &Fighter, attack_held: bool) {
    weapon.active = attack_held;
    weapon.follow(owner);
}

/// Apply damage for every weapon overlapping the opposing fighter.
/// Weapon boxes are fixed before any damage lands, so order does not matter.
pub fn resolve_hits(weapons: &[Weapon; 2], fighters: &mut [Fighter; 2]) -> Vec<Hit> {
    let mut hits = Vec::new();
    for weapon in weapons {
        if !weapon.active {
            continue;
        }
        let target = &mut fighters[weapon.owner.opponent().index()];
        if weapon.aabb.intersects(&target.aabb) {
            target.take_damage(weapon.damage);
            hits.push(Hit {
                attacker: weapon.owner,
                target: target.id,
                damage: weapon.damage,
            });
        }
    }
    hits
}
