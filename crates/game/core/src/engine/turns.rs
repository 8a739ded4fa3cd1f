//! Turn ownership and cooldown bookkeeping.

use crate::state::{Battle, Cooldowns};

/// Cooldowns as seen at the start of the acting monster's turn: every
/// counter ticks down by one, floored at zero.
pub fn tick_cooldowns(cooldowns: &Cooldowns) -> Cooldowns {
    cooldowns.iter().map(|&turns| turns.saturating_sub(1)).collect()
}

/// Gives the turn to the other side.
pub fn pass_turn(battle: &mut Battle) {
    battle.turn_owner = battle.turn_owner.opposite();
}

/// Index of the first monster still standing, given each monster's health
/// in roster order.
pub fn first_standing(health: &[u32]) -> Option<usize> {
    health.iter().position(|&hp| hp > 0)
}
