//! Skill magnitude calculation and application.

/// Calculate the magnitude of a skill.
///
/// # Formula
///
/// ```text
/// magnitude = floor(attack × damage_multiplier_percent / 100)
/// ```
///
/// The same magnitude is used as damage for Physical/Special skills and as
/// restored health for Heal skills.
pub fn calculate_magnitude(attack: u32, damage_multiplier_percent: u32) -> u32 {
    let magnitude = u64::from(attack) * u64::from(damage_multiplier_percent) / 100;
    u32::try_from(magnitude).unwrap_or(u32::MAX)
}

/// Apply damage to current health.
///
/// # Returns
///
/// New health value (clamped to 0)
pub fn apply_damage(current_health: u32, damage: u32) -> u32 {
    current_health.saturating_sub(damage)
}

/// Apply healing to current health.
///
/// # Returns
///
/// New health value (clamped to `max_health`)
pub fn apply_heal(current_health: u32, amount: u32, max_health: u32) -> u32 {
    current_health.saturating_add(amount).min(max_health)
}
