/// Arena rule constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArenaConfig {
    /// Highest level a monster can reach. Reward calls at this level fail.
    pub max_level: u32,

    /// Experience granted to the monster that lands the finishing blow.
    pub experience_reward: u32,

    /// Experience needed per level: `threshold(level) = level * factor`.
    pub level_threshold_factor: u32,
}

impl ArenaConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of monsters a side may bring into a battle.
    pub const MAX_ROSTER: usize = 4;
    /// Maximum number of skills in a monster type's skill set.
    pub const MAX_SKILLS: usize = 8;
    /// Largest supported bracket size.
    pub const MAX_TOURNAMENT_PLAYERS: usize = 64;
    /// Upper bound on minted monsters.
    pub const MAX_MONSTERS: usize = 10_000;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_LEVEL: u32 = 9;
    pub const DEFAULT_EXPERIENCE_REWARD: u32 = 5;
    pub const DEFAULT_LEVEL_THRESHOLD_FACTOR: u32 = 10;

    pub fn new() -> Self {
        Self {
            max_level: Self::DEFAULT_MAX_LEVEL,
            experience_reward: Self::DEFAULT_EXPERIENCE_REWARD,
            level_threshold_factor: Self::DEFAULT_LEVEL_THRESHOLD_FACTOR,
        }
    }

    pub fn with_max_level(mut self, max_level: u32) -> Self {
        self.max_level = max_level.max(1);
        self
    }

    pub fn with_experience_reward(mut self, experience_reward: u32) -> Self {
        self.experience_reward = experience_reward;
        self
    }

    /// Experience a monster at `level` must accumulate to reach `level + 1`.
    pub fn level_threshold(&self, level: u32) -> u32 {
        level.saturating_mul(self.level_threshold_factor)
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new()
    }
}
