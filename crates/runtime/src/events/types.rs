//! Event payloads that do not originate from a core notification.

use arena_core::{LevelOutcome, MonsterId, MonsterTypeId, PlayerId};
use serde::{Deserialize, Serialize};

/// Monster registry activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonsterEvent {
    /// A new level-1 monster was created.
    Minted {
        monster: MonsterId,
        owner: PlayerId,
        type_id: MonsterTypeId,
    },

    /// A monster gained experience, from a battle win or an owner reward.
    ExperienceRewarded(LevelOutcome),
}
