//! Shared setup for runtime integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use arena_core::{MonsterType, MonsterTypeId, PlayerId, Skill, SkillId, SkillType};
use arena_runtime::{CatalogOracleImpl, Runtime, RuntimeHandle};

pub const ALICE: PlayerId = PlayerId(1);
pub const BOB: PlayerId = PlayerId(2);
pub const CAROL: PlayerId = PlayerId(3);
pub const DAVE: PlayerId = PlayerId(4);

pub const FIRE_BREATH: SkillId = SkillId(0);
pub const MENDING: SkillId = SkillId(1);

/// attack 10, health 100
pub const DRAGON: MonsterTypeId = MonsterTypeId(0);
/// attack 10, health 15
pub const WISP: MonsterTypeId = MonsterTypeId(1);
/// attack 10, health 10: every hit is a knockout
pub const SPRITE: MonsterTypeId = MonsterTypeId(2);

pub fn catalog() -> Arc<CatalogOracleImpl> {
    let catalog = CatalogOracleImpl::new();
    catalog
        .add_skill(Skill::new("Fire Breath", 100, SkillType::Physical, 0))
        .unwrap();
    catalog
        .add_skill(Skill::new("Mending", 50, SkillType::Heal, 1))
        .unwrap();
    catalog
        .add_monster_type(
            MonsterType::new("Dragon", 10, 100, 5, 10)
                .with_skill(FIRE_BREATH)
                .with_skill(MENDING),
        )
        .unwrap();
    catalog
        .add_monster_type(MonsterType::new("Wisp", 10, 15, 5, 10).with_skill(FIRE_BREATH))
        .unwrap();
    catalog
        .add_monster_type(MonsterType::new("Sprite", 10, 10, 0, 0).with_skill(FIRE_BREATH))
        .unwrap();
    Arc::new(catalog)
}

pub async fn start() -> (Runtime, RuntimeHandle) {
    let runtime = Runtime::builder()
        .catalog(catalog())
        .build()
        .await
        .expect("runtime should start");
    let handle = runtime.handle();
    (runtime, handle)
}
