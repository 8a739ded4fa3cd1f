//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers one async method per
//! arena operation, plus helpers for streaming events from specific topics.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};

use arena_core::{
    Battle, BattleId, LevelOutcome, MonsterId, MonsterInstance, MonsterType, MonsterTypeId,
    Player, PlayerId, Skill, SkillId, SkillOutcome, Tournament, TournamentId,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::oracle::CatalogOracleImpl;
use crate::state::ArenaState;
use crate::workers::{CatalogCommand, Command};

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    catalog: Arc<CatalogOracleImpl>,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        catalog: Arc<CatalogOracleImpl>,
    ) -> Self {
        Self {
            command_tx,
            event_bus,
            catalog,
        }
    }

    /// Sends a command built around a fresh reply channel and awaits the
    /// worker's answer.
    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    // ===== monsters =====

    /// Mint a level-1 monster of `type_id` for `owner`
    pub async fn mint(&self, owner: PlayerId, type_id: MonsterTypeId) -> Result<MonsterId> {
        self.request(|reply| Command::Mint {
            owner,
            type_id,
            reply,
        })
        .await?
    }

    /// Owner edit of current health. Rejected with `MonsterBusy` while the
    /// monster is fielded in an unfinished battle, like the other owner edits.
    pub async fn set_monster_health(
        &self,
        caller: PlayerId,
        monster: MonsterId,
        health: u32,
    ) -> Result<()> {
        self.request(|reply| Command::SetMonsterHealth {
            caller,
            monster,
            health,
            reply,
        })
        .await?
    }

    /// Overwrite the leading cooldown slots of a monster
    pub async fn set_monster_cooldowns(
        &self,
        caller: PlayerId,
        monster: MonsterId,
        cooldowns: Vec<u32>,
    ) -> Result<()> {
        self.request(|reply| Command::SetMonsterCooldowns {
            caller,
            monster,
            cooldowns,
            reply,
        })
        .await?
    }

    pub async fn reward_experience(
        &self,
        caller: PlayerId,
        monster: MonsterId,
        amount: u32,
    ) -> Result<LevelOutcome> {
        self.request(|reply| Command::RewardExperience {
            caller,
            monster,
            amount,
            reply,
        })
        .await?
    }

    // ===== battles =====

    /// Enter public matchmaking with the given roster
    pub async fn start_battle(&self, caller: PlayerId, monsters: Vec<MonsterId>) -> Result<BattleId> {
        self.request(|reply| Command::StartBattle {
            caller,
            monsters,
            reply,
        })
        .await?
    }

    /// Challenge (or accept a challenge from) a specific opponent
    pub async fn join_battle(
        &self,
        caller: PlayerId,
        opponent: PlayerId,
        monsters: Vec<MonsterId>,
    ) -> Result<BattleId> {
        self.request(|reply| Command::JoinBattle {
            caller,
            opponent,
            monsters,
            reply,
        })
        .await?
    }

    pub async fn use_skill(
        &self,
        caller: PlayerId,
        battle: BattleId,
        attacker: MonsterId,
        target: MonsterId,
        skill: SkillId,
    ) -> Result<SkillOutcome> {
        self.request(|reply| Command::UseSkill {
            caller,
            battle,
            attacker,
            target,
            skill,
            reply,
        })
        .await?
    }

    // ===== tournaments =====

    pub async fn create_tournament(
        &self,
        host: PlayerId,
        max_player_num: u32,
    ) -> Result<TournamentId> {
        self.request(|reply| Command::CreateTournament {
            host,
            max_player_num,
            reply,
        })
        .await?
    }

    pub async fn join_tournament(&self, caller: PlayerId, tournament: TournamentId) -> Result<()> {
        self.request(|reply| Command::JoinTournament {
            caller,
            tournament,
            reply,
        })
        .await?
    }

    pub async fn set_tournament_monsters(
        &self,
        caller: PlayerId,
        tournament: TournamentId,
        monsters: Vec<MonsterId>,
    ) -> Result<()> {
        self.request(|reply| Command::SetTournamentMonsters {
            caller,
            tournament,
            monsters,
            reply,
        })
        .await?
    }

    pub async fn mark_player_ready(
        &self,
        caller: PlayerId,
        tournament: TournamentId,
    ) -> Result<()> {
        self.request(|reply| Command::MarkPlayerReady {
            caller,
            tournament,
            reply,
        })
        .await?
    }

    /// Start round 0 (host only)
    pub async fn start_tournament(&self, caller: PlayerId, tournament: TournamentId) -> Result<()> {
        self.request(|reply| Command::StartTournament {
            caller,
            tournament,
            reply,
        })
        .await?
    }

    // ===== catalog administration =====

    pub async fn add_monster_type(&self, monster_type: MonsterType) -> Result<MonsterTypeId> {
        self.request(|reply| {
            Command::Catalog(CatalogCommand::AddMonsterType {
                monster_type,
                reply,
            })
        })
        .await?
    }

    pub async fn update_monster_type(
        &self,
        id: MonsterTypeId,
        monster_type: MonsterType,
    ) -> Result<()> {
        self.request(|reply| {
            Command::Catalog(CatalogCommand::UpdateMonsterType {
                id,
                monster_type,
                reply,
            })
        })
        .await?
    }

    pub async fn add_skill(&self, skill: Skill) -> Result<SkillId> {
        self.request(|reply| Command::Catalog(CatalogCommand::AddSkill { skill, reply }))
            .await?
    }

    pub async fn update_skill(&self, id: SkillId, skill: Skill) -> Result<()> {
        self.request(|reply| Command::Catalog(CatalogCommand::UpdateSkill { id, skill, reply }))
            .await?
    }

    pub async fn add_skill_to_type(&self, type_id: MonsterTypeId, skill: SkillId) -> Result<()> {
        self.request(|reply| {
            Command::Catalog(CatalogCommand::AddSkillToType {
                type_id,
                skill,
                reply,
            })
        })
        .await?
    }

    /// Remove the skill at `index` of the type's skill set, returning it.
    /// Cooldowns of existing monsters of the type shift with their skills.
    pub async fn remove_skill_from_type(
        &self,
        type_id: MonsterTypeId,
        index: usize,
    ) -> Result<SkillId> {
        self.request(|reply| {
            Command::Catalog(CatalogCommand::RemoveSkillFromType {
                type_id,
                index,
                reply,
            })
        })
        .await?
    }

    /// Read access to the catalog. Reads never wait on the worker.
    pub fn catalog(&self) -> &CatalogOracleImpl {
        &self.catalog
    }

    // ===== queries =====

    /// Query the current arena state (read-only snapshot)
    pub async fn query_state(&self) -> Result<ArenaState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    pub async fn battle(&self, id: BattleId) -> Result<Option<Battle>> {
        Ok(self.query_state().await?.battle(id).cloned())
    }

    pub async fn tournament(&self, id: TournamentId) -> Result<Option<Tournament>> {
        Ok(self.query_state().await?.tournament(id).cloned())
    }

    pub async fn player(&self, tournament: TournamentId, player: PlayerId) -> Result<Option<Player>> {
        Ok(self.query_state().await?.player(tournament, player).cloned())
    }

    pub async fn monster(&self, id: MonsterId) -> Result<Option<MonsterInstance>> {
        Ok(self.query_state().await?.monster(id).cloned())
    }

    // ===== events =====

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Battle` - battle created, skill used, battle ended
    /// - `Topic::Tournament` - tournament lifecycle
    /// - `Topic::Monster` - minting and experience rewards
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
