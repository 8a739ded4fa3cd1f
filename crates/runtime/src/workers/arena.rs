//! Arena worker that owns the authoritative [`ArenaState`].
//!
//! Receives commands from [`crate::RuntimeHandle`], runs them through the
//! rules of `arena-core` and publishes the resulting notifications to the
//! [`EventBus`]. Commands are handled one at a time, so no two operations
//! ever interleave.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use arena_core::{
    ArenaConfig, ArenaEnv, ArenaError, BattleEngine, BattleId, CatalogOracle, IgnoreOutcomes,
    LevelOutcome, MonsterId, MonsterType, MonsterTypeId, Notification, PlayerId, Skill, SkillId,
    SkillOutcome, TournamentId, reward_registered,
};

use crate::api::Result;
use crate::events::{EventBus, MonsterEvent};
use crate::oracle::CatalogOracleImpl;
use crate::state::ArenaState;

/// Commands that can be sent to the arena worker
pub enum Command {
    Mint {
        owner: PlayerId,
        type_id: MonsterTypeId,
        reply: oneshot::Sender<Result<MonsterId>>,
    },
    SetMonsterHealth {
        caller: PlayerId,
        monster: MonsterId,
        health: u32,
        reply: oneshot::Sender<Result<()>>,
    },
    SetMonsterCooldowns {
        caller: PlayerId,
        monster: MonsterId,
        cooldowns: Vec<u32>,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Owner-initiated experience reward.
    RewardExperience {
        caller: PlayerId,
        monster: MonsterId,
        amount: u32,
        reply: oneshot::Sender<Result<LevelOutcome>>,
    },
    StartBattle {
        caller: PlayerId,
        monsters: Vec<MonsterId>,
        reply: oneshot::Sender<Result<BattleId>>,
    },
    JoinBattle {
        caller: PlayerId,
        opponent: PlayerId,
        monsters: Vec<MonsterId>,
        reply: oneshot::Sender<Result<BattleId>>,
    },
    UseSkill {
        caller: PlayerId,
        battle: BattleId,
        attacker: MonsterId,
        target: MonsterId,
        skill: SkillId,
        reply: oneshot::Sender<Result<SkillOutcome>>,
    },
    CreateTournament {
        host: PlayerId,
        max_player_num: u32,
        reply: oneshot::Sender<Result<TournamentId>>,
    },
    JoinTournament {
        caller: PlayerId,
        tournament: TournamentId,
        reply: oneshot::Sender<Result<()>>,
    },
    SetTournamentMonsters {
        caller: PlayerId,
        tournament: TournamentId,
        monsters: Vec<MonsterId>,
        reply: oneshot::Sender<Result<()>>,
    },
    MarkPlayerReady {
        caller: PlayerId,
        tournament: TournamentId,
        reply: oneshot::Sender<Result<()>>,
    },
    StartTournament {
        caller: PlayerId,
        tournament: TournamentId,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Catalog administration, serialized with gameplay.
    Catalog(CatalogCommand),
    /// Query the current arena state (read-only).
    QueryState {
        reply: oneshot::Sender<ArenaState>,
    },
}

/// Administrative catalog edits.
pub enum CatalogCommand {
    AddMonsterType {
        monster_type: MonsterType,
        reply: oneshot::Sender<Result<MonsterTypeId>>,
    },
    UpdateMonsterType {
        id: MonsterTypeId,
        monster_type: MonsterType,
        reply: oneshot::Sender<Result<()>>,
    },
    AddSkill {
        skill: Skill,
        reply: oneshot::Sender<Result<SkillId>>,
    },
    UpdateSkill {
        id: SkillId,
        skill: Skill,
        reply: oneshot::Sender<Result<()>>,
    },
    AddSkillToType {
        type_id: MonsterTypeId,
        skill: SkillId,
        reply: oneshot::Sender<Result<()>>,
    },
    RemoveSkillFromType {
        type_id: MonsterTypeId,
        index: usize,
        reply: oneshot::Sender<Result<SkillId>>,
    },
}

/// Background task that processes arena commands.
pub struct ArenaWorker {
    state: ArenaState,
    catalog: Arc<CatalogOracleImpl>,
    config: ArenaConfig,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl ArenaWorker {
    pub fn new(
        state: ArenaState,
        catalog: Arc<CatalogOracleImpl>,
        config: ArenaConfig,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            target: "runtime::worker",
            monsters = state.registry.len(),
            battles = state.battles.len(),
            max_level = config.max_level,
            "ArenaWorker initialized"
        );

        Self {
            state,
            catalog,
            config,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Exits once every handle has been dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        debug!(target: "runtime::worker", "Command channel closed, worker stopping");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Mint {
                owner,
                type_id,
                reply,
            } => {
                let result = self.handle_mint(owner, type_id);
                send_reply(reply, log_result("mint", result));
            }
            Command::SetMonsterHealth {
                caller,
                monster,
                health,
                reply,
            } => {
                let result = self.stage(|state, _, _| {
                    state.ensure_idle(monster)?;
                    Ok(state.registry.set_monster_health(caller, monster, health)?)
                });
                send_reply(reply, log_result("set_monster_health", result));
            }
            Command::SetMonsterCooldowns {
                caller,
                monster,
                cooldowns,
                reply,
            } => {
                let result = self.stage(|state, env, _| {
                    state.ensure_idle(monster)?;
                    Ok(state.registry.set_monster_cooldowns(
                        caller,
                        monster,
                        &cooldowns,
                        env.catalog(),
                    )?)
                });
                send_reply(reply, log_result("set_monster_cooldowns", result));
            }
            Command::RewardExperience {
                caller,
                monster,
                amount,
                reply,
            } => {
                let result = self.stage(|state, env, _| {
                    state.ensure_idle(monster)?;
                    Ok(reward_registered(
                        &mut state.registry,
                        env,
                        caller,
                        monster,
                        amount,
                    )?)
                });
                if let Ok(outcome) = &result {
                    self.event_bus
                        .publish(MonsterEvent::ExperienceRewarded(*outcome));
                }
                send_reply(reply, log_result("reward_experience", result));
            }
            Command::StartBattle {
                caller,
                monsters,
                reply,
            } => {
                let result = self.stage(|state, env, notifications| {
                    let mut engine =
                        BattleEngine::new(&mut state.battles, &mut state.registry, env, notifications);
                    Ok(engine.start_battle(caller, &monsters)?)
                });
                send_reply(reply, log_result("start_battle", result));
            }
            Command::JoinBattle {
                caller,
                opponent,
                monsters,
                reply,
            } => {
                let result = self.stage(|state, env, notifications| {
                    let mut engine =
                        BattleEngine::new(&mut state.battles, &mut state.registry, env, notifications);
                    Ok(engine.join_battle(caller, opponent, &monsters)?)
                });
                send_reply(reply, log_result("join_battle", result));
            }
            Command::UseSkill {
                caller,
                battle,
                attacker,
                target,
                skill,
                reply,
            } => {
                let result = self.handle_use_skill(caller, battle, attacker, target, skill);
                send_reply(reply, log_result("use_skill", result));
            }
            Command::CreateTournament {
                host,
                max_player_num,
                reply,
            } => {
                let result = self.stage(|state, _, notifications| {
                    Ok(state
                        .tournaments
                        .create_tournament(host, max_player_num, notifications)?)
                });
                send_reply(reply, log_result("create_tournament", result));
            }
            Command::JoinTournament {
                caller,
                tournament,
                reply,
            } => {
                let result = self.stage(|state, _, notifications| {
                    Ok(state
                        .tournaments
                        .join_tournament(caller, tournament, notifications)?)
                });
                send_reply(reply, log_result("join_tournament", result));
            }
            Command::SetTournamentMonsters {
                caller,
                tournament,
                monsters,
                reply,
            } => {
                let result = self.stage(|state, _, _| {
                    Ok(state.tournaments.set_monsters(
                        caller,
                        tournament,
                        &monsters,
                        &state.registry,
                    )?)
                });
                send_reply(reply, log_result("set_tournament_monsters", result));
            }
            Command::MarkPlayerReady {
                caller,
                tournament,
                reply,
            } => {
                let result = self.stage(|state, _, notifications| {
                    Ok(state
                        .tournaments
                        .mark_player_ready(caller, tournament, notifications)?)
                });
                send_reply(reply, log_result("mark_player_ready", result));
            }
            Command::StartTournament {
                caller,
                tournament,
                reply,
            } => {
                let result = self.stage(|state, env, notifications| {
                    let ArenaState {
                        battles,
                        tournaments,
                        registry,
                    } = state;
                    let mut engine = BattleEngine::new(battles, registry, env, notifications);
                    Ok(tournaments.start_tournament(caller, tournament, &mut engine)?)
                });
                send_reply(reply, log_result("start_tournament", result));
            }
            Command::Catalog(cmd) => self.handle_catalog(cmd),
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!(target: "runtime::worker", "QueryState reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn handle_mint(&mut self, owner: PlayerId, type_id: MonsterTypeId) -> Result<MonsterId> {
        let monster =
            self.stage(|state, env, _| Ok(state.registry.mint(owner, type_id, env.catalog())?))?;
        debug!(
            target: "runtime::worker",
            %owner,
            %monster,
            %type_id,
            "Monster minted"
        );
        self.event_bus.publish(MonsterEvent::Minted {
            monster,
            owner,
            type_id,
        });
        Ok(monster)
    }

    /// Runs a skill; tournament battles report their outcome to the bracket
    /// within the same staged command.
    fn handle_use_skill(
        &mut self,
        caller: PlayerId,
        battle: BattleId,
        attacker: MonsterId,
        target: MonsterId,
        skill: SkillId,
    ) -> Result<SkillOutcome> {
        let outcome = self.stage(|state, env, notifications| {
            let ArenaState {
                battles,
                tournaments,
                registry,
            } = state;
            let scheduled = battles
                .battle(battle)
                .and_then(|battle| battle.tournament())
                .is_some();
            let mut engine = BattleEngine::new(battles, registry, env, notifications);
            let outcome = if scheduled {
                engine.use_skill(caller, battle, attacker, target, skill, tournaments)?
            } else {
                engine.use_skill(caller, battle, attacker, target, skill, &mut IgnoreOutcomes)?
            };
            Ok(outcome)
        })?;

        if let Some(ended) = outcome.ended {
            info!(
                target: "runtime::worker",
                %battle,
                winner = %ended.winner,
                loser = %ended.loser,
                "Battle ended"
            );
        }
        if let Some(experience) = outcome.experience {
            self.event_bus
                .publish(MonsterEvent::ExperienceRewarded(experience));
        } else if outcome.reward_skipped() {
            warn!(
                target: "runtime::worker",
                %battle,
                monster = %attacker,
                "Winner already at max level, experience reward skipped"
            );
        }
        Ok(outcome)
    }

    /// Applies a catalog edit. Edits that reshape a skill set also realign
    /// the cooldowns of existing monsters of that type, in the same command.
    fn handle_catalog(&mut self, cmd: CatalogCommand) {
        let catalog = Arc::clone(&self.catalog);
        match cmd {
            CatalogCommand::AddMonsterType {
                monster_type,
                reply,
            } => {
                let result = catalog.add_monster_type(monster_type).map_err(Into::into);
                send_reply(reply, log_result("add_monster_type", result));
            }
            CatalogCommand::UpdateMonsterType {
                id,
                monster_type,
                reply,
            } => {
                let result = self.stage(|state, _, _| {
                    let previous = catalog.monster_type(id);
                    let skill_set = monster_type.skill_set.clone();
                    catalog.update_monster_type(id, monster_type)?;
                    if let Some(previous) = previous {
                        state
                            .registry
                            .realign_cooldowns(id, &previous.skill_set, &skill_set);
                    }
                    Ok(())
                });
                send_reply(reply, log_result("update_monster_type", result));
            }
            CatalogCommand::AddSkill { skill, reply } => {
                let result = catalog.add_skill(skill).map_err(Into::into);
                send_reply(reply, log_result("add_skill", result));
            }
            CatalogCommand::UpdateSkill { id, skill, reply } => {
                let result = catalog.update_skill(id, skill).map_err(Into::into);
                send_reply(reply, log_result("update_skill", result));
            }
            CatalogCommand::AddSkillToType {
                type_id,
                skill,
                reply,
            } => {
                let result = catalog
                    .add_skill_to_type(type_id, skill)
                    .map_err(Into::into);
                send_reply(reply, log_result("add_skill_to_type", result));
            }
            CatalogCommand::RemoveSkillFromType {
                type_id,
                index,
                reply,
            } => {
                let result = self.stage(|state, _, _| {
                    let removed = catalog.remove_skill_from_type(type_id, index)?;
                    state.registry.remove_cooldown_slot(type_id, index);
                    Ok(removed)
                });
                send_reply(reply, log_result("remove_skill_from_type", result));
            }
        }
    }

    /// Applies `op` to a clone of the state and commits it only on success.
    ///
    /// Notifications collected while `op` runs are published after the
    /// commit, in emission order; a failed command publishes nothing.
    fn stage<T>(
        &mut self,
        op: impl FnOnce(&mut ArenaState, ArenaEnv<'_>, &mut Vec<Notification>) -> Result<T>,
    ) -> Result<T> {
        let mut working_state = self.state.clone();
        let mut notifications = Vec::new();
        let env = ArenaEnv::new(self.catalog.as_ref(), &self.config);

        let value = op(&mut working_state, env, &mut notifications)?;

        self.state = working_state;
        for notification in notifications {
            log_notification(&notification);
            self.event_bus.publish(notification);
        }
        Ok(value)
    }
}

fn log_notification(notification: &Notification) {
    match notification {
        Notification::TournamentRoundStarted { tournament, round } => {
            info!(target: "runtime::worker", %tournament, round, "Tournament round started");
        }
        Notification::TournamentEnded {
            tournament,
            champion,
        } => {
            info!(target: "runtime::worker", %tournament, %champion, "Tournament ended");
        }
        _ => {
            debug!(target: "runtime::worker", event = notification.name(), "Publishing notification");
        }
    }
}

/// Logs a rejected command: rule rejections at debug, internal failures at
/// error.
fn log_result<T>(command: &'static str, result: Result<T>) -> Result<T> {
    if let Err(error) = &result {
        if error.kind().is_internal() {
            error!(
                target: "runtime::worker",
                command,
                code = error.error_code(),
                error = %error,
                "Command failed"
            );
        } else {
            debug!(
                target: "runtime::worker",
                command,
                code = error.error_code(),
                error = %error,
                "Command rejected"
            );
        }
    }
    result
}

fn send_reply<T>(reply: oneshot::Sender<T>, value: T) {
    if reply.send(value).is_err() {
        debug!(target: "runtime::worker", "Reply channel closed (caller dropped)");
    }
}
