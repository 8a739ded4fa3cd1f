//! Single-elimination brackets built on top of the combat engine.
//!
//! The [`TournamentManager`] owns every tournament record. Players enroll
//! while the bracket is pending, register a roster and mark themselves
//! ready; the host then starts round 0. Each round's battles are opened
//! through a [`BattleOpener`] and reported back through
//! [`BattleOutcomeListener`]. When the last battle of a round reports, the
//! survivors are paired again until one champion remains.
//!
//! ```text
//! Pending --start--> Started --last battle of final round--> Ended
//! ```

mod bracket;
mod errors;

pub use bracket::{is_valid_size, pairings};
pub use errors::TournamentError;

use std::collections::BTreeMap;

use crate::config::ArenaConfig;
use crate::engine::BattleOpener;
use crate::env::MonsterRegistry;
use crate::events::{BattleOutcome, BattleOutcomeListener, Notification, NotificationSink};
use crate::state::{
    BattleKind, MonsterId, Player, PlayerId, Roster, Tournament, TournamentId, TournamentStatus,
};

/// Owner of all tournament records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TournamentManager {
    tournaments: BTreeMap<TournamentId, Tournament>,
    next_id: TournamentId,
}

impl TournamentManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tournament(&self, id: TournamentId) -> Option<&Tournament> {
        self.tournaments.get(&id)
    }

    pub fn tournaments(&self) -> impl Iterator<Item = &Tournament> {
        self.tournaments.values()
    }

    pub fn player(&self, id: TournamentId, player: PlayerId) -> Option<&Player> {
        self.tournament(id)?.player(player)
    }

    /// Creates a pending bracket for `max_player_num` players.
    ///
    /// # Errors
    ///
    /// `InvalidSize` unless the size is a power of two between 2 and
    /// [`ArenaConfig::MAX_TOURNAMENT_PLAYERS`].
    pub fn create_tournament(
        &mut self,
        host: PlayerId,
        max_player_num: u32,
        sink: &mut dyn NotificationSink,
    ) -> Result<TournamentId, TournamentError> {
        if !is_valid_size(max_player_num, ArenaConfig::MAX_TOURNAMENT_PLAYERS) {
            return Err(TournamentError::InvalidSize(max_player_num));
        }

        let id = self.next_id;
        self.next_id = id.next();
        self.tournaments
            .insert(id, Tournament::new(id, host, max_player_num));

        sink.notify(Notification::TournamentCreated {
            tournament: id,
            host,
        });
        Ok(id)
    }

    /// Enrolls `caller` with an empty, not-ready roster.
    pub fn join_tournament(
        &mut self,
        caller: PlayerId,
        id: TournamentId,
        sink: &mut dyn NotificationSink,
    ) -> Result<(), TournamentError> {
        let tournament = self.pending_mut(id)?;
        if tournament.is_full() {
            return Err(TournamentError::TournamentFull {
                tournament: id,
                max: tournament.max_player_num,
            });
        }
        if tournament.player(caller).is_some() {
            return Err(TournamentError::AlreadyJoined {
                tournament: id,
                player: caller,
            });
        }

        tournament
            .players
            .try_push(Player::new(caller))
            .map_err(|_| TournamentError::TournamentFull {
                tournament: id,
                max: tournament.max_player_num,
            })?;

        sink.notify(Notification::PlayerJoined {
            tournament: id,
            player: caller,
        });
        Ok(())
    }

    /// Replaces the caller's roster.
    ///
    /// # Errors
    ///
    /// - `NotAParticipant`, `NotPending`
    /// - `InvalidRosterSize`, `DuplicateMonster`, `NotOwner` for a bad roster
    pub fn set_monsters(
        &mut self,
        caller: PlayerId,
        id: TournamentId,
        monsters: &[MonsterId],
        registry: &dyn MonsterRegistry,
    ) -> Result<(), TournamentError> {
        let tournament = self
            .tournaments
            .get_mut(&id)
            .ok_or(TournamentError::TournamentNotFound(id))?;
        if tournament.player(caller).is_none() {
            return Err(TournamentError::NotAParticipant {
                tournament: id,
                player: caller,
            });
        }
        if tournament.status != TournamentStatus::Pending {
            return Err(TournamentError::NotPending {
                tournament: id,
                status: tournament.status,
            });
        }

        let roster = validate_roster(caller, monsters, registry)?;
        if let Some(player) = tournament.player_mut(caller) {
            // A non-empty roster keeps an existing ready mark.
            player.monsters = roster;
        }
        Ok(())
    }

    /// Marks the caller ready to fight.
    pub fn mark_player_ready(
        &mut self,
        caller: PlayerId,
        id: TournamentId,
        sink: &mut dyn NotificationSink,
    ) -> Result<(), TournamentError> {
        let tournament = self
            .tournaments
            .get_mut(&id)
            .ok_or(TournamentError::TournamentNotFound(id))?;
        let status = tournament.status;
        let player = tournament
            .player_mut(caller)
            .ok_or(TournamentError::NotAParticipant {
                tournament: id,
                player: caller,
            })?;
        if status != TournamentStatus::Pending {
            return Err(TournamentError::NotPending {
                tournament: id,
                status,
            });
        }
        if player.monsters.is_empty() {
            return Err(TournamentError::EmptyRoster {
                tournament: id,
                player: caller,
            });
        }

        player.is_ready = true;
        sink.notify(Notification::PlayerReady {
            tournament: id,
            player: caller,
        });
        Ok(())
    }

    /// Starts round 0 once the bracket is full and everyone is ready.
    ///
    /// # Errors
    ///
    /// - `NotHost`, `NotPending`, `NotFull`, `NotAllReady`
    /// - `OpenBattle` if a pairing's battle cannot be opened
    pub fn start_tournament(
        &mut self,
        caller: PlayerId,
        id: TournamentId,
        opener: &mut dyn BattleOpener,
    ) -> Result<(), TournamentError> {
        let tournament = self
            .tournaments
            .get(&id)
            .ok_or(TournamentError::TournamentNotFound(id))?;
        if tournament.host != caller {
            return Err(TournamentError::NotHost {
                tournament: id,
                caller,
            });
        }
        if tournament.status != TournamentStatus::Pending {
            return Err(TournamentError::NotPending {
                tournament: id,
                status: tournament.status,
            });
        }
        if !tournament.is_full() {
            return Err(TournamentError::NotFull {
                tournament: id,
                joined: tournament.player_num(),
                max: tournament.max_player_num,
            });
        }
        if !tournament.all_ready() {
            return Err(TournamentError::NotAllReady(id));
        }

        let mut staged = tournament.clone();
        staged.status = TournamentStatus::Started;
        staged.current_round = 0;
        open_round(&mut staged, opener)?;
        self.tournaments.insert(id, staged);
        Ok(())
    }

    /// Records a finished battle and advances the bracket.
    ///
    /// Battles not scheduled by a tournament are ignored.
    ///
    /// # Errors
    ///
    /// - `TournamentNotFound` or `UnexpectedBattle` for an outcome that does
    ///   not belong to a running round
    /// - `OpenBattle` if the next round cannot be opened
    pub fn on_battle_ended(
        &mut self,
        outcome: &BattleOutcome,
        opener: &mut dyn BattleOpener,
    ) -> Result<(), TournamentError> {
        let BattleKind::Scheduled { tournament: id, .. } = outcome.kind else {
            return Ok(());
        };

        let mut staged = self
            .tournaments
            .get(&id)
            .cloned()
            .ok_or(TournamentError::TournamentNotFound(id))?;
        let position = staged
            .pending_battles
            .iter()
            .position(|battle| *battle == outcome.battle)
            .filter(|_| staged.status == TournamentStatus::Started)
            .ok_or(TournamentError::UnexpectedBattle {
                tournament: id,
                battle: outcome.battle,
            })?;
        staged.pending_battles.remove(position);

        for player in staged.players.iter_mut() {
            if player.id == outcome.winner || player.id == outcome.loser {
                player.is_in_battle = false;
            }
            if player.id == outcome.loser {
                player.is_eliminated = true;
            }
        }
        opener.notifications().notify(Notification::PlayerEliminated {
            tournament: id,
            player: outcome.loser,
        });

        if staged.pending_battles.is_empty() {
            let survivors: Vec<PlayerId> = staged.survivors().map(|player| player.id).collect();
            match survivors.as_slice() {
                &[champion] => {
                    staged.status = TournamentStatus::Ended;
                    staged.champion = Some(champion);
                    opener.notifications().notify(Notification::TournamentEnded {
                        tournament: id,
                        champion,
                    });
                }
                _ => {
                    staged.current_round += 1;
                    open_round(&mut staged, opener)?;
                }
            }
        }

        self.tournaments.insert(id, staged);
        Ok(())
    }
}

impl BattleOutcomeListener for TournamentManager {
    fn battle_ended(
        &mut self,
        outcome: &BattleOutcome,
        opener: &mut dyn BattleOpener,
    ) -> Result<(), TournamentError> {
        self.on_battle_ended(outcome, opener)
    }
}

/// Opens one battle per seed-order pair and announces the round.
fn open_round(
    tournament: &mut Tournament,
    opener: &mut dyn BattleOpener,
) -> Result<(), TournamentError> {
    let round = tournament.current_round;
    for (side_a, side_b) in pairings(tournament) {
        let battle = opener.open_scheduled(tournament.id, round, &side_a, &side_b)?;
        tournament
            .pending_battles
            .try_push(battle)
            .map_err(|_| TournamentError::UnexpectedBattle {
                tournament: tournament.id,
                battle,
            })?;
        for player in tournament.players.iter_mut() {
            if player.id == side_a.player || player.id == side_b.player {
                player.is_in_battle = true;
            }
        }
    }

    opener
        .notifications()
        .notify(Notification::TournamentRoundStarted {
            tournament: tournament.id,
            round,
        });
    Ok(())
}

fn validate_roster(
    caller: PlayerId,
    monsters: &[MonsterId],
    registry: &dyn MonsterRegistry,
) -> Result<Roster, TournamentError> {
    if monsters.is_empty() || monsters.len() > ArenaConfig::MAX_ROSTER {
        return Err(TournamentError::InvalidRosterSize {
            len: monsters.len(),
        });
    }

    let mut roster = Roster::new();
    for &monster in monsters {
        if roster.contains(&monster) {
            return Err(TournamentError::DuplicateMonster(monster));
        }
        if registry.owner_of(monster)? != caller {
            return Err(TournamentError::NotOwner {
                player: caller,
                monster,
            });
        }
        roster.push(monster);
    }
    Ok(roster)
}

impl TournamentManager {
    fn pending_mut(&mut self, id: TournamentId) -> Result<&mut Tournament, TournamentError> {
        let tournament = self
            .tournaments
            .get_mut(&id)
            .ok_or(TournamentError::TournamentNotFound(id))?;
        if tournament.status != TournamentStatus::Pending {
            return Err(TournamentError::NotPending {
                tournament: id,
                status: tournament.status,
            });
        }
        Ok(tournament)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BattleError, Entrant};
    use crate::env::{MonsterType, Skill, SkillType};
    use crate::error::{ArenaError, ErrorKind};
    use crate::state::{BattleId, MonsterTypeId, SkillId};
    use crate::testing::{ALICE, BOB, CAROL, DAVE, TestArena};

    const STRIKE: SkillId = SkillId(0);
    const GLASS: MonsterTypeId = MonsterTypeId(0);

    fn arena() -> TestArena {
        let mut arena = TestArena::new();
        arena
            .catalog
            .add_skill(STRIKE, Skill::new("Strike", 100, SkillType::Physical, 0));
        arena.catalog.add_type(
            GLASS,
            MonsterType::new("Glass Golem", 10, 10, 0, 0).with_skill(STRIKE),
        );
        arena
    }

    /// Four players enrolled, rostered and ready in tournament 0.
    fn ready_bracket(arena: &mut TestArena, manager: &mut TournamentManager) -> TournamentId {
        let id = manager
            .create_tournament(ALICE, 4, &mut arena.notifications)
            .unwrap();
        for player in [ALICE, BOB, CAROL, DAVE] {
            let monster = arena.mint(player, GLASS);
            manager
                .join_tournament(player, id, &mut arena.notifications)
                .unwrap();
            manager
                .set_monsters(player, id, &[monster], &arena.registry)
                .unwrap();
            manager
                .mark_player_ready(player, id, &mut arena.notifications)
                .unwrap();
        }
        id
    }

    /// Side A knocks out side B's only monster in one strike.
    fn finish(arena: &mut TestArena, manager: &mut TournamentManager, battle: BattleId) {
        let record = arena.book.battle(battle).unwrap().clone();
        let attacker = record.side_a.active_monster().unwrap();
        let target = record.side_b.as_ref().unwrap().active_monster().unwrap();
        let outcome = arena
            .engine()
            .use_skill(record.side_a.player, battle, attacker, target, STRIKE, manager)
            .unwrap();
        assert!(outcome.ended.is_some());
    }

    #[test]
    fn four_player_bracket_runs_to_a_champion() {
        let mut arena = arena();
        let mut manager = TournamentManager::new();
        let id = ready_bracket(&mut arena, &mut manager);
        arena.notifications.clear();

        manager
            .start_tournament(ALICE, id, &mut arena.engine())
            .unwrap();
        assert_eq!(
            arena.notifications.last(),
            Some(&Notification::TournamentRoundStarted {
                tournament: id,
                round: 0
            })
        );

        let round_zero: Vec<BattleId> =
            manager.tournament(id).unwrap().pending_battles.to_vec();
        assert_eq!(round_zero.len(), 2);
        assert!(manager.player(id, BOB).unwrap().is_in_battle);

        finish(&mut arena, &mut manager, round_zero[0]);
        assert!(manager.player(id, BOB).unwrap().is_eliminated);
        assert_eq!(manager.tournament(id).unwrap().current_round, 0);

        arena.notifications.clear();
        finish(&mut arena, &mut manager, round_zero[1]);

        let tournament = manager.tournament(id).unwrap();
        assert!(tournament.player(DAVE).unwrap().is_eliminated);
        assert_eq!(tournament.current_round, 1);
        assert!(arena.notifications.contains(&Notification::PlayerEliminated {
            tournament: id,
            player: DAVE
        }));
        assert_eq!(
            arena.notifications.last(),
            Some(&Notification::TournamentRoundStarted {
                tournament: id,
                round: 1
            })
        );

        let final_battle = tournament.pending_battles[0];
        let battle = arena.book.battle(final_battle).unwrap();
        assert_eq!(battle.side_a.player, ALICE);
        assert_eq!(battle.side_b.as_ref().unwrap().player, CAROL);

        finish(&mut arena, &mut manager, final_battle);
        let tournament = manager.tournament(id).unwrap();
        assert_eq!(tournament.status, TournamentStatus::Ended);
        assert_eq!(tournament.champion, Some(ALICE));
        assert_eq!(
            arena.notifications.last(),
            Some(&Notification::TournamentEnded {
                tournament: id,
                champion: ALICE
            })
        );
    }

    #[test]
    fn bracket_size_must_be_power_of_two() {
        let mut manager = TournamentManager::new();
        let mut sink = Vec::new();
        for size in [0, 1, 3, 6, 128] {
            let err = manager.create_tournament(ALICE, size, &mut sink).unwrap_err();
            assert_eq!(err, TournamentError::InvalidSize(size));
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert!(sink.is_empty());

        let id = manager.create_tournament(ALICE, 2, &mut sink).unwrap();
        assert_eq!(id, TournamentId(0));
        let tournament = manager.tournament(id).unwrap();
        assert_eq!(tournament.status, TournamentStatus::Pending);
        assert_eq!(tournament.player_num(), 0);
        assert_eq!(tournament.current_round, 0);
    }

    #[test]
    fn enrollment_rules() {
        let mut manager = TournamentManager::new();
        let mut sink = Vec::new();
        let id = manager.create_tournament(ALICE, 2, &mut sink).unwrap();

        manager.join_tournament(ALICE, id, &mut sink).unwrap();
        assert_eq!(
            manager.join_tournament(ALICE, id, &mut sink).unwrap_err(),
            TournamentError::AlreadyJoined {
                tournament: id,
                player: ALICE
            }
        );
        manager.join_tournament(BOB, id, &mut sink).unwrap();
        assert_eq!(
            manager.join_tournament(CAROL, id, &mut sink).unwrap_err(),
            TournamentError::TournamentFull {
                tournament: id,
                max: 2
            }
        );
        assert_eq!(
            manager
                .join_tournament(CAROL, TournamentId(7), &mut sink)
                .unwrap_err(),
            TournamentError::TournamentNotFound(TournamentId(7))
        );
        assert_eq!(
            sink.last(),
            Some(&Notification::PlayerJoined {
                tournament: id,
                player: BOB
            })
        );
    }

    #[test]
    fn roster_and_readiness_rules() {
        let mut arena = arena();
        let mut manager = TournamentManager::new();
        let id = manager
            .create_tournament(ALICE, 2, &mut arena.notifications)
            .unwrap();
        let mine = arena.mint(ALICE, GLASS);
        let theirs = arena.mint(BOB, GLASS);

        assert!(matches!(
            manager
                .set_monsters(ALICE, id, &[mine], &arena.registry)
                .unwrap_err(),
            TournamentError::NotAParticipant { .. }
        ));
        manager
            .join_tournament(ALICE, id, &mut arena.notifications)
            .unwrap();

        assert_eq!(
            manager
                .mark_player_ready(ALICE, id, &mut arena.notifications)
                .unwrap_err(),
            TournamentError::EmptyRoster {
                tournament: id,
                player: ALICE
            }
        );
        assert_eq!(
            manager
                .set_monsters(ALICE, id, &[], &arena.registry)
                .unwrap_err(),
            TournamentError::InvalidRosterSize { len: 0 }
        );
        assert_eq!(
            manager
                .set_monsters(ALICE, id, &[theirs], &arena.registry)
                .unwrap_err(),
            TournamentError::NotOwner {
                player: ALICE,
                monster: theirs
            }
        );

        manager
            .set_monsters(ALICE, id, &[mine], &arena.registry)
            .unwrap();
        manager
            .mark_player_ready(ALICE, id, &mut arena.notifications)
            .unwrap();
        let player = manager.player(id, ALICE).unwrap();
        assert!(player.is_ready);
        assert_eq!(player.monsters.as_slice(), &[mine]);
    }

    #[test]
    fn start_requires_host_full_bracket_and_ready_players() {
        let mut arena = arena();
        let mut manager = TournamentManager::new();
        let id = manager
            .create_tournament(ALICE, 2, &mut arena.notifications)
            .unwrap();
        manager
            .join_tournament(ALICE, id, &mut arena.notifications)
            .unwrap();

        assert_eq!(
            manager
                .start_tournament(BOB, id, &mut arena.engine())
                .unwrap_err(),
            TournamentError::NotHost {
                tournament: id,
                caller: BOB
            }
        );
        assert_eq!(
            manager
                .start_tournament(ALICE, id, &mut arena.engine())
                .unwrap_err(),
            TournamentError::NotFull {
                tournament: id,
                joined: 1,
                max: 2
            }
        );

        manager
            .join_tournament(BOB, id, &mut arena.notifications)
            .unwrap();
        assert_eq!(
            manager
                .start_tournament(ALICE, id, &mut arena.engine())
                .unwrap_err(),
            TournamentError::NotAllReady(id)
        );
        assert_eq!(
            manager.tournament(id).unwrap().status,
            TournamentStatus::Pending
        );
        assert!(arena.book.is_empty());

        for player in [ALICE, BOB] {
            let monster = arena.mint(player, GLASS);
            manager
                .set_monsters(player, id, &[monster], &arena.registry)
                .unwrap();
            manager
                .mark_player_ready(player, id, &mut arena.notifications)
                .unwrap();
        }
        manager
            .start_tournament(ALICE, id, &mut arena.engine())
            .unwrap();

        assert!(matches!(
            manager
                .join_tournament(CAROL, id, &mut arena.notifications)
                .unwrap_err(),
            TournamentError::NotPending {
                status: TournamentStatus::Started,
                ..
            }
        ));
    }

    #[test]
    fn casual_outcomes_are_ignored() {
        let mut arena = arena();
        let mut manager = TournamentManager::new();
        let outcome = BattleOutcome {
            battle: BattleId(0),
            kind: BattleKind::Public,
            winner: ALICE,
            loser: BOB,
        };

        manager
            .on_battle_ended(&outcome, &mut arena.engine())
            .unwrap();
        assert!(arena.notifications.is_empty());
    }

    #[test]
    fn stray_outcome_is_rejected() {
        let mut arena = arena();
        let mut manager = TournamentManager::new();
        let id = ready_bracket(&mut arena, &mut manager);
        let outcome = BattleOutcome {
            battle: BattleId(42),
            kind: BattleKind::Scheduled {
                tournament: id,
                round: 0,
            },
            winner: ALICE,
            loser: BOB,
        };

        let err = manager
            .on_battle_ended(&outcome, &mut arena.engine())
            .unwrap_err();
        assert!(matches!(err, TournamentError::UnexpectedBattle { .. }));
        assert!(!manager.player(id, BOB).unwrap().is_eliminated);
    }

    #[test]
    fn opener_failure_leaves_bracket_pending() {
        struct FailingOpener(Vec<Notification>);

        impl BattleOpener for FailingOpener {
            fn open_scheduled(
                &mut self,
                _tournament: TournamentId,
                _round: u32,
                _side_a: &Entrant,
                _side_b: &Entrant,
            ) -> Result<BattleId, BattleError> {
                Err(BattleError::InvalidRosterSize { len: 0 })
            }

            fn notifications(&mut self) -> &mut dyn NotificationSink {
                &mut self.0
            }
        }

        let mut arena = arena();
        let mut manager = TournamentManager::new();
        let id = ready_bracket(&mut arena, &mut manager);

        let err = manager
            .start_tournament(ALICE, id, &mut FailingOpener(Vec::new()))
            .unwrap_err();
        assert!(matches!(err, TournamentError::OpenBattle(_)));
        assert_eq!(
            manager.tournament(id).unwrap().status,
            TournamentStatus::Pending
        );
    }
}
