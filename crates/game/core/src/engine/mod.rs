//! Turn-based combat between two rosters.
//!
//! The [`BattleEngine`] is the authoritative reducer for battles. It borrows
//! the battle book, the monster registry and the notification sink for the
//! duration of one operation. Every skill goes through the same pipeline:
//! validate the request against a read-only view, apply the effect to the
//! registry and the battle, then report a terminal outcome to the listener.
//!
//! ```text
//! WaitingForOpponent --join--> Active --terminal skill--> Ended
//! ```

mod errors;
mod matchmaking;
mod turns;

pub use errors::{BattleError, SkillRejection};
pub use matchmaking::BattleBook;
pub use turns::{first_standing, pass_turn, tick_cooldowns};

use crate::combat::{self, SkillEffect};
use crate::config::ArenaConfig;
use crate::env::{ArenaEnv, MonsterRegistry, Skill, SkillType};
use crate::events::{BattleOutcome, BattleOutcomeListener, Notification, NotificationSink};
use crate::leveling::{self, LevelOutcome, LevelingError};
use crate::state::{
    Battle, BattleId, BattleKind, BattleSide, BattleStatus, Cooldowns, MonsterId,
    MonsterInstance, PlayerId, Roster, Side, SkillId, TournamentId,
};

/// A player and the roster they bring into a scheduled battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entrant {
    pub player: PlayerId,
    pub monsters: Roster,
}

impl Entrant {
    pub fn new(player: PlayerId, monsters: Roster) -> Self {
        Self { player, monsters }
    }
}

/// Complete result of an accepted skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillOutcome {
    pub battle: BattleId,
    pub actor: PlayerId,
    pub attacker: MonsterId,
    pub target: MonsterId,
    pub skill_type: SkillType,
    pub amount: u32,
    /// Set when this skill finished the battle.
    pub ended: Option<BattleOutcome>,
    /// Experience granted to the winning monster. `None` when the battle
    /// continues, or when the winner was already at max level.
    pub experience: Option<LevelOutcome>,
}

impl SkillOutcome {
    /// True when the battle ended but the winner could not gain experience.
    pub fn reward_skipped(&self) -> bool {
        self.ended.is_some() && self.experience.is_none()
    }
}

/// Capability handed to battle outcome listeners so they can schedule
/// follow-up battles within the same operation.
pub trait BattleOpener {
    /// Opens an already-active battle between two entrants on behalf of a
    /// tournament round.
    ///
    /// # Errors
    ///
    /// Returns a roster validation or registry error if either entrant can no
    /// longer field their roster, or `MonsterBusy` if a monster is still in
    /// another unfinished battle.
    fn open_scheduled(
        &mut self,
        tournament: TournamentId,
        round: u32,
        side_a: &Entrant,
        side_b: &Entrant,
    ) -> Result<BattleId, BattleError>;

    /// Sink the listener emits its own notifications into.
    fn notifications(&mut self) -> &mut dyn NotificationSink;
}

/// Validated skill request, ready to be applied.
struct SkillPlan {
    side: Side,
    attacker: MonsterInstance,
    target: MonsterId,
    skill: Skill,
    cooldowns: Cooldowns,
}

/// Combat engine over borrowed arena state.
pub struct BattleEngine<'a> {
    book: &'a mut BattleBook,
    registry: &'a mut dyn MonsterRegistry,
    env: ArenaEnv<'a>,
    notifications: &'a mut dyn NotificationSink,
}

impl<'a> BattleEngine<'a> {
    pub fn new(
        book: &'a mut BattleBook,
        registry: &'a mut dyn MonsterRegistry,
        env: ArenaEnv<'a>,
        notifications: &'a mut dyn NotificationSink,
    ) -> Self {
        Self {
            book,
            registry,
            env,
            notifications,
        }
    }

    pub fn battle(&self, id: BattleId) -> Option<&Battle> {
        self.book.battle(id)
    }

    pub fn book(&self) -> &BattleBook {
        self.book
    }

    /// Enters public matchmaking.
    ///
    /// Joins the oldest public battle opened by another player, or opens a
    /// new one and waits in the queue.
    ///
    /// # Errors
    ///
    /// - `InvalidRosterSize`, `DuplicateMonster`, `NotOwner` for a bad roster
    /// - `AlreadyWaiting` if the caller already has a queued battle
    /// - `MonsterBusy` if a monster is fielded in another unfinished battle
    pub fn start_battle(
        &mut self,
        caller: PlayerId,
        monsters: &[MonsterId],
    ) -> Result<BattleId, BattleError> {
        let roster = self.validate_roster(caller, monsters)?;

        if let Some(battle) = self.book.waiting_public(caller) {
            return Err(BattleError::AlreadyWaiting {
                player: caller,
                battle,
            });
        }
        self.ensure_idle(&roster)?;

        match self.book.next_public_for(caller) {
            Some(id) => {
                let creator = self.seat_opponent(id, BattleSide::new(caller, roster))?;
                self.book.dequeue_public(id);
                self.notifications.notify(Notification::BattleCreated {
                    side_a: creator,
                    side_b: Some(caller),
                    battle: id,
                });
                Ok(id)
            }
            None => {
                let id = self.book.allocate_id();
                let side = BattleSide::new(caller, roster);
                self.book.insert(Battle::open(id, BattleKind::Public, side));
                self.notifications.notify(Notification::BattleCreated {
                    side_a: caller,
                    side_b: None,
                    battle: id,
                });
                Ok(id)
            }
        }
    }

    /// Private matchmaking against a named opponent.
    ///
    /// Completes the opponent's open invitation to the caller if there is
    /// one; otherwise opens a battle with seat B reserved for the opponent.
    ///
    /// # Errors
    ///
    /// - `SelfMatch` if `opponent == caller`
    /// - roster validation errors as for [`start_battle`](Self::start_battle)
    /// - `AlreadyWaiting` if the caller already invited this opponent
    /// - `MonsterBusy` as for [`start_battle`](Self::start_battle)
    pub fn join_battle(
        &mut self,
        caller: PlayerId,
        opponent: PlayerId,
        monsters: &[MonsterId],
    ) -> Result<BattleId, BattleError> {
        if caller == opponent {
            return Err(BattleError::SelfMatch(caller));
        }
        let roster = self.validate_roster(caller, monsters)?;

        if let Some(id) = self.book.private_invite(opponent, caller) {
            self.ensure_idle(&roster)?;
            self.seat_opponent(id, BattleSide::new(caller, roster))?;
            self.notifications.notify(Notification::BattleCreated {
                side_a: opponent,
                side_b: Some(caller),
                battle: id,
            });
            return Ok(id);
        }

        if let Some(battle) = self.book.private_invite(caller, opponent) {
            return Err(BattleError::AlreadyWaiting {
                player: caller,
                battle,
            });
        }
        self.ensure_idle(&roster)?;

        let id = self.book.allocate_id();
        let kind = BattleKind::Private { invited: opponent };
        self.book
            .insert(Battle::open(id, kind, BattleSide::new(caller, roster)));
        self.notifications.notify(Notification::BattleCreated {
            side_a: caller,
            side_b: Some(opponent),
            battle: id,
        });
        Ok(id)
    }

    /// Uses `skill` with the caller's active monster.
    ///
    /// When the skill knocks out the last defending monster the battle ends,
    /// the attacker earns experience and `listener` is told about the
    /// outcome.
    ///
    /// # Errors
    ///
    /// See [`BattleError`]. Validation errors leave all state untouched.
    pub fn use_skill(
        &mut self,
        caller: PlayerId,
        battle: BattleId,
        attacker: MonsterId,
        target: MonsterId,
        skill: SkillId,
        listener: &mut dyn BattleOutcomeListener,
    ) -> Result<SkillOutcome, BattleError> {
        let plan = self.validate_skill(caller, battle, attacker, target, skill)?;
        let mut outcome = self.apply_skill(caller, battle, plan)?;

        if let Some(ended) = outcome.ended {
            outcome.experience = self.reward_winner(attacker)?;
            self.notifications.notify(Notification::BattleEnded {
                winner: ended.winner,
                battle,
            });
            listener
                .battle_ended(&ended, self)
                .map_err(|error| BattleError::OutcomeRejected(Box::new(error)))?;
        }

        Ok(outcome)
    }

    fn validate_roster(
        &self,
        caller: PlayerId,
        monsters: &[MonsterId],
    ) -> Result<Roster, BattleError> {
        if monsters.is_empty() || monsters.len() > ArenaConfig::MAX_ROSTER {
            return Err(BattleError::InvalidRosterSize {
                len: monsters.len(),
            });
        }

        let mut roster = Roster::new();
        for &monster in monsters {
            if roster.contains(&monster) {
                return Err(BattleError::DuplicateMonster(monster));
            }
            if self.registry.owner_of(monster)? != caller {
                return Err(BattleError::NotOwner {
                    player: caller,
                    monster,
                });
            }
            roster.push(monster);
        }
        Ok(roster)
    }

    /// A monster fights in at most one unfinished battle at a time.
    fn ensure_idle(&self, roster: &Roster) -> Result<(), BattleError> {
        for &monster in roster {
            if let Some(battle) = self.book.engagement(monster) {
                return Err(BattleError::MonsterBusy { monster, battle });
            }
        }
        Ok(())
    }

    /// Fills seat B of an open battle and activates it. Returns the creator.
    fn seat_opponent(&mut self, id: BattleId, side_b: BattleSide) -> Result<PlayerId, BattleError> {
        let mut battle = self
            .book
            .battle(id)
            .cloned()
            .ok_or(BattleError::BattleNotFound(id))?;

        battle.side_b = Some(side_b);
        self.activate(&mut battle)?;

        let creator = battle.side_a.player;
        if let Some(slot) = self.book.battle_mut(id) {
            *slot = battle;
        }
        Ok(creator)
    }

    /// Restores every participating monster and hands side A the first turn.
    fn activate(&mut self, battle: &mut Battle) -> Result<(), BattleError> {
        let participants = battle
            .side_a
            .monsters
            .iter()
            .chain(battle.side_b.iter().flat_map(|side| side.monsters.iter()));

        for &id in participants {
            let monster = self.registry.monster(id)?;
            let cleared: Cooldowns = monster.cooldowns.iter().map(|_| 0).collect();
            self.registry.set_health(id, monster.max_health)?;
            self.registry.set_cooldowns(id, &cleared)?;
        }

        battle.side_a.active = 0;
        if let Some(side) = battle.side_b.as_mut() {
            side.active = 0;
        }
        battle.turn_owner = Side::A;
        battle.status = BattleStatus::Active;
        Ok(())
    }

    fn validate_skill(
        &self,
        caller: PlayerId,
        id: BattleId,
        attacker: MonsterId,
        target: MonsterId,
        skill_id: SkillId,
    ) -> Result<SkillPlan, BattleError> {
        let battle = self.book.battle(id).ok_or(BattleError::BattleNotFound(id))?;
        if !battle.is_active() {
            return Err(BattleError::BattleNotActive {
                battle: id,
                status: battle.status,
            });
        }

        let side = battle
            .side_of(caller)
            .filter(|side| *side == battle.turn_owner)
            .ok_or(BattleError::NotYourTurn {
                player: caller,
                battle: id,
            })?;
        let (own, opposing) = match (battle.side(side), battle.side(side.opposite())) {
            (Some(own), Some(opposing)) => (own, opposing),
            _ => {
                return Err(BattleError::BattleNotActive {
                    battle: id,
                    status: battle.status,
                });
            }
        };

        if own.active_monster() != Some(attacker) {
            return Err(BattleError::InvalidAttacker(attacker));
        }
        let attacker_record = self.registry.monster(attacker)?;
        if attacker_record.is_fainted() {
            return Err(BattleError::InvalidAttacker(attacker));
        }

        let monster_type = self.env.monster_type(attacker_record.type_id)?;
        let slot = monster_type
            .skill_slot(skill_id)
            .ok_or(BattleError::InvalidSkill {
                skill: skill_id,
                monster: attacker,
                reason: SkillRejection::NotInSkillSet,
            })?;

        let mut cooldowns = tick_cooldowns(&attacker_record.cooldowns);
        let remaining = cooldowns.get(slot).copied().unwrap_or(0);
        if remaining > 0 {
            return Err(BattleError::InvalidSkill {
                skill: skill_id,
                monster: attacker,
                reason: SkillRejection::OnCooldown { remaining },
            });
        }

        let skill = self.env.skill(skill_id)?;

        let target_side = if skill.skill_type.is_heal() {
            own
        } else {
            opposing
        };
        if !target_side.contains(target) || self.registry.monster(target)?.is_fainted() {
            return Err(BattleError::InvalidTarget(target));
        }

        // Skills added to the type after minting start with a ready slot.
        while cooldowns.len() <= slot {
            if cooldowns.try_push(0).is_err() {
                break;
            }
        }
        if let Some(turns) = cooldowns.get_mut(slot) {
            *turns = skill.cooldown_turns;
        }

        Ok(SkillPlan {
            side,
            attacker: attacker_record,
            target,
            skill,
            cooldowns,
        })
    }

    fn apply_skill(
        &mut self,
        caller: PlayerId,
        id: BattleId,
        plan: SkillPlan,
    ) -> Result<SkillOutcome, BattleError> {
        let SkillPlan {
            side,
            attacker,
            target,
            skill,
            cooldowns,
        } = plan;

        let effect = combat::resolve_skill(attacker.attack, &skill);
        match effect {
            SkillEffect::Damage(amount) => {
                let current = self.registry.monster(target)?.health;
                self.registry
                    .set_health(target, combat::apply_damage(current, amount))?;
            }
            SkillEffect::Heal(amount) => {
                let healed = combat::apply_heal(attacker.health, amount, attacker.max_health);
                self.registry.set_health(attacker.id, healed)?;
            }
        }
        self.registry.set_cooldowns(attacker.id, &cooldowns)?;

        self.notifications.notify(Notification::SkillUsed {
            actor: caller,
            attacker: attacker.id,
            target,
            skill_type: skill.skill_type,
            amount: effect.amount(),
        });

        let mut battle = self
            .book
            .battle(id)
            .cloned()
            .ok_or(BattleError::BattleNotFound(id))?;
        let defending = side.opposite();
        let health = match battle.side(defending) {
            Some(defenders) => self.roster_health(defenders)?,
            None => Vec::new(),
        };

        let ended = match first_standing(&health) {
            Some(index) => {
                if let Some(defenders) = battle.side_mut(defending) {
                    defenders.active = index;
                }
                pass_turn(&mut battle);
                None
            }
            None => {
                battle.status = BattleStatus::Ended;
                battle.winner = Some(caller);
                let loser = battle.opponent_of(caller).unwrap_or(PlayerId::SYSTEM);
                Some(BattleOutcome {
                    battle: id,
                    kind: battle.kind,
                    winner: caller,
                    loser,
                })
            }
        };

        if let Some(slot) = self.book.battle_mut(id) {
            *slot = battle;
        }

        Ok(SkillOutcome {
            battle: id,
            actor: caller,
            attacker: attacker.id,
            target,
            skill_type: skill.skill_type,
            amount: effect.amount(),
            ended,
            experience: None,
        })
    }

    fn roster_health(&self, side: &BattleSide) -> Result<Vec<u32>, BattleError> {
        side.monsters
            .iter()
            .map(|&id| Ok(self.registry.monster(id)?.health))
            .collect()
    }

    /// Grants the battle reward to the winning monster. A winner already at
    /// max level gets nothing.
    fn reward_winner(&mut self, monster: MonsterId) -> Result<Option<LevelOutcome>, BattleError> {
        let amount = self.env.config().experience_reward;
        match leveling::reward_registered(
            &mut *self.registry,
            self.env,
            PlayerId::SYSTEM,
            monster,
            amount,
        ) {
            Ok(outcome) => Ok(Some(outcome)),
            Err(LevelingError::AtMaxLevel { .. }) => Ok(None),
            Err(LevelingError::Catalog(error)) => Err(error.into()),
            Err(LevelingError::Registry(error)) => Err(error.into()),
            Err(LevelingError::Unauthorized { caller, monster }) => {
                Err(BattleError::NotOwner {
                    player: caller,
                    monster,
                })
            }
        }
    }
}

impl BattleOpener for BattleEngine<'_> {
    fn open_scheduled(
        &mut self,
        tournament: TournamentId,
        round: u32,
        side_a: &Entrant,
        side_b: &Entrant,
    ) -> Result<BattleId, BattleError> {
        let roster_a = self.validate_roster(side_a.player, &side_a.monsters)?;
        let roster_b = self.validate_roster(side_b.player, &side_b.monsters)?;
        self.ensure_idle(&roster_a)?;
        self.ensure_idle(&roster_b)?;

        let id = self.book.allocate_id();
        let kind = BattleKind::Scheduled { tournament, round };
        let mut battle = Battle::open(id, kind, BattleSide::new(side_a.player, roster_a));
        battle.side_b = Some(BattleSide::new(side_b.player, roster_b));
        self.activate(&mut battle)?;
        self.book.insert(battle);

        self.notifications.notify(Notification::BattleCreated {
            side_a: side_a.player,
            side_b: Some(side_b.player),
            battle: id,
        });
        Ok(id)
    }

    fn notifications(&mut self) -> &mut dyn NotificationSink {
        &mut *self.notifications
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MonsterType;
    use crate::events::IgnoreOutcomes;
    use crate::state::MonsterTypeId;
    use crate::testing::{TestArena, ALICE, BOB, CAROL};
    use crate::ArenaError;
    use crate::ErrorKind;

    const FIRE_BREATH: SkillId = SkillId(0);
    const SLAM: SkillId = SkillId(1);
    const MEND: SkillId = SkillId(2);
    const ROAR: SkillId = SkillId(3);

    fn arena() -> TestArena {
        let mut arena = TestArena::new();
        arena.catalog.add_skill(
            FIRE_BREATH,
            Skill::new("Fire Breath", 100, SkillType::Physical, 0),
        );
        arena
            .catalog
            .add_skill(SLAM, Skill::new("Slam", 150, SkillType::Physical, 0));
        arena
            .catalog
            .add_skill(MEND, Skill::new("Mend", 50, SkillType::Heal, 0));
        arena
            .catalog
            .add_skill(ROAR, Skill::new("Roar", 100, SkillType::Special, 2));
        arena.catalog.add_type(
            MonsterTypeId(0),
            MonsterType::new("Dragon", 10, 100, 5, 10)
                .with_skill(FIRE_BREATH)
                .with_skill(SLAM)
                .with_skill(MEND)
                .with_skill(ROAR),
        );
        arena.catalog.add_type(
            MonsterTypeId(1),
            MonsterType::new("Sprite", 10, 15, 0, 0)
                .with_skill(FIRE_BREATH)
                .with_skill(SLAM),
        );
        arena
    }

    /// Starts an active public battle between one dragon each.
    fn dragon_duel(arena: &mut TestArena) -> (BattleId, MonsterId, MonsterId) {
        let a = arena.mint(ALICE, MonsterTypeId(0));
        let b = arena.mint(BOB, MonsterTypeId(0));
        arena.engine().start_battle(ALICE, &[a]).unwrap();
        let id = arena.engine().start_battle(BOB, &[b]).unwrap();
        arena.notifications.clear();
        (id, a, b)
    }

    #[test]
    fn physical_skill_damages_target_and_flips_turn() {
        let mut arena = arena();
        let (id, a, b) = dragon_duel(&mut arena);

        let outcome = arena
            .engine()
            .use_skill(ALICE, id, a, b, FIRE_BREATH, &mut IgnoreOutcomes)
            .unwrap();

        assert_eq!(outcome.amount, 10);
        assert_eq!(arena.registry.get(b).health, 90);
        assert_eq!(
            arena.notifications,
            vec![Notification::SkillUsed {
                actor: ALICE,
                attacker: a,
                target: b,
                skill_type: SkillType::Physical,
                amount: 10,
            }]
        );
        assert_eq!(arena.book.battle(id).unwrap().turn_owner, Side::B);
    }

    #[test]
    fn acting_twice_in_a_row_is_rejected() {
        let mut arena = arena();
        let (id, a, b) = dragon_duel(&mut arena);

        arena
            .engine()
            .use_skill(ALICE, id, a, b, FIRE_BREATH, &mut IgnoreOutcomes)
            .unwrap();
        let err = arena
            .engine()
            .use_skill(ALICE, id, a, b, FIRE_BREATH, &mut IgnoreOutcomes)
            .unwrap_err();

        assert_eq!(
            err,
            BattleError::NotYourTurn {
                player: ALICE,
                battle: id
            }
        );
        assert_eq!(arena.registry.get(b).health, 90);
    }

    #[test]
    fn roster_size_is_bounded() {
        let mut arena = arena();
        let ids: Vec<MonsterId> = (0..6)
            .map(|_| arena.mint(ALICE, MonsterTypeId(0)))
            .collect();

        let empty = arena.engine().start_battle(ALICE, &[]).unwrap_err();
        assert_eq!(empty, BattleError::InvalidRosterSize { len: 0 });
        assert!(empty.to_string().contains("at least one monster"));

        let oversized = arena.engine().start_battle(ALICE, &ids).unwrap_err();
        assert_eq!(oversized, BattleError::InvalidRosterSize { len: 6 });
        assert!(oversized.to_string().contains("maximum of 4 monsters"));
        assert_eq!(oversized.kind(), ErrorKind::Validation);
        assert!(arena.book.is_empty());
    }

    #[test]
    fn roster_must_be_owned_and_unique() {
        let mut arena = arena();
        let a = arena.mint(ALICE, MonsterTypeId(0));
        let b = arena.mint(BOB, MonsterTypeId(0));

        assert_eq!(
            arena.engine().start_battle(ALICE, &[a, a]).unwrap_err(),
            BattleError::DuplicateMonster(a)
        );
        assert_eq!(
            arena.engine().start_battle(ALICE, &[a, b]).unwrap_err(),
            BattleError::NotOwner {
                player: ALICE,
                monster: b
            }
        );
        assert!(matches!(
            arena
                .engine()
                .start_battle(ALICE, &[MonsterId(99)])
                .unwrap_err(),
            BattleError::Registry(_)
        ));
    }

    #[test]
    fn knockout_ends_battle_and_rewards_winner() {
        let mut arena = arena();
        let a = arena.mint(ALICE, MonsterTypeId(1));
        let b = arena.mint(BOB, MonsterTypeId(1));
        arena.engine().start_battle(ALICE, &[a]).unwrap();
        let id = arena.engine().start_battle(BOB, &[b]).unwrap();

        arena
            .engine()
            .use_skill(ALICE, id, a, b, FIRE_BREATH, &mut IgnoreOutcomes)
            .unwrap();
        assert_eq!(arena.registry.get(b).health, 5);
        arena
            .engine()
            .use_skill(BOB, id, b, a, FIRE_BREATH, &mut IgnoreOutcomes)
            .unwrap();
        arena.notifications.clear();

        let outcome = arena
            .engine()
            .use_skill(ALICE, id, a, b, SLAM, &mut IgnoreOutcomes)
            .unwrap();

        assert_eq!(outcome.amount, 15);
        assert_eq!(arena.registry.get(b).health, 0);
        assert_eq!(
            outcome.ended,
            Some(BattleOutcome {
                battle: id,
                kind: BattleKind::Public,
                winner: ALICE,
                loser: BOB,
            })
        );
        assert!(arena.registry.get(a).experience > 0);
        assert_eq!(
            arena.notifications.last(),
            Some(&Notification::BattleEnded {
                winner: ALICE,
                battle: id
            })
        );

        let battle = arena.book.battle(id).unwrap();
        assert_eq!(battle.status, BattleStatus::Ended);
        assert_eq!(battle.winner, Some(ALICE));

        let err = arena
            .engine()
            .use_skill(BOB, id, b, a, FIRE_BREATH, &mut IgnoreOutcomes)
            .unwrap_err();
        assert!(matches!(err, BattleError::BattleNotActive { .. }));
    }

    #[test]
    fn fainted_defender_hands_over_to_next_monster() {
        let mut arena = arena();
        let a = arena.mint(ALICE, MonsterTypeId(1));
        let b1 = arena.mint(BOB, MonsterTypeId(1));
        let b2 = arena.mint(BOB, MonsterTypeId(1));
        arena.engine().start_battle(ALICE, &[a]).unwrap();
        let id = arena.engine().start_battle(BOB, &[b1, b2]).unwrap();

        arena.registry.get_mut(b1).health = 10;
        let outcome = arena
            .engine()
            .use_skill(ALICE, id, a, b1, FIRE_BREATH, &mut IgnoreOutcomes)
            .unwrap();

        assert!(outcome.ended.is_none());
        let battle = arena.book.battle(id).unwrap();
        assert_eq!(battle.side_b.as_ref().unwrap().active_monster(), Some(b2));

        let err = arena
            .engine()
            .use_skill(BOB, id, b1, a, FIRE_BREATH, &mut IgnoreOutcomes)
            .unwrap_err();
        assert_eq!(err, BattleError::InvalidAttacker(b1));
    }

    #[test]
    fn cooldown_blocks_reuse_until_it_ticks_down() {
        let mut arena = arena();
        let (id, a, b) = dragon_duel(&mut arena);

        arena
            .engine()
            .use_skill(ALICE, id, a, b, ROAR, &mut IgnoreOutcomes)
            .unwrap();
        assert_eq!(arena.registry.get(a).cooldown(3), 2);

        arena
            .engine()
            .use_skill(BOB, id, b, a, FIRE_BREATH, &mut IgnoreOutcomes)
            .unwrap();
        let err = arena
            .engine()
            .use_skill(ALICE, id, a, b, ROAR, &mut IgnoreOutcomes)
            .unwrap_err();
        assert_eq!(
            err,
            BattleError::InvalidSkill {
                skill: ROAR,
                monster: a,
                reason: SkillRejection::OnCooldown { remaining: 1 },
            }
        );
        // The rejected attempt does not consume the tick.
        assert_eq!(arena.registry.get(a).cooldown(3), 2);

        arena
            .engine()
            .use_skill(ALICE, id, a, b, FIRE_BREATH, &mut IgnoreOutcomes)
            .unwrap();
        assert_eq!(arena.registry.get(a).cooldown(3), 1);
        arena
            .engine()
            .use_skill(BOB, id, b, a, FIRE_BREATH, &mut IgnoreOutcomes)
            .unwrap();
        arena
            .engine()
            .use_skill(ALICE, id, a, b, ROAR, &mut IgnoreOutcomes)
            .unwrap();
    }

    #[test]
    fn heal_restores_attacker_and_targets_own_side() {
        let mut arena = arena();
        let (id, a, b) = dragon_duel(&mut arena);
        arena.registry.get_mut(a).health = 50;

        let err = arena
            .engine()
            .use_skill(ALICE, id, a, b, MEND, &mut IgnoreOutcomes)
            .unwrap_err();
        assert_eq!(err, BattleError::InvalidTarget(b));

        let outcome = arena
            .engine()
            .use_skill(ALICE, id, a, a, MEND, &mut IgnoreOutcomes)
            .unwrap();
        assert_eq!(outcome.skill_type, SkillType::Heal);
        assert_eq!(arena.registry.get(a).health, 55);
        assert_eq!(arena.registry.get(b).health, 100);
    }

    #[test]
    fn unknown_skill_and_target_are_rejected() {
        let mut arena = arena();
        let (id, a, b) = dragon_duel(&mut arena);

        let err = arena
            .engine()
            .use_skill(ALICE, id, a, b, SkillId(42), &mut IgnoreOutcomes)
            .unwrap_err();
        assert!(matches!(
            err,
            BattleError::InvalidSkill {
                reason: SkillRejection::NotInSkillSet,
                ..
            }
        ));

        let err = arena
            .engine()
            .use_skill(ALICE, id, a, a, FIRE_BREATH, &mut IgnoreOutcomes)
            .unwrap_err();
        assert_eq!(err, BattleError::InvalidTarget(a));
    }

    #[test]
    fn waiting_battle_rejects_skills_and_second_queue_entry() {
        let mut arena = arena();
        let a = arena.mint(ALICE, MonsterTypeId(0));
        let id = arena.engine().start_battle(ALICE, &[a]).unwrap();

        assert_eq!(
            arena.notifications,
            vec![Notification::BattleCreated {
                side_a: ALICE,
                side_b: None,
                battle: id
            }]
        );
        assert!(matches!(
            arena
                .engine()
                .use_skill(ALICE, id, a, a, FIRE_BREATH, &mut IgnoreOutcomes)
                .unwrap_err(),
            BattleError::BattleNotActive {
                status: BattleStatus::WaitingForOpponent,
                ..
            }
        ));
        assert_eq!(
            arena.engine().start_battle(ALICE, &[a]).unwrap_err(),
            BattleError::AlreadyWaiting {
                player: ALICE,
                battle: id
            }
        );
        assert!(matches!(
            arena
                .engine()
                .use_skill(ALICE, BattleId(9), a, a, FIRE_BREATH, &mut IgnoreOutcomes)
                .unwrap_err(),
            BattleError::BattleNotFound(BattleId(9))
        ));
    }

    #[test]
    fn activation_restores_health_and_cooldowns() {
        let mut arena = arena();
        let a = arena.mint(ALICE, MonsterTypeId(0));
        let b = arena.mint(BOB, MonsterTypeId(0));
        arena.registry.get_mut(a).health = 1;
        arena.registry.get_mut(a).cooldowns[3] = 5;

        arena.engine().start_battle(ALICE, &[a]).unwrap();
        let id = arena.engine().start_battle(BOB, &[b]).unwrap();

        let battle = arena.book.battle(id).unwrap();
        assert_eq!(battle.status, BattleStatus::Active);
        assert_eq!(battle.turn_owner, Side::A);
        assert_eq!(arena.registry.get(a).health, 100);
        assert_eq!(arena.registry.get(a).cooldown(3), 0);
        assert_eq!(
            arena.notifications.last(),
            Some(&Notification::BattleCreated {
                side_a: ALICE,
                side_b: Some(BOB),
                battle: id
            })
        );
    }

    #[test]
    fn private_invitation_is_completed_by_the_invited_player() {
        let mut arena = arena();
        let a = arena.mint(ALICE, MonsterTypeId(0));
        let b = arena.mint(BOB, MonsterTypeId(0));

        assert_eq!(
            arena.engine().join_battle(ALICE, ALICE, &[a]).unwrap_err(),
            BattleError::SelfMatch(ALICE)
        );

        let id = arena.engine().join_battle(ALICE, BOB, &[a]).unwrap();
        assert!(arena.book.battle(id).unwrap().is_open());
        assert!(matches!(
            arena.engine().join_battle(ALICE, BOB, &[a]).unwrap_err(),
            BattleError::AlreadyWaiting { .. }
        ));

        let joined = arena.engine().join_battle(BOB, ALICE, &[b]).unwrap();
        assert_eq!(joined, id);
        assert!(arena.book.battle(id).unwrap().is_active());
        assert_eq!(
            arena.notifications,
            vec![
                Notification::BattleCreated {
                    side_a: ALICE,
                    side_b: Some(BOB),
                    battle: id
                },
                Notification::BattleCreated {
                    side_a: ALICE,
                    side_b: Some(BOB),
                    battle: id
                },
            ]
        );
    }

    #[test]
    fn scheduled_battles_open_active() {
        let mut arena = arena();
        let a = arena.mint(ALICE, MonsterTypeId(0));
        let b = arena.mint(BOB, MonsterTypeId(0));
        let side_a = Entrant::new(ALICE, [a].into_iter().collect());
        let side_b = Entrant::new(BOB, [b].into_iter().collect());

        let id = arena
            .engine()
            .open_scheduled(TournamentId(0), 0, &side_a, &side_b)
            .unwrap();

        let battle = arena.book.battle(id).unwrap();
        assert!(battle.is_active());
        assert_eq!(battle.tournament(), Some(TournamentId(0)));
        assert_eq!(arena.book.public_queue().count(), 0);
    }

    #[test]
    fn player_outside_the_battle_cannot_act() {
        let mut arena = arena();
        let (id, a, b) = dragon_duel(&mut arena);

        let err = arena
            .engine()
            .use_skill(CAROL, id, a, b, FIRE_BREATH, &mut IgnoreOutcomes)
            .unwrap_err();

        assert_eq!(
            err,
            BattleError::NotYourTurn {
                player: CAROL,
                battle: id
            }
        );
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert_eq!(arena.registry.get(b).health, 100);
        assert!(arena.notifications.is_empty());
    }

    #[test]
    fn monster_in_an_unfinished_battle_cannot_enter_another() {
        let mut arena = arena();
        let (id, a, b) = dragon_duel(&mut arena);
        let c = arena.mint(CAROL, MonsterTypeId(0));
        arena
            .engine()
            .use_skill(ALICE, id, a, b, FIRE_BREATH, &mut IgnoreOutcomes)
            .unwrap();
        arena.notifications.clear();

        let busy = BattleError::MonsterBusy {
            monster: b,
            battle: id,
        };
        assert_eq!(arena.engine().start_battle(BOB, &[b]).unwrap_err(), busy);
        assert_eq!(
            arena.engine().join_battle(BOB, CAROL, &[b]).unwrap_err(),
            busy
        );
        let err = arena
            .engine()
            .open_scheduled(
                TournamentId(0),
                0,
                &Entrant::new(CAROL, [c].into_iter().collect()),
                &Entrant::new(BOB, [b].into_iter().collect()),
            )
            .unwrap_err();
        assert_eq!(err, busy);
        assert_eq!(err.kind(), ErrorKind::StateConflict);
        assert_eq!(err.error_code(), "BATTLE_MONSTER_BUSY");

        // The running battle is untouched.
        assert_eq!(arena.registry.get(b).health, 90);
        assert_eq!(arena.book.len(), 1);
        assert!(arena.notifications.is_empty());
    }

    #[test]
    fn monster_is_free_again_once_its_battle_ends() {
        let mut arena = arena();
        let a = arena.mint(ALICE, MonsterTypeId(1));
        let b = arena.mint(BOB, MonsterTypeId(1));
        arena.engine().start_battle(ALICE, &[a]).unwrap();

        // Still waiting for an opponent counts as engaged.
        assert!(matches!(
            arena.engine().join_battle(ALICE, BOB, &[a]).unwrap_err(),
            BattleError::MonsterBusy { monster, .. } if monster == a
        ));

        let id = arena.engine().start_battle(BOB, &[b]).unwrap();
        let outcome = arena
            .engine()
            .use_skill(ALICE, id, a, b, SLAM, &mut IgnoreOutcomes)
            .unwrap();
        assert!(outcome.ended.is_some());

        let rematch = arena.engine().start_battle(ALICE, &[a]).unwrap();
        assert_ne!(rematch, id);
        assert_eq!(arena.book.engagement(a), Some(rematch));
        assert_eq!(arena.book.engagement(b), None);
    }
}
