//! Run a scripted tournament against the arena runtime
//!
//! Seeds a runtime from content files, enrolls `players` scripted players with
//! freshly minted rosters, and fights every battle to completion with a greedy
//! policy: the acting monster uses its strongest ready damaging skill on the
//! opposing active monster.

use anyhow::{Context, Result, bail};
use clap::Parser;
use console::style;
use std::path::PathBuf;

use arena_core::{
    BattleId, CatalogOracle, MonsterId, MonsterTypeId, Notification, PlayerId, Side, SkillId,
    TournamentId, TournamentStatus,
};
use arena_runtime::{ArenaState, Event, Runtime, RuntimeHandle, Topic};

use super::content_factory;

/// Turns after which a battle is considered stuck.
const MAX_TURNS: usize = 10_000;

/// Run a scripted tournament and print the bracket
#[derive(Parser)]
pub struct Simulate {
    /// Number of players (a power of two between 2 and 64)
    #[arg(short, long, default_value_t = 4)]
    players: u32,

    /// Monsters per roster (1 to 4)
    #[arg(short, long, default_value_t = 2)]
    roster: u32,

    /// Content directory holding arena.toml and catalog.ron
    /// (defaults to the bundled content)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Print every published event as JSON
    #[arg(long)]
    events: bool,
}

impl Simulate {
    pub async fn execute(self) -> Result<()> {
        let factory = content_factory(self.data_dir);
        let runtime = Runtime::builder()
            .content(&factory)
            .with_context(|| format!("Failed to load content from {}", factory.data_dir().display()))?
            .build()
            .await?;
        let handle = runtime.handle();

        let printers = if self.events {
            spawn_event_printers(&handle)
        } else {
            Vec::new()
        };

        let types: Vec<MonsterTypeId> = handle
            .catalog()
            .list_monster_types()?
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        if types.is_empty() {
            bail!("Catalog has no monster types");
        }

        let host = PlayerId(1);
        let tournament = handle.create_tournament(host, self.players).await?;
        for seat in 0..self.players {
            let player = PlayerId(u64::from(seat) + 1);
            let mut roster = Vec::new();
            for slot in 0..self.roster {
                let type_id = types[((seat + slot) as usize) % types.len()];
                roster.push(handle.mint(player, type_id).await?);
            }
            handle.join_tournament(player, tournament).await?;
            handle
                .set_tournament_monsters(player, tournament, roster)
                .await?;
            handle.mark_player_ready(player, tournament).await?;
        }

        println!(
            "{} {} players, {} monsters each",
            style("Tournament").bold().cyan(),
            self.players,
            self.roster
        );
        handle.start_tournament(host, tournament).await?;

        let champion = run_bracket(&handle, tournament).await?;
        println!();
        println!(
            "{} {}",
            style("Champion:").bold().green(),
            style(champion).bold()
        );

        drop(handle);
        runtime.shutdown().await?;
        for printer in printers {
            printer.await?;
        }
        Ok(())
    }
}

/// Plays rounds until the tournament ends and returns the champion.
async fn run_bracket(handle: &RuntimeHandle, tournament: TournamentId) -> Result<PlayerId> {
    loop {
        let record = handle
            .tournament(tournament)
            .await?
            .context("Tournament disappeared")?;
        match record.status {
            TournamentStatus::Ended => {
                return record.champion.context("Ended tournament has no champion");
            }
            TournamentStatus::Pending => bail!("Tournament {tournament} never started"),
            TournamentStatus::Started => {}
        }

        println!();
        println!(
            "{}",
            style(format!("Round {}", record.current_round)).bold().yellow()
        );
        for battle in record.pending_battles {
            let (winner, loser, turns) = fight(handle, battle).await?;
            println!(
                "  {:<10} {} defeats {} in {} turns",
                battle.to_string(),
                style(winner).green(),
                style(loser).red(),
                turns
            );
        }
    }
}

/// Fights one battle to the end. Returns `(winner, loser, turns)`.
async fn fight(handle: &RuntimeHandle, id: BattleId) -> Result<(PlayerId, PlayerId, usize)> {
    for turn in 1..=MAX_TURNS {
        let state = handle.query_state().await?;
        let battle = state.battle(id).context("Battle not found")?;
        let (own, opposing) = match battle.turn_owner {
            Side::A => (Some(&battle.side_a), battle.side_b.as_ref()),
            Side::B => (battle.side_b.as_ref(), Some(&battle.side_a)),
        };
        let (Some(own), Some(opposing)) = (own, opposing) else {
            bail!("Battle {id} has an empty seat");
        };
        let attacker = own.active_monster().context("No active attacker")?;
        let target = opposing.active_monster().context("No active target")?;
        let skill = choose_skill(handle, &state, attacker)?;

        let outcome = handle
            .use_skill(own.player, id, attacker, target, skill)
            .await?;
        if let Some(ended) = outcome.ended {
            return Ok((ended.winner, ended.loser, turn));
        }
    }
    bail!("Battle {id} did not finish within {MAX_TURNS} turns")
}

/// Strongest damaging skill that is ready this turn.
fn choose_skill(
    handle: &RuntimeHandle,
    state: &ArenaState,
    attacker: MonsterId,
) -> Result<SkillId> {
    let monster = state.monster(attacker).context("Attacker not minted")?;
    let catalog = handle.catalog();
    let monster_type = catalog
        .monster_type(monster.type_id)
        .context("Attacker type missing from catalog")?;

    monster_type
        .skill_set
        .iter()
        .enumerate()
        // Cooldowns tick once before the check, so 1 means ready.
        .filter(|(slot, _)| monster.cooldown(*slot) <= 1)
        .filter_map(|(_, &id)| catalog.skill(id).map(|skill| (id, skill)))
        .filter(|(_, skill)| !skill.skill_type.is_heal())
        .max_by_key(|(_, skill)| skill.damage_multiplier_percent)
        .map(|(id, _)| id)
        .with_context(|| format!("{attacker} has no ready damaging skill"))
}

/// One printing task per topic; each ends once the runtime drops its bus.
fn spawn_event_printers(handle: &RuntimeHandle) -> Vec<tokio::task::JoinHandle<()>> {
    handle
        .subscribe_multiple(&[Topic::Battle, Topic::Tournament, Topic::Monster])
        .into_values()
        .map(|mut rx| {
            tokio::spawn(async move {
                while let Ok(event) = rx.recv().await {
                    print_event(&event);
                }
            })
        })
        .collect()
}

fn print_event(event: &Event) {
    let important = matches!(
        event.notification(),
        Some(Notification::BattleEnded { .. } | Notification::TournamentEnded { .. })
    );
    match serde_json::to_string(event) {
        Ok(json) if important => eprintln!("{}", style(json).bold()),
        Ok(json) => eprintln!("{}", style(json).dim()),
        Err(error) => eprintln!("unserializable event: {error}"),
    }
}
