//! Seed-order pairing for single-elimination rounds.

use crate::engine::Entrant;
use crate::state::Tournament;

/// Returns true if `size` is a valid bracket size.
pub fn is_valid_size(size: u32, max: usize) -> bool {
    size >= 2 && size.is_power_of_two() && size as usize <= max
}

/// Pairs surviving players by seed order: the 2k-th survivor meets the
/// (2k+1)-th.
///
/// A trailing survivor without an opponent is left out; it cannot happen in a
/// bracket whose size is a power of two.
pub fn pairings(tournament: &Tournament) -> Vec<(Entrant, Entrant)> {
    let survivors: Vec<Entrant> = tournament
        .survivors()
        .map(|player| Entrant::new(player.id, player.monsters.clone()))
        .collect();

    survivors
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect()
}
