use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::participant::ParticipantId;

/// A directed giver -> receiver assignment
#[derive(PartialEq, Eq, Hash, Debug, Clone, Serialize, Deserialize)]
pub struct Pairing {
    pub giver: ParticipantId,
    pub receiver: ParticipantId,
}

/// Uniformly permute `items` in place (Fisher-Yates).
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Arrange `ids` into a single random gift-giving cycle.
///
/// The ids are shuffled and every position gives to its successor, the last
/// one wrapping around to the first. For at least 2 distinct ids this is a
/// derangement by construction: everyone gives exactly once, receives exactly
/// once, and nobody draws themselves.
///
/// Callers must not pass fewer than 2 ids.
pub fn generate_pairings<R: Rng + ?Sized>(ids: &[ParticipantId], rng: &mut R) -> Vec<Pairing> {
    debug_assert!(ids.len() >= 2, "pairing requires at least 2 participants");

    let mut order = ids.to_vec();
    shuffle(&mut order, rng);

    order
        .iter()
        .enumerate()
        .map(|(i, giver)| Pairing {
            giver: giver.clone(),
            receiver: order[(i + 1) % order.len()].clone(),
        })
        .collect()
}

/// Return if `pairings` gives every id in `ids` exactly one giver and one
/// receiver slot, with no self-pairing.
pub fn is_valid_cycle(ids: &[ParticipantId], pairings: &[Pairing]) -> bool {
    if pairings.len() != ids.len() {
        return false;
    }

    let expected: HashSet<&str> = ids.iter().map(|id| id.as_str()).collect();
    let givers: HashSet<&str> = pairings.iter().map(|p| p.giver.as_str()).collect();
    let receivers: HashSet<&str> = pairings.iter().map(|p| p.receiver.as_str()).collect();

    expected.len() == ids.len()
        && givers == expected
        && receivers == expected
        && pairings.iter().all(|p| p.giver != p.receiver)
}
