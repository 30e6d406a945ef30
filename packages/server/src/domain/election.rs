//! Admin election on departure.
//!
//! The policy only picks a candidate; applying the result to the directory
//! is the registry's job.

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::entity::Member;

/// Strategy for choosing the next admin among the remaining members.
pub trait AdminElection: Send {
    /// Index of the chosen candidate, `None` when `candidates` is empty.
    fn elect(&mut self, candidates: &[Member]) -> Option<usize>;
}

/// Uniform random choice.
#[derive(Debug)]
pub struct RandomElection {
    rng: StdRng,
}

impl RandomElection {
    /// Seeded from the operating system
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence of choices
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomElection {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminElection for RandomElection {
    fn elect(&mut self, candidates: &[Member]) -> Option<usize> {
        if candidates.is_empty() {
            return None;
        }
        Some(self.rng.random_range(0..candidates.len()))
    }
}

/// Always the longest-present member. Deterministic, used in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstMemberElection;

impl AdminElection for FirstMemberElection {
    fn elect(&mut self, candidates: &[Member]) -> Option<usize> {
        if candidates.is_empty() { None } else { Some(0) }
    }
}

/// Pick a replacement admin.
///
/// Returns `None` when the departing connection was not the admin or when
/// nobody is left in the room.
pub fn elect_admin(
    policy: &mut dyn AdminElection,
    departing_was_admin: bool,
    remaining: &[Member],
) -> Option<Member> {
    if !departing_was_admin || remaining.is_empty() {
        return None;
    }
    policy
        .elect(remaining)
        .and_then(|index| remaining.get(index))
        .cloned()
}
