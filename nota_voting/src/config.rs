// ********* Input data structures ***********

use std::collections::{BTreeMap, BTreeSet};

use snafu::prelude::*;

use crate::ballots::BallotPool;

/// The display name that marks the sentinel candidate of a roster.
pub const NONE_OF_THE_ABOVE: &str = "None of the above";

/// Stable key of a candidate. Candidates are always enumerated in the
/// lexicographic order of their ids.
pub type CandidateId = String;

/// The registered candidates of an election, including the sentinel.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Roster {
    candidates: BTreeMap<CandidateId, String>,
    sentinel: CandidateId,
}

impl Roster {
    /// Builds a roster from a mapping id -> display name.
    ///
    /// Exactly one candidate must be named "None of the above".
    pub fn new(candidates: BTreeMap<CandidateId, String>) -> Result<Roster, InputError> {
        ensure!(
            candidates.len() >= 2,
            TooFewCandidatesSnafu {
                count: candidates.len()
            }
        );
        let sentinels: Vec<&CandidateId> = candidates
            .iter()
            .filter(|(_, name)| name.as_str() == NONE_OF_THE_ABOVE)
            .map(|(cid, _)| cid)
            .collect();
        let sentinel = match sentinels.as_slice() {
            [cid] => (*cid).clone(),
            _ => {
                return SentinelSnafu {
                    count: sentinels.len(),
                }
                .fail()
            }
        };
        Ok(Roster {
            candidates,
            sentinel,
        })
    }

    pub fn sentinel(&self) -> &CandidateId {
        &self.sentinel
    }

    pub fn is_sentinel(&self, cid: &str) -> bool {
        self.sentinel == cid
    }

    pub fn contains(&self, cid: &str) -> bool {
        self.candidates.contains_key(cid)
    }

    pub fn name(&self, cid: &str) -> Option<&str> {
        self.candidates.get(cid).map(|s| s.as_str())
    }

    /// All the candidate ids, sentinel included, in lexicographic order.
    pub fn ids(&self) -> impl Iterator<Item = &CandidateId> {
        self.candidates.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CandidateId, &String)> {
        self.candidates.iter()
    }

    /// The candidates that can actually be elected.
    pub fn real_candidates(&self) -> BTreeSet<CandidateId> {
        self.candidates
            .keys()
            .filter(|cid| **cid != self.sentinel)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

// ******** Output data structures *********

/// An unordered pair of candidates, stored with the smaller id first.
pub type CandidatePair = (CandidateId, CandidateId);

/// The outcome of one head-to-head comparison.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PairwiseOutcome {
    pub winner: CandidateId,
    /// Absolute difference of the weighted votes of the two candidates.
    pub margin: u64,
}

pub type PairwiseResults = BTreeMap<CandidatePair, PairwiseOutcome>;

/// How the winners were obtained.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Decision {
    /// There were not more surviving candidates than seats.
    DirectWin,
    /// The multi-winner resolver picked the winners.
    Delegated,
}

/// Statistics for one round of a resolver.
#[derive(PartialEq, Debug, Clone)]
pub struct RoundStats {
    pub round: u32,
    pub tally: Vec<(CandidateId, f64)>,
    pub elected: Vec<CandidateId>,
    pub eliminated: Vec<CandidateId>,
    /// The weight of the ballots that do not rank any continuing candidate.
    pub exhausted: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ElectionResult {
    pub pairwise: PairwiseResults,
    pub losers: BTreeSet<CandidateId>,
    pub survivors: BTreeSet<CandidateId>,
    pub decision: Decision,
    pub winners: BTreeSet<CandidateId>,
    pub total_votes: u64,
    /// The ballots once the losers have been removed.
    pub derived_ballots: BallotPool,
    /// Empty unless the resolver reports rounds.
    pub resolver_rounds: Vec<RoundStats>,
}

/// Errors caused by invalid election data.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum InputError {
    #[snafu(display("at least 2 candidates are required, found {count}"))]
    TooFewCandidates { count: usize },

    #[snafu(display(
        "exactly one candidate must be named \"None of the above\", found {count}"
    ))]
    Sentinel { count: usize },

    #[snafu(display("ballot {index} references unknown candidate {candidate:?}"))]
    UnknownCandidate { index: usize, candidate: String },

    #[snafu(display("ballot {index} mentions candidate {candidate:?} more than once"))]
    DuplicateCandidate { index: usize, candidate: String },

    #[snafu(display("ballot {index} has a count of zero"))]
    ZeroCount { index: usize },

    #[snafu(display(
        "the number of positions must be between 1 and {candidates}, got {positions}"
    ))]
    InvalidPositions { positions: usize, candidates: usize },
}

/// Errors coming from the multi-winner resolver.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ResolverError {
    #[snafu(display("the resolver failed: {message}"))]
    Failed { message: String },

    #[snafu(display("the resolver returned {found} winners, {expected} were required"))]
    WinnerCountMismatch { expected: usize, found: usize },

    #[snafu(display("the resolver elected {candidate:?} which is not a surviving candidate"))]
    UnknownWinner { candidate: String },
}

/// Errors that prevent the election from completing.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum VotingErrors {
    #[snafu(display("invalid input: {source}"))]
    Input { source: InputError },

    #[snafu(display("resolver error: {source}"))]
    Resolver { source: ResolverError },
}

impl From<InputError> for VotingErrors {
    fn from(source: InputError) -> Self {
        VotingErrors::Input { source }
    }
}

impl From<ResolverError> for VotingErrors {
    fn from(source: ResolverError) -> Self {
        VotingErrors::Resolver { source }
    }
}

// ********* Configuration **********

/// How the resolver orders candidates that are tied for elimination.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TieBreakMode {
    /// The candidate with the largest id is eliminated first.
    UseCandidateOrder,
    // The order is derived from a cryptographic hash of the seed, the round and the
    // candidate id, so it is hard to guess but reproducible.
    Random(u32),
}

/// Everything needed to run an election.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Election {
    pub roster: Roster,
    pub ballots: BallotPool,
    /// The number of seats to fill.
    pub positions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(entries: &[(&str, &str)]) -> Result<Roster, InputError> {
        Roster::new(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn roster_finds_sentinel() {
        let r = roster(&[("a", "Alice"), ("n", NONE_OF_THE_ABOVE), ("b", "Bob")]).unwrap();
        assert_eq!(r.sentinel(), "n");
        assert!(r.is_sentinel("n"));
        let ids: Vec<&CandidateId> = r.ids().collect();
        assert_eq!(ids, vec!["a", "b", "n"]);
        assert_eq!(r.real_candidates().len(), 2);
        assert_eq!(r.name("b"), Some("Bob"));
    }

    #[test]
    fn roster_needs_two_candidates() {
        assert_eq!(
            roster(&[("n", NONE_OF_THE_ABOVE)]),
            Err(InputError::TooFewCandidates { count: 1 })
        );
    }

    #[test]
    fn roster_needs_exactly_one_sentinel() {
        assert_eq!(
            roster(&[("a", "Alice"), ("b", "Bob")]),
            Err(InputError::Sentinel { count: 0 })
        );
        assert_eq!(
            roster(&[("a", NONE_OF_THE_ABOVE), ("b", NONE_OF_THE_ABOVE)]),
            Err(InputError::Sentinel { count: 2 })
        );
    }
}
