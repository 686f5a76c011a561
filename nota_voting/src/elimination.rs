use log::{debug, info};

use std::collections::BTreeSet;

use crate::ballots::BallotPool;
use crate::config::*;

/// Finds the candidates who lost a head-to-head comparison against "None of the above".
///
/// This is a single pass over the given results: a candidate who would only lose
/// to the sentinel once other candidates are removed is not caught. The sentinel
/// itself is never a loser.
pub fn find_losers(roster: &Roster, results: &PairwiseResults) -> BTreeSet<CandidateId> {
    let sentinel = roster.sentinel();
    let mut losers: BTreeSet<CandidateId> = BTreeSet::new();
    for ((a, b), outcome) in results.iter() {
        if outcome.winner == *sentinel {
            for cid in [a, b] {
                if !roster.is_sentinel(cid) {
                    debug!(
                        "find_losers: {} lost to {} by {}",
                        cid, sentinel, outcome.margin
                    );
                    losers.insert(cid.clone());
                }
            }
        }
    }
    losers
}

/// Runs the elimination stage: returns the losers and the ballots without them.
pub fn eliminate(
    roster: &Roster,
    results: &PairwiseResults,
    ballots: &BallotPool,
) -> (BTreeSet<CandidateId>, BallotPool) {
    let losers = find_losers(roster, results);
    for cid in losers.iter() {
        info!(
            "Removed due to losing to None of the above: {}: {}",
            cid,
            roster.name(cid).unwrap_or_default()
        );
    }
    let derived = ballots.without_candidates(&losers);
    (losers, derived)
}
