/*!
Tallies multi-winner ranked elections that offer a "None of the above" option.

The count runs in three stages:
1. every pair of candidates is compared head-to-head across all the ballots,
2. the candidates who lose such a comparison against "None of the above" are
   removed from the race and from the ballots,
3. if there are still more candidates than seats, a proportional multi-winner
   method picks the winners among the remaining ones.

```
use nota_voting::builder::Builder;
use nota_voting::*;
# use nota_voting::VotingErrors;

let mut builder = Builder::new(1)?.candidates(&[
    ("A", "Alice"),
    ("B", "Bob"),
    ("N", NONE_OF_THE_ABOVE),
])?;
builder.add_ballot(&[&["A"], &["B"]], 3)?;
builder.add_ballot(&[&["N"], &["A"], &["B"]], 2)?;

let result = run_election(&builder.build()?, &StvResolver::default())?;
assert!(result.losers.is_empty());
assert_eq!(result.decision, Decision::Delegated);
assert!(result.winners.contains("A"));
# Ok::<(), VotingErrors>(())
```
*/
mod ballots;
pub mod builder;
mod config;
pub mod elimination;
pub mod manual;
pub mod pairwise;
pub mod quick_start;
pub mod standardize;
pub mod stv;

use log::{debug, info};

use snafu::prelude::*;
use std::collections::{BTreeSet, HashSet};

pub use crate::ballots::*;
pub use crate::config::*;
pub use crate::stv::{StvOutcome, StvResolver};

use crate::standardize::{standardize, StandardizedBallot};

/// A method that selects a fixed number of winners from ranked ballots.
///
/// The ballots it receives are already stripped of the eliminated candidates
/// and of the sentinel.
pub trait MultiWinnerResolver {
    /// Returns exactly `required_winners` candidates mentioned in `ballots`.
    fn resolve(
        &self,
        ballots: &BallotPool,
        required_winners: usize,
    ) -> Result<BTreeSet<CandidateId>, ResolverError>;

    /// Same as `resolve`, along with the statistics of each round when the
    /// method has rounds.
    fn resolve_with_stats(
        &self,
        ballots: &BallotPool,
        required_winners: usize,
    ) -> Result<(BTreeSet<CandidateId>, Vec<RoundStats>), ResolverError> {
        Ok((self.resolve(ballots, required_winners)?, Vec::new()))
    }
}

/// Runs the full count for the given election.
///
/// Arguments:
/// * `election` the roster, the ballots and the number of seats
/// * `resolver` the method used when there are more surviving candidates than seats
pub fn run_election<R: MultiWinnerResolver + ?Sized>(
    election: &Election,
    resolver: &R,
) -> Result<ElectionResult, VotingErrors> {
    let roster = &election.roster;
    info!(
        "Processing {} ballots ({} votes), {} candidates, {} positions",
        election.ballots.len(),
        election.ballots.total_votes(),
        roster.len(),
        election.positions
    );
    for (cid, name) in roster.iter() {
        info!("Candidate: {}: {}", cid, name);
    }

    let checked = checks(election).context(InputSnafu)?;

    let pairwise = pairwise::tally_pairs(roster, &checked);
    info!("Pairwise tally done: {} pairs", pairwise.len());

    let (losers, derived_ballots) =
        elimination::eliminate(roster, &pairwise, &election.ballots);
    info!("Elimination done: {} losers", losers.len());

    let survivors = survivors(roster, &losers);
    let (decision, winners, resolver_rounds) = decide_winners(
        roster,
        &survivors,
        &derived_ballots,
        election.positions,
        resolver,
    )?;
    info!("Resolved ({:?}): winners {:?}", decision, winners);

    Ok(ElectionResult {
        pairwise,
        losers,
        survivors,
        decision,
        winners,
        total_votes: election.ballots.total_votes(),
        derived_ballots,
        resolver_rounds,
    })
}

/// The candidates that can still win: not losers and not the sentinel.
pub fn survivors(roster: &Roster, losers: &BTreeSet<CandidateId>) -> BTreeSet<CandidateId> {
    roster
        .real_candidates()
        .into_iter()
        .filter(|cid| !losers.contains(cid))
        .collect()
}

/// Picks the winners among the survivors.
///
/// When there are not more survivors than positions, they all win. Otherwise the
/// resolver is called with the derived ballots, without the sentinel. If the ballots
/// rank no more survivors than positions, the ranked ones win and the remaining
/// seats go to the unranked survivors in id order.
pub fn decide_winners<R: MultiWinnerResolver + ?Sized>(
    roster: &Roster,
    survivors: &BTreeSet<CandidateId>,
    derived_ballots: &BallotPool,
    positions: usize,
    resolver: &R,
) -> Result<(Decision, BTreeSet<CandidateId>, Vec<RoundStats>), VotingErrors> {
    if survivors.len() <= positions {
        debug!(
            "decide_winners: {} survivors for {} positions, all elected",
            survivors.len(),
            positions
        );
        return Ok((Decision::DirectWin, survivors.clone(), Vec::new()));
    }

    let sentinel: BTreeSet<CandidateId> = [roster.sentinel().clone()].into_iter().collect();
    let resolver_ballots = derived_ballots.without_candidates(&sentinel);

    // Survivors that no ballot ranks can only take the seats left over.
    let ranked: BTreeSet<CandidateId> = resolver_ballots
        .candidates()
        .intersection(survivors)
        .cloned()
        .collect();
    if ranked.len() <= positions {
        let mut winners = ranked;
        let unranked: Vec<&CandidateId> = survivors
            .iter()
            .filter(|cid| !winners.contains(*cid))
            .collect();
        let missing = positions - winners.len();
        info!(
            "Only {} survivors are ranked for {} positions, {} seats go to unranked survivors",
            winners.len(),
            positions,
            missing
        );
        winners.extend(unranked.into_iter().take(missing).cloned());
        return Ok((Decision::Delegated, winners, Vec::new()));
    }

    debug!(
        "decide_winners: delegating {} ranked survivors for {} positions",
        ranked.len(),
        positions
    );
    let (winners, rounds) = resolver
        .resolve_with_stats(&resolver_ballots, positions)
        .context(ResolverSnafu)?;

    if winners.len() != positions {
        return Err(VotingErrors::from(ResolverError::WinnerCountMismatch {
            expected: positions,
            found: winners.len(),
        }));
    }
    if let Some(cid) = winners.iter().find(|cid| !survivors.contains(*cid)) {
        return Err(VotingErrors::from(ResolverError::UnknownWinner {
            candidate: cid.clone(),
        }));
    }
    Ok((Decision::Delegated, winners, rounds))
}

// Validates the ballots against the roster and standardizes them once.
fn checks(election: &Election) -> Result<Vec<StandardizedBallot>, InputError> {
    let roster = &election.roster;
    let num_real = roster.real_candidates().len();
    ensure!(
        election.positions >= 1 && election.positions <= num_real,
        InvalidPositionsSnafu {
            positions: election.positions,
            candidates: num_real,
        }
    );

    let mut res: Vec<StandardizedBallot> = Vec::with_capacity(election.ballots.len());
    for (index, ballot) in election.ballots.iter().enumerate() {
        ensure!(ballot.count > 0, ZeroCountSnafu { index });
        let mut seen: HashSet<&CandidateId> = HashSet::new();
        for cid in ballot.ranking.mentions() {
            ensure!(
                roster.contains(cid),
                UnknownCandidateSnafu {
                    index,
                    candidate: cid.clone()
                }
            );
            ensure!(
                seen.insert(cid),
                DuplicateCandidateSnafu {
                    index,
                    candidate: cid.clone()
                }
            );
        }
        res.push(standardize(ballot));
    }
    debug!("checks: {} ballots standardized", res.len());
    Ok(res)
}
