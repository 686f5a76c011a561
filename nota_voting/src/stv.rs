use log::{debug, info};

use snafu::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::ballots::BallotPool;
use crate::config::*;
use crate::MultiWinnerResolver;

// Tolerance when comparing fractional vote values.
const EPSILON: f64 = 1e-9;

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct CandidateIdx(u32);

// Invariant: no group is empty.
#[derive(PartialEq, Debug, Clone)]
struct WeightedVote {
    groups: Vec<Vec<CandidateIdx>>,
    count: f64,
    // The part of each vote that has not been used to elect a candidate yet.
    weight: f64,
}

impl WeightedVote {
    fn value(&self) -> f64 {
        self.count * self.weight
    }

    /// The continuing candidates of the most preferred group that still has some.
    fn top_group(&self, continuing: &BTreeSet<CandidateIdx>) -> Vec<CandidateIdx> {
        self.groups
            .iter()
            .map(|g| {
                g.iter()
                    .filter(|cidx| continuing.contains(cidx))
                    .cloned()
                    .collect::<Vec<CandidateIdx>>()
            })
            .find(|g| !g.is_empty())
            .unwrap_or_default()
    }
}

/// The complete outcome of a count, with the statistics of every round.
#[derive(PartialEq, Debug, Clone)]
pub struct StvOutcome {
    pub winners: BTreeSet<CandidateId>,
    pub quota: f64,
    pub rounds: Vec<RoundStats>,
}

/// A single transferable vote count with a Droop quota.
///
/// Surpluses are transferred fractionally: every ballot that contributed to an
/// elected candidate keeps the unused part of its value. Candidates tied on a
/// ballot share its value equally. Each round either elects the candidate with
/// the most votes, if it reaches the quota, or eliminates the candidate with the
/// fewest.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StvResolver {
    pub tiebreak_mode: TieBreakMode,
}

impl Default for StvResolver {
    fn default() -> Self {
        StvResolver::new(TieBreakMode::UseCandidateOrder)
    }
}

impl StvResolver {
    pub fn new(tiebreak_mode: TieBreakMode) -> StvResolver {
        StvResolver { tiebreak_mode }
    }

    /// Runs the count. The candidates are the ones mentioned by the ballots.
    pub fn run(&self, ballots: &BallotPool, seats: usize) -> Result<StvOutcome, ResolverError> {
        let names: Vec<CandidateId> = ballots.candidates().into_iter().collect();
        ensure!(
            seats > 0,
            FailedSnafu {
                message: "no seat to fill".to_string()
            }
        );
        ensure!(
            names.len() >= seats,
            FailedSnafu {
                message: format!(
                    "{} seats to fill but the ballots only rank {} candidates",
                    seats,
                    names.len()
                )
            }
        );
        let index: HashMap<&CandidateId, CandidateIdx> = names
            .iter()
            .enumerate()
            .map(|(idx, cid)| (cid, CandidateIdx(idx as u32)))
            .collect();

        let mut votes: Vec<WeightedVote> = ballots
            .iter()
            .map(|b| WeightedVote {
                groups: b
                    .ranking
                    .groups()
                    .iter()
                    .map(|g| g.iter().map(|cid| index[*cid]).collect())
                    .collect(),
                count: b.count as f64,
                weight: 1.0,
            })
            .filter(|v| !v.groups.is_empty())
            .collect();

        let total: f64 = votes.iter().map(|v| v.value()).sum();
        let quota = (total / (seats as f64 + 1.0)).floor() + 1.0;
        info!(
            "STV count: {} candidates, {} seats, {} votes, quota {}",
            names.len(),
            seats,
            total,
            quota
        );

        let mut continuing: BTreeSet<CandidateIdx> = index.values().cloned().collect();
        let mut elected: Vec<CandidateIdx> = Vec::new();
        let mut rounds: Vec<RoundStats> = Vec::new();

        while elected.len() < seats {
            let round = (rounds.len() + 1) as u32;
            let (tally, exhausted) = compute_tally(&votes, &continuing);
            let mut stats = RoundStats {
                round,
                tally: tally
                    .iter()
                    .map(|(cidx, vc)| (names[cidx.0 as usize].clone(), *vc))
                    .collect(),
                elected: Vec::new(),
                eliminated: Vec::new(),
                exhausted,
            };

            if continuing.len() <= seats - elected.len() {
                // Not more candidates than the remaining seats.
                for cidx in continuing.iter() {
                    stats.elected.push(names[cidx.0 as usize].clone());
                    elected.push(*cidx);
                }
                continuing.clear();
            } else if let Some((cidx, count)) = find_elected_candidate(&tally, quota) {
                stats.elected.push(names[cidx.0 as usize].clone());
                transfer_surplus(&mut votes, &continuing, cidx, count, quota);
                continuing.remove(&cidx);
                elected.push(cidx);
            } else {
                let cidx = find_eliminated_candidate(&tally, self.tiebreak_mode, &names, round);
                stats.eliminated.push(names[cidx.0 as usize].clone());
                continuing.remove(&cidx);
            }

            info!("Round {} (quota: {})", round, quota);
            for (name, count) in stats.tally.iter() {
                if stats.elected.contains(name) {
                    info!("      {:.4} {} -> elected", count, name);
                } else if stats.eliminated.contains(name) {
                    info!("      {:.4} {} -> eliminated", count, name);
                } else {
                    info!("      {:.4} {}", count, name);
                }
            }
            rounds.push(stats);
        }

        Ok(StvOutcome {
            winners: elected
                .iter()
                .map(|cidx| names[cidx.0 as usize].clone())
                .collect(),
            quota,
            rounds,
        })
    }
}

impl MultiWinnerResolver for StvResolver {
    fn resolve(
        &self,
        ballots: &BallotPool,
        required_winners: usize,
    ) -> Result<BTreeSet<CandidateId>, ResolverError> {
        self.run(ballots, required_winners).map(|o| o.winners)
    }

    fn resolve_with_stats(
        &self,
        ballots: &BallotPool,
        required_winners: usize,
    ) -> Result<(BTreeSet<CandidateId>, Vec<RoundStats>), ResolverError> {
        let outcome = self.run(ballots, required_winners)?;
        Ok((outcome.winners, outcome.rounds))
    }
}

/// The votes of every continuing candidate, and the exhausted votes.
fn compute_tally(
    votes: &[WeightedVote],
    continuing: &BTreeSet<CandidateIdx>,
) -> (BTreeMap<CandidateIdx, f64>, f64) {
    let mut tally: BTreeMap<CandidateIdx, f64> = continuing.iter().map(|c| (*c, 0.0)).collect();
    let mut exhausted = 0.0;
    for v in votes.iter() {
        let top = v.top_group(continuing);
        if top.is_empty() {
            exhausted += v.value();
            continue;
        }
        let share = v.value() / top.len() as f64;
        for cidx in top.iter() {
            if let Some(vc) = tally.get_mut(cidx) {
                *vc += share;
            }
        }
    }
    debug!("compute_tally: {:?} exhausted: {}", tally, exhausted);
    (tally, exhausted)
}

/// The candidate with the most votes, if it reaches the quota.
/// Equal counts are resolved in candidate order.
fn find_elected_candidate(
    tally: &BTreeMap<CandidateIdx, f64>,
    quota: f64,
) -> Option<(CandidateIdx, f64)> {
    let mut best: Option<(CandidateIdx, f64)> = None;
    for (cidx, vc) in tally.iter() {
        match best {
            Some((_, best_vc)) if *vc <= best_vc + EPSILON => {}
            _ => best = Some((*cidx, *vc)),
        }
    }
    best.filter(|(_, vc)| *vc + EPSILON >= quota)
}

// Keeps, on every ballot counted for the elected candidate, the part of the value
// that was not needed to reach the quota.
fn transfer_surplus(
    votes: &mut [WeightedVote],
    continuing: &BTreeSet<CandidateIdx>,
    cidx: CandidateIdx,
    count: f64,
    quota: f64,
) {
    let kept_ratio = ((count - quota) / count).max(0.0);
    debug!(
        "transfer_surplus: candidate {:?} count {} surplus ratio {}",
        cidx, count, kept_ratio
    );
    for v in votes.iter_mut() {
        let top = v.top_group(continuing);
        if top.contains(&cidx) {
            let k = top.len() as f64;
            v.weight *= 1.0 - (1.0 - kept_ratio) / k;
        }
    }
}

fn find_eliminated_candidate(
    tally: &BTreeMap<CandidateIdx, f64>,
    tiebreak: TieBreakMode,
    names: &[CandidateId],
    num_round: u32,
) -> CandidateIdx {
    let min_count = tally.values().cloned().fold(f64::INFINITY, f64::min);
    let mut all_smallest: Vec<CandidateIdx> = tally
        .iter()
        .filter(|(_, vc)| **vc <= min_count + EPSILON)
        .map(|(cidx, _)| *cidx)
        .collect();
    debug!(
        "find_eliminated_candidate: all_smallest: {:?}",
        all_smallest
    );

    if all_smallest.len() > 1 {
        match tiebreak {
            TieBreakMode::UseCandidateOrder => {
                // The last candidate in id order goes first.
                all_smallest.reverse();
            }
            TieBreakMode::Random(seed) => {
                all_smallest = candidate_permutation_crypto(&all_smallest, names, seed, num_round);
            }
        }
        debug!(
            "find_eliminated_candidate: tiebreak {:?} queue: {:?}",
            tiebreak, all_smallest
        );
    }
    all_smallest[0]
}

/// Orders the candidates by the hash of the seed, the round and their id.
fn candidate_permutation_crypto(
    candidates: &[CandidateIdx],
    names: &[CandidateId],
    seed: u32,
    num_round: u32,
) -> Vec<CandidateIdx> {
    let mut data: Vec<(CandidateIdx, String)> = candidates
        .iter()
        .map(|cidx| {
            let key = format!("{:08}{:08}{}", seed, num_round, names[cidx.0 as usize]);
            (*cidx, sha256::digest(key))
        })
        .collect();
    data.sort_by(|x, y| x.1.cmp(&y.1));
    data.iter().map(|p| p.0).collect()
}
