// ********* Ballot store ***********

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::config::CandidateId;

/// The preferences expressed on a ballot.
///
/// Both notations carry the same information for the tally: whether a candidate
/// is mentioned, and how it compares to the other mentioned candidates.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ranking {
    /// Groups of tied candidates, the most preferred group first.
    /// A candidate missing from every group is unranked.
    Grouped(Vec<Vec<CandidateId>>),
    /// An explicit rank for each mentioned candidate. Smaller is preferred.
    Ranked(BTreeMap<CandidateId, u32>),
}

impl Ranking {
    /// All the candidates mentioned on this ranking, duplicates included.
    pub fn mentions(&self) -> Vec<&CandidateId> {
        match self {
            Ranking::Grouped(groups) => groups.iter().flatten().collect(),
            Ranking::Ranked(ranks) => ranks.keys().collect(),
        }
    }

    pub fn contains(&self, cid: &str) -> bool {
        match self {
            Ranking::Grouped(groups) => groups.iter().flatten().any(|c| c == cid),
            Ranking::Ranked(ranks) => ranks.contains_key(cid),
        }
    }

    /// The non-empty groups of tied candidates, most preferred first.
    pub fn groups(&self) -> Vec<Vec<&CandidateId>> {
        match self {
            Ranking::Grouped(groups) => groups
                .iter()
                .filter(|g| !g.is_empty())
                .map(|g| g.iter().collect())
                .collect(),
            Ranking::Ranked(ranks) => {
                let mut by_rank: BTreeMap<u32, Vec<&CandidateId>> = BTreeMap::new();
                for (cid, rank) in ranks.iter() {
                    by_rank.entry(*rank).or_default().push(cid);
                }
                by_rank.into_values().collect()
            }
        }
    }

    /// Returns a copy of this ranking without the given candidates.
    ///
    /// A group that becomes empty because of the removal is dropped. Groups that
    /// were already empty keep their position.
    pub fn without(&self, removed: &BTreeSet<CandidateId>) -> Ranking {
        match self {
            Ranking::Grouped(groups) => Ranking::Grouped(
                groups
                    .iter()
                    .filter_map(|group| {
                        let kept: Vec<CandidateId> = group
                            .iter()
                            .filter(|cid| !removed.contains(*cid))
                            .cloned()
                            .collect();
                        if kept.is_empty() && !group.is_empty() {
                            None
                        } else {
                            Some(kept)
                        }
                    })
                    .collect(),
            ),
            Ranking::Ranked(ranks) => Ranking::Ranked(
                ranks
                    .iter()
                    .filter(|(cid, _)| !removed.contains(*cid))
                    .map(|(cid, rank)| (cid.clone(), *rank))
                    .collect(),
            ),
        }
    }
}

/// A ranking together with the number of voters who cast it.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize)]
pub struct Ballot {
    pub count: u64,
    // Older ballot files call this field "ballot".
    #[serde(alias = "ballot")]
    pub ranking: Ranking,
}

impl Ballot {
    pub fn grouped(groups: &[&[&str]], count: u64) -> Ballot {
        Ballot {
            count,
            ranking: Ranking::Grouped(
                groups
                    .iter()
                    .map(|g| g.iter().map(|s| s.to_string()).collect())
                    .collect(),
            ),
        }
    }
}

/// An immutable collection of ballots.
///
/// Operations that change the ballots return a new pool.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BallotPool {
    ballots: Vec<Ballot>,
}

impl BallotPool {
    pub fn new(ballots: Vec<Ballot>) -> BallotPool {
        BallotPool { ballots }
    }

    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ballot> {
        self.ballots.iter()
    }

    pub fn len(&self) -> usize {
        self.ballots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ballots.is_empty()
    }

    /// The number of voters represented by this pool.
    pub fn total_votes(&self) -> u64 {
        self.ballots.iter().map(|b| b.count).sum()
    }

    /// Every candidate mentioned by at least one ballot.
    pub fn candidates(&self) -> BTreeSet<CandidateId> {
        self.ballots
            .iter()
            .flat_map(|b| b.ranking.mentions())
            .cloned()
            .collect()
    }

    /// Merges identical rankings into a single ballot. The order of first appearance is kept.
    pub fn aggregate(&self) -> BallotPool {
        let mut positions: HashMap<&Ranking, usize> = HashMap::new();
        let mut res: Vec<Ballot> = Vec::new();
        for b in self.ballots.iter() {
            if let Some(&idx) = positions.get(&b.ranking) {
                res[idx].count += b.count;
            } else {
                positions.insert(&b.ranking, res.len());
                res.push(b.clone());
            }
        }
        BallotPool { ballots: res }
    }

    /// A new pool in which the given candidates are never mentioned.
    /// Counts are not affected and no ballot is dropped.
    pub fn without_candidates(&self, removed: &BTreeSet<CandidateId>) -> BallotPool {
        BallotPool {
            ballots: self
                .ballots
                .iter()
                .map(|b| Ballot {
                    count: b.count,
                    ranking: b.ranking.without(removed),
                })
                .collect(),
        }
    }
}

impl From<Vec<Ballot>> for BallotPool {
    fn from(ballots: Vec<Ballot>) -> Self {
        BallotPool::new(ballots)
    }
}

impl<'a> IntoIterator for &'a BallotPool {
    type Item = &'a Ballot;
    type IntoIter = std::slice::Iter<'a, Ballot>;

    fn into_iter(self) -> Self::IntoIter {
        self.ballots.iter()
    }
}
