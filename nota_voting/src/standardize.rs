use std::collections::HashMap;

use crate::ballots::{Ballot, Ranking};
use crate::config::CandidateId;

/// A ballot in a form where presence and rank of a candidate are O(1) lookups.
///
/// Ranks follow the grouped notation: tied candidates share a rank, a smaller
/// rank is preferred, and an absent candidate is unranked.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StandardizedBallot {
    ranks: HashMap<CandidateId, u32>,
    pub count: u64,
}

impl StandardizedBallot {
    pub fn contains(&self, cid: &str) -> bool {
        self.ranks.contains_key(cid)
    }

    /// Only defined for the candidates this ballot contains.
    pub fn rank_of(&self, cid: &str) -> Option<u32> {
        self.ranks.get(cid).cloned()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

pub fn standardize(ballot: &Ballot) -> StandardizedBallot {
    let ranks: HashMap<CandidateId, u32> = match &ballot.ranking {
        // The position of the group is the rank, including positions left empty.
        Ranking::Grouped(groups) => groups
            .iter()
            .enumerate()
            .flat_map(|(idx, group)| group.iter().map(move |cid| (cid.clone(), idx as u32)))
            .collect(),
        Ranking::Ranked(ranks) => ranks.iter().map(|(cid, r)| (cid.clone(), *r)).collect(),
    };
    StandardizedBallot {
        ranks,
        count: ballot.count,
    }
}
