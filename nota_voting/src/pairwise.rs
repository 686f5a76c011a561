use log::debug;

use std::ops::Add;

use crate::config::*;
use crate::standardize::StandardizedBallot;

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct VoteCount(u64);

impl VoteCount {
    const EMPTY: VoteCount = VoteCount(0);
}

impl Add for VoteCount {
    type Output = VoteCount;
    fn add(self: VoteCount, rhs: VoteCount) -> VoteCount {
        VoteCount(self.0 + rhs.0)
    }
}

/// The preference of a single ballot between two candidates.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Preference {
    First,
    Second,
    Abstain,
}

/// Compares two candidates on one ballot.
///
/// A mentioned candidate beats an unmentioned one. When both are mentioned, the
/// smaller rank wins and equal ranks abstain.
pub fn compare_in_ballot(ballot: &StandardizedBallot, a: &str, b: &str) -> Preference {
    match (ballot.rank_of(a), ballot.rank_of(b)) {
        (Some(_), None) => Preference::First,
        (None, Some(_)) => Preference::Second,
        (None, None) => Preference::Abstain,
        (Some(ra), Some(rb)) if ra < rb => Preference::First,
        (Some(ra), Some(rb)) if rb < ra => Preference::Second,
        _ => Preference::Abstain,
    }
}

/// Tallies a single pair of candidates across all the ballots.
///
/// Equal totals are awarded to `b`, so that every pair has exactly one winner.
pub fn pairwise_outcome(ballots: &[StandardizedBallot], a: &str, b: &str) -> PairwiseOutcome {
    let (votes_a, votes_b) = ballots.iter().fold(
        (VoteCount::EMPTY, VoteCount::EMPTY),
        |(va, vb), ballot| match compare_in_ballot(ballot, a, b) {
            Preference::First => (va + VoteCount(ballot.count), vb),
            Preference::Second => (va, vb + VoteCount(ballot.count)),
            Preference::Abstain => (va, vb),
        },
    );
    let winner = if votes_a > votes_b { a } else { b };
    let margin = votes_a.0.abs_diff(votes_b.0);
    debug!(
        "pairwise_outcome: {} ({}) vs {} ({}): winner {} margin {}",
        a, votes_a.0, b, votes_b.0, winner, margin
    );
    PairwiseOutcome {
        winner: winner.to_string(),
        margin,
    }
}

/// Computes the outcome of every pair `(a, b)` of the roster with `a < b`.
///
/// The ballots must already have been checked against the roster.
pub fn tally_pairs(roster: &Roster, ballots: &[StandardizedBallot]) -> PairwiseResults {
    let ids: Vec<&CandidateId> = roster.ids().collect();
    let mut res = PairwiseResults::new();
    for (idx, a) in ids.iter().enumerate() {
        for b in ids[idx + 1..].iter() {
            res.insert(
                ((*a).clone(), (*b).clone()),
                pairwise_outcome(ballots, a, b),
            );
        }
    }
    debug!("tally_pairs: {} pairs", res.len());
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballots::Ballot;
    use crate::standardize::standardize;

    fn std_ballots(ballots: &[Ballot]) -> Vec<StandardizedBallot> {
        ballots.iter().map(standardize).collect()
    }

    fn roster() -> Roster {
        Roster::new(
            [("A", "Alice"), ("B", "Bob"), ("N", NONE_OF_THE_ABOVE)]
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn preference_rules() {
        let sb = standardize(&Ballot::grouped(&[&["a"], &["b", "c"]], 1));
        assert_eq!(compare_in_ballot(&sb, "a", "b"), Preference::First);
        assert_eq!(compare_in_ballot(&sb, "c", "a"), Preference::Second);
        assert_eq!(compare_in_ballot(&sb, "b", "c"), Preference::Abstain);
        assert_eq!(compare_in_ballot(&sb, "b", "z"), Preference::First);
        assert_eq!(compare_in_ballot(&sb, "z", "c"), Preference::Second);
        assert_eq!(compare_in_ballot(&sb, "y", "z"), Preference::Abstain);
    }

    #[test]
    fn worked_example() {
        let ballots = std_ballots(&[
            Ballot::grouped(&[&["A"], &["B"]], 3),
            Ballot::grouped(&[&["N"], &["A"], &["B"]], 2),
        ]);
        let res = tally_pairs(&roster(), &ballots);
        assert_eq!(res.len(), 3);
        let ab = &res[&("A".to_string(), "B".to_string())];
        assert_eq!((ab.winner.as_str(), ab.margin), ("A", 5));
        let an = &res[&("A".to_string(), "N".to_string())];
        assert_eq!((an.winner.as_str(), an.margin), ("A", 1));
        let bn = &res[&("B".to_string(), "N".to_string())];
        assert_eq!((bn.winner.as_str(), bn.margin), ("B", 1));
    }

    #[test]
    fn ties_go_to_the_larger_id() {
        let ballots = std_ballots(&[
            Ballot::grouped(&[&["A"], &["B"]], 2),
            Ballot::grouped(&[&["B"], &["A"]], 2),
        ]);
        let out = pairwise_outcome(&ballots, "A", "B");
        assert_eq!(out.winner, "B");
        assert_eq!(out.margin, 0);
    }

    #[test]
    fn no_ballots_still_names_a_winner() {
        let res = tally_pairs(&roster(), &[]);
        for ((_, b), out) in res.iter() {
            assert_eq!(&out.winner, b);
            assert_eq!(out.margin, 0);
        }
    }
}
