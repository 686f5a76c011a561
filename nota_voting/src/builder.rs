pub use crate::config::*;

use std::collections::BTreeMap;

use snafu::prelude::*;

use crate::ballots::{Ballot, BallotPool, Ranking};

/// A builder for assembling an election.
///
/// ```
/// pub use nota_voting::builder::Builder;
/// pub use nota_voting::NONE_OF_THE_ABOVE;
/// # use nota_voting::VotingErrors;
///
/// let mut builder = Builder::new(2)?
///     .candidates(&[("a", "Anna"), ("b", "Bob"), ("c", "Clara"), ("n", NONE_OF_THE_ABOVE)])?;
///
/// builder.add_ballot_simple(&["a", "c"])?;
/// builder.add_ballot(&[&["b", "c"], &["n"]], 4)?;
///
/// let election = builder.build()?;
/// assert_eq!(election.ballots.total_votes(), 5);
/// # Ok::<(), VotingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _positions: usize,
    pub(crate) _roster: Option<Roster>,
    pub(crate) _ballots: Vec<Ballot>,
}

impl Builder {
    pub fn new(positions: usize) -> Result<Builder, VotingErrors> {
        Ok(Builder {
            _positions: positions,
            _roster: None,
            _ballots: Vec::new(),
        })
    }

    /// Sets the candidates, as pairs of (id, display name).
    ///
    /// One of them must be named "None of the above".
    pub fn candidates(self, cands: &[(&str, &str)]) -> Result<Builder, VotingErrors> {
        let mapping: BTreeMap<CandidateId, String> = cands
            .iter()
            .map(|(cid, name)| (cid.to_string(), name.to_string()))
            .collect();
        let roster = Roster::new(mapping).context(InputSnafu)?;
        Ok(Builder {
            _positions: self._positions,
            _roster: Some(roster),
            _ballots: Vec::new(),
        })
    }

    /// Adds the ballot of a single voter, who ranked the candidates one by one.
    pub fn add_ballot_simple(&mut self, candidates: &[&str]) -> Result<(), VotingErrors> {
        let groups: Vec<&[&str]> = candidates.iter().map(std::slice::from_ref).collect();
        self.add_ballot(&groups, 1)
    }

    /// Adds a ballot with a weight attached to it.
    ///
    /// groups: the candidates tied at each rank, the preferred rank first.
    pub fn add_ballot(&mut self, groups: &[&[&str]], count: u64) -> Result<(), VotingErrors> {
        let ranking = Ranking::Grouped(
            groups
                .iter()
                .map(|g| g.iter().map(|s| s.to_string()).collect())
                .collect(),
        );
        self.add_ballot_2(&Ballot { count, ranking })
    }

    pub fn add_ballot_2(&mut self, ballot: &Ballot) -> Result<(), VotingErrors> {
        self._ballots.push(ballot.clone());
        Ok(())
    }

    /// Finishes the election. The candidates must have been set.
    pub fn build(self) -> Result<Election, VotingErrors> {
        let roster = self
            ._roster
            .context(TooFewCandidatesSnafu { count: 0usize })
            .context(InputSnafu)?;
        Ok(Election {
            roster,
            ballots: BallotPool::new(self._ballots),
            positions: self._positions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_an_election() {
        let mut b = Builder::new(1)
            .unwrap()
            .candidates(&[("x", "Xavier"), ("n", NONE_OF_THE_ABOVE)])
            .unwrap();
        b.add_ballot_simple(&["x", "n"]).unwrap();
        let e = b.build().unwrap();
        assert_eq!(e.positions, 1);
        assert_eq!(e.ballots.ballots()[0], Ballot::grouped(&[&["x"], &["n"]], 1));
    }

    #[test]
    fn candidates_are_required() {
        let b = Builder::new(1).unwrap();
        assert!(matches!(
            b.build(),
            Err(VotingErrors::Input {
                source: InputError::TooFewCandidates { count: 0 }
            })
        ));
    }

    #[test]
    fn sentinel_is_required() {
        let res = Builder::new(1).unwrap().candidates(&[("x", "X"), ("y", "Y")]);
        assert!(res.is_err());
    }
}
