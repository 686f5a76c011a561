//! Property-based tests using proptest

use std::collections::{BTreeMap, BTreeSet};

use nota_voting::*;
use proptest::prelude::*;

const REAL_IDS: [&str; 4] = ["b", "d", "f", "h"];
const NAMES: [&str; 4] = ["Bob", "Dan", "Fay", "Hugo"];
// Sentinel ids on both sides of the real ones, so pairwise ties go either way.
const SENTINEL_IDS: [&str; 4] = ["0", "a", "m", "z"];

fn roster(sentinel: &str) -> Roster {
    let candidates: BTreeMap<CandidateId, String> = REAL_IDS
        .iter()
        .zip(NAMES.iter())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .chain([(sentinel.to_string(), NONE_OF_THE_ABOVE.to_string())])
        .collect();
    Roster::new(candidates).unwrap()
}

#[derive(Debug, Clone, Copy)]
enum Form {
    Grouped,
    Ranked,
}

// One optional rank per candidate (the sentinel last), a count and the notation.
fn raw_ballot_strategy() -> impl Strategy<Value = (Vec<Option<u32>>, u64, Form)> {
    (
        prop::collection::vec(prop::option::of(0u32..4), REAL_IDS.len() + 1),
        1u64..10,
        prop_oneof![Just(Form::Grouped), Just(Form::Ranked)],
    )
}

fn make_ballot(ids: &[CandidateId], ranks: &[Option<u32>], count: u64, form: Form) -> Ballot {
    let ranking = match form {
        Form::Grouped => Ranking::Grouped(
            (0..4)
                .map(|r| {
                    ids.iter()
                        .zip(ranks.iter())
                        .filter(|(_, rank)| **rank == Some(r))
                        .map(|(cid, _)| cid.clone())
                        .collect()
                })
                .collect(),
        ),
        Form::Ranked => Ranking::Ranked(
            ids.iter()
                .zip(ranks.iter())
                .filter_map(|(cid, rank)| rank.map(|r| (cid.clone(), r + 1)))
                .collect(),
        ),
    };
    Ballot { count, ranking }
}

fn election_strategy() -> impl Strategy<Value = Election> {
    (
        prop::sample::select(SENTINEL_IDS.to_vec()),
        prop::collection::vec(raw_ballot_strategy(), 0..12),
        1usize..5,
    )
        .prop_map(|(sentinel, raw, positions)| {
            let ids: Vec<CandidateId> = REAL_IDS
                .iter()
                .chain([sentinel].iter())
                .map(|s| s.to_string())
                .collect();
            Election {
                roster: roster(sentinel),
                ballots: BallotPool::new(
                    raw.iter()
                        .map(|(ranks, count, form)| make_ballot(&ids, ranks, *count, *form))
                        .collect(),
                ),
                positions,
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn test_elimination_conserves_weight(election in election_strategy()) {
        let res = run_election(&election, &StvResolver::default()).unwrap();
        prop_assert_eq!(res.derived_ballots.total_votes(), election.ballots.total_votes());
        prop_assert_eq!(res.derived_ballots.len(), election.ballots.len());
        prop_assert_eq!(res.total_votes, election.ballots.total_votes());
    }

    #[test]
    fn test_every_pair_has_one_winner(election in election_strategy()) {
        let res = run_election(&election, &StvResolver::default()).unwrap();
        let n = REAL_IDS.len() + 1;
        prop_assert_eq!(res.pairwise.len(), n * (n - 1) / 2);
        for ((a, b), outcome) in res.pairwise.iter() {
            prop_assert!(a < b);
            prop_assert!(outcome.winner == *a || outcome.winner == *b);
        }
    }

    #[test]
    fn test_losers_are_stripped(election in election_strategy()) {
        let res = run_election(&election, &StvResolver::default()).unwrap();
        for cid in res.losers.iter() {
            prop_assert!(res.derived_ballots.iter().all(|b| !b.ranking.contains(cid)));
        }
        prop_assert!(!res.losers.contains(election.roster.sentinel()));
    }

    #[test]
    fn test_winner_count(election in election_strategy()) {
        let res = run_election(&election, &StvResolver::default()).unwrap();
        if res.survivors.len() >= election.positions {
            prop_assert_eq!(res.winners.len(), election.positions);
            prop_assert!(res.winners.is_subset(&res.survivors));
        } else {
            prop_assert_eq!(&res.winners, &res.survivors);
        }
        let expected: BTreeSet<CandidateId> = election
            .roster
            .real_candidates()
            .difference(&res.losers)
            .cloned()
            .collect();
        prop_assert_eq!(&res.survivors, &expected);
    }

    #[test]
    fn test_count_is_deterministic(election in election_strategy()) {
        let first = run_election(&election, &StvResolver::default()).unwrap();
        let second = run_election(&election, &StvResolver::default()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_aggregation_keeps_outcome(election in election_strategy()) {
        let aggregated = Election {
            ballots: election.ballots.aggregate(),
            ..election.clone()
        };
        let res = run_election(&election, &StvResolver::default()).unwrap();
        let res_agg = run_election(&aggregated, &StvResolver::default()).unwrap();
        prop_assert_eq!(res.pairwise, res_agg.pairwise);
        prop_assert_eq!(res.losers, res_agg.losers);
    }
}
