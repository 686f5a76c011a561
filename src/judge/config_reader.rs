use std::collections::BTreeMap;
use std::fs;

use log::debug;
use nota_voting::{BallotPool, Roster, TieBreakMode, VotingErrors};
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::prelude::*;

use crate::judge::*;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ElectionConfig {
    /// Candidate id to display name. Exactly one name must be "None of the above".
    pub candidates: BTreeMap<String, String>,
    pub positions: usize,
    /// The ballot file, relative to the directory of the configuration file.
    pub votefile: String,
    #[serde(rename = "contestName")]
    pub contest_name: Option<String>,
    #[serde(rename = "tiebreakMode")]
    pub tiebreak_mode: Option<String>,
    #[serde(rename = "randomSeed")]
    pub random_seed: Option<String>,
    #[serde(rename = "aggregateBallots")]
    pub aggregate_ballots: Option<bool>,
}

impl ElectionConfig {
    pub fn tiebreak_mode(&self) -> JudgeResult<TieBreakMode> {
        let mode = self.tiebreak_mode.as_deref().unwrap_or("useCandidateOrder");
        match mode {
            "useCandidateOrder" => Ok(TieBreakMode::UseCandidateOrder),
            "random" => {
                let seed_str = match self.random_seed.as_deref() {
                    Some(s) => s,
                    None => whatever!("the random tiebreak mode requires a randomSeed"),
                };
                match seed_str.parse::<u32>() {
                    Ok(seed) => Ok(TieBreakMode::Random(seed)),
                    Err(_) => whatever!("cannot parse randomSeed {:?}", seed_str),
                }
            }
            _ => whatever!("unknown tiebreak mode: {}", mode),
        }
    }

    pub fn roster(&self) -> JudgeResult<Roster> {
        Roster::new(self.candidates.clone())
            .map_err(VotingErrors::from)
            .context(VotingSnafu)
    }
}

pub fn read_config(path: &str) -> JudgeResult<ElectionConfig> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let config: ElectionConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_ballots(path: &str) -> JudgeResult<BallotPool> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let pool: BallotPool =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!(
        "read_ballots: {} ballots, {} votes",
        pool.len(),
        pool.total_votes()
    );
    Ok(pool)
}

pub fn read_summary(path: &str) -> JudgeResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(extra: &str) -> ElectionConfig {
        let s = format!(
            r#"{{
                "candidates": {{"a": "Anna", "n": "None of the above"}},
                "positions": 1,
                "votefile": "ballots.json"{}
            }}"#,
            extra
        );
        serde_json::from_str(&s).unwrap()
    }

    #[test]
    fn tiebreak_modes() {
        assert_eq!(
            config("").tiebreak_mode().unwrap(),
            TieBreakMode::UseCandidateOrder
        );
        assert_eq!(
            config(r#", "tiebreakMode": "random", "randomSeed": "42""#)
                .tiebreak_mode()
                .unwrap(),
            TieBreakMode::Random(42)
        );
        assert!(config(r#", "tiebreakMode": "random""#)
            .tiebreak_mode()
            .is_err());
        assert!(config(r#", "tiebreakMode": "random", "randomSeed": "x""#)
            .tiebreak_mode()
            .is_err());
        assert!(config(r#", "tiebreakMode": "coinToss""#)
            .tiebreak_mode()
            .is_err());
    }

    #[test]
    fn optional_fields() {
        let c = config(r#", "contestName": "Board", "aggregateBallots": false"#);
        assert_eq!(c.contest_name.as_deref(), Some("Board"));
        assert_eq!(c.aggregate_ballots, Some(false));
        assert!(c.roster().is_ok());
    }

    #[test]
    fn roster_needs_the_sentinel() {
        let mut c = config("");
        c.candidates.remove("n");
        c.candidates.insert("b".to_string(), "Bob".to_string());
        assert!(matches!(
            c.roster().unwrap_err(),
            JudgeError::Voting {
                source: VotingErrors::Input { .. }
            }
        ));
    }
}
