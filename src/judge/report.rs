use std::collections::BTreeMap;

use nota_voting::{Decision, Election, ElectionResult, Roster};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map as JSMap, Value as JSValue};

use crate::judge::config_reader::ElectionConfig;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: Option<String>,
    pub positions: usize,
    pub candidates: BTreeMap<String, String>,
}

fn display_name<'a>(roster: &'a Roster, cid: &'a str) -> &'a str {
    roster.name(cid).unwrap_or(cid)
}

/// The human-readable report of an election.
pub fn format_report(election: &Election, result: &ElectionResult) -> String {
    let roster = &election.roster;
    let mut lines: Vec<String> = vec!["Candidates:".to_string()];
    for (cid, name) in roster.iter() {
        lines.push(format!("   - {}: {}", cid, name));
    }
    lines.push(format!("Number of winners: {}", election.positions));
    if !result.resolver_rounds.is_empty() {
        lines.push("Resolution rounds:".to_string());
        for round in result.resolver_rounds.iter() {
            lines.push(format!("   Round {}:", round.round));
            for (cid, count) in round.tally.iter() {
                lines.push(format!("      {:>10.4} {}", count, display_name(roster, cid)));
            }
            for cid in round.elected.iter() {
                lines.push(format!("      elected: {}", display_name(roster, cid)));
            }
            for cid in round.eliminated.iter() {
                lines.push(format!("      eliminated: {}", display_name(roster, cid)));
            }
        }
    }

    lines.push(format!("Total number of votes cast: {}", result.total_votes));

    lines.push("Pairwise results:".to_string());
    for ((a, b), outcome) in result.pairwise.iter() {
        lines.push(format!(
            "   - {} vs {}: {} ({})",
            display_name(roster, a),
            display_name(roster, b),
            display_name(roster, &outcome.winner),
            outcome.margin
        ));
    }

    lines.push("Removed due to losing to None of the Above:".to_string());
    for cid in result.losers.iter() {
        lines.push(format!("   - {}", display_name(roster, cid)));
    }

    lines.push("Winners (in no particular order):".to_string());
    for cid in result.winners.iter() {
        lines.push(format!("   - {}", display_name(roster, cid)));
    }
    lines.push(String::new());
    lines.join("\n")
}

fn rounds_to_json(result: &ElectionResult) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for round in result.resolver_rounds.iter() {
        let mut tally: JSMap<String, JSValue> = JSMap::new();
        for (cid, count) in round.tally.iter() {
            tally.insert(cid.clone(), json!(format!("{:.4}", count)));
        }
        l.push(json!({
            "round": round.round,
            "tally": tally,
            "elected": round.elected,
            "eliminated": round.eliminated,
            "exhausted": format!("{:.4}", round.exhausted),
        }));
    }
    l
}

/// The JSON summary of an election.
pub fn build_summary_js(config: &ElectionConfig, result: &ElectionResult) -> JSValue {
    let c = OutputConfig {
        contest: config.contest_name.clone(),
        positions: config.positions,
        candidates: config.candidates.clone(),
    };
    let pairwise: Vec<JSValue> = result
        .pairwise
        .iter()
        .map(|((a, b), outcome)| {
            json!({
                "candidates": [a, b],
                "winner": outcome.winner,
                "margin": outcome.margin,
            })
        })
        .collect();
    let decision = match result.decision {
        Decision::DirectWin => "direct",
        Decision::Delegated => "delegated",
    };
    json!({
        "config": c,
        "totalVotes": result.total_votes,
        "pairwise": pairwise,
        "losers": result.losers,
        "decision": decision,
        "winners": result.winners,
        "rounds": rounds_to_json(result),
    })
}
