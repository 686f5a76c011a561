use std::collections::HashSet;

use log::{debug, warn};
use nota_voting::{Ballot, CandidateId, Ranking};
use snafu::prelude::*;

use crate::judge::*;

/// How to read the survey responses.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ConvertOptions {
    /// For each candidate, the column holding its rank.
    pub columns: Vec<(CandidateId, usize)>,
    pub voter_column: usize,
    pub exclude_voters: HashSet<String>,
    /// The rank given to a candidate whose cell is blank.
    pub unranked_rank: u32,
    pub excel_worksheet_name: Option<String>,
}

impl ConvertOptions {
    /// Checks the options. The unranked rank defaults to the number of columns.
    pub fn new(
        columns: Vec<(CandidateId, usize)>,
        voter_column: Option<usize>,
        exclude_voters: &[String],
        unranked_rank: Option<u32>,
        excel_worksheet_name: Option<String>,
    ) -> JudgeResult<ConvertOptions> {
        let opts = ConvertOptions {
            unranked_rank: unranked_rank.unwrap_or(columns.len() as u32),
            columns,
            voter_column: voter_column.unwrap_or(1),
            exclude_voters: exclude_voters.iter().cloned().collect(),
            excel_worksheet_name,
        };
        opts.check_unranked_rank()?;
        Ok(opts)
    }

    /// The largest rank a cell may hold: one per candidate column.
    pub fn max_rank(&self) -> u32 {
        self.columns.len() as u32
    }

    // Blank cells may also go one rank below every ranked candidate.
    fn check_unranked_rank(&self) -> JudgeResult<()> {
        ensure!(
            self.unranked_rank >= 1 && self.unranked_rank <= self.max_rank() + 1,
            UnrankedRankSnafu {
                rank: self.unranked_rank,
                max: self.max_rank() + 1,
            }
        );
        Ok(())
    }
}

/// Parses a mapping such as `a=3`.
pub fn parse_column_mapping(spec: &str) -> JudgeResult<(CandidateId, usize)> {
    let (cid, idx) = spec.split_once('=').context(ColumnMappingSnafu { spec })?;
    let cid = cid.trim();
    ensure!(!cid.is_empty(), ColumnMappingSnafu { spec });
    let idx = idx
        .trim()
        .parse::<usize>()
        .ok()
        .context(ColumnMappingSnafu { spec })?;
    Ok((cid.to_string(), idx))
}

/// Reads a rank label such as "Rank 2". Bare numbers are accepted too.
pub fn parse_rank_label(label: &str) -> Option<u32> {
    let s = label.trim();
    let digits = match s.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("rank") => s[4..].trim(),
        _ => s,
    };
    match digits.parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(rank) => Some(rank),
    }
}

/// Turns (candidate, rank) pairs into rank groups. Ranks start at 1.
///
/// Every rank up to the largest one gets a group, even when nobody holds it.
pub fn assemble_choices(ranks: &[(CandidateId, u32)]) -> Vec<Vec<CandidateId>> {
    let max_rank = ranks.iter().map(|(_, rank)| *rank).max().unwrap_or(0);
    let mut choices: Vec<Vec<CandidateId>> = vec![vec![]; max_rank as usize];
    for (cid, rank) in ranks.iter() {
        if let Some(elt) = rank
            .checked_sub(1)
            .and_then(|idx| choices.get_mut(idx as usize))
        {
            elt.push(cid.clone());
        }
    }
    choices
}

/// Converts one row of responses into a ballot.
///
/// Returns None for the rows that do not hold a vote: the header, rows that are
/// too short and responses from excluded voters.
pub fn row_to_ballot(
    cells: &[String],
    lineno: usize,
    opts: &ConvertOptions,
) -> JudgeResult<Option<Ballot>> {
    if cells.len() < 2 {
        debug!("row_to_ballot: {}: skipping short row {:?}", lineno, cells);
        return Ok(None);
    }
    if cells[0].trim() == "Timestamp" {
        debug!("row_to_ballot: {}: skipping header", lineno);
        return Ok(None);
    }
    if let Some(voter) = cells.get(opts.voter_column) {
        if opts.exclude_voters.contains(voter.trim()) {
            warn!("Line {}: ignoring the response from {:?}", lineno, voter);
            return Ok(None);
        }
    }

    opts.check_unranked_rank()?;
    let mut ranks: Vec<(CandidateId, u32)> = Vec::with_capacity(opts.columns.len());
    for (cid, column) in opts.columns.iter() {
        let cell = cells
            .get(*column)
            .context(LineTooShortSnafu {
                lineno,
                column: *column,
            })?
            .trim();
        let rank = if cell.is_empty() {
            opts.unranked_rank
        } else {
            parse_rank_label(cell)
                .filter(|rank| *rank <= opts.max_rank())
                .context(RankLabelSnafu {
                    label: cell,
                    lineno,
                })?
        };
        ranks.push((cid.clone(), rank));
    }
    let choices = assemble_choices(&ranks);
    debug!("row_to_ballot: {}: {:?}", lineno, choices);
    Ok(Some(Ballot {
        count: 1,
        ranking: Ranking::Grouped(choices),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> ConvertOptions {
        ConvertOptions {
            columns: vec![("a".to_string(), 2), ("b".to_string(), 3), ("c".to_string(), 4)],
            voter_column: 1,
            exclude_voters: ["test@example.org".to_string()].into_iter().collect(),
            unranked_rank: 3,
            excel_worksheet_name: None,
        }
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn column_mappings() {
        assert_eq!(parse_column_mapping("a=3").unwrap(), ("a".to_string(), 3));
        assert_eq!(parse_column_mapping(" b = 10 ").unwrap(), ("b".to_string(), 10));
        for bad in ["a", "=3", "a=x", "a=-1"] {
            assert!(matches!(
                parse_column_mapping(bad).unwrap_err(),
                JudgeError::ColumnMapping { .. }
            ));
        }
    }

    #[test]
    fn rank_labels() {
        assert_eq!(parse_rank_label("Rank 1"), Some(1));
        assert_eq!(parse_rank_label("rank 12"), Some(12));
        assert_eq!(parse_rank_label(" 4 "), Some(4));
        assert_eq!(parse_rank_label("Rank 0"), None);
        assert_eq!(parse_rank_label("First"), None);
        assert_eq!(parse_rank_label(""), None);
    }

    #[test]
    fn choices_keep_empty_ranks() {
        let ranks = vec![
            ("a".to_string(), 1),
            ("b".to_string(), 3),
            ("c".to_string(), 1),
        ];
        assert_eq!(
            assemble_choices(&ranks),
            vec![
                vec!["a".to_string(), "c".to_string()],
                vec![],
                vec!["b".to_string()]
            ]
        );
        assert!(assemble_choices(&[]).is_empty());
    }

    #[test]
    fn rows() {
        let o = opts();
        let b = row_to_ballot(&row(&["t", "x@example.org", "Rank 2", "", "Rank 1"]), 2, &o)
            .unwrap()
            .unwrap();
        assert_eq!(b, Ballot::grouped(&[&["c"], &["a"], &["b"]], 1));

        assert_eq!(
            row_to_ballot(&row(&["Timestamp", "Email", "A", "B", "C"]), 1, &o).unwrap(),
            None
        );
        assert_eq!(row_to_ballot(&row(&["t"]), 3, &o).unwrap(), None);
        assert_eq!(
            row_to_ballot(
                &row(&["t", "test@example.org", "Rank 1", "Rank 2", "Rank 3"]),
                4,
                &o
            )
            .unwrap(),
            None
        );
    }

    #[test]
    fn bad_rows() {
        let o = opts();
        assert!(matches!(
            row_to_ballot(&row(&["t", "x", "Rank 1", "maybe", ""]), 5, &o).unwrap_err(),
            JudgeError::RankLabel { lineno: 5, .. }
        ));
        assert!(matches!(
            row_to_ballot(&row(&["t", "x", "Rank 1"]), 6, &o).unwrap_err(),
            JudgeError::LineTooShort {
                lineno: 6,
                column: 3
            }
        ));
    }

    #[test]
    fn ranks_are_bounded() {
        let o = opts();
        for label in ["Rank 4", "Rank 4000000000"] {
            assert!(matches!(
                row_to_ballot(&row(&["t", "x", "Rank 1", label, ""]), 8, &o).unwrap_err(),
                JudgeError::RankLabel { lineno: 8, .. }
            ));
        }

        let zero = ConvertOptions {
            unranked_rank: 0,
            ..opts()
        };
        assert!(matches!(
            row_to_ballot(&row(&["t", "x", "", "", ""]), 9, &zero).unwrap_err(),
            JudgeError::UnrankedRank { rank: 0, max: 4 }
        ));
        assert_eq!(assemble_choices(&[("a".to_string(), 0)]), Vec::<Vec<String>>::new());
    }

    #[test]
    fn unranked_rank_defaults_and_limits() {
        let columns = opts().columns;
        let o = ConvertOptions::new(columns.clone(), None, &[], None, None).unwrap();
        assert_eq!(o.unranked_rank, 3);
        assert_eq!(o.voter_column, 1);
        assert!(ConvertOptions::new(columns.clone(), None, &[], Some(4), None).is_ok());
        for rank in [0, 5] {
            assert!(matches!(
                ConvertOptions::new(columns.clone(), None, &[], Some(rank), None).unwrap_err(),
                JudgeError::UnrankedRank { .. }
            ));
        }
    }
}
