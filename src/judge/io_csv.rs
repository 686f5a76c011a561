// Reading survey responses exported as CSV.

use log::debug;
use nota_voting::Ballot;
use snafu::prelude::*;

use crate::judge::io_common::{row_to_ballot, ConvertOptions};
use crate::judge::*;

pub fn read_csv_ballots(path: &str, opts: &ConvertOptions) -> JudgeResult<Vec<Ballot>> {
    // Header rows are recognized by row_to_ballot, and some exports end rows early.
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let mut res: Vec<Ballot> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        // The line numbers start at 1, as in a spreadsheet.
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let cells: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        debug!("read_csv_ballots: lineno: {:?} row: {:?}", lineno, &cells);
        if let Some(ballot) = row_to_ballot(&cells, lineno, opts)? {
            res.push(ballot);
        }
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_responses() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            "Timestamp,Email,A,B\n\
             t1,x@example.org,Rank 2,Rank 1\n\
             t2\n\
             t3,y@example.org,,Rank 1\n"
        )
        .unwrap();
        let opts = ConvertOptions {
            columns: vec![("a".to_string(), 2), ("b".to_string(), 3)],
            voter_column: 1,
            exclude_voters: Default::default(),
            unranked_rank: 2,
            excel_worksheet_name: None,
        };
        let path = f.path().display().to_string();
        let ballots = read_csv_ballots(&path, &opts).unwrap();
        assert_eq!(
            ballots,
            vec![
                Ballot::grouped(&[&["b"], &["a"]], 1),
                Ballot::grouped(&[&["b"], &["a"]], 1),
            ]
        );
    }

    #[test]
    fn missing_file() {
        let opts = ConvertOptions {
            columns: vec![],
            voter_column: 1,
            exclude_voters: Default::default(),
            unranked_rank: 1,
            excel_worksheet_name: None,
        };
        assert!(matches!(
            read_csv_ballots("/nonexistent/responses.csv", &opts).unwrap_err(),
            JudgeError::CsvOpen { .. }
        ));
    }
}
