use log::{debug, info, warn};

use nota_voting::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::judge::config_reader::*;
use crate::judge::io_common::*;
use crate::judge::report::*;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_xlsx;
pub mod report;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum JudgeError {
    #[snafu(display("Error opening file {path}: {source}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}: {source}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing JSON: {source}"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("The configuration file {path} has no parent directory"))]
    MissingParentDir { path: String },

    #[snafu(display("Error opening Excel file {path}: {source}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The Excel file {path} has no worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("Cannot find worksheet {worksheet:?} in {path}"))]
    MissingWorksheet { path: String, worksheet: String },
    #[snafu(display("Could not understand cell on line {lineno}: {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },

    #[snafu(display("Error opening CSV file {path}: {source}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading CSV line {lineno}: {source}"))]
    CsvLineParse { source: csv::Error, lineno: usize },

    #[snafu(display("Line {lineno} is too short: no column {column}"))]
    LineTooShort { lineno: usize, column: usize },
    #[snafu(display("Cannot understand rank {label:?} on line {lineno}"))]
    RankLabel { label: String, lineno: usize },
    #[snafu(display("The unranked rank must be between 1 and {max}, got {rank}"))]
    UnrankedRank { rank: u32, max: u32 },
    #[snafu(display("Invalid column mapping {spec:?}, expected <candidate id>=<column index>"))]
    ColumnMapping { spec: String },

    #[snafu(display("Voting error: {source}"))]
    Voting { source: VotingErrors },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type JudgeResult<T> = Result<T, JudgeError>;

/// Runs the election described by the configuration file and prints the report.
///
/// The JSON summary is written to `out` ("stdout" prints it) and compared with the
/// reference summary when one is given.
pub fn run_tally(
    config_path: String,
    out: Option<String>,
    check_summary_path: Option<String>,
) -> JudgeResult<()> {
    let config = read_config(&config_path)?;
    info!("config: {:?}", config);

    // Validate the rules:
    let tiebreak_mode = config.tiebreak_mode()?;
    let roster = config.roster()?;

    let config_p = Path::new(config_path.as_str());
    let root_p = config_p.parent().context(MissingParentDirSnafu {
        path: config_path.clone(),
    })?;
    let vote_p: PathBuf = root_p.join(&config.votefile);
    let vote_path = vote_p.as_path().display().to_string();
    info!("Attempting to read ballot file {:?}", vote_path);
    let mut ballots = read_ballots(&vote_path)?;
    if config.aggregate_ballots.unwrap_or(true) {
        ballots = ballots.aggregate();
        info!("Processing {} aggregated ballots", ballots.len());
    }

    let election = Election {
        roster,
        ballots,
        positions: config.positions,
    };
    let resolver = StvResolver::new(tiebreak_mode);
    let result = nota_voting::run_election(&election, &resolver).context(VotingSnafu)?;
    debug!("result: {:?}", result);

    print!("{}", format_report(&election, &result));

    // Assemble the final json
    let result_js = build_summary_js(&config, &result);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(WritingJsonSnafu)?;
    match out.as_deref() {
        Some("stdout") => println!("{}", pretty_js_stats),
        Some(p) if !p.is_empty() => {
            fs::write(p, &pretty_js_stats).context(OpeningFileSnafu { path: p })?;
            info!("Summary written to {:?}", p);
        }
        _ => {}
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref: JSValue = read_summary(&summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(WritingJsonSnafu)?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary {:?}", summary_p);
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            return ReferenceMismatchSnafu {}.fail();
        }
        info!("Summary matches the reference {:?}", summary_p);
    }

    Ok(())
}

/// Converts survey responses into a ballot file, merging identical ballots.
#[allow(clippy::too_many_arguments)]
pub fn run_convert(
    input: String,
    output: String,
    input_type: Option<String>,
    columns: &[String],
    voter_column: Option<usize>,
    exclude_voters: &[String],
    unranked_rank: Option<u32>,
    excel_worksheet_name: Option<String>,
) -> JudgeResult<()> {
    let mut mapping: Vec<(CandidateId, usize)> = Vec::new();
    for spec in columns.iter() {
        mapping.push(parse_column_mapping(spec)?);
    }
    let opts = ConvertOptions::new(
        mapping,
        voter_column,
        exclude_voters,
        unranked_rank,
        excel_worksheet_name,
    )?;
    debug!("run_convert: options: {:?}", opts);

    info!("Attempting to read responses {:?}", input);
    let ballots = match input_type.as_deref().unwrap_or("csv") {
        "csv" => io_csv::read_csv_ballots(&input, &opts)?,
        "xlsx" => io_xlsx::read_xlsx_ballots(&input, &opts)?,
        x => whatever!("Input type not implemented {:?}", x),
    };
    let num_read = ballots.len();
    let pool = BallotPool::new(ballots).aggregate();
    info!(
        "Read {} ballots, {} distinct rankings",
        num_read,
        pool.len()
    );

    let js = serde_json::to_string(&pool).context(WritingJsonSnafu)?;
    fs::write(&output, js).context(OpeningFileSnafu { path: output.clone() })?;
    info!("Ballots written to {:?}", output);
    Ok(())
}
