use clap::{Parser, Subcommand};

/// This is a tabulation program for ranked elections with a "None of the above" option.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, global = true, takes_value = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Runs the election described by a configuration file and prints the report.
    Tally {
        /// (file path) The JSON file describing the election (candidates, positions and ballot file).
        #[clap(value_parser)]
        config: String,

        /// (file path, 'stdout' or empty) If specified, the summary of the election will be written in JSON
        /// format to the given location.
        #[clap(short, long, value_parser)]
        out: Option<String>,

        /// (file path) A reference file containing the summary of an election in JSON format. If provided,
        /// judgevote will check that the tabulated summary matches the reference.
        #[clap(short, long, value_parser)]
        reference: Option<String>,
    },

    /// Converts the responses of a survey into a ballot file.
    Convert {
        /// (file path) The exported responses.
        #[clap(short, long, value_parser)]
        input: String,

        /// (file path) Where to write the ballots in JSON format.
        #[clap(short, long, value_parser)]
        output: String,

        /// (default csv) The type of the input: csv or xlsx.
        #[clap(long, value_parser)]
        input_type: Option<String>,

        /// (repeated, <candidate id>=<column index>) The column holding the rank of each candidate. The
        /// first column has index 0.
        #[clap(long = "column", value_parser, required = true)]
        columns: Vec<String>,

        /// (default 1) The column that identifies the voter, used with --exclude-voter.
        #[clap(long, value_parser)]
        voter_column: Option<usize>,

        /// (repeated) Responses from these voters are ignored, for example test submissions.
        #[clap(long = "exclude-voter", value_parser)]
        exclude_voters: Vec<String>,

        /// (default: number of columns) The rank given to a candidate left blank.
        #[clap(long, value_parser)]
        unranked_rank: Option<u32>,

        /// (default: the only worksheet) When using an Excel file, the name of the worksheet to use.
        #[clap(long, value_parser)]
        excel_worksheet_name: Option<String>,
    },
}
