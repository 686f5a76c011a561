mod args;
mod judge;

use clap::Parser;
use log::{debug, warn};
use snafu::ErrorCompat;

use crate::args::{Args, Command};

fn main() {
    let args = Args::parse();

    // RUST_LOG still takes precedence over the verbosity flag.
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    debug!("args: {:?}", args);

    let res = match args.command {
        Command::Tally {
            config,
            out,
            reference,
        } => judge::run_tally(config, out, reference),
        Command::Convert {
            input,
            output,
            input_type,
            columns,
            voter_column,
            exclude_voters,
            unranked_rank,
            excel_worksheet_name,
        } => judge::run_convert(
            input,
            output,
            input_type,
            &columns,
            voter_column,
            &exclude_voters,
            unranked_rank,
            excel_worksheet_name,
        ),
    };

    if let Err(e) = res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
