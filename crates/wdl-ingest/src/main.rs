//! wdl-ingest - load OSDU well data into the Well Data Layer
//!
//! Usage:
//!     wdl-ingest wells
//!     wdl-ingest all --only trajectories,well-tops --dry-run

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use wdl_ingest::{CliError, RunOptions, init_logging, run_cli};
use wdl_ingest_core::Stage;

#[derive(Debug, Parser)]
#[command(
    name = "wdl-ingest",
    version,
    about = "Load OSDU well data into the Well Data Layer"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Mapping table (TOML or YAML)
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// Record writes locally instead of sending them
    #[arg(long)]
    dry_run: bool,

    /// Show a progress bar
    #[arg(long)]
    progress: bool,
}

impl From<RunArgs> for RunOptions {
    fn from(args: RunArgs) -> Self {
        RunOptions {
            mapping: args.mapping,
            dry_run: args.dry_run,
            progress: args.progress,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Stage 1: register sources, ingest wells and wellbores
    Wells(RunArgs),
    /// Stage 2: ingest trajectories
    Trajectories(RunArgs),
    /// Stage 3: ingest depth measurements
    DepthMeasurements(RunArgs),
    /// Stage 4: ingest well tops
    WellTops(RunArgs),
    /// Run several stages in order
    All {
        /// Comma-separated subset of stages (default: all)
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,

        #[command(flatten)]
        run: RunArgs,
    },
    /// List the stages
    Stages,
}

fn parse_stages(names: &[String]) -> Result<Vec<Stage>, CliError> {
    if names.is_empty() {
        return Ok(Stage::all());
    }
    let mut stages = names
        .iter()
        .map(|s| s.parse::<Stage>().map_err(CliError::InvalidArgument))
        .collect::<Result<Vec<_>, _>>()?;
    stages.sort_by_key(Stage::index);
    stages.dedup();
    Ok(stages)
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let (stages, args) = match cli.command {
        Command::Stages => {
            for stage in Stage::all() {
                println!("{}. {:<20} {}", stage.index(), stage.name(), stage.description());
            }
            return Ok(ExitCode::SUCCESS);
        }
        Command::Wells(args) => (vec![Stage::Wells], args),
        Command::Trajectories(args) => (vec![Stage::Trajectories], args),
        Command::DepthMeasurements(args) => (vec![Stage::DepthMeasurements], args),
        Command::WellTops(args) => (vec![Stage::WellTops], args),
        Command::All { only, run } => match parse_stages(&only) {
            Ok(stages) => (stages, run),
            Err(e) => {
                eprintln!("Error: {}", e.user_message());
                return Ok(ExitCode::FAILURE);
            }
        },
    };

    init_logging();
    run_cli(&stages, args.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stages_orders_and_dedups() {
        let names = vec!["tops".to_string(), "1".to_string(), "well-tops".to_string()];
        assert_eq!(
            parse_stages(&names).unwrap(),
            vec![Stage::Wells, Stage::WellTops]
        );
        assert_eq!(parse_stages(&[]).unwrap(), Stage::all());
        assert!(matches!(
            parse_stages(&["logs".to_string()]),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["wdl-ingest", "depth-measurements", "--dry-run"]).unwrap();
        match cli.command {
            Command::DepthMeasurements(args) => assert!(args.dry_run),
            other => panic!("Unexpected command: {other:?}"),
        }

        let cli =
            Cli::try_parse_from(["wdl-ingest", "all", "--only", "wells,trajectories"]).unwrap();
        match cli.command {
            Command::All { only, run } => {
                assert_eq!(only, vec!["wells", "trajectories"]);
                assert!(!run.dry_run);
            }
            other => panic!("Unexpected command: {other:?}"),
        }
    }
}
