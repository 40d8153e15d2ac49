use crate::commands::{
    run_decode, run_recommend, run_results_list, run_results_show, run_stats, RecommendArgs,
    ResultsListArgs,
};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use major_advisor::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Major Advisor",
    about = "Recommend academic majors from a student questionnaire",
    version
)]
struct Cli {
    /// Store results in this directory instead of the configured location
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a questionnaire JSON file and save the result
    Recommend(RecommendArgs),
    /// Print the result carried by a share token
    Decode {
        /// Token taken from a share link's `data` parameter
        token: String,
    },
    /// Browse saved results
    Results {
        #[command(subcommand)]
        command: ResultsCommand,
    },
    /// Summarize which majors are recommended most often
    Stats,
    /// Score a few sample students end to end
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ResultsCommand {
    /// List saved results, newest first
    List(ResultsListArgs),
    /// Show one saved result
    Show {
        /// Result identifier
        id: String,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let store_dir = cli.store_dir;
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args, store_dir).await,
        Command::Recommend(args) => run_recommend(args, store_dir),
        Command::Decode { token } => run_decode(&token),
        Command::Results {
            command: ResultsCommand::List(args),
        } => run_results_list(args, store_dir),
        Command::Results {
            command: ResultsCommand::Show { id },
        } => run_results_show(&id, store_dir),
        Command::Stats => run_stats(store_dir),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["major-advisor"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_nested_results_commands() {
        let cli = Cli::try_parse_from([
            "major-advisor",
            "results",
            "list",
            "--query",
            "an",
            "--csv",
            "--store-dir",
            "/tmp/advisor",
        ])
        .expect("parses");

        assert_eq!(cli.store_dir, Some(PathBuf::from("/tmp/advisor")));
        match cli.command {
            Some(Command::Results {
                command: ResultsCommand::List(args),
            }) => {
                assert_eq!(args.query.as_deref(), Some("an"));
                assert!(args.csv);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn recommend_requires_input() {
        assert!(Cli::try_parse_from(["major-advisor", "recommend"]).is_err());
    }
}
