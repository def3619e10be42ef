#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::{OutputMode, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "protomod",
    author,
    version,
    about = "protomod: namespace-driven modularization for Protocol Buffer schemas",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (defaults to pretty on a terminal, text when piped).
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Alias for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file to use instead of `./protomod.toml`.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Analyze",
        about = "Show dependency graph statistics",
        after_help = "EXAMPLES:\n    protomod stats schema.json\n    protomod stats schema.yaml --format json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        next_help_heading = "Analyze",
        about = "Group schema files into namespace modules",
        after_help = "EXAMPLES:\n    protomod partition schema.json\n    protomod partition schema.json --naming full --json > partition.json"
    )]
    Partition(cmd::partition::PartitionArgs),

    #[command(
        next_help_heading = "Check",
        about = "Validate a partition; exits non-zero when invalid",
        after_help = "EXAMPLES:\n    protomod validate schema.json\n    protomod validate schema.json --partition edited.json"
    )]
    Validate(cmd::validate::ValidateArgs),

    #[command(
        next_help_heading = "Check",
        about = "Score the computed partition"
    )]
    Evaluate(cmd::evaluate::EvaluateArgs),

    #[command(
        next_help_heading = "Check",
        about = "Compare the computed partition with a partition file",
        after_help = "EXAMPLES:\n    protomod compare schema.json --against manual.json --name manual"
    )]
    Compare(cmd::compare::CompareArgs),

    #[command(next_help_heading = "Build", about = "Print the module build order")]
    Order(cmd::order::OrderArgs),

    #[command(
        next_help_heading = "Build",
        about = "Emit the build plan for a valid partition",
        after_help = "EXAMPLES:\n    protomod plan schema.json -o plan.json"
    )]
    Plan(cmd::plan::PlanArgs),

    #[command(about = "Generate shell completions")]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PROTOMOD_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "protomod=debug,info"
        } else {
            "protomod=info,warn"
        })
    });

    let format = env::var("PROTOMOD_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let output = cli.output_mode();
    let config = cli.config.as_deref();

    match &cli.command {
        Commands::Stats(args) => cmd::stats::run_stats(args, config, output, &project_root),
        Commands::Partition(args) => {
            cmd::partition::run_partition(args, config, output, &project_root)
        }
        Commands::Validate(args) => {
            cmd::validate::run_validate(args, config, output, &project_root)
        }
        Commands::Evaluate(args) => {
            cmd::evaluate::run_evaluate(args, config, output, &project_root)
        }
        Commands::Compare(args) => cmd::compare::run_compare(args, config, output, &project_root),
        Commands::Order(args) => cmd::order::run_order(args, config, output, &project_root),
        Commands::Plan(args) => cmd::plan::run_plan(args, config, output, &project_root),
        Commands::Completions(args) => {
            cmd::completions::run_completions(args.shell, &mut Cli::command())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["protomod", "stats", "schema.json", "--json", "-v"]);
        assert!(cli.json);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Stats(_)));
    }

    #[test]
    fn format_flag_parses() {
        let cli = Cli::parse_from(["protomod", "--format", "text", "order", "schema.json"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
        assert_eq!(cli.output_mode(), OutputMode::Text);
    }

    #[test]
    fn config_flag_parses() {
        let cli = Cli::parse_from([
            "protomod",
            "--config",
            "custom.toml",
            "evaluate",
            "schema.json",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn compare_requires_against() {
        assert!(Cli::try_parse_from(["protomod", "compare", "schema.json"]).is_err());
        let cli = Cli::parse_from([
            "protomod",
            "compare",
            "schema.json",
            "--against",
            "manual.json",
        ]);
        assert!(matches!(cli.command, Commands::Compare(_)));
    }

    #[test]
    fn plan_output_short_flag() {
        let cli = Cli::parse_from(["protomod", "plan", "schema.json", "-o", "plan.json"]);
        let Commands::Plan(args) = cli.command else {
            panic!("expected plan");
        };
        assert_eq!(args.output, Some(PathBuf::from("plan.json")));
    }
}
