use clap::CommandFactory;
use clap::FromArgMatches;
use clap::Parser;
use clap::Subcommand;
use git_testament::git_testament;
use git_testament::render_testament;

use ncov_qc::collect::command::collect;
use ncov_qc::collect::command::CollectArgs;
use ncov_qc::summary::command::summarize;
use ncov_qc::summary::command::SummarizeArgs;

git_testament!(TESTAMENT);

/// Condenses viral sequencing QC outputs into per-sample and per-run summary
/// tables.
#[derive(Parser)]
#[command(name = "ncov-qc", propagate_version = true)]
struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    command: Commands,

    /// Only errors are printed to the stderr stream.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// All available information, including debug information, is printed to
    /// stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarizes the QC outputs of a single sample.
    Summarize(SummarizeArgs),

    /// Collects per-sample summaries from a directory into a single table.
    Collect(CollectArgs),
}

fn main() -> anyhow::Result<()> {
    let version = render_testament!(TESTAMENT);
    let matches = Cli::command().version(version).get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let mut level = tracing::Level::INFO;
    if cli.quiet {
        level = tracing::Level::ERROR;
    } else if cli.verbose {
        level = tracing::Level::DEBUG;
    }

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    match cli.command {
        Commands::Summarize(args) => summarize(args),
        Commands::Collect(args) => collect(args),
    }
}
