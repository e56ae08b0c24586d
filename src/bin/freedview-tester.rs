use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use freedview_tester::{
    DEFAULT_INI_NAME, DEFAULT_MAX_WORKERS, Phase, PhaseSummary, SessionOpts, TesterSession,
    compare_folder,
};

#[derive(Parser, Debug)]
#[command(
    name = "freedview-tester",
    version,
    about = "Render two renderer builds over a test asset tree and compare the results"
)]
struct Cli {
    /// Configuration INI (default: freeDView_tester.ini in the working directory or next
    /// to the executable).
    #[arg(long, global = true)]
    ini: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    /// Worker threads for the render and compare phases.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_WORKERS)]
    max_workers: usize,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run localize, render and compare in sequence.
    All,
    /// Rewrite frame descriptors to reference the local asset tree.
    Localize(LocalizeArgs),
    /// Render every frame with both renderer builds.
    Render,
    /// Compare rendered sequences and write reports.
    Compare,
    /// Compare two image folders directly.
    CompareUi(CompareUiArgs),
}

#[derive(Parser, Debug)]
struct LocalizeArgs {
    /// Synthesize placeholder sport/stadium/category folders for shallow events.
    #[arg(long, default_value_t = false)]
    create_folders: bool,
}

#[derive(Parser, Debug)]
struct CompareUiArgs {
    /// Folder receiving `results/`.
    frame_folder: PathBuf,
    /// Tester build image folder.
    tester_path: PathBuf,
    /// Original build image folder.
    orig_path: PathBuf,
    /// Original build name.
    orig_name: String,
    /// Tester build name.
    tester_name: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.cmd {
        Command::CompareUi(args) => cmd_compare_ui(args),
        Command::All => cmd_phases(&cli, &Phase::ALL, false),
        Command::Localize(args) => cmd_phases(&cli, &[Phase::Localize], args.create_folders),
        Command::Render => cmd_phases(&cli, &[Phase::Render], false),
        Command::Compare => cmd_phases(&cli, &[Phase::Compare], false),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_ini(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        anyhow::ensure!(path.is_file(), "INI file not found: {}", path.display());
        return Ok(path.to_path_buf());
    }

    let mut candidates = vec![PathBuf::from(DEFAULT_INI_NAME)];
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(dir.join(DEFAULT_INI_NAME));
    }
    candidates
        .into_iter()
        .find(|p| p.is_file())
        .ok_or_else(|| anyhow::anyhow!("default INI file not found: {DEFAULT_INI_NAME}"))
}

fn cmd_phases(cli: &Cli, phases: &[Phase], create_folders: bool) -> anyhow::Result<()> {
    let ini = resolve_ini(cli.ini.as_deref())?;
    let opts = SessionOpts {
        max_workers: cli.max_workers,
        create_folders,
    };
    let session = TesterSession::from_ini(&ini, opts)?;

    let summaries: Vec<PhaseSummary> = phases.iter().map(|&p| session.run_phase(p)).collect();
    let aborted: Vec<String> = summaries
        .iter()
        .filter(|s| s.aborted)
        .map(|s| s.phase.to_string())
        .collect();
    anyhow::ensure!(aborted.is_empty(), "aborted phase(s): {}", aborted.join(", "));

    for s in &summaries {
        eprintln!(
            "{}: {} succeeded, {} failed out of {}",
            s.phase, s.stats.succeeded, s.stats.failed, s.stats.total
        );
    }
    Ok(())
}

fn cmd_compare_ui(args: &CompareUiArgs) -> anyhow::Result<()> {
    let report = compare_folder(
        &args.frame_folder,
        &args.tester_path,
        &args.orig_path,
        &args.orig_name,
        &args.tester_name,
    )?;
    eprintln!("wrote {}", report.display());
    Ok(())
}
