//! Hoist CLI - single-host deployment pipeline
//!
//! Usage: hoist <HOST> [--dry-run] [--config <PATH>] [-v...]

mod ui;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hoist::config::DEFAULT_CONFIG_FILE;
use hoist::domain::ports::{RemoteHost, StepEvent, StepReporter};
use hoist::infrastructure::{DryRunHost, GitCli, PassStore, SshHost};
use hoist::{format_elapsed, load_with_warnings, DeployError, Pipeline, StepRunner};

/// Exit status after the operator interrupted the run
const EXIT_INTERRUPTED: u8 = 130;

/// Environment variable holding the sudo password for non-interactive runs
const SUDO_PASSWORD_ENV: &str = "HOIST_SUDO_PASSWORD";

/// Hoist - deploy the current project to a single host
#[derive(Parser, Debug)]
#[command(name = "hoist")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SSH destination (host or user@host)
    host: String,

    /// Dry run - print remote changes instead of making them
    #[arg(short, long)]
    dry_run: bool,

    /// Deploy configuration template
    #[arg(short, long, env = "HOIST_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cancel = Arc::new(AtomicBool::new(false));
    match run(&cli, Arc::clone(&cancel)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if cancel.load(Ordering::SeqCst) || is_interrupted(&err) => {
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, cancel: Arc<AtomicBool>) -> Result<()> {
    let root = std::env::current_dir().context("unable to determine the working directory")?;

    let (config, warnings) = load_with_warnings(&cli.config, &root)?;
    for warning in &warnings {
        eprintln!("⚠ {}", warning);
    }

    let password = sudo_password(&cli.host)?;
    install_interrupt_handler(&cancel);

    let caps = ui::detect_capabilities();
    let reporter: Arc<dyn StepReporter> = Arc::new(ui::ConsoleReporter::new(caps));

    let ssh = SshHost::connect(cli.host.clone(), password)?;
    let dry_run;
    let host: &dyn RemoteHost = if cli.dry_run {
        reporter.on_event(StepEvent::Stage { name: "DRY RUN" });
        dry_run = DryRunHost::new(&ssh, Arc::clone(&reporter));
        &dry_run
    } else {
        &ssh
    };

    let scm = GitCli;
    let secrets = PassStore::new();
    let runner = StepRunner::new(Arc::clone(&reporter), cancel);

    let report = Pipeline::new(host, &scm, &secrets, runner).execute(root, config)?;
    println!(
        "{}",
        ui::reporter::render_complete(&format_elapsed(report.elapsed), caps.supports_color)
    );
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hoist={level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Stop between steps on Ctrl-C instead of killing the process mid-command
fn install_interrupt_handler(cancel: &Arc<AtomicBool>) {
    let flag = Arc::clone(cancel);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        tracing::warn!(error = %e, "unable to install interrupt handler");
    }
}

fn sudo_password(host: &str) -> Result<Option<String>> {
    if let Ok(password) = std::env::var(SUDO_PASSWORD_ENV) {
        return Ok(Some(password).filter(|p| !p.is_empty()));
    }

    let password = dialoguer::Password::new()
        .with_prompt(format!("sudo password on {host}"))
        .allow_empty_password(true)
        .interact()
        .context("unable to read the sudo password")?;

    Ok(Some(password).filter(|p| !p.is_empty()))
}

fn is_interrupted(err: &anyhow::Error) -> bool {
    err.downcast_ref::<DeployError>()
        .is_some_and(DeployError::is_interrupted)
}
