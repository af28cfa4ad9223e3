//! tddguard - pre-tool-use hook that keeps implementation edits behind tests.
//!
//! # Protocol
//!
//! ```text
//! stdin (hook JSON, bounded read) -> Gate::decide -> emit
//!                                                     |
//!                                                     v
//!                          exit 0 + stdout advisory | exit N + stderr reason
//! ```
//!
//! The gate fails open: any error or panic in the pipeline becomes an allow
//! verdict with a diagnostic note. stdout and stderr carry only the verdict;
//! logs (warnings by default, `RUST_LOG` to widen) go to
//! `~/.tddguard/logs/tddguard.log`.

use anyhow::{Context, Result};
use std::{
    any::Any,
    env,
    fs::{self, OpenOptions},
    io,
    panic,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Mutex,
    time::Duration,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tddguard_config::{DEFAULT_BLOCK_EXIT_CODE, GuardConfig, tddguard_home};
use tddguard_core::{Gate, GateSettings, PatternRegistry, emit, read_invocation};
use tddguard_types::{Invocation, Verdict};

fn init_tracing() {
    // Runs on every edit: keep the default quiet.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("error"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::debug!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // stdout/stderr belong to the hook protocol; without a log file, stay silent.
    tracing_subscriber::registry().with(env_filter).init();
}

/// Open `~/.tddguard/logs/tddguard.log`. Nothing is ever created under the
/// project directory; without a usable home there is no log.
fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    let Some(candidate) = log_file_path() else {
        return (None, warnings);
    };

    if let Some(parent) = candidate.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warnings.push(format!(
            "Failed to create log dir {}: {e}",
            parent.display()
        ));
        return (None, warnings);
    }

    match OpenOptions::new()
        .create(true)
        .append(true)
        .open(&candidate)
    {
        Ok(file) => (Some((candidate, file)), warnings),
        Err(e) => {
            warnings.push(format!(
                "Failed to open log file {}: {e}",
                candidate.display()
            ));
            (None, warnings)
        }
    }
}

fn log_file_path() -> Option<PathBuf> {
    tddguard_home().map(|home| home.join("logs").join("tddguard.log"))
}

/// Route panic reports into the log instead of stderr, which is reserved
/// for block messages.
fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        tracing::error!("tddguard panicked: {info}");
    }));
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

struct Decision {
    verdict: Verdict,
    block_exit_code: u8,
}

fn main() -> ExitCode {
    init_tracing();
    install_panic_hook();

    let decision = match panic::catch_unwind(run) {
        Ok(Ok(decision)) => decision,
        Ok(Err(err)) => {
            tracing::error!("Gate failed, allowing edit: {err:#}");
            fail_open(format!("{err:#}"))
        }
        Err(payload) => fail_open(panic_message(payload.as_ref())),
    };

    let code = emit(
        &decision.verdict,
        decision.block_exit_code,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    ExitCode::from(code)
}

fn fail_open(detail: String) -> Decision {
    Decision {
        verdict: Verdict::fail_open(detail),
        block_exit_code: DEFAULT_BLOCK_EXIT_CODE,
    }
}

fn run() -> Result<Decision> {
    let project_root = match env::current_dir() {
        Ok(dir) => Some(dir),
        Err(e) => {
            tracing::warn!("Cannot determine project root: {e}");
            None
        }
    };

    let config = load_config(project_root.as_deref());
    let invocation = read_stdin(config.stdin_timeout())?;

    let registry = match PatternRegistry::from_config(config.patterns()) {
        Ok(registry) => registry,
        Err(e) => {
            tracing::warn!("Invalid configured patterns, using defaults: {e}");
            PatternRegistry::with_defaults().context("failed to compile default patterns")?
        }
    };

    let settings = GateSettings::new(&config, project_root);
    let verdict = Gate::new(&registry, &settings).decide(&invocation);

    Ok(Decision {
        verdict,
        block_exit_code: config.block_exit_code(),
    })
}

/// A broken config file must not block edits; fall back to defaults.
fn load_config(project_root: Option<&Path>) -> GuardConfig {
    match GuardConfig::load(project_root) {
        Ok(Some(config)) => config,
        Ok(None) => GuardConfig::default(),
        Err(e) => {
            tracing::warn!(path = %e.path().display(), "Using default config: {e}");
            GuardConfig::default()
        }
    }
}

fn read_stdin(timeout: Duration) -> Result<Invocation> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start async runtime")?;

    let invocation = runtime.block_on(read_invocation(tokio::io::stdin(), timeout));

    // A timed-out stdin read is still parked on a blocking thread; don't wait for it.
    runtime.shutdown_background();
    Ok(invocation)
}
