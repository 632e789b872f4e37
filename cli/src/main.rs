//! Lattice CLI - replays pointer scripts through a capture session.
//!
//! ```text
//! lattice <enroll|authenticate> <script> [--width W] [--height H] [--credential ORDINALS]
//! ```
//!
//! The binary drives [`lattice_engine::CaptureSession`] the way a touch
//! surface would: every script line becomes a command on the session, results
//! are printed as the engine reports them, and `wait` lines let the delayed
//! reset run in real time. Credentials are kept in memory only.

mod memory_validator;
mod script;

use std::{
    env,
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{Context, Result, anyhow, bail};
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use lattice_config::LatticeConfig;
use lattice_engine::{
    CaptureParameters, CaptureRequest, CaptureResult, CaptureSession, Mode, Pattern, SessionError,
    SessionHandle, SessionSnapshot,
};

use memory_validator::MemoryValidator;
use script::Step;

const DEFAULT_SURFACE: u32 = 900;

/// How often to check whether an in-flight validation has reported.
const VALIDATION_POLL: Duration = Duration::from_millis(10);

const USAGE: &str = "usage: lattice <enroll|authenticate> <script> [--width W] [--height H] [--credential ORDINALS]";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_lattice_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Stdout carries the results; without a log file, logs are dropped.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_lattice_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in lattice_log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn lattice_log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: next to the config file, ~/.lattice/logs/lattice.log by default
    if let Some(config_path) = LatticeConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("lattice.log"));
    }

    // Fallback: ./.lattice/logs/lattice.log
    candidates.push(PathBuf::from(".lattice").join("logs").join("lattice.log"));

    candidates
}

#[derive(Debug)]
struct Args {
    mode: Mode,
    script: PathBuf,
    width: u32,
    height: u32,
    credential: Option<Pattern>,
}

impl Args {
    fn parse(mut raw: impl Iterator<Item = String>) -> Result<Self> {
        let mode = raw.next().ok_or_else(|| anyhow!(USAGE))?;
        let mode = Mode::parse(&mode)
            .ok_or_else(|| anyhow!("unknown mode `{mode}`\n{USAGE}"))?;
        let script = raw.next().map(PathBuf::from).ok_or_else(|| anyhow!(USAGE))?;

        let mut args = Self {
            mode,
            script,
            width: DEFAULT_SURFACE,
            height: DEFAULT_SURFACE,
            credential: None,
        };

        while let Some(flag) = raw.next() {
            let value = raw
                .next()
                .ok_or_else(|| anyhow!("`{flag}` needs a value\n{USAGE}"))?;
            match flag.as_str() {
                "--width" => args.width = parse_dimension(&flag, &value)?,
                "--height" => args.height = parse_dimension(&flag, &value)?,
                "--credential" => args.credential = Some(parse_credential(&value)?),
                other => bail!("unknown option `{other}`\n{USAGE}"),
            }
        }

        Ok(args)
    }
}

fn parse_dimension(flag: &str, value: &str) -> Result<u32> {
    value
        .parse()
        .with_context(|| format!("`{flag}` expects a pixel count, got `{value}`"))
}

/// `1236` or `1,2,3,6`.
fn parse_credential(value: &str) -> Result<Pattern> {
    let ordinals = value
        .chars()
        .filter(|c| *c != ',')
        .map(|c| {
            c.to_digit(10)
                .and_then(|d| u8::try_from(d).ok())
                .ok_or_else(|| anyhow!("`{c}` is not a touch point"))
        })
        .collect::<Result<Vec<u8>>>()?;
    Pattern::from_ordinals(&ordinals).context("invalid credential")
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse(env::args().skip(1))?;

    let config = match LatticeConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("warning: {e}; using defaults");
            None
        }
    };
    let parameters = CaptureParameters::from_config(config.as_ref());

    let source = fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read script {}", args.script.display()))?;
    let steps = script::parse(&source)
        .with_context(|| format!("invalid script {}", args.script.display()))?;

    let validator = Arc::new(match &args.credential {
        Some(credential) => MemoryValidator::with_credential(parameters.shape, credential),
        None => MemoryValidator::new(parameters.shape),
    });

    replay(&args, steps, parameters, validator).await
}

async fn replay(
    args: &Args,
    steps: Vec<Step>,
    parameters: CaptureParameters,
    validator: Arc<MemoryValidator>,
) -> Result<()> {
    let (results_tx, mut results_rx) = mpsc::unbounded_channel::<CaptureResult>();
    let printer = tokio::spawn(async move {
        while let Some(result) = results_rx.recv().await {
            println!("{} {}", result.mode, result.status);
        }
    });

    let request = |mode: Mode| {
        CaptureRequest::new(mode, Arc::new(results_tx.clone()), validator.clone())
            .with_parameters(parameters.clone())
    };

    let session = CaptureSession::spawn(args.width, args.height);
    session.start_capture(request(args.mode))?;
    tracing::info!(
        mode = %args.mode,
        steps = steps.len(),
        width = args.width,
        height = args.height,
        "Replaying script"
    );

    for step in steps {
        match step {
            Step::Pointer(event) => session.pointer(event)?,
            Step::Resize { width, height } => session.resize(width, height)?,
            Step::Wait(duration) => {
                // Drain queued commands first so the wait starts after them.
                session.snapshot().await?;
                tokio::time::sleep(duration).await;
            }
            Step::Restart(mode) => session.start_capture(request(mode))?,
        }
    }

    let snapshot = settle(&session).await?;
    session.shutdown().await?;
    drop(results_tx);
    printer.await.context("result printer failed")?;

    println!(
        "final state={:?} gate={:?} pending={} stored={}",
        snapshot.state,
        snapshot.gate,
        snapshot.has_pending,
        validator.has_credential()
    );
    Ok(())
}

/// Wait until no validation is in flight and return that snapshot.
async fn settle(session: &SessionHandle) -> Result<SessionSnapshot, SessionError> {
    loop {
        let snapshot = session.snapshot().await?;
        if !snapshot.validating {
            return Ok(snapshot);
        }
        tokio::time::sleep(VALIDATION_POLL).await;
    }
}
