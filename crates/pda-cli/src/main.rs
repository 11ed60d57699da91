//! pda - Personal Digital Authority command line.
//!
//! Drives the kernel pipeline over statements from files or stdin:
//! validate, compile, lease, and run against the reference executors. The
//! kernel stages stay pure; the clock, the configuration, and all
//! observability live here.

use std::fs;
use std::io::Read as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pda_core::compiler::{AuxInputs, CapabilityId, compile};
use pda_core::dsl::validate;
use pda_core::lease::{LeaseManager, LeaseToken, RevocationSnapshot};
use pda_core::manifest::{HrcToken, TaskManifest, TrustSnapshot};
use pda_executors::app_launch::{AppLaunchExecutor, AppLaunchExecutorConfig};
use pda_executors::contract::{Executor, ExecutorKeys};
use pda_executors::file::{FileExecutor, FileExecutorConfig};
use pda_executors::host::StaticHostAdapter;
use pda_executors::media::{MediaExecutor, MediaExecutorConfig};
use pda_executors::navigation::NavigationExecutor;
use pda_executors::search::SearchExecutor;
use pda_core::crypto::Signer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod config;

use config::PdaConfig;

/// pda - Personal Digital Authority
#[derive(Parser, Debug)]
#[command(name = "pda")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the static configuration file
    #[arg(short, long, default_value = "pda.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a statement and print its AST
    Validate {
        /// Statement file, or '-' for stdin
        input: String,
    },

    /// Compile a statement into a task manifest
    Compile {
        /// Statement file, or '-' for stdin
        input: String,

        /// Auxiliary input bindings, key=value
        #[arg(short, long = "bind")]
        bind: Vec<String>,
    },

    /// Evaluate a manifest and print the lease decision
    Lease {
        /// Manifest JSON file, or '-' for stdin
        manifest: String,

        /// Supply a confirmed HRC token
        #[arg(long)]
        hrc_confirmed: bool,

        /// Evaluation instant in ms since epoch (defaults to now)
        #[arg(long)]
        now_ms: Option<u64>,
    },

    /// Run the full pipeline: validate, compile, lease, execute
    Run {
        /// Statement file, or '-' for stdin
        input: String,

        /// Auxiliary input bindings, key=value
        #[arg(short, long = "bind")]
        bind: Vec<String>,

        /// Supply a confirmed HRC token
        #[arg(long)]
        hrc_confirmed: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Validate { input } => cmd_validate(&input),
        Commands::Compile { input, bind } => cmd_compile(&input, &bind),
        Commands::Lease {
            manifest,
            hrc_confirmed,
            now_ms,
        } => cmd_lease(&cli.config, &manifest, hrc_confirmed, now_ms),
        Commands::Run {
            input,
            bind,
            hrc_confirmed,
        } => cmd_run(&cli.config, &input, &bind, hrc_confirmed),
    }
}

fn cmd_validate(input: &str) -> Result<()> {
    let text = read_input(input)?;
    match validate(&text) {
        Ok(ast) => print_json(&ast),
        Err(error) => {
            print_json(&error)?;
            std::process::exit(1);
        },
    }
}

fn cmd_compile(input: &str, bind: &[String]) -> Result<()> {
    let text = read_input(input)?;
    let ast = match validate(&text) {
        Ok(ast) => ast,
        Err(error) => {
            print_json(&error)?;
            std::process::exit(1);
        },
    };
    match compile(&ast, &parse_bindings(bind)?) {
        Ok(manifest) => print_json(&manifest),
        Err(error) => {
            print_json(&error)?;
            std::process::exit(1);
        },
    }
}

fn cmd_lease(
    config_path: &Path,
    manifest_input: &str,
    hrc_confirmed: bool,
    now_ms: Option<u64>,
) -> Result<()> {
    let config = PdaConfig::load(config_path)?;
    let text = read_input(manifest_input)?;
    let manifest: TaskManifest =
        serde_json::from_str(&text).context("manifest is not valid JSON")?;

    let now = now_ms.unwrap_or_else(wall_clock_ms);
    match evaluate_lease(&config, &manifest, now, hrc_confirmed)? {
        Ok(lease) => print_json(&lease),
        Err(error) => {
            print_json(&error)?;
            std::process::exit(1);
        },
    }
}

fn cmd_run(
    config_path: &Path,
    input: &str,
    bind: &[String],
    hrc_confirmed: bool,
) -> Result<()> {
    let config = PdaConfig::load(config_path)?;
    let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let text = read_input(input)?;

    let ast = match validate(&text) {
        Ok(ast) => ast,
        Err(error) => {
            print_json(&error)?;
            std::process::exit(1);
        },
    };
    let manifest = match compile(&ast, &parse_bindings(bind)?) {
        Ok(manifest) => manifest,
        Err(error) => {
            print_json(&error)?;
            std::process::exit(1);
        },
    };

    let now = wall_clock_ms();
    let lease = match evaluate_lease(&config, &manifest, now, hrc_confirmed)? {
        Ok(lease) => lease,
        Err(error) => {
            print_json(&error)?;
            std::process::exit(1);
        },
    };
    info!(task_id = %manifest.task_id, capability = %manifest.capability_id, "lease granted");

    let result = dispatch(&config, config_dir, &manifest, &lease, now)?;
    print_json(&result)
}

fn evaluate_lease(
    config: &PdaConfig,
    manifest: &TaskManifest,
    now_ms: u64,
    hrc_confirmed: bool,
) -> Result<std::result::Result<LeaseToken, pda_core::lease::LeaseError>> {
    let manager = LeaseManager::new(config.lease_signer()?)
        .with_duration_ms(config.kernel.lease_duration_ms)
        .with_revocations(RevocationSnapshot::from_task_ids(
            config.kernel.revoked_task_ids.iter().cloned(),
        ));
    let trust = TrustSnapshot {
        trust_score: config.trust.trust_score,
        minimum_required: config.trust.minimum_required,
    };
    let hrc = hrc_confirmed.then(|| HrcToken {
        confirmed: true,
        confirmed_at: now_ms,
    });

    Ok(manager.evaluate(manifest, &trust, now_ms, hrc.as_ref()))
}

/// Routes a manifest to the reference executor serving its capability
/// family.
fn dispatch(
    config: &PdaConfig,
    config_dir: &Path,
    manifest: &TaskManifest,
    lease: &LeaseToken,
    now_ms: u64,
) -> Result<pda_executors::contract::ExecutionResult> {
    let keys = || -> Result<ExecutorKeys> {
        Ok(ExecutorKeys {
            lease_verifier: config.lease_verifier()?,
            result_signer: Signer::generate(),
        })
    };
    let host = || StaticHostAdapter::new(config.host_config());

    let result = match manifest.capability_id {
        CapabilityId::FileMove | CapabilityId::FileCopy | CapabilityId::FileDelete => {
            let executor = FileExecutor::new(
                FileExecutorConfig {
                    base_directories: config.file.base_directories.clone(),
                },
                keys()?,
            )
            .context("FILE executor configuration")?;
            executor.execute(manifest, lease, now_ms)
        },
        CapabilityId::MediaPlay
        | CapabilityId::MediaPause
        | CapabilityId::MediaStop
        | CapabilityId::MediaSeek => {
            let executor = MediaExecutor::new(
                MediaExecutorConfig {
                    device_allowlist: config.media.device_allowlist.clone(),
                },
                keys()?,
                host(),
            );
            executor.execute(manifest, lease, now_ms)
        },
        CapabilityId::AppLaunch | CapabilityId::AppFocus | CapabilityId::AppClose => {
            let executor = AppLaunchExecutor::new(
                AppLaunchExecutorConfig {
                    app_allowlist: config.apps.allowlist.clone(),
                },
                keys()?,
                host(),
            );
            executor.execute(manifest, lease, now_ms)
        },
        CapabilityId::NavigateApp
        | CapabilityId::NavigateWindow
        | CapabilityId::NavigateUrl
        | CapabilityId::NavigateFile => {
            let executor = NavigationExecutor::new(keys()?, host());
            executor.execute(manifest, lease, now_ms)
        },
        CapabilityId::SearchFiles | CapabilityId::SearchEmails | CapabilityId::SearchDatasets => {
            let executor = SearchExecutor::new(config.search_scopes(config_dir)?, keys()?);
            executor.execute(manifest, lease, now_ms)
        },
        other => bail!("capability {other} has no reference executor"),
    };
    Ok(result)
}

fn parse_bindings(bind: &[String]) -> Result<AuxInputs> {
    let mut aux = AuxInputs::new();
    for entry in bind {
        let Some((key, value)) = entry.split_once('=') else {
            bail!("binding {entry:?} is not key=value");
        };
        aux.insert(key, value);
    }
    Ok(aux)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("cannot read stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(input).with_context(|| format!("cannot read {input}"))
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn wall_clock_ms() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}
