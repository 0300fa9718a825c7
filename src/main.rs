use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use profile_audit::audit::{AuditError, Auditor};
use profile_audit::cache::{get_cache_path, ResultCache};
use profile_audit::config::{CacheTtls, Config};
use profile_audit::credentials::Credentials;
use profile_audit::llm::LlmClient;
use profile_audit::profile::{ProfileClient, ProfileError};
use profile_audit::scoring::{
    calculate_score_detailed, ChecklistResult, HardFacts, RandomSampler, RuleTable,
};

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Audit a profile and print its growth score
    Audit {
        /// Handle to audit, with or without the leading @
        handle: String,

        /// Ignore a cached report and run a new audit
        #[arg(long)]
        fresh: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate pro fixes and sponsor pricing for an audited profile
    Pro {
        handle: String,

        #[arg(long)]
        json: bool,
    },
    /// Score a saved checklist and hard facts offline
    Score {
        /// Checklist JSON file
        #[arg(long)]
        checklist: PathBuf,

        /// Hard facts JSON file
        #[arg(long)]
        facts: PathBuf,

        /// Seed for top-tier tip sampling
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        json: bool,
    },
    /// Run the HTTP API
    Serve {
        /// Listen address (defaults to server.addr from config)
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
    /// Manage the result cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
enum CacheAction {
    /// Delete every cached report, context and pro result
    Clear,
}

#[derive(Parser, Debug)]
#[command(name = "profile-audit")]
#[command(about = "Growth audit for X profiles", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/profile-audit/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    profile_audit::logging::init_tracing(cli.verbose);

    // Install rustls crypto provider (required for rustls 0.23+)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let start_time = Instant::now();
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init { force } = cli.command {
        std::process::exit(run_init(config_path, force));
    }

    let config = match profile_audit::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = config.validate() {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let code = match cli.command {
        Commands::Audit {
            handle,
            fresh,
            json,
        } => run_audit(&config, &handle, fresh, json).await,
        Commands::Pro { handle, json } => run_pro(&config, &handle, json).await,
        Commands::Score {
            checklist,
            facts,
            seed,
            json,
        } => run_score(&config, &checklist, &facts, seed, json),
        Commands::Serve { addr } => run_serve(&config, addr).await,
        Commands::Cache {
            action: CacheAction::Clear,
        } => run_cache_clear(),
        Commands::Init { .. } => EXIT_SUCCESS,
    };

    info!(elapsed_ms = start_time.elapsed().as_millis() as u64, "done");
    std::process::exit(code);
}

fn run_init(config_path: Option<PathBuf>, force: bool) -> i32 {
    let path = match config_path.map_or_else(profile_audit::config::get_config_path, Ok) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            return EXIT_CONFIG;
        }
    };

    match profile_audit::config::write_default_config(&path, force) {
        Ok(()) => {
            println!("Wrote default config to {}", path.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            EXIT_CONFIG
        }
    }
}

/// Wire the live clients. Fails with an exit code when keys are missing.
fn build_auditor(config: &Config) -> Result<Auditor, i32> {
    let credentials = Credentials::from_env().map_err(|e| {
        eprintln!("Credential error: {}", e);
        EXIT_AUTH
    })?;
    let ttls = config.cache.ttls().unwrap_or_else(|_| CacheTtls::default());

    let profiles = Arc::new(ProfileClient::new(
        credentials.rapidapi_key,
        &config.profile_api,
    ));
    let llm = Arc::new(LlmClient::new(credentials.llm_api_key, &config.llm));
    debug!(model = llm.model(), "llm client ready");

    let cache = ResultCache::new(get_cache_path(), config.cache.enabled);
    Ok(Auditor::new(profiles, llm.clone(), llm, cache)
        .with_scoring(config.scoring.clone())
        .with_ttls(ttls))
}

fn exit_code_for(err: &AuditError) -> i32 {
    match err {
        AuditError::Profile(ProfileError::InvalidHandle(_)) => EXIT_CONFIG,
        AuditError::MissingContext(_) => EXIT_CONFIG,
        AuditError::Profile(_) => EXIT_NETWORK,
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            EXIT_CONFIG
        }
    }
}

async fn run_audit(config: &Config, handle: &str, fresh: bool, json: bool) -> i32 {
    let auditor = match build_auditor(config) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match auditor.analyze(handle, fresh).await {
        Ok(report) if json => print_json(&report),
        Ok(report) => {
            let use_colors = profile_audit::output::should_use_colors();
            println!("{}", profile_audit::output::format_report(&report, use_colors));
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Audit failed: {}", e);
            exit_code_for(&e)
        }
    }
}

async fn run_pro(config: &Config, handle: &str, json: bool) -> i32 {
    let auditor = match build_auditor(config) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match auditor.generate_pro(handle).await {
        Ok(content) if json => print_json(&content),
        Ok(content) => {
            let use_colors = profile_audit::output::should_use_colors();
            println!("{}", profile_audit::output::format_pro(&content, use_colors));
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Pro content failed: {}", e);
            exit_code_for(&e)
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&content).map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e))
}

fn run_score(
    config: &Config,
    checklist_path: &Path,
    facts_path: &Path,
    seed: Option<u64>,
    json: bool,
) -> i32 {
    let checklist: ChecklistResult = match read_json(checklist_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return EXIT_CONFIG;
        }
    };
    let facts: HardFacts = match read_json(facts_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("{}", e);
            return EXIT_CONFIG;
        }
    };

    let mut sampler = match seed {
        Some(seed) => RandomSampler::seeded(seed),
        None => RandomSampler::from_entropy(),
    };
    let detail = calculate_score_detailed(
        &checklist,
        &facts,
        &RuleTable::standard(),
        &config.scoring,
        &mut sampler,
    );

    if json {
        print_json(&detail.result)
    } else {
        let use_colors = profile_audit::output::should_use_colors();
        println!(
            "{}",
            profile_audit::output::format_score_detail(&detail, use_colors)
        );
        EXIT_SUCCESS
    }
}

async fn run_serve(config: &Config, addr: Option<SocketAddr>) -> i32 {
    let addr = match addr {
        Some(a) => a,
        None => match config.server.addr.parse() {
            Ok(a) => a,
            Err(e) => {
                eprintln!("Invalid server.addr '{}': {}", config.server.addr, e);
                return EXIT_CONFIG;
            }
        },
    };
    let auditor = match build_auditor(config) {
        Ok(a) => Arc::new(a),
        Err(code) => return code,
    };

    eprintln!("Listening on http://{}", addr);
    match profile_audit::server::serve(addr, auditor).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Server error: {:#}", e);
            EXIT_NETWORK
        }
    }
}

fn run_cache_clear() -> i32 {
    let cache = ResultCache::new(get_cache_path(), true);
    match cache.clear() {
        Ok(()) => {
            println!("Cleared cache at {}", cache.path().display());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to clear cache: {:#}", e);
            EXIT_CONFIG
        }
    }
}
