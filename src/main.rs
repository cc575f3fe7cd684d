//! prop-bridge CLI
//!
//! Coordinator-side tooling for distributed property-check runs.
//!
//! ## Usage
//!
//! ```bash
//! # Merge worker summaries collected in files
//! prop-bridge merge worker-1.txt worker-2.txt
//!
//! # Merge from stdin
//! cat workers/*.txt | prop-bridge merge --format json
//!
//! # Show the effective checker configuration
//! prop-bridge config -- -minSuccessfulTests 500 -verbosity 1
//!
//! # Validate one message
//! prop-bridge decode d7,5,1,1
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

mod cli;

use cli::Args;
use prop_bridge::config::{print_env_help, AppConfig, EnvConfig};
use prop_bridge::discovery::PropertyLoader;
use prop_bridge::output::ResultFormatter;
use prop_bridge::protocol::RunnerMessage;
use prop_bridge::session::{Role, Runner};
use prop_bridge::utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let env = EnvConfig::load();
    let config = AppConfig::resolve::<&str>(&[], &env)?;

    init_logger(if args.verbose {
        LogLevel::Debug
    } else {
        config.log_level()
    });
    if env.has_any() {
        debug!("Environment overrides: {:?}", env);
    }

    match args.command {
        cli::Command::Merge(merge_args) => merge(merge_args, config).await,
        cli::Command::Config(config_args) => show_config(config_args, &env),
        cli::Command::Decode(decode_args) => decode(decode_args),
    }
}

async fn merge(args: cli::MergeArgs, config: AppConfig) -> Result<ExitCode> {
    let format = config.output_format(args.format.as_deref())?;
    let coordinator = Runner::builder(Role::Coordinator, PropertyLoader::new())
        .build_with_params(config.checker);

    let mut lines = Vec::new();
    if args.files.is_empty() {
        let mut reader = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = reader.next_line().await.context("Failed to read stdin")? {
            lines.push(line);
        }
    } else {
        for path in &args.files {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            lines.extend(content.lines().map(str::to_string));
        }
    }

    let mut rejected = 0usize;
    for line in &lines {
        if let Err(e) = coordinator.receive_message(line) {
            if args.strict {
                return Err(e).context("Malformed worker message");
            }
            warn!("{}", e);
            rejected += 1;
        }
    }

    info!("Merged {} messages ({} rejected)", lines.len() - rejected, rejected);

    let counters = coordinator.counters();
    coordinator.done();
    println!("{}", ResultFormatter::new(format).format_counters(&counters));

    Ok(if counters.is_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn show_config(args: cli::ConfigArgs, env: &EnvConfig) -> Result<ExitCode> {
    if args.env_help {
        print_env_help();
        return Ok(ExitCode::SUCCESS);
    }

    let config = AppConfig::resolve(&args.checker_args, env)?;
    let rendered = if args.json {
        serde_json::to_string_pretty(&config).context("Failed to serialize config")?
    } else {
        serde_yaml::to_string(&config).context("Failed to serialize config")?
    };
    println!("{rendered}");

    Ok(ExitCode::SUCCESS)
}

fn decode(args: cli::DecodeArgs) -> Result<ExitCode> {
    match RunnerMessage::decode(&args.line)? {
        Some(RunnerMessage::CounterDelta(delta)) => {
            println!("counter delta: {}", serde_json::to_string(&delta)?);
        }
        None => println!("ignored: no known tag"),
    }
    Ok(ExitCode::SUCCESS)
}
