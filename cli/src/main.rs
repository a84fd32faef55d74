use anyhow::{Context, Result};
use clap::Parser;
use compare_core::config::{ClientConfig, get_default_config_file};
use compare_core::{ComparisonClient, DemoSession};
use std::process::ExitCode;
use tracing::debug;

mod app;
mod cli;
mod logging;
mod output;

use crate::cli::Args;
use crate::logging::init_logging;
use crate::output::print_usage_instructions;

const APP_NAME: &str = "compare-cli";

/// Resolves configuration: file defaults, then `COMPARE_*` environment, then flags
fn resolve_config(args: &Args, env_config: &ClientConfig) -> Result<ClientConfig> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_default_config_file(APP_NAME)?,
    };
    let file_config = ClientConfig::load_from_file(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let flags = ClientConfig {
        api_url: args.api_url.clone(),
        friendly_errors: args.no_friendly_errors.then_some(false),
        ..ClientConfig::empty()
    };

    Ok(file_config.merge(env_config).merge(&flags))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Loads .env before clap reads COMPARE_API_URL
    let env_config = ClientConfig::from_env();
    let args = Args::parse();

    let config = resolve_config(&args, &env_config)?;
    init_logging(config.log_level.as_deref(), args.verbose);
    debug!("Resolved configuration: {:?}", config);

    let client = ComparisonClient::new(&config)?;
    debug!("Using comparison API at {}", client.base_url());

    let mut session = DemoSession::new(client, config.api_port())
        .with_friendly_errors(config.friendly_errors_enabled());

    let wants_backend = args.interactive || args.demo || args.pick.is_some() || args.query.is_some();
    if !wants_backend {
        print_usage_instructions();
        return Ok(ExitCode::SUCCESS);
    }

    if !args.skip_health {
        app::run_health_check(&mut session).await;
    }

    let outcome = if args.interactive {
        app::run_interactive(&mut session, args.plain).await
    } else if let Some(n) = args.pick {
        app::run_demo_pick(&mut session, n as usize, args.plain).await
    } else if args.demo {
        app::run_demo_list(&mut session).await
    } else if let Some(query) = args.query.as_deref() {
        app::run_single_query(&mut session, query, args.plain).await
    } else {
        Ok(())
    };

    // Errors were already printed for the user
    Ok(match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("Exiting with failure: {}", e);
            ExitCode::FAILURE
        }
    })
}
