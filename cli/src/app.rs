use anyhow::{Context, Result, anyhow};
use colored::*;
use compare_core::{ComparisonClient, DemoSession};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, info};

use crate::output::{
    print_comparison, print_demo_queries, print_error, print_interactive_help,
};

pub type Session = DemoSession<ComparisonClient>;

fn start_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Checks readiness and prints the warning if the backend is not usable.
/// Queries are still allowed afterwards; the backend may come up later.
pub async fn run_health_check(session: &mut Session) -> bool {
    match session.check_health().await {
        Some(health) if health.ready => {
            info!("Backend is ready");
            true
        }
        _ => {
            if let Some(message) = session.state().error() {
                eprintln!("{}", message.yellow());
            }
            false
        }
    }
}

/// Runs one comparison and prints the result or the error
pub async fn run_single_query(session: &mut Session, query: &str, plain: bool) -> Result<()> {
    let spinner = start_spinner("Processing comparison...");
    let outcome = session.compare(query).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(result) => {
            print_comparison(result, plain);
            Ok(())
        }
        Err(message) => {
            print_error(&message);
            Err(anyhow!(message))
        }
    }
}

/// Fetches (once) and prints the demo queries
pub async fn run_demo_list(session: &mut Session) -> Result<()> {
    match session.load_demo_queries().await {
        Ok(queries) => {
            print_demo_queries(queries);
            Ok(())
        }
        Err(message) => {
            print_error(&message);
            Err(anyhow!(message))
        }
    }
}

/// Runs demo query `number` (1-based)
pub async fn run_demo_pick(session: &mut Session, number: usize, plain: bool) -> Result<()> {
    if session.state().demo_queries().is_empty() {
        session.load_demo_queries().await.map_err(|message| {
            print_error(&message);
            anyhow!(message)
        })?;
    }

    let spinner = start_spinner("Processing comparison...");
    let outcome = session.select_demo_query(number.saturating_sub(1)).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(result) => {
            print_comparison(result, plain);
            Ok(())
        }
        Err(message) => {
            print_error(&message);
            Err(anyhow!(message))
        }
    }
}

/// Runs an interactive comparison session
pub async fn run_interactive(session: &mut Session, plain: bool) -> Result<()> {
    println!("{}", "Live Comparison Demo".bold());
    print_interactive_help();

    loop {
        print!("{}: ", "Query".green().bold());
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        let read = io::stdin()
            .read_line(&mut input)
            .context("Failed to read input")?;
        if read == 0 {
            // EOF
            println!();
            break;
        }

        let input = input.trim();
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            println!("Exiting comparison session.");
            break;
        }

        debug!("Interactive input: {}", input);
        // Failures are already printed and kept in the session; keep going
        let _ = match input {
            ":demo" => toggle_demo_list(session).await,
            ":clear" => {
                session.clear();
                println!("{}", "Cleared.".dimmed());
                Ok(())
            }
            ":health" => {
                if run_health_check(session).await {
                    println!("{}", "Backend is ready.".green());
                }
                Ok(())
            }
            ":help" => {
                print_interactive_help();
                Ok(())
            }
            cmd if cmd.starts_with(":pick") => match cmd[":pick".len()..].trim().parse::<usize>() {
                Ok(n) if n > 0 => run_demo_pick(session, n, plain).await,
                _ => {
                    print_error("Usage: :pick N (N starts at 1)");
                    Ok(())
                }
            },
            query => run_single_query(session, query, plain).await,
        };

        println!();
    }

    Ok(())
}

async fn toggle_demo_list(session: &mut Session) -> Result<()> {
    session.load_demo_queries().await.map_err(|message| {
        print_error(&message);
        anyhow!(message)
    })?;

    let state = session.state();
    if state.demo_queries_visible() {
        print_demo_queries(state.demo_queries());
    } else {
        println!("{}", "Demo queries hidden.".dimmed());
    }
    Ok(())
}
