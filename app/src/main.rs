//! Todo timer binary
//!
//! Reads one command per line from standard input and prints the updated
//! screen after each. Logs go to standard error.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use todo_timer::session::{handle_line, on_observed, Reply};
use todo_timer::{app_store, view, AppEnvironment, Config};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_timer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(?config, "Starting todo timer");

    let store = app_store(AppEnvironment::live(&config), &config);
    let mut observed = store.subscribe_actions();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("{}", store.state(view::render).await);
    println!("(type `help` for commands)");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read standard input")? else {
                    break;
                };

                match handle_line(&store, &line).await? {
                    Reply::Print(text) => print!("{text}"),
                    Reply::Quit => break,
                }
            }
            action = observed.recv() => match action {
                Ok(action) => {
                    if let Some(text) = on_observed(&store, &action).await {
                        print!("{text}");
                    }
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Display fell behind, {} actions skipped", skipped);
                },
                Err(RecvError::Closed) => break,
            },
        }
    }

    info!("Shutting down");
    store
        .shutdown(config.shutdown_timeout)
        .await
        .context("graceful shutdown failed")?;

    Ok(())
}
