#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;

use anyhow::Error;
use yansi::Paint;

use crate::application::cli;
use crate::configuration::Settings;
use crate::domain::models::StartupError;
use crate::domain::services::SessionEngine;
use crate::infrastructure::backends::BackendManager;
use crate::infrastructure::consoles::ConsoleManager;
use crate::infrastructure::services::ServiceManager;

fn handle_error(err: Error) {
    if let Some(startup_err) = err.downcast_ref::<StartupError>() {
        eprintln!("\n{}", Paint::red(format!("Error: {startup_err}")));
        eprintln!("Check the service log for details, or start the service manually and try again.");
        process::exit(1);
    }

    eprintln!(
        "{}",
        Paint::red(format!(
            "Oh no! belullama-chat has failed with the following app version and error.\n\nVersion: {}\nCommit: {}\nError: {:?}",
            env!("CARGO_PKG_VERSION"),
            env!("VERGEN_GIT_DESCRIBE"),
            err
        ))
    );

    let backtrace = err.backtrace();
    if backtrace.to_string() == "disabled backtrace" {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 {args}");
    } else {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

async fn start() -> anyhow::Result<()> {
    let config = match cli::parse().await? {
        Some(config) => config,
        None => return Ok(()),
    };
    let settings = Settings::from_config(&config)?;
    tracing::debug!(settings = ?settings, "Starting session");

    let mut engine = SessionEngine::new(
        settings.clone(),
        BackendManager::get(&settings),
        ServiceManager::get(&settings),
        ConsoleManager::get(&settings),
    );

    return engine.run().await;
}

#[tokio::main]
async fn main() {
    better_panic::install();

    let mut log_guard = None;
    if env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("belullama")
    {
        let file_appender = tracing_appender::rolling::never(cli::log_dir(), "debug.log");
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        log_guard = Some(guard);
        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }

    let res = start().await;
    drop(log_guard);
    if let Err(err) = res {
        handle_error(err);
    }

    process::exit(0);
}
