mod cli;
mod script;

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use roster_core::app::{SharedRegistry, Ticker};
use roster_core::ports::{ManualClock, SystemClock};
use roster_core::{ProfileFields, Registry, RosterConfig, UserId};
use tokio::sync::Mutex;
use tracing::info;

use crate::cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = match &args.config {
        Some(path) => RosterConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => RosterConfig::default(),
    };

    match args.command {
        Command::Replay { script, start } => replay(config, script, start),
        Command::Demo { interval_ms } => demo(config, Duration::from_millis(interval_ms)).await,
    }
}

fn replay(config: RosterConfig, path: Option<std::path::PathBuf>, start: Option<String>) -> Result<()> {
    let input = match &path {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read script {}", p.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read script from stdin")?;
            buf
        }
    };
    let start = match start {
        Some(s) => DateTime::parse_from_rfc3339(&s)
            .with_context(|| format!("invalid --start: {s}"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    // スクリプトの advance だけが時刻を進める
    let clock = ManualClock::new(start);
    let mut registry = Registry::builder()
        .config(config)
        .clock(clock.clone())
        .build()
        .context("invalid configuration")?;

    for (line, cmd) in script::parse(&input)? {
        let outcome = script::execute(&mut registry, &clock, line, cmd)?;
        println!("{}", serde_json::to_string(&outcome)?);
    }
    Ok(())
}

async fn demo(config: RosterConfig, interval: Duration) -> Result<()> {
    let registry = Registry::builder()
        .config(config)
        .clock(SystemClock)
        .build()
        .context("invalid configuration")?;
    let wait = registry
        .delay()
        .to_std()
        .context("delay does not fit a std duration")?;
    let registry: SharedRegistry = Arc::new(Mutex::new(registry));

    let users = [UserId::new("john"), UserId::new("jane")];
    {
        let mut reg = registry.lock().await;
        for user in &users {
            let fields = ProfileFields {
                nickname: user.to_string(),
                locale: "en_US".to_string(),
                metadata: "{}".to_string(),
                ..Default::default()
            };
            reg.update(user, user, fields)?;
            reg.schedule(user, user)?;
        }
    }

    let ticker = Ticker::spawn(Arc::clone(&registry), UserId::new("keeper"), interval);
    info!(wait_ms = wait.as_millis() as u64, "waiting for tasks to come due");
    // delay 経過後、さらに 2 interval 待ってから止める
    tokio::time::sleep(wait + interval * 2).await;
    let stats = ticker.shutdown_and_join().await;

    let reg = registry.lock().await;
    for user in &users {
        println!("{}", serde_json::to_string(&reg.profile(user))?);
    }
    println!("{}", serde_json::to_string(&stats)?);
    Ok(())
}
