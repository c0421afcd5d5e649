//! GOGO Slot terminal front-end
//!
//! Usage:
//!   gogo-slot                     - play with the default save file
//!   gogo-slot --memory            - play without saving
//!   gogo-slot --store save.json   - play with a specific save file
//!   gogo-slot --config slot.yaml  - load machine configuration
//!
//! Timers follow the wall clock: the time spent typing a command is fed to
//! the session before the command runs.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use parking_lot::Mutex;

use gg_slot::{
    Command, CommandOutcome, GameSession, GameUi, RandomSource, RngSource, SessionSnapshot,
    SlotConfig,
};
use gg_state::{FileStore, KeyValueStore, MemoryStore};

#[derive(Parser)]
#[command(name = "gogo-slot", about = "GOGO slot machine")]
struct Cli {
    /// Save file (defaults to the user data directory)
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Keep state in memory only
    #[arg(long, conflicts_with = "store")]
    memory: bool,

    /// Machine configuration (.json, .yaml, .yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed the outcome RNG
    #[arg(long)]
    seed: Option<u64>,
}

/// Prints snapshots and asks confirmations on the terminal
#[derive(Clone, Default)]
struct TerminalUi {
    latest: Arc<Mutex<Option<SessionSnapshot>>>,
}

impl TerminalUi {
    fn print_status(&self) {
        if let Some(snapshot) = self.latest.lock().as_ref() {
            print_snapshot(snapshot);
        }
    }

    fn print_prizes(&self) {
        let latest = self.latest.lock();
        let Some(snapshot) = latest.as_ref() else {
            return;
        };
        if snapshot.purchasable.is_empty() {
            println!("  All prizes exchanged!");
        }
        for prize in &snapshot.purchasable {
            let mark = if prize.affordable { "*" } else { " " };
            println!("  {} [{}] {} ({} coins)", mark, prize.id, prize.name, prize.cost);
        }
        if !snapshot.collected.is_empty() {
            println!("  Collection: {}", snapshot.collected.join(", "));
        }
    }
}

impl GameUi for TerminalUi {
    fn render(&mut self, snapshot: &SessionSnapshot) {
        *self.latest.lock() = Some(snapshot.clone());
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        let _ = io::stdout().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes")
    }
}

fn print_snapshot(snapshot: &SessionSnapshot) {
    let reels: Vec<String> = snapshot
        .reels
        .iter()
        .map(|r| {
            let symbol = r.displayed.map(|s| s.label()).unwrap_or("-");
            if r.spinning {
                format!("({})", symbol)
            } else {
                format!("[{}]", symbol)
            }
        })
        .collect();
    let lamp = if snapshot.lamp_active { " GOGO!" } else { "" };
    println!("  {}{}", reels.join(" "), lamp);
    println!("  coins: {}  | {}", snapshot.coins, snapshot.message);
    if snapshot.purchase.open {
        println!(
            "  [buy {} coins] {}",
            snapshot.purchase.amount,
            snapshot.purchase.message.as_deref().unwrap_or("enter serial key")
        );
    }
}

fn print_help() {
    println!("  insert | lever | stop N | wait MS | status | prizes");
    println!("  exchange ID | buy AMOUNT | key AMOUNT KEY | close | quit");
}

/// Whole milliseconds, saturating at `u64::MAX`
fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

fn parse_command(line: &str) -> Result<Option<Command>> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let command = match parts.as_slice() {
        ["insert"] => Command::Insert,
        ["lever"] => Command::PullLever,
        ["stop", n] => Command::Stop(n.parse().context("reel index")?),
        ["wait", ms] => Command::Advance(ms.parse().context("milliseconds")?),
        ["exchange", id] => Command::Exchange(id.parse().context("prize id")?),
        ["buy", amount] => Command::OpenPurchase(amount.parse().context("amount")?),
        ["key", amount, key] => Command::ConfirmPurchase {
            amount: amount.parse().context("amount")?,
            key: key.to_string(),
        },
        ["close"] => Command::ClosePurchase,
        _ => return Ok(None),
    };
    Ok(Some(command))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SlotConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SlotConfig::default(),
    };

    let store: Box<dyn KeyValueStore> = if cli.memory {
        Box::new(MemoryStore::new())
    } else {
        let store = match &cli.store {
            Some(path) => FileStore::open(path),
            None => FileStore::open_default(),
        };
        log::info!("Using save file {}", store.path().display());
        Box::new(store)
    };

    let source: Box<dyn RandomSource> = match cli.seed {
        Some(seed) => Box::new(RngSource::seeded(seed)),
        None => Box::new(RngSource::from_os_rng()),
    };

    let ui = TerminalUi::default();
    let mut session = GameSession::with_source(config, store, Box::new(ui.clone()), source);

    println!("GOGO SLOT - type 'help' for commands");
    ui.print_status();

    let stdin = io::stdin();
    let mut last_tick = Instant::now();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let elapsed = elapsed_ms(last_tick.elapsed());
        last_tick = Instant::now();
        session.advance(elapsed);

        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "help" => print_help(),
            "status" => ui.print_status(),
            "prizes" => ui.print_prizes(),
            input => match parse_command(input) {
                Ok(Some(command)) => {
                    match session.dispatch(command) {
                        CommandOutcome::Stopped(stop) => {
                            println!("  reel {} -> {}", stop.reel, stop.symbol);
                        }
                        CommandOutcome::ExchangeFailed(e) => println!("  {}", e),
                        CommandOutcome::PurchaseFailed(e) => println!("  {}", e),
                        _ => {}
                    }
                    ui.print_status();
                }
                Ok(None) => println!("  unknown command, try 'help'"),
                Err(e) => println!("  {:#}", e),
            },
        }
    }

    let stats = session.stats();
    log::info!(
        "Session over: {} plays, RTP {:.1}%, hit rate {:.1}%",
        stats.plays,
        stats.rtp(),
        stats.hit_rate()
    );
    println!("Bye! {} coins saved.", session.coins());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_ms_saturates() {
        assert_eq!(elapsed_ms(Duration::from_millis(1500)), 1500);
        assert_eq!(elapsed_ms(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_parse_command() {
        assert!(matches!(parse_command("stop 2"), Ok(Some(Command::Stop(2)))));
        assert!(matches!(
            parse_command("key 10 30"),
            Ok(Some(Command::ConfirmPurchase { amount: 10, .. }))
        ));
        assert!(matches!(parse_command("dance"), Ok(None)));
        assert!(parse_command("stop x").is_err());
    }
}
