use std::path::PathBuf;

use anyhow::Result;
use directories::ProjectDirs;
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader};

use focusfox::display::{ConsoleSink, DisplaySink};
use focusfox::utils::format::format_clock;
use focusfox::{Database, SessionTracker, StatsStore};

fn data_dir() -> PathBuf {
    ProjectDirs::from("", "", "focusfox")
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("focusfox starting up...");

    let database = Database::new(data_dir().join("focusfox.sqlite3"))?;
    let stats = StatsStore::load(database.clone()).await?;

    let sinks: Vec<Box<dyn DisplaySink>> = vec![Box::new(ConsoleSink::new())];
    let tracker = SessionTracker::new(stats.clone(), sinks);

    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        let (command, rest) = match input.split_once(char::is_whitespace) {
            Some((head, tail)) => (head, tail.trim()),
            None => (input, ""),
        };

        match command {
            "" => {}
            "start" => {
                let label = (!rest.is_empty()).then(|| rest.to_string());
                if let Err(err) = tracker.start(label).await {
                    println!("{err}");
                }
            }
            "pause" => tracker.pause().await,
            "stop" => {
                if let Err(err) = tracker.stop().await {
                    println!("{err}");
                }
            }
            "leaderboard" | "board" => render_leaderboard(&stats).await,
            "stats" => render_overview(&stats).await,
            "help" => print_help(),
            "quit" | "exit" => break,
            other => println!("unknown command: {other} (try 'help')"),
        }
    }

    tracker.dispose().await;
    Ok(())
}

async fn render_leaderboard(stats: &StatsStore) {
    let entries = stats.leaderboard().await;
    if entries.is_empty() {
        println!("no sessions recorded yet");
        return;
    }
    println!("{:<14} {:>5} {:>9} {:>9}", "day", "score", "focus", "slacked");
    for entry in entries {
        println!(
            "{:<14} {:>5} {:>9} {:>9}",
            entry.date, entry.score, entry.focus, entry.procrastination
        );
    }
}

async fn render_overview(stats: &StatsStore) {
    let overview = stats.overview().await;
    println!(
        "lifetime focus {} | procrastination {} ({}% focused)",
        format_clock(overview.cumulative_focus),
        format_clock(overview.cumulative_procrastination),
        overview.percent_focused,
    );
    if overview.streak > 0 {
        println!("🔥 {} day streak", overview.streak);
    }
}

fn print_help() {
    println!("commands: start [name] | pause | stop | leaderboard | stats | help | quit");
}
