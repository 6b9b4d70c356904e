use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use game_2048::config::Config;
use game_2048::game::GameState;
use game_2048::input::Command;
use game_2048::session::Session;
use game_2048::store::{BestScoreStore, JsonFileStore, MemoryStore};
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "game-2048", version, about = "Play 2048 in the terminal")]
struct Args {
    /// Optional TOML config file; flags below override its values.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,
    /// File holding the best score.
    #[arg(long, value_name = "FILE")]
    best_score_file: Option<PathBuf>,
    /// Do not read or write the best-score file.
    #[arg(long)]
    no_persist: bool,
    /// Seed the RNG for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,
    /// Optional tracing filter, e.g. "info", "debug".
    #[arg(long)]
    log: Option<String>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => Config::from_toml(path)?,
            None => Config::default(),
        };
        if let Some(path) = self.best_score_file {
            cfg.best_score_file = path;
        }
        if self.no_persist {
            cfg.no_persist = true;
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        if let Some(log) = self.log {
            cfg.log = log;
        }
        Ok(cfg)
    }
}

fn main() -> anyhow::Result<()> {
    let cfg = Args::parse().into_config()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(cfg.log.clone()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let store: Box<dyn BestScoreStore> = if cfg.no_persist {
        Box::new(MemoryStore::new())
    } else {
        info!(path = %cfg.best_score_file.display(), "best score file");
        Box::new(JsonFileStore::new(&cfg.best_score_file))
    };
    let rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = Session::new(store, rng);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        write!(stdout, "{}", render(session.state()))?;
        stdout.flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        if line.trim().eq_ignore_ascii_case("q") {
            break;
        }
        match Command::from_key(&line) {
            Some(command) => {
                session.apply(command);
            }
            None => writeln!(stdout, "unrecognized input: {:?}", line.trim())?,
        }
    }
    let state = session.into_state();
    writeln!(stdout, "Final score: {} | best: {} | highest tile: {}", state.score(), state.best_score(), state.highest_tile())?;
    Ok(())
}

fn render(state: &GameState) -> String {
    let mut out = format!("\n{}\nScore: {} | Best: {}\n", state.board(), state.score(), state.best_score());
    if state.won() {
        out.push_str("You reached 2048!\n");
    }
    if state.over() {
        out.push_str("Game over. [n]ew game, [u]ndo or [q]uit\n");
    } else if state.can_undo() {
        out.push_str(&format!("Move with wasd/hjkl/arrows + Enter, [u]ndo ({} left), [n]ew, [q]uit\n> ", state.history_len()));
    } else {
        out.push_str("Move with wasd/hjkl/arrows + Enter, [n]ew, [q]uit\n> ");
    }
    out
}
