use clap::{Parser, ValueEnum};
use isolation_core::agent::{Agent, Decision};
use isolation_core::engine::config::{ConfigError, EngineConfig, SearchAlgorithm};
use isolation_core::engine::eval::Heuristic;
use isolation_core::engine::SearchError;
use isolation_core::logic::board::Board;
use isolation_core::logic::game::{GameState, Player};
use isolation_core::logic::rules::MoveError;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BoardKind {
    /// 3x2 with one corner blocked
    Toy,
    /// 11x9, all open
    Standard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlgorithmArg {
    Minimax,
    AlphaBeta,
}

impl From<AlgorithmArg> for SearchAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Minimax => Self::Minimax,
            AlgorithmArg::AlphaBeta => Self::AlphaBeta,
        }
    }
}

/// Plays isolation matches between two search agents.
#[derive(Debug, Parser)]
#[command(name = "isolation", version)]
pub struct Args {
    #[arg(long, value_enum, default_value_t = BoardKind::Standard)]
    pub board: BoardKind,

    /// Number of games; seats swap every game
    #[arg(long, default_value_t = 10)]
    pub games: u32,

    /// Per-move time budget in milliseconds (overrides the config file)
    #[arg(long)]
    pub time_ms: Option<u64>,

    /// Heuristic of the agent seated first in game one (default: the config's)
    #[arg(long)]
    pub first: Option<Heuristic>,

    /// Heuristic of the other agent (default: the config's)
    #[arg(long)]
    pub second: Option<Heuristic>,

    #[arg(long, value_enum)]
    pub algorithm: Option<AlgorithmArg>,

    /// Seed for the opening moves; random when absent
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON engine config shared by both agents
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error("failed to encode summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// Running totals for one agent across the match.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AgentRecord {
    pub heuristic: String,
    pub wins: u32,
    pub moves: u64,
    pub searched_moves: u64,
    pub depth_sum: u64,
    pub max_depth: u8,
    pub nodes: u64,
    pub time_ms: u64,
}

impl AgentRecord {
    fn new(heuristic: Heuristic) -> Self {
        Self {
            heuristic: heuristic.to_string(),
            ..Self::default()
        }
    }

    fn record(&mut self, decision: &Decision) {
        self.moves += 1;
        if decision.random {
            return;
        }
        self.searched_moves += 1;
        self.depth_sum += u64::from(decision.depth);
        self.max_depth = self.max_depth.max(decision.depth);
        self.nodes += decision.stats.nodes;
        self.time_ms += decision.stats.time_ms;
    }

    #[allow(clippy::cast_precision_loss)]
    fn mean_depth(&self) -> f64 {
        if self.searched_moves == 0 {
            0.0
        } else {
            self.depth_sum as f64 / self.searched_moves as f64
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub games: u32,
    pub time_ms: u64,
    pub agents: [AgentRecord; 2],
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} games, {} ms per move", self.games, self.time_ms)?;
        writeln!(
            f,
            "{:<28} {:>5} {:>7} {:>10} {:>9} {:>12}",
            "heuristic", "wins", "moves", "mean depth", "max depth", "nodes"
        )?;
        for agent in &self.agents {
            writeln!(
                f,
                "{:<28} {:>5} {:>7} {:>10.2} {:>9} {:>12}",
                agent.heuristic,
                agent.wins,
                agent.moves,
                agent.mean_depth(),
                agent.max_depth,
                agent.nodes
            )?;
        }
        Ok(())
    }
}

fn base_config(args: &Args) -> Result<EngineConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load_from_path(path)?,
        None => EngineConfig::default(),
    };
    if let Some(ms) = args.time_ms {
        config.time_limit_ms = ms;
    }
    if let Some(algorithm) = args.algorithm {
        config.algorithm = algorithm.into();
    }
    Ok(config)
}

/// Per-agent heuristics; a missing flag keeps the shared config's choice,
/// thresholds included.
fn heuristics(args: &Args, config: &EngineConfig) -> (Heuristic, Heuristic) {
    (
        args.first.unwrap_or(config.heuristic),
        args.second.unwrap_or(config.heuristic),
    )
}

fn make_agent(config: &EngineConfig, heuristic: Heuristic, seed: Option<u64>) -> Agent {
    let config = Arc::new(config.clone().with_heuristic(heuristic));
    match seed {
        Some(seed) => Agent::with_seed(config, seed),
        None => Agent::new(config),
    }
}

/// Plays one game. `agents[0]` moves first. Returns the index of the winner.
fn play_game(
    board: Board,
    agents: &mut [Agent; 2],
    records: &mut [&mut AgentRecord; 2],
    budget: Duration,
) -> Result<usize, AppError> {
    let mut state = GameState::new(board);
    while !state.terminal_test() {
        let seat = state.player().index();
        let (agent, record) = match seat {
            0 => (&mut agents[0], &mut *records[0]),
            _ => (&mut agents[1], &mut *records[1]),
        };
        let decision = agent.decide(&state, budget)?;
        record.record(&decision);
        state = state.result(decision.action)?;
    }
    tracing::debug!("final position:\n{state}");

    Ok(match state.winner() {
        Some(Player::Second) => 1,
        _ => 0,
    })
}

pub fn run(args: &Args) -> Result<String, AppError> {
    let config = base_config(args)?;
    let board = match args.board {
        BoardKind::Toy => Board::toy(),
        BoardKind::Standard => Board::standard(),
    };
    let budget = Duration::from_millis(config.time_limit_ms);
    let (first_heuristic, second_heuristic) = heuristics(args, &config);

    let mut first = AgentRecord::new(first_heuristic);
    let mut second = AgentRecord::new(second_heuristic);

    for game in 0..args.games {
        let swapped = game % 2 == 1;
        let seed = |seat: u64| args.seed.map(|s| s ^ ((u64::from(game) << 1) | seat));
        let (lead, follow) = if swapped {
            (second_heuristic, first_heuristic)
        } else {
            (first_heuristic, second_heuristic)
        };
        let mut agents = [
            make_agent(&config, lead, seed(0)),
            make_agent(&config, follow, seed(1)),
        ];

        let winner_seat = if swapped {
            play_game(board, &mut agents, &mut [&mut second, &mut first], budget)?
        } else {
            play_game(board, &mut agents, &mut [&mut first, &mut second], budget)?
        };

        let winner = if (winner_seat == 0) != swapped {
            &mut first
        } else {
            &mut second
        };
        winner.wins += 1;
        tracing::info!("game {}: {} wins", game + 1, winner.heuristic);
    }

    let summary = Summary {
        games: args.games,
        time_ms: config.time_limit_ms,
        agents: [first, second],
    };

    if args.json {
        Ok(serde_json::to_string_pretty(&summary)?)
    } else {
        Ok(summary.to_string())
    }
}
