use crate::engine::config::EngineConfig;
use crate::engine::limits::CancelToken;
use crate::engine::search::AlphaBetaEngine;
use crate::engine::{SearchError, SearchStats};
use crate::logic::board::Cell;
use crate::logic::game::{Action, GameState};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// An action together with the search depth that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Published {
    pub action: Action,
    pub depth: u8,
}

/// Single-value mailbox between the search thread and its owner.
///
/// The value is packed into one atomic word (`present | depth | y | x`), so
/// a publish is one store and a read never sees half of an update.
#[derive(Debug, Default)]
pub struct ActionSlot {
    packed: AtomicU32,
}

impl ActionSlot {
    const PRESENT: u32 = 1 << 24;

    pub const fn new() -> Self {
        Self {
            packed: AtomicU32::new(0),
        }
    }

    pub fn publish(&self, action: Action, depth: u8) {
        let word = Self::PRESENT
            | u32::from(depth) << 16
            | u32::from(action.y) << 8
            | u32::from(action.x);
        self.packed.store(word, Ordering::Release);
    }

    pub fn latest(&self) -> Option<Published> {
        let word = self.packed.load(Ordering::Acquire);
        if word & Self::PRESENT == 0 {
            return None;
        }
        let [x, y, depth, _] = word.to_le_bytes();
        Some(Published {
            action: Cell::new(x, y),
            depth,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub depth: u8,
    pub stats: SearchStats,
    /// Chosen at random during the opening rather than searched.
    pub random: bool,
}

/// A running (or already answered) decision.
pub struct SearchHandle {
    slot: Arc<ActionSlot>,
    token: CancelToken,
    worker: Option<JoinHandle<Result<SearchStats, SearchError>>>,
}

impl SearchHandle {
    /// Best action published so far.
    pub fn latest(&self) -> Option<Published> {
        self.slot.latest()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Waits for the search to end on its own.
    pub fn join(self) -> Result<Decision, SearchError> {
        let published = self.latest();
        self.finish(published)
    }

    /// Polls until `deadline` or until the search ends, takes the slot's
    /// value at that moment, then stops the worker and collects its stats.
    pub fn wait(self, deadline: Instant) -> Result<Decision, SearchError> {
        while !self.is_finished() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            std::thread::sleep((deadline - now).min(Duration::from_millis(1)));
        }
        let published = self.latest();
        self.cancel();
        self.finish(published)
    }

    fn finish(mut self, published: Option<Published>) -> Result<Decision, SearchError> {
        let (stats, random) = match self.worker.take() {
            Some(worker) => (worker.join().map_err(|_| SearchError::WorkerPanicked)??, false),
            None => (SearchStats::default(), true),
        };
        // A worker that ran to completion may have published after the read.
        let Published { action, depth } = published
            .or_else(|| self.latest())
            .ok_or(SearchError::NoLegalActions)?;
        Ok(Decision {
            action,
            depth,
            stats,
            random,
        })
    }
}

/// Chooses actions for whoever is to move.
pub struct Agent {
    config: Arc<EngineConfig>,
    rng: StdRng,
}

impl Agent {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(config: Arc<EngineConfig>, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Starts deciding for the player to move in `state`.
    ///
    /// During the opening plies a random legal action is published at once.
    /// Otherwise iterative deepening runs on its own thread until it finishes
    /// or `token` fires, publishing after every completed depth.
    pub fn start(
        &mut self,
        state: &GameState,
        token: CancelToken,
    ) -> Result<SearchHandle, SearchError> {
        let actions = state.actions();
        if actions.is_empty() {
            return Err(SearchError::NoLegalActions);
        }

        let slot = Arc::new(ActionSlot::new());

        if state.ply() < self.config.opening_plies {
            let &action = actions
                .choose(&mut self.rng)
                .ok_or(SearchError::NoLegalActions)?;
            slot.publish(action, 0);
            return Ok(SearchHandle {
                slot,
                token,
                worker: None,
            });
        }

        let engine = AlphaBetaEngine::new(Arc::clone(&self.config));
        let max_depth = self.config.max_depth;
        let state = *state;
        let worker_slot = Arc::clone(&slot);
        let worker_token = token.clone();

        let worker = std::thread::Builder::new()
            .name("isolation-search".into())
            .spawn(move || {
                engine
                    .iterative_deepening(&state, max_depth, Some(&worker_token), |action, stats| {
                        worker_slot.publish(action, stats.depth);
                    })
                    .map(|(_, stats)| stats)
            })
            .map_err(|_| SearchError::WorkerUnavailable)?;

        Ok(SearchHandle {
            slot,
            token,
            worker: Some(worker),
        })
    }

    /// Best action within `budget`.
    pub fn decide(
        &mut self,
        state: &GameState,
        budget: Duration,
    ) -> Result<Decision, SearchError> {
        let deadline = Instant::now() + budget;
        let handle = self.start(state, CancelToken::with_deadline(deadline))?;
        let decision = handle.wait(deadline)?;

        log::info!(
            "{} plays {} (depth {}, {} nodes, {} ms{})",
            state.player(),
            decision.action,
            decision.depth,
            decision.stats.nodes,
            decision.stats.time_ms,
            if decision.random { ", opening" } else { "" }
        );
        Ok(decision)
    }
}
