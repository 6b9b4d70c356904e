//! Game state transitions: new game, move, undo.
//!
//! A [`GameState`] is a plain value. Every operation consumes the state it is
//! given and hands back the next one; nothing here performs I/O. The best
//! score is passed in at construction, and a move that raises it reports the
//! new value in [`MoveOutcome::new_best`] so the caller can persist it.
//!
//! ```
//! use game_2048::engine::Move;
//! use game_2048::game::GameState;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let state = GameState::new_game(0, &mut rng);
//! assert_eq!(state.board().count_empty(), 14);
//!
//! let outcome = state.make_move(Move::Left, &mut rng);
//! let state = if outcome.changed { outcome.state.undo() } else { outcome.state };
//! assert_eq!(state.score(), 0);
//! ```

use std::collections::VecDeque;

use rand::Rng;

use crate::engine::{Board, Move, TileId, WIN_VALUE};

/// Number of prior positions kept for undo.
pub const HISTORY_LIMIT: usize = 10;

/// A prior position: board (without transient markers) and score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameState {
    board: Board,
    score: u64,
    best_score: u64,
    won: bool,
    over: bool,
    history: VecDeque<Snapshot>,
    next_tile_id: u64,
}

/// Result of [`GameState::make_move`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub state: GameState,
    /// False when the move had no effect; `state` is then the input state, untouched.
    pub changed: bool,
    /// Sum of the tiles produced by merges in this move.
    pub score_gained: u64,
    /// Set when this move raised the best score.
    pub new_best: Option<u64>,
}

impl MoveOutcome {
    fn unchanged(state: GameState) -> Self {
        MoveOutcome { state, changed: false, score_gained: 0, new_best: None }
    }
}

impl GameState {
    /// An empty board with two random tiles on distinct cells, zero score.
    pub fn new_game<R: Rng + ?Sized>(best_score: u64, rng: &mut R) -> Self {
        let board = Board::EMPTY
            .with_random_tile(rng, TileId(0))
            .with_random_tile(rng, TileId(1));
        GameState {
            board,
            score: 0,
            best_score,
            won: false,
            over: false,
            history: VecDeque::with_capacity(HISTORY_LIMIT),
            next_tile_id: 2,
        }
    }

    /// Convenience: like `new_game` but uses thread-local RNG.
    pub fn new_game_thread(best_score: u64) -> Self {
        let mut rng = rand::thread_rng();
        Self::new_game(best_score, &mut rng)
    }

    /// Resume from an arbitrary position with an empty history.
    ///
    /// `won` and `over` are derived from the board.
    pub fn from_board(board: Board, score: u64, best_score: u64) -> Self {
        let next_tile_id = board.max_tile_id().map_or(0, |TileId(id)| id + 1);
        GameState {
            won: board.contains_value(WIN_VALUE),
            over: board.is_game_over(),
            board,
            score,
            best_score: best_score.max(score),
            history: VecDeque::with_capacity(HISTORY_LIMIT),
            next_tile_id,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board { &self.board }

    #[inline]
    pub fn score(&self) -> u64 { self.score }

    #[inline]
    pub fn best_score(&self) -> u64 { self.best_score }

    /// Sticky: once a 2048 tile has appeared, stays true for the rest of the game.
    #[inline]
    pub fn won(&self) -> bool { self.won }

    /// No move in any direction would change the board.
    #[inline]
    pub fn over(&self) -> bool { self.over }

    /// Prior positions, oldest first.
    pub fn history(&self) -> impl ExactSizeIterator<Item = &Snapshot> + '_ {
        self.history.iter()
    }

    #[inline]
    pub fn history_len(&self) -> usize { self.history.len() }

    #[inline]
    pub fn can_undo(&self) -> bool { !self.history.is_empty() }

    pub fn highest_tile(&self) -> u32 { self.board.highest_tile() }

    /// Slide in `direction`, spawn a tile and update score, flags and history.
    ///
    /// If the slide leaves the value layout unchanged the move is rejected and
    /// the state comes back as it was: no spawn, no history entry.
    pub fn make_move<R: Rng + ?Sized>(self, direction: Move, rng: &mut R) -> MoveOutcome {
        let (shifted, score_gained) = self.board.shift(direction);
        if shifted.same_layout(&self.board) {
            return MoveOutcome::unchanged(self);
        }

        let GameState { board, score, best_score, won, mut history, next_tile_id, .. } = self;
        let board_after = shifted.with_random_tile(rng, TileId(next_tile_id));
        let score_after = score + score_gained;
        let best_after = best_score.max(score_after);

        history.push_back(Snapshot { board: board.settled(), score });
        while history.len() > HISTORY_LIMIT {
            history.pop_front();
        }

        let state = GameState {
            won: won || board_after.contains_value(WIN_VALUE),
            over: board_after.is_game_over(),
            board: board_after,
            score: score_after,
            best_score: best_after,
            history,
            next_tile_id: next_tile_id + 1,
        };
        MoveOutcome {
            state,
            changed: true,
            score_gained,
            new_best: (best_after > best_score).then_some(best_after),
        }
    }

    /// Convenience: like `make_move` but uses thread-local RNG.
    pub fn make_move_thread(self, direction: Move) -> MoveOutcome {
        let mut rng = rand::thread_rng();
        self.make_move(direction, &mut rng)
    }

    /// Restore the most recent snapshot. No-op on an empty history.
    ///
    /// `over` is recomputed from the restored board; `won` stays sticky and the
    /// best score is kept.
    pub fn undo(self) -> GameState {
        let GameState { board, score, best_score, won, over, mut history, next_tile_id } = self;
        match history.pop_back() {
            Some(Snapshot { board: restored, score: restored_score }) => GameState {
                over: restored.is_game_over(),
                board: restored,
                score: restored_score,
                best_score,
                won,
                history,
                next_tile_id,
            },
            None => GameState { board, score, best_score, won, over, history, next_tile_id },
        }
    }
}

/// Free-function form of [`GameState::new_game`].
///
/// ```
/// use game_2048::engine::Move;
/// use game_2048::game;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(5);
/// let mut state = game::new_game(0, &mut rng);
/// let start = state.board().values();
/// let mut moved = false;
/// for dir in Move::ALL {
///     let outcome = game::make_move(state, dir, &mut rng);
///     state = outcome.state;
///     if outcome.changed {
///         moved = true;
///         break;
///     }
/// }
/// assert!(moved);
/// let back = game::undo(state);
/// assert_eq!(back.board().values(), start);
/// ```
pub fn new_game<R: Rng + ?Sized>(best_score: u64, rng: &mut R) -> GameState {
    GameState::new_game(best_score, rng)
}

/// Free-function form of [`GameState::make_move`].
pub fn make_move<R: Rng + ?Sized>(state: GameState, direction: Move, rng: &mut R) -> MoveOutcome {
    state.make_move(direction, rng)
}

/// Free-function form of [`GameState::undo`].
pub fn undo(state: GameState) -> GameState {
    state.undo()
}
