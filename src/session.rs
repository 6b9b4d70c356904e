//! The caller side of the engine: owns the live [`GameState`], the RNG and the
//! best-score store, and serializes commands against them.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::engine::Move;
use crate::game::{GameState, MoveOutcome};
use crate::input::Command;
use crate::store::BestScoreStore;

pub struct Session<S, R> {
    state: GameState,
    store: S,
    rng: R,
}

impl<S: BestScoreStore, R: Rng> Session<S, R> {
    /// Start a fresh game, reading the best score from `store`.
    pub fn new(store: S, mut rng: R) -> Self {
        let best_score = read_best(&store);
        let state = GameState::new_game(best_score, &mut rng);
        info!(best_score, "new game");
        Session { state, store, rng }
    }

    /// Resume an existing state.
    pub fn with_state(state: GameState, store: S, rng: R) -> Self {
        Session { state, store, rng }
    }

    #[inline]
    pub fn state(&self) -> &GameState { &self.state }

    #[inline]
    pub fn store(&self) -> &S { &self.store }

    pub fn into_state(self) -> GameState { self.state }

    /// Apply one command. Returns whether the visible state changed.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Move(direction) => self.play(direction),
            Command::Undo => self.undo(),
            Command::NewGame => {
                self.new_game();
                true
            }
        }
    }

    /// Moves are ignored once the game is over.
    pub fn play(&mut self, direction: Move) -> bool {
        if self.state.over() {
            debug!(%direction, "move ignored, game over");
            return false;
        }
        let was_won = self.state.won();
        let MoveOutcome { state, changed, score_gained, new_best } =
            std::mem::take(&mut self.state).make_move(direction, &mut self.rng);
        self.state = state;
        if !changed {
            debug!(%direction, "move had no effect");
            return false;
        }
        debug!(%direction, score_gained, score = self.state.score(), "move applied");
        if let Some(best_score) = new_best {
            self.persist_best(best_score);
        }
        if self.state.won() && !was_won {
            info!(score = self.state.score(), "reached 2048");
        }
        if self.state.over() {
            info!(score = self.state.score(), highest_tile = self.state.highest_tile(), "game over");
        }
        true
    }

    pub fn undo(&mut self) -> bool {
        if !self.state.can_undo() {
            return false;
        }
        self.state = std::mem::take(&mut self.state).undo();
        debug!(score = self.state.score(), remaining = self.state.history_len(), "undo");
        true
    }

    /// Start over. The best score is the larger of the stored one and the one in memory.
    pub fn new_game(&mut self) {
        let best_score = read_best(&self.store).max(self.state.best_score());
        self.state = GameState::new_game(best_score, &mut self.rng);
        info!(best_score, "new game");
    }

    fn persist_best(&mut self, best_score: u64) {
        match self.store.save(best_score) {
            Ok(()) => debug!(best_score, "saved best score"),
            Err(e) => warn!(error = %e, best_score, "failed to save best score"),
        }
    }
}

fn read_best<S: BestScoreStore>(store: &S) -> u64 {
    store.load().unwrap_or_else(|e| {
        warn!(error = %e, "failed to read best score, starting from 0");
        0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Board;
    use crate::store::{MemoryStore, StoreError};
    use rand::{rngs::StdRng, SeedableRng};

    struct BrokenStore;

    impl BestScoreStore for BrokenStore {
        fn load(&self) -> Result<u64, StoreError> {
            Err(StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk gone")))
        }
        fn save(&mut self, _best_score: u64) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk gone")))
        }
    }

    fn resume(rows: [[u32; 4]; 4], score: u64, best: u64) -> GameState {
        GameState::from_board(Board::from_rows(rows).unwrap(), score, best)
    }

    #[test]
    fn new_session_reads_best_score() {
        let session = Session::new(MemoryStore::with_best_score(900), StdRng::seed_from_u64(1));
        assert_eq!(session.state().best_score(), 900);
        assert_eq!(session.state().score(), 0);
    }

    #[test]
    fn new_best_is_written_to_store() {
        let state = resume([[4, 4, 0, 0], [0; 4], [0; 4], [0; 4]], 10, 10);
        let mut session = Session::with_state(state, MemoryStore::with_best_score(10), StdRng::seed_from_u64(2));
        assert!(session.apply(Command::Move(Move::Left)));
        assert_eq!(session.state().score(), 18);
        assert_eq!(session.store().load().unwrap(), 18);
    }

    #[test]
    fn store_failures_do_not_abort_play() {
        let mut session = Session::new(BrokenStore, StdRng::seed_from_u64(3));
        assert_eq!(session.state().best_score(), 0);
        let state = resume([[4, 4, 0, 0], [0; 4], [0; 4], [0; 4]], 0, 0);
        session = Session::with_state(state, BrokenStore, StdRng::seed_from_u64(3));
        assert!(session.play(Move::Left));
        assert_eq!(session.state().best_score(), 8);
    }

    #[test]
    fn moves_ignored_when_over() {
        let stuck = resume([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]], 0, 0);
        assert!(stuck.over());
        let mut session = Session::with_state(stuck.clone(), MemoryStore::new(), StdRng::seed_from_u64(4));
        for direction in Move::ALL {
            assert!(!session.apply(Command::Move(direction)));
        }
        assert_eq!(session.state(), &stuck);
    }

    #[test]
    fn undo_and_new_game_commands() {
        let state = resume([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]], 0, 50);
        let mut session = Session::with_state(state, MemoryStore::with_best_score(50), StdRng::seed_from_u64(5));
        assert!(session.apply(Command::Move(Move::Left)));
        assert_eq!(session.state().score(), 4);
        assert!(session.apply(Command::Undo));
        assert!(!session.apply(Command::Undo));

        assert!(session.apply(Command::NewGame));
        assert_eq!(session.state().score(), 0);
        assert_eq!(session.state().best_score(), 50);
        assert_eq!(session.state().board().count_empty(), 14);
    }
}
