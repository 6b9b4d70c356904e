//! game-2048: the rules engine of the 4x4 sliding-tile merge puzzle
//!
//! This crate provides:
//! - A `Board` of identity-carrying tiles with rotation-based sliding/merging (`engine` module)
//! - An immutable `GameState` with scoring, win/over detection and a bounded undo history (`game` module)
//! - Best-score persistence behind a small trait (`store` module)
//! - A `Session` that wires state, RNG and store together for a front end (`session` module)
//! - Key/swipe mapping to commands (`input` module) and TOML settings (`config` module)
//!
//! Quick start:
//! ```
//! use game_2048::engine::Move;
//! use game_2048::game::GameState;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic game with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut state = GameState::new_game(0, &mut rng);
//! for dir in [Move::Left, Move::Up, Move::Right, Move::Down] {
//!     let outcome = state.make_move(dir, &mut rng);
//!     if let Some(best) = outcome.new_best {
//!         // persist `best` here
//!         assert!(best > 0);
//!     }
//!     state = outcome.state;
//! }
//! assert!(state.history_len() <= 4);
//! ```
//!
//! Full loop with persistence
//! ```
//! use game_2048::engine::Move;
//! use game_2048::input::Command;
//! use game_2048::session::Session;
//! use game_2048::store::MemoryStore;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut session = Session::new(MemoryStore::new(), StdRng::seed_from_u64(123));
//! let mut turns = 0;
//! while !session.state().over() && turns < 200 {
//!     session.apply(Command::Move(Move::ALL[turns % 4]));
//!     turns += 1;
//! }
//! assert!(session.state().score() > 0);
//! ```
//!
pub mod config;
pub mod engine;
pub mod game;
pub mod input;
pub mod session;
pub mod store;
