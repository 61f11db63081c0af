//! ai-2048-agents: the agent layer for a 2048-style tile game
//!
//! This crate provides:
//! - A compact `Board` type with slide simulation and merge rewards (`engine` module)
//! - `Action` and `GameState`, the values agents exchange with a driver
//! - Interchangeable agents behind one `Agent` trait (`agent` module): a tile-placing
//!   environment and a greedy player, each with its own reproducible random stream
//!
//! A driver alternates the environment and the player, applying each returned
//! action to a shared `GameState`. A legal slide records itself as the state's
//! last move, which tells the environment where the next tile may appear.
//!
//! Full loop (simplest possible)
//! ```
//! use ai_2048_agents::agent::{Agent, Player, RndEnv};
//! use ai_2048_agents::state::GameState;
//!
//! // 1) Seeded agents replay the same episode every run
//! let mut env = RndEnv::new("seed=123").unwrap();
//! let mut player = Player::new("seed=456").unwrap();
//! let mut state = GameState::new();
//! env.open_episode("");
//! player.open_episode("");
//!
//! // 2) Two opening tiles, then alternate until someone cannot act
//! env.take_action(&state).apply(&mut state);
//! env.take_action(&state).apply(&mut state);
//! let mut moves = 0u32;
//! while moves < 8 {
//!     let slide = player.take_action(&state);
//!     if slide.apply(&mut state) == -1 { break; }
//!     moves += 1;
//!     if env.take_action(&state).apply(&mut state) == -1 { break; }
//! }
//! env.close_episode("");
//! player.close_episode("");
//! assert!(moves > 0);
//! ```
//!
pub mod action;
pub mod agent;
pub mod engine;
pub mod error;
pub mod state;

pub use action::Action;
pub use agent::{Agent, Player, RndEnv};
pub use engine::{Board, Move};
pub use error::AgentError;
pub use state::GameState;
