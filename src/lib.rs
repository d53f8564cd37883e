//! # Chain Reaction
//!
//! A turn-based multiplayer Chain Reaction engine. Players place orbs on a
//! grid; a cell that reaches its critical mass explodes into its neighbours,
//! capturing them and possibly setting off further explosions.
//!
//! ## Modules
//!
//! - [`game`]: Core engine covering the board, move validation, chain reactions and turns
//! - [`ai`]: Agent trait and a random agent for automatic moves
//! - [`ui`]: Hot-seat terminal game view with explosion replay
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod ui;
