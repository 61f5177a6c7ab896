//! # Onitama RL
//!
//! An Onitama rules engine with a self-play actor-critic (PPO) training loop
//! built on the Burn ML framework.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: cards, board, players, match state machine
//! - [`ai`] — Agent traits, PPO learner, afterstate selector, networks, state encoding
//! - [`training`] — Experience buffer, GAE, self-play episodes, metrics, trainer
//! - [`checkpoint`] — Model persistence and versioning
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

#![recursion_limit = "256"]

pub mod ai;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod game;
pub mod training;
