//! Flappy Bird for the terminal.
//!
//! The simulation in [`sim`] is pure and deterministic given a seeded RNG;
//! [`render`], [`audio`] and [`highscore`] turn its events and state into
//! pixels, sound and a saved best score.

pub mod audio;
pub mod config;
pub mod highscore;
pub mod render;
pub mod sim;
