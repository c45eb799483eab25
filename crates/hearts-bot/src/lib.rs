#![deny(warnings)]
pub mod annotator;
pub mod strategy;

pub use annotator::{Annotator, DecisionRecord};
pub use strategy::{MonteCarlo, RandomStrategy, RolloutConfig, Strategy, play_game, play_out};
