pub mod game;
pub mod hearts;
pub mod knowable;
