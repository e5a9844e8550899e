//! Core building blocks: deterministic RNG and run configuration.
//!
//! Nothing in this module knows about boards or networks; the rest of the
//! crate is parameterized over these types.

pub mod config;
pub mod rng;

pub use config::TrainerConfig;
pub use rng::GameRng;
