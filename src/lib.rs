// birdquiz - lib.rs
// Spaced-repetition bird identification quiz.

pub mod catalog;
pub mod config;
pub mod debug;
pub mod error;
pub mod media;
pub mod options;
pub mod scenes;
pub mod scheduler;
pub mod selector;
pub mod session;
pub mod storage;
