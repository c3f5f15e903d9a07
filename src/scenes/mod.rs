// src/scenes/mod.rs
// Terminal screens of the trainer.

pub mod quiz;
