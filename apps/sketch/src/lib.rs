#![no_std]

pub mod board;
pub mod console;
pub mod display;
pub mod error;

pub use error::SketchError;
