#![forbid(unsafe_code)]

pub mod error;
pub mod generator;
pub mod model;
pub mod shortcuts;
pub mod time;

pub use error::Error;
pub use generator::{GeneratorError, SampleGenerator};
pub use time::Clock;
