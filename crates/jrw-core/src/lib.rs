pub mod build;
pub mod config;
pub mod error;
pub mod io;
pub mod paths;
pub mod pipeline;
pub mod plan;
pub mod runner;
pub mod suite;

pub use error::{JrwError, Result};
