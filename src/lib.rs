pub mod constructor;
pub mod error;
pub mod graph;
pub mod grid;
pub mod math;
pub mod session;

pub use error::{GridspanError, Result};
