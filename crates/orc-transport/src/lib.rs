#![deny(missing_docs)]

//! Min-cost-flow backend for balanced transportation programs.

mod flow;

pub use flow::{SolverOptions, SuccessiveShortestPath};
