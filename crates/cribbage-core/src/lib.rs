#![deny(warnings)]
pub mod combinatorics;
pub mod eval;
pub mod model;
