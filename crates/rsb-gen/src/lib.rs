//! Random C++ program generator for struct-recovery benchmarks.
//!
//! Programs consist of randomly shaped structs and functions that touch every
//! scalar member reachable from their arguments through the preamble's `use`
//! transform, then call each other so the recovery tool sees cross-function
//! data flow.

#![deny(missing_docs)]

mod generator;
mod options;
mod preamble;
mod program;

pub use generator::generate;
pub use options::GenOptions;
pub use preamble::{load_preamble, PREAMBLE};
pub use program::{default_argument, manifest_path, Call, Func, Program};
