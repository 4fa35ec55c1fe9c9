//! In-memory fetch collaborator and contract fixtures.

mod fixtures;
mod memory;

pub use fixtures::ContractBuilder;
pub use memory::{FailingSource, MemorySource};
