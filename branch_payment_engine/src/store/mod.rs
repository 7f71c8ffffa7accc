//! Transaction store implementations.

mod memory;

pub use memory::MemoryTransactionStore;
