// Adapters layer: concrete store implementations behind the AccountStore
// port. Real persistence lives outside this crate.

pub mod jsonl;
pub mod memory;

pub use jsonl::JsonlStore;
pub use memory::MemoryStore;
