//! Role-lookup adapters (role service client + in-memory directory).

pub mod http;
pub mod in_memory;

pub use http::{HttpRoleLookup, HttpRoleLookupConfig};
pub use in_memory::InMemoryRoleDirectory;
