//! Infrastructure layer: adapters to sibling services.

pub mod role_lookup;

pub use role_lookup::{HttpRoleLookup, HttpRoleLookupConfig, InMemoryRoleDirectory};
