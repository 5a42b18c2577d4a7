//! Orgdir Store
//!
//! Storage collaborator for the organization directory.
//!
//! # Overview
//!
//! - **Store**: async backend contract; reads plus atomic batch commits
//! - **WriteBatch**: ordered [`Mutation`]s applied all-or-nothing
//! - **MemoryStore**: reference backend with a radix-trie path index
//! - **Snapshot**: JSON dump/restore of every table
//!
//! Backends enforce the schema constraints themselves: unique activity
//! paths, unique association pairs and every foreign key. Violations surface
//! as [`StoreError`] variants naming the [`Constraint`].

#![warn(missing_docs)]

pub mod batch;
pub mod error;
pub mod index;
pub mod memory;
pub mod records;
pub mod snapshot;
pub mod store;

mod tables;

// Re-exports
pub use batch::{CommitReceipt, Mutation, RowId, WriteBatch};
pub use error::{Constraint, StoreError, Table};
pub use index::PathIndex;
pub use memory::MemoryStore;
pub use records::{
    ActivityLink, Building, BuildingId, BuildingPatch, NewBuilding, NewOrganization, NewPhone,
    Organization, OrganizationId, OrganizationPatch, Phone, PhoneId, PhonePatch,
};
pub use snapshot::Snapshot;
pub use store::Store;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
