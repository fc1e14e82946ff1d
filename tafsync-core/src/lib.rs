//! tafsync core library: domain types, descriptor lookup and patching.
//!
//! Public API surface:
//! - [`types`]: remote records and identifier records
//! - [`error`]: [`DescriptorError`]
//! - [`store`]: [`DescriptorStore`], find a descriptor by model
//! - [`descriptor`]: load / patch / save a descriptor document

pub mod descriptor;
pub mod error;
pub mod store;
pub mod types;

pub use descriptor::{patch, Descriptor, PatchOutcome, DESCRIPTOR_EXTENSION};
pub use error::DescriptorError;
pub use store::DescriptorStore;
pub use types::{AudioId, FileRecord, IdRecord, TafHeader, TagRecord, TonieInfo};
