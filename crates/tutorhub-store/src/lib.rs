//! # tutorhub-store — Entity Store
//!
//! Durable key-value persistence per entity type. Each collection is a JSON
//! file holding an id-keyed map, guarded by its own mutex; every logical
//! operation is an atomic read-modify-write on one collection, and
//! cross-collection transactions hold both guards with a fixed lock order
//! (enrollment ledger before offerings).
//!
//! Reads are fail-open: missing or corrupt files load as empty collections.
//! Writes surface [`StoreError`] to the caller.

pub mod collection;
pub mod stores;

pub use collection::{CollectionGuard, JsonCollection, StoreError};
pub use stores::{EnrollmentStore, OfferingStore, ReportStore, RoomStore, Stores};
