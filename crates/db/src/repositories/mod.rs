//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&SqlitePool` as the first argument.

pub mod inventory_repo;
pub mod paste_repo;

pub use inventory_repo::InventoryRepo;
pub use paste_repo::PasteRepo;
