//! Domain layer for the lab kit service.
//!
//! Holds the error taxonomy, the persistence traits the storage layer
//! implements, and the two services built on them: the paste lifecycle
//! manager and the inventory service. Nothing here knows about HTTP or SQL.

pub mod error;
pub mod inventory;
pub mod memory;
pub mod paste;
pub mod types;
