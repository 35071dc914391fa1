//! Row types mapped with `sqlx::FromRow`, converted into core domain types.

pub mod inventory;
pub mod paste;
