//! Request handlers, one module per resource.

pub mod inventory;
pub mod pastebin;
pub mod system;
