//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `Serialize` entity struct matching the database row (also `FromRow`
//!   with the `store` feature)
//! - `Deserialize` DTOs consumed by the store for inserts and updates

pub mod category;
pub mod image;
pub mod restaurant;
