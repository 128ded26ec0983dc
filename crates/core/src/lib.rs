//! Domain rules shared by the Savor database, API and client crates.
//!
//! Everything here is free of HTTP and SQL concerns: identifier types, the
//! domain error taxonomy, category and restaurant field rules, the image slot
//! allocator, list-filter predicates, and the blob storage seam.

pub mod category;
pub mod error;
pub mod image_slots;
pub mod listing;
pub mod restaurant;
pub mod storage;
pub mod types;
