//! Client-side state for the restaurant dashboard.
//!
//! [`optimistic`] projects pending mutations over the last server snapshot so
//! the UI can render them before the server answers; [`filter`] applies the
//! dashboard filters to that projection.

pub mod filter;
pub mod optimistic;
