//! Domain services shared by the HTTP handlers.
//!
//! Services borrow the store, blob store and view cache from [`AppState`]
//! for the duration of one request.
//!
//! [`AppState`]: crate::state::AppState

pub mod category_registry;
pub mod restaurant_workflow;

pub use category_registry::CategoryRegistry;
pub use restaurant_workflow::{NewRestaurant, RestaurantEdit, RestaurantWorkflow};
