//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod restaurant_image_repo;
pub mod restaurant_repo;

pub use category_repo::CategoryRepo;
pub use restaurant_image_repo::RestaurantImageRepo;
pub use restaurant_repo::RestaurantRepo;
