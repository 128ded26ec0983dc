pub mod categories;
pub mod images;
pub mod restaurants;
