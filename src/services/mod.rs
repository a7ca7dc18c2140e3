pub mod auth;
pub mod categories;
pub mod post_images;
pub mod posts;
