pub mod body;
pub mod categories;
pub mod post_images;
pub mod posts;
pub mod query;
pub mod response;
pub mod users;
