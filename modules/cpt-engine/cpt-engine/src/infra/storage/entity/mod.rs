pub mod custom_post;
pub mod post_type;
