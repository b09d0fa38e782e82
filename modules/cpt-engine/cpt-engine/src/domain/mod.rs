pub mod error;
pub mod posts;
pub mod query;
pub mod registry;
pub mod repo;
pub mod shape;
pub mod slug;
pub mod validator;
