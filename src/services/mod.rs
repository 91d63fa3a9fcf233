pub mod articles;
pub mod comments;
pub mod engagement;
pub mod generator;
pub mod identity;
