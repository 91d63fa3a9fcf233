pub mod articles;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod favorites;
pub mod middleware;
pub mod votes;
