pub mod access;
pub mod post;
pub mod user;
