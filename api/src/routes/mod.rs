pub mod health;
pub mod tweet;
pub mod user;
