mod like;
mod post;
mod user;

pub use like::Like;
pub use post::Post;
pub use user::User;
