pub mod activity;
pub mod user;

pub use activity::Activity;
pub use user::User;
