pub mod delete_user;

pub use delete_user::run as delete_user;
