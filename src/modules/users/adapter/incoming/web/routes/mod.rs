mod create_user;
mod document_payload;
mod get_user;
mod hard_delete_user;
mod list_users;
mod restore_user;
mod soft_delete_user;
mod update_user;

pub use create_user::create_user_handler;
pub use get_user::{get_my_profile_handler, get_user_handler};
pub use hard_delete_user::hard_delete_user_handler;
pub use list_users::list_users_handler;
pub use restore_user::restore_user_handler;
pub use soft_delete_user::soft_delete_user_handler;
pub use update_user::update_user_handler;
