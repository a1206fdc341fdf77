pub mod create_user;
pub mod fetch_profile;
pub mod hard_delete_user;
pub mod list_users;
pub mod restore_user;
pub mod soft_delete_user;
pub mod update_user;
