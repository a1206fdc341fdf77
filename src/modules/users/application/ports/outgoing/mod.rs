pub mod document_storage;
pub mod password_hasher;
pub mod token_provider;
pub mod user_notifier;
pub mod user_query;
pub mod user_repository;

pub use document_storage::{DocumentSlot, DocumentStorage, DocumentUpload};
pub use user_query::{UserQuery, UserQueryError};
pub use user_repository::{UserRepository, UserRepositoryError};
