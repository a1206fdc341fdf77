pub mod document_storage_gcs;

pub use document_storage_gcs::GcsDocumentStorage;
