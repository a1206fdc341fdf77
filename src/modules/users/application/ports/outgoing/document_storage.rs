use async_trait::async_trait;

/// The five identity-document slots on the personal-info section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSlot {
    Photo,
    NationalityCard,
    FamilyBook,
    BirthCertificate,
    DegreeCertificate,
}

impl DocumentSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentSlot::Photo => "photo",
            DocumentSlot::NationalityCard => "nationality_card",
            DocumentSlot::FamilyBook => "family_book",
            DocumentSlot::BirthCertificate => "birth_certificate",
            DocumentSlot::DegreeCertificate => "degree_certificate",
        }
    }
}

/// Raw upload handed off to the storage collaborator.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub slot: DocumentSlot,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DocumentStorageError {
    #[error("Storage rejected the upload: {0}")]
    Rejected(String),

    #[error("Storage infrastructure failure: {0}")]
    Infrastructure(String),
}

/// Stores document bytes and returns a stable reference string to persist.
/// The handoff happens BEFORE the transactional metadata write, so a failed
/// upload never leaves metadata pointing at a missing file.
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    async fn store_document(
        &self,
        user_id: uuid::Uuid,
        upload: DocumentUpload,
    ) -> Result<String, DocumentStorageError>;
}
