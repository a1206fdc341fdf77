use base64::Engine as _;
use serde::Deserialize;

use crate::users::application::ports::outgoing::document_storage::{DocumentSlot, DocumentUpload};

/// Inline document in a create/update body. Bytes travel base64-encoded.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentPayload {
    pub slot: DocumentSlotPayload,
    pub file_name: String,
    pub content_type: String,
    pub data_base64: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSlotPayload {
    Photo,
    NationalityCard,
    FamilyBook,
    BirthCertificate,
    DegreeCertificate,
}

impl From<DocumentSlotPayload> for DocumentSlot {
    fn from(slot: DocumentSlotPayload) -> Self {
        match slot {
            DocumentSlotPayload::Photo => DocumentSlot::Photo,
            DocumentSlotPayload::NationalityCard => DocumentSlot::NationalityCard,
            DocumentSlotPayload::FamilyBook => DocumentSlot::FamilyBook,
            DocumentSlotPayload::BirthCertificate => DocumentSlot::BirthCertificate,
            DocumentSlotPayload::DegreeCertificate => DocumentSlot::DegreeCertificate,
        }
    }
}

impl DocumentPayload {
    pub fn decode(self) -> Result<DocumentUpload, String> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(self.data_base64.as_bytes())
            .map_err(|e| format!("document '{}' is not valid base64: {}", self.file_name, e))?;

        Ok(DocumentUpload {
            slot: self.slot.into(),
            file_name: self.file_name,
            content_type: self.content_type,
            bytes,
        })
    }
}

pub fn decode_documents(payloads: Vec<DocumentPayload>) -> Result<Vec<DocumentUpload>, String> {
    payloads.into_iter().map(DocumentPayload::decode).collect()
}
