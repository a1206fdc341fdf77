use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::users::application::ports::outgoing::document_storage::{
    DocumentStorage, DocumentStorageError, DocumentUpload,
};

/// Bucket where identity documents live.
const DEFAULT_DOCUMENTS_BUCKET: &str = "roster-user-documents";

/// google-cloud-storage uses a bucket resource name format:
/// `projects/_/buckets/{bucket}`
///
/// Keeping this here makes it hard to accidentally pass a raw bucket name.
fn bucket_resource(bucket: &str) -> String {
    format!("projects/_/buckets/{}", bucket)
}

/// One object per slot, so re-uploading a document replaces the old one.
fn document_object_key(user_id: Uuid, upload: &DocumentUpload) -> String {
    let extension = upload
        .file_name
        .rsplit_once('.')
        .map(|(_, ext)| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default();

    format!("users/{}/{}{}", user_id, upload.slot.as_str(), extension)
}

fn map_upload_error(msg: &str) -> DocumentStorageError {
    let m = msg.to_lowercase();

    if m.contains("denied")
        || m.contains("forbidden")
        || m.contains("invalid")
        || m.contains("400")
        || m.contains("413")
    {
        DocumentStorageError::Rejected(msg.to_string())
    } else {
        DocumentStorageError::Infrastructure(msg.to_string())
    }
}

/// Internal seam to make the adapter testable without mocking
/// google-cloud-storage types/streams.
#[async_trait]
trait GcsClient: Send + Sync {
    async fn upload_object(
        &self,
        bucket_resource: &str,
        object_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), String>;
}

#[cfg(test)]
struct ArcGcsClient(Arc<dyn GcsClient>);

#[cfg(test)]
#[async_trait]
impl GcsClient for ArcGcsClient {
    async fn upload_object(
        &self,
        bucket_resource: &str,
        object_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), String> {
        self.0
            .upload_object(bucket_resource, object_name, content_type, bytes)
            .await
    }
}

/// Production adapter: implements the DocumentStorage port.
#[derive(Clone)]
pub struct GcsDocumentStorage {
    client: Arc<OnceCell<Box<dyn GcsClient>>>,
    bucket: String,
}

impl GcsDocumentStorage {
    /// Synchronous constructor - client is initialized lazily on first use.
    pub fn new() -> Self {
        let bucket = std::env::var("GCS_DOCUMENTS_BUCKET")
            .unwrap_or_else(|_| DEFAULT_DOCUMENTS_BUCKET.to_string());

        Self {
            client: Arc::new(OnceCell::new()),
            bucket,
        }
    }

    async fn get_client(&self) -> Result<&dyn GcsClient, Box<dyn std::error::Error + Send + Sync>> {
        self.client
            .get_or_try_init(|| async {
                let real_client = RealGcsClient::new().await?;
                Ok(Box::new(real_client) as Box<dyn GcsClient>)
            })
            .await
            .map(|boxed| &**boxed)
    }

    #[cfg(test)]
    fn with_client(client: Arc<dyn GcsClient>, bucket: &str) -> Self {
        let once = OnceCell::new();
        let _ = once.set(Box::new(ArcGcsClient(client)) as Box<dyn GcsClient>);

        Self {
            client: Arc::new(once),
            bucket: bucket.to_string(),
        }
    }
}

impl Default for GcsDocumentStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStorage for GcsDocumentStorage {
    async fn store_document(
        &self,
        user_id: Uuid,
        upload: DocumentUpload,
    ) -> Result<String, DocumentStorageError> {
        if upload.bytes.is_empty() {
            return Err(DocumentStorageError::Rejected("empty file".to_string()));
        }
        if upload.file_name.trim().is_empty() {
            return Err(DocumentStorageError::Rejected(
                "missing file name".to_string(),
            ));
        }

        let client = self
            .get_client()
            .await
            .map_err(|e| DocumentStorageError::Infrastructure(e.to_string()))?;

        let bucket = bucket_resource(&self.bucket);
        let object = document_object_key(user_id, &upload);

        client
            .upload_object(&bucket, &object, &upload.content_type, upload.bytes)
            .await
            .map_err(|e| map_upload_error(&e))?;

        Ok(object)
    }
}

// ============================================================================
// Real Google Cloud Storage client (google-cloud-storage)
// ============================================================================

struct RealGcsClient {
    storage: google_cloud_storage::client::Storage,
}

impl RealGcsClient {
    async fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        tracing::info!("Initializing GCS client...");

        let storage = google_cloud_storage::client::Storage::builder()
            .build()
            .await
            .map_err(|e| {
                tracing::error!("Failed to build GCS storage client: {:?}", e);
                e
            })?;

        tracing::info!("GCS storage client created");

        Ok(Self { storage })
    }
}

#[async_trait]
impl GcsClient for RealGcsClient {
    async fn upload_object(
        &self,
        bucket_resource: &str,
        object_name: &str,
        _content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), String> {
        self.storage
            .write_object(
                bucket_resource.to_string(),
                object_name.to_string(),
                bytes::Bytes::from(bytes),
            )
            .send_buffered()
            .await
            .map_err(|e| e.to_string())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::application::ports::outgoing::document_storage::DocumentSlot;
    use std::sync::Mutex;

    struct FakeGcsClient {
        last_upload_call: Mutex<Option<(String, String, String, usize)>>,
        upload_result: Mutex<Result<(), String>>,
    }

    impl Default for FakeGcsClient {
        fn default() -> Self {
            Self {
                last_upload_call: Mutex::new(None),
                upload_result: Mutex::new(Ok(())),
            }
        }
    }

    impl FakeGcsClient {
        fn set_upload_result(&self, r: Result<(), String>) {
            *self.upload_result.lock().unwrap() = r;
        }
    }

    #[async_trait]
    impl GcsClient for FakeGcsClient {
        async fn upload_object(
            &self,
            bucket_resource: &str,
            object_name: &str,
            content_type: &str,
            bytes: Vec<u8>,
        ) -> Result<(), String> {
            *self.last_upload_call.lock().unwrap() = Some((
                bucket_resource.to_string(),
                object_name.to_string(),
                content_type.to_string(),
                bytes.len(),
            ));

            self.upload_result.lock().unwrap().clone()
        }
    }

    fn sample_upload(slot: DocumentSlot) -> DocumentUpload {
        DocumentUpload {
            slot,
            file_name: "Scan.PDF".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: vec![1, 2, 3, 4],
        }
    }

    #[tokio::test]
    async fn test_store_document_uses_slot_scoped_object_key() {
        let fake = Arc::new(FakeGcsClient::default());
        let storage = GcsDocumentStorage::with_client(fake.clone(), "test-bucket");
        let user_id = Uuid::new_v4();

        let reference = storage
            .store_document(user_id, sample_upload(DocumentSlot::FamilyBook))
            .await
            .unwrap();

        assert_eq!(reference, format!("users/{}/family_book.pdf", user_id));

        let call = fake.last_upload_call.lock().unwrap().clone().unwrap();
        assert_eq!(call.0, "projects/_/buckets/test-bucket");
        assert_eq!(call.1, reference);
        assert_eq!(call.2, "application/pdf");
        assert_eq!(call.3, 4);
    }

    #[tokio::test]
    async fn test_store_document_without_extension() {
        let fake = Arc::new(FakeGcsClient::default());
        let storage = GcsDocumentStorage::with_client(fake, "test-bucket");
        let user_id = Uuid::new_v4();

        let mut upload = sample_upload(DocumentSlot::Photo);
        upload.file_name = "photo".to_string();

        let reference = storage.store_document(user_id, upload).await.unwrap();

        assert_eq!(reference, format!("users/{}/photo", user_id));
    }

    #[tokio::test]
    async fn test_store_document_rejects_empty_file() {
        let fake = Arc::new(FakeGcsClient::default());
        let storage = GcsDocumentStorage::with_client(fake.clone(), "test-bucket");

        let mut upload = sample_upload(DocumentSlot::Photo);
        upload.bytes.clear();

        let result = storage.store_document(Uuid::new_v4(), upload).await;

        assert!(matches!(result, Err(DocumentStorageError::Rejected(_))));
        assert!(fake.last_upload_call.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_document_rejects_missing_file_name() {
        let fake = Arc::new(FakeGcsClient::default());
        let storage = GcsDocumentStorage::with_client(fake, "test-bucket");

        let mut upload = sample_upload(DocumentSlot::Photo);
        upload.file_name = "  ".to_string();

        let result = storage.store_document(Uuid::new_v4(), upload).await;

        assert!(matches!(result, Err(DocumentStorageError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_store_document_maps_denied_to_rejected() {
        let fake = Arc::new(FakeGcsClient::default());
        fake.set_upload_result(Err("Permission denied".to_string()));

        let storage = GcsDocumentStorage::with_client(fake, "test-bucket");

        let result = storage
            .store_document(Uuid::new_v4(), sample_upload(DocumentSlot::Photo))
            .await;

        assert!(matches!(result, Err(DocumentStorageError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_store_document_maps_network_error_to_infrastructure() {
        let fake = Arc::new(FakeGcsClient::default());
        fake.set_upload_result(Err("connection timeout".to_string()));

        let storage = GcsDocumentStorage::with_client(fake, "test-bucket");

        let result = storage
            .store_document(Uuid::new_v4(), sample_upload(DocumentSlot::Photo))
            .await;

        assert!(matches!(
            result,
            Err(DocumentStorageError::Infrastructure(_))
        ));
    }
}
