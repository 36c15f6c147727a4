//! Storage service implementation using Apache OpenDAL.

use bytes::Bytes;
use opendal::{Operator, services};

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Object storage for photos.
#[derive(Debug, Clone)]
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Validate an upload against config constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if the size or MIME type is not allowed.
    pub fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(size, self.config.max_file_size));
        }

        if !self.config.is_mime_type_allowed(content_type) {
            return Err(StorageError::invalid_mime_type(content_type));
        }

        Ok(())
    }

    /// Write an object.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn put(&self, key: &str, content: Bytes) -> Result<(), StorageError> {
        self.operator.write(key, content).await?;
        Ok(())
    }

    /// Read an object's full content.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the key does not exist.
    pub async fn read(&self, key: &str) -> Result<Bytes, StorageError> {
        let buffer = self.operator.read(key).await?;
        Ok(buffer.to_bytes())
    }

    /// Delete an object. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.operator.delete(key).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> StorageService {
        StorageService::from_config(StorageConfig::new(StorageProvider::local_fs(
            std::env::temp_dir().join("faktura-storage-tests"),
        )))
        .unwrap()
    }

    #[test]
    fn test_validate_upload_rejects_oversize() {
        let svc = service();
        let max = StorageConfig::DEFAULT_MAX_FILE_SIZE;
        assert!(svc.validate_upload("image/png", max).is_ok());
        assert!(matches!(
            svc.validate_upload("image/png", max + 1),
            Err(StorageError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_validate_upload_rejects_non_image() {
        let svc = service();
        assert!(matches!(
            svc.validate_upload("text/html", 10),
            Err(StorageError::InvalidMimeType { .. })
        ));
    }

    #[tokio::test]
    async fn test_put_read_delete_round_trip() {
        let svc = service();
        let key = "photos/customers/test-object.png";

        svc.put(key, Bytes::from_static(b"content")).await.unwrap();
        assert_eq!(svc.read(key).await.unwrap(), Bytes::from_static(b"content"));

        svc.delete(key).await.unwrap();
        assert!(matches!(svc.read(key).await, Err(StorageError::NotFound { .. })));
    }
}
