// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Delegated Uploader
//!
//! Delivers a finished artifact to the blob store in one transfer, signed
//! with a delegated credential obtained right before the transfer starts.
//! The credential is dropped once the upload completes.

use crate::application::credentials::DelegatedCredentialProvider;
use crate::domain::entities::{ArtifactHandle, UploadReceipt};
use crate::domain::errors::{ExportError, Result};
use crate::ports::blob_port::BlobStorePort;
use log::info;
use std::sync::Arc;

pub struct DelegatedUploader {
    credentials: DelegatedCredentialProvider,
    blob_store: Arc<dyn BlobStorePort>,
    bucket: String,
}

impl DelegatedUploader {
    pub fn new(
        credentials: DelegatedCredentialProvider,
        blob_store: Arc<dyn BlobStorePort>,
        bucket: String,
    ) -> Self {
        Self {
            credentials,
            blob_store,
            bucket,
        }
    }

    /// Uploads the whole artifact under `key`.
    ///
    /// The artifact is streamed from disk; only its size is checked up front.
    pub fn upload(&self, artifact: &ArtifactHandle, key: &str) -> Result<UploadReceipt> {
        let on_disk = std::fs::metadata(&artifact.path)?.len();
        if on_disk != artifact.bytes {
            return Err(ExportError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "artifact {} is {} bytes, expected {}",
                    artifact.path.display(),
                    on_disk,
                    artifact.bytes
                ),
            )));
        }
        let credential = self.credentials.credential()?;

        info!(
            "Uploading {} bytes to s3://{}/{} as {}",
            on_disk, self.bucket, key, credential.access_key_id
        );
        let res = self.blob_store.put_object(
            &credential,
            &self.bucket,
            key,
            &artifact.path,
            on_disk,
        );
        self.credentials.discard();
        res?;

        Ok(UploadReceipt {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            bytes: on_disk,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::credentials::RoleSettings;
    use crate::testing::{ManualClock, RecordingBlobStore, RecordingRoleAssumer};
    use chrono::Duration;
    use std::io::Write;

    fn uploader(
        blob: Arc<RecordingBlobStore>,
    ) -> (DelegatedUploader, Arc<RecordingRoleAssumer>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let assumer = Arc::new(RecordingRoleAssumer::new(clock.clone()));
        let provider = DelegatedCredentialProvider::new(
            assumer.clone(),
            clock.clone(),
            RoleSettings {
                role_arn: "arn:aws:iam::1:role/upload".to_string(),
                session_name: "test".to_string(),
                session_duration: Duration::minutes(15),
                expiry_window: Duration::seconds(30),
            },
        );
        (
            DelegatedUploader::new(provider, blob, "exports".to_string()),
            assumer,
            clock,
        )
    }

    fn artifact(dir: &tempfile::TempDir, content: &[u8]) -> ArtifactHandle {
        let path = dir.path().join("dynamo.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content).unwrap();
        ArtifactHandle {
            path,
            bytes: content.len() as u64,
        }
    }

    #[test]
    fn test_upload_sends_full_content() {
        let dir = tempfile::tempdir().unwrap();
        let blob = Arc::new(RecordingBlobStore::new());
        let (up, assumer, _) = uploader(blob.clone());
        let handle = artifact(&dir, b"\"UUID\",\"Customer\"\n\"1\",\"Acme\"\n");

        let receipt = up.upload(&handle, "dynamo/2024/06/15/TT_20240615083000.csv").unwrap();

        assert_eq!(receipt.bytes, handle.bytes);
        assert_eq!(assumer.calls(), 1);
        let objects = blob.objects();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].bucket, "exports");
        assert_eq!(objects[0].key, "dynamo/2024/06/15/TT_20240615083000.csv");
        assert_eq!(objects[0].length, handle.bytes);
        assert_eq!(objects[0].body, b"\"UUID\",\"Customer\"\n\"1\",\"Acme\"\n".to_vec());
        assert_eq!(objects[0].access_key_id, "ASIA1");
    }

    #[test]
    fn test_artifact_is_handed_over_by_path() {
        let dir = tempfile::tempdir().unwrap();
        let blob = Arc::new(RecordingBlobStore::new());
        let (up, _, _) = uploader(blob.clone());
        let content = "\"UUID\",\"Customer\"\n".repeat(10_000);
        let handle = artifact(&dir, content.as_bytes());

        up.upload(&handle, "k").unwrap();

        let objects = blob.objects();
        assert_eq!(objects[0].source, handle.path);
        assert_eq!(objects[0].length, content.len() as u64);
    }

    #[test]
    fn test_credential_not_reused_across_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let blob = Arc::new(RecordingBlobStore::new());
        let (up, assumer, clock) = uploader(blob.clone());
        let handle = artifact(&dir, b"a");

        up.upload(&handle, "k1").unwrap();
        clock.advance(Duration::minutes(20));
        up.upload(&handle, "k2").unwrap();

        assert_eq!(assumer.calls(), 2);
        let keys: Vec<String> = blob.objects().iter().map(|o| o.access_key_id.clone()).collect();
        assert_eq!(keys, vec!["ASIA1".to_string(), "ASIA2".to_string()]);
    }

    #[test]
    fn test_transfer_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blob = Arc::new(RecordingBlobStore::failing());
        let (up, _, _) = uploader(blob);
        let err = up.upload(&artifact(&dir, b"x"), "k").unwrap_err();
        assert_eq!(err.step(), "transfer");
    }

    #[test]
    fn test_missing_artifact_is_io_error() {
        let blob = Arc::new(RecordingBlobStore::new());
        let (up, assumer, _) = uploader(blob.clone());
        let handle = ArtifactHandle {
            path: "/nonexistent/dynamo.csv".into(),
            bytes: 0,
        };
        assert!(matches!(up.upload(&handle, "k"), Err(ExportError::IoError(_))));
        assert_eq!(assumer.calls(), 0);
        assert!(blob.objects().is_empty());
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let blob = Arc::new(RecordingBlobStore::new());
        let (up, _, _) = uploader(blob.clone());
        let mut handle = artifact(&dir, b"abc");
        handle.bytes = 10;
        assert!(up.upload(&handle, "k").is_err());
        assert!(blob.objects().is_empty());
    }
}
