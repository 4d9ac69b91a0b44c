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

//! `BlobStorePort` backed by S3 `PutObject`.

use crate::application::runtime::RuntimeContext;
use crate::domain::entities::DelegatedCredential;
use crate::domain::errors::{ExportError, Result};
use crate::ports::blob_port::BlobStorePort;
use aws_config::SdkConfig;
use aws_sdk_s3::config::{Builder as S3ConfigBuilder, Credentials};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::runtime::Runtime;

/// Builds a client per transfer so each upload is signed with exactly the
/// delegated credential it was handed.
pub struct S3BlobAdapter {
    sdk_config: SdkConfig,
    runtime: Arc<Runtime>,
}

impl S3BlobAdapter {
    pub fn new(ctx: &RuntimeContext) -> Self {
        Self {
            sdk_config: ctx.sdk_config.clone(),
            runtime: ctx.runtime.clone(),
        }
    }

    fn client_for(&self, credential: &DelegatedCredential) -> Client {
        let creds = Credentials::new(
            &credential.access_key_id,
            &credential.secret_access_key,
            Some(credential.session_token.clone()),
            Some(SystemTime::from(credential.expiration)),
            "exporter-assumed-role",
        );
        let conf = S3ConfigBuilder::from(&self.sdk_config)
            .credentials_provider(creds)
            .build();
        Client::from_conf(conf)
    }
}

impl BlobStorePort for S3BlobAdapter {
    fn put_object(
        &self,
        credential: &DelegatedCredential,
        bucket: &str,
        key: &str,
        source: &Path,
        length: u64,
    ) -> Result<()> {
        let transfer_error = |reason: String| ExportError::TransferError {
            bucket: bucket.to_string(),
            key: key.to_string(),
            reason,
        };
        let content_length = i64::try_from(length)
            .map_err(|_| transfer_error(format!("artifact of {} bytes is too large", length)))?;
        let client = self.client_for(credential);

        self.runtime.block_on(async {
            // Body is read from disk in chunks while the request is sent.
            let body = ByteStream::from_path(source).await.map_err(|e| {
                transfer_error(format!("cannot open {}: {}", source.display(), e))
            })?;
            client
                .put_object()
                .bucket(bucket)
                .key(key)
                .acl(ObjectCannedAcl::Private)
                .content_type("text/csv")
                .content_length(content_length)
                .body(body)
                .send()
                .await
                .map_err(|e| transfer_error(DisplayErrorContext(&e).to_string()))?;
            Ok::<(), ExportError>(())
        })
    }
}
