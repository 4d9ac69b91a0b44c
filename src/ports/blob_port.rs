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

//! # Blob Port
//!
//! Contract for delivering a finished artifact to the blob store.

use crate::domain::entities::DelegatedCredential;
use crate::domain::errors::Result;
use std::path::Path;

/// `BlobStorePort` performs a single, whole-object transfer.
pub trait BlobStorePort: Send + Sync {
    /// Streams the `length` bytes at `source` to `bucket/key`, signing with
    /// `credential`. The file is never loaded into memory as a whole.
    fn put_object(
        &self,
        credential: &DelegatedCredential,
        bucket: &str,
        key: &str,
        source: &Path,
        length: u64,
    ) -> Result<()>;
}
