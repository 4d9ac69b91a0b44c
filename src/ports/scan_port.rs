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

//! # Scan Port
//!
//! This Port defines what it means to "read one page" of a key-value table.
//! It doesn't care IF the table lives in DynamoDB or in a test double. Any
//! struct implementing `TableScanPort` can feed the paginated scanner.

use crate::domain::entities::Record;
use crate::domain::errors::Result;

/// Opaque continuation token marking how far a scan has progressed.
///
/// Only the adapter that issued a cursor knows how to read it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor(String);

impl Cursor {
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

/// Scan options passed through to the store on every page request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Request strongly consistent reads where the store supports them.
    pub consistent_read: bool,
}

/// One page returned by the store.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub records: Vec<Record>,
    /// Where to resume. `None` means the store has nothing after this page.
    pub next_cursor: Option<Cursor>,
}

/// `TableScanPort` issues bounded retrieval requests against one table.
pub trait TableScanPort: Send + Sync {
    /// Fetches up to `limit` records starting after `start` (or at the start
    /// of the table when `start` is `None`).
    fn scan_page(
        &self,
        table: &str,
        limit: usize,
        start: Option<&Cursor>,
        options: ScanOptions,
    ) -> Result<ScanPage>;
}
