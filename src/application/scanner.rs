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

//! # Paginated Scanner
//!
//! Walks an entire table in fixed-size pages. The scanner owns the
//! continuation cursor: it starts at the beginning of the table, advances to
//! the position after the last returned item, and stops once the store
//! reports nothing further.
//!
//! A scanner is a one-shot producer. Once exhausted (or failed) it yields
//! nothing more; a fresh scan needs a fresh `PaginatedScanner`.

use crate::domain::entities::Batch;
use crate::domain::errors::{ExportError, Result};
use crate::ports::scan_port::{Cursor, ScanOptions, ScanPage, TableScanPort};
use log::{debug, info, warn};
use std::sync::Arc;

pub struct PaginatedScanner {
    port: Arc<dyn TableScanPort>,
    table: String,
    batch_size: usize,
    options: ScanOptions,
    max_page_retries: u32,
    cursor: Option<Cursor>,
    pages: u64,
    items: u64,
    finished: bool,
}

impl PaginatedScanner {
    /// Opens a scan over `table` in pages of `batch_size`.
    ///
    /// A zero batch size is rejected here, before any request is issued.
    pub fn open(
        port: Arc<dyn TableScanPort>,
        table: &str,
        batch_size: usize,
        options: ScanOptions,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(ExportError::ConfigError(
                "batch size must be a positive integer".to_string(),
            ));
        }
        if table.trim().is_empty() {
            return Err(ExportError::ConfigError("table name is empty".to_string()));
        }
        debug!("Opening scan of {} with batch size {}", table, batch_size);
        Ok(Self {
            port,
            table: table.to_string(),
            batch_size,
            options,
            max_page_retries: 0,
            cursor: None,
            pages: 0,
            items: 0,
            finished: false,
        })
    }

    /// Allows a failed page request to be re-issued from the same cursor.
    pub fn with_max_page_retries(mut self, retries: u32) -> Self {
        self.max_page_retries = retries;
        self
    }

    /// Fetches the next page.
    ///
    /// Returns the batch together with a `done` flag. The final batch may be
    /// partial or empty. After `done` (or an error) every further call returns
    /// an empty, done batch.
    pub fn next_batch(&mut self) -> Result<(Batch, bool)> {
        if self.finished {
            return Ok((
                Batch {
                    sequence: self.pages,
                    records: Vec::new(),
                },
                true,
            ));
        }

        let page = match self.fetch_with_retries() {
            Ok(page) => page,
            Err(e) => {
                self.finished = true;
                return Err(e);
            }
        };

        if page.records.len() > self.batch_size {
            self.finished = true;
            return Err(ExportError::RetrievalError {
                table: self.table.clone(),
                reason: format!(
                    "store returned {} items for a page limit of {}",
                    page.records.len(),
                    self.batch_size
                ),
            });
        }

        if let (Some(prev), Some(next)) = (&self.cursor, &page.next_cursor) {
            if prev == next {
                self.finished = true;
                return Err(ExportError::RetrievalError {
                    table: self.table.clone(),
                    reason: "continuation cursor did not advance".to_string(),
                });
            }
        }

        let sequence = self.pages;
        self.pages += 1;
        self.items += page.records.len() as u64;

        let done = page.next_cursor.is_none();
        self.cursor = page.next_cursor;
        if done {
            self.finished = true;
            info!(
                "Scan of {} complete: {} items in {} pages",
                self.table, self.items, self.pages
            );
        } else {
            debug!(
                "Page {} of {}: {} items, more to come",
                sequence,
                self.table,
                page.records.len()
            );
        }

        Ok((
            Batch {
                sequence,
                records: page.records,
            },
            done,
        ))
    }

    fn fetch_with_retries(&self) -> Result<ScanPage> {
        let mut attempt = 0;
        loop {
            match self.port.scan_page(
                &self.table,
                self.batch_size,
                self.cursor.as_ref(),
                self.options,
            ) {
                Ok(page) => return Ok(page),
                Err(e) if attempt < self.max_page_retries => {
                    attempt += 1;
                    warn!(
                        "Page {} of {} failed ({}), retrying from the same cursor ({}/{})",
                        self.pages, self.table, e, attempt, self.max_page_retries
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Yields the non-empty batches of the scan, in order.
impl Iterator for PaginatedScanner {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            match self.next_batch() {
                Ok((batch, _)) if batch.is_empty() => continue,
                Ok((batch, _)) => return Some(Ok(batch)),
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

impl std::iter::FusedIterator for PaginatedScanner {}
