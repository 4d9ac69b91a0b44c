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

//! In-memory port implementations shared by the unit tests.

use crate::domain::entities::{DelegatedCredential, Record};
use crate::domain::errors::{ExportError, Result};
use crate::ports::blob_port::BlobStorePort;
use crate::ports::clock::Clock;
use crate::ports::credential_port::RoleAssumptionPort;
use crate::ports::scan_port::{Cursor, ScanOptions, ScanPage, TableScanPort};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn customer(i: usize) -> Record {
    Record::from_pairs([
        ("UUID".to_string(), format!("id-{:05}", i)),
        ("Customer".to_string(), format!("Customer {}", i)),
    ])
}

pub fn customers(n: usize) -> Vec<Record> {
    (0..n).map(customer).collect()
}

/// A table that pages like DynamoDB: a full page always carries a
/// continuation, even when it happens to be the last one.
pub struct MemoryTable {
    records: Vec<Record>,
    /// Store-side cap on items per page, below the requested limit.
    page_cap: Option<usize>,
    /// 1-based call number that fails, and how many times it fails.
    fail_on_call: Option<usize>,
    failures_left: AtomicUsize,
    calls: AtomicUsize,
    starts: Mutex<Vec<Option<String>>>,
}

impl MemoryTable {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            page_cap: None,
            fail_on_call: None,
            failures_left: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            starts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page_cap(mut self, cap: usize) -> Self {
        self.page_cap = Some(cap);
        self
    }

    /// Makes the `call`-th request (and `times - 1` retries of it) fail.
    pub fn failing_on_call(mut self, call: usize, times: usize) -> Self {
        self.fail_on_call = Some(call);
        self.failures_left = AtomicUsize::new(times);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn starts(&self) -> Vec<Option<String>> {
        self.starts.lock().unwrap().clone()
    }
}

impl TableScanPort for MemoryTable {
    fn scan_page(
        &self,
        table: &str,
        limit: usize,
        start: Option<&Cursor>,
        _options: ScanOptions,
    ) -> Result<ScanPage> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.starts
            .lock()
            .unwrap()
            .push(start.map(|c| c.token().to_string()));

        if let Some(fail_call) = self.fail_on_call {
            if call >= fail_call && self.failures_left.load(Ordering::SeqCst) > 0 {
                self.failures_left.fetch_sub(1, Ordering::SeqCst);
                return Err(ExportError::RetrievalError {
                    table: table.to_string(),
                    reason: "ProvisionedThroughputExceededException".to_string(),
                });
            }
        }

        let from = match start {
            Some(c) => c.token().parse::<usize>().unwrap(),
            None => 0,
        };
        let take = self.page_cap.map_or(limit, |cap| cap.min(limit));
        let to = (from + take).min(self.records.len());
        let records = self.records[from..to].to_vec();

        let truncated = take < limit && to < self.records.len();
        let next_cursor = if records.len() == limit || truncated {
            Some(Cursor::from_token(to.to_string()))
        } else {
            None
        };
        Ok(ScanPage {
            records,
            next_cursor,
        })
    }
}

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 6, 15, 8, 30, 0).unwrap()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Issues credentials that expire `duration` after the clock's current time.
pub struct RecordingRoleAssumer {
    clock: Arc<ManualClock>,
    fail: bool,
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, String, i64)>>,
}

impl RecordingRoleAssumer {
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            clock,
            fail: false,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(clock: Arc<ManualClock>) -> Self {
        Self {
            fail: true,
            ..Self::new(clock)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(String, String, i64)> {
        self.requests.lock().unwrap().clone()
    }
}

impl RoleAssumptionPort for RecordingRoleAssumer {
    fn assume_role(
        &self,
        role: &str,
        session_name: &str,
        duration: Duration,
    ) -> Result<DelegatedCredential> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests.lock().unwrap().push((
            role.to_string(),
            session_name.to_string(),
            duration.num_seconds(),
        ));
        if self.fail {
            return Err(ExportError::CredentialError(format!(
                "AccessDenied: not authorized to assume {}",
                role
            )));
        }
        Ok(DelegatedCredential {
            access_key_id: format!("ASIA{}", n),
            secret_access_key: "secret".to_string(),
            session_token: format!("token-{}", n),
            expiration: self.clock.now() + duration,
        })
    }
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub source: PathBuf,
    pub length: u64,
    /// Contents of `source` at transfer time.
    pub body: Vec<u8>,
    pub access_key_id: String,
}

#[derive(Default)]
pub struct RecordingBlobStore {
    fail: bool,
    objects: Mutex<Vec<StoredObject>>,
}

impl RecordingBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

impl BlobStorePort for RecordingBlobStore {
    fn put_object(
        &self,
        credential: &DelegatedCredential,
        bucket: &str,
        key: &str,
        source: &Path,
        length: u64,
    ) -> Result<()> {
        if self.fail {
            return Err(ExportError::TransferError {
                bucket: bucket.to_string(),
                key: key.to_string(),
                reason: "connection reset".to_string(),
            });
        }
        let body = std::fs::read(source).map_err(|e| ExportError::TransferError {
            bucket: bucket.to_string(),
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.objects.lock().unwrap().push(StoredObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            source: source.to_path_buf(),
            length,
            body,
            access_key_id: credential.access_key_id.clone(),
        });
        Ok(())
    }
}
