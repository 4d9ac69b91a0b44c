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

//! # Domain Entities
//!
//! The "Nouns" of the exporter: records read from the table, the batches they
//! travel in, the delegated credential used for delivery, and the summaries
//! reported at the end of a run.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Field names exported when no projection is configured.
pub const DEFAULT_FIELDS: [&str; 2] = ["UUID", "Customer"];

/// A single item read from the table, rendered as text attributes.
///
/// Records are immutable once built by the scanner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    attributes: BTreeMap<String, String>,
}

impl Record {
    pub fn new(attributes: BTreeMap<String, String>) -> Self {
        Self { attributes }
    }

    /// Builds a record from `(name, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            attributes: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.attributes.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// The ordered list of fields that make up one exported row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    fields: Vec<String>,
}

impl TableSchema {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

impl Default for TableSchema {
    fn default() -> Self {
        Self::new(DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect())
    }
}

/// One page of records retrieved by a single scan request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    /// Zero-based position of this page in the scan.
    pub sequence: u64,
    pub records: Vec<Record>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Short-lived credentials obtained by assuming the upload role.
#[derive(Clone, PartialEq, Eq)]
pub struct DelegatedCredential {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: DateTime<Utc>,
}

impl DelegatedCredential {
    /// A credential is usable only while `now` is outside the safety margin
    /// (`window`) before its expiration.
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now + window < self.expiration
    }
}

impl fmt::Debug for DelegatedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatedCredential")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Outcome of streaming a full scan into a sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Total data rows written (header excluded).
    pub records: u64,
    /// Non-empty batches encoded.
    pub batches: u64,
    /// Encoded bytes appended to the sink, header included.
    pub bytes: u64,
}

/// A finished artifact on local disk, ready for transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactHandle {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Acknowledgement of a completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub bucket: String,
    pub key: String,
    pub bytes: u64,
}

/// Final report of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub table: String,
    pub bucket: String,
    pub key: String,
    pub records: u64,
    pub batches: u64,
    pub bytes: u64,
    pub duration_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_schema() {
        let schema = TableSchema::default();
        assert_eq!(schema.fields(), &["UUID".to_string(), "Customer".to_string()]);
    }

    #[test]
    fn test_credential_freshness_window() {
        let expiration = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let cred = DelegatedCredential {
            access_key_id: "AKIA".into(),
            secret_access_key: "secret".into(),
            session_token: "token".into(),
            expiration,
        };
        let window = Duration::seconds(30);

        assert!(cred.is_fresh(expiration - Duration::seconds(31), window));
        // Inside the safety margin counts as expired.
        assert!(!cred.is_fresh(expiration - Duration::seconds(30), window));
        assert!(!cred.is_fresh(expiration - Duration::seconds(5), window));
        assert!(!cred.is_fresh(expiration + Duration::seconds(1), window));
    }

    #[test]
    fn test_credential_debug_redacts_secrets() {
        let cred = DelegatedCredential {
            access_key_id: "AKIA".into(),
            secret_access_key: "very-secret".into(),
            session_token: "very-token".into(),
            expiration: Utc::now(),
        };
        let out = format!("{:?}", cred);
        assert!(out.contains("AKIA"));
        assert!(!out.contains("very-secret"));
        assert!(!out.contains("very-token"));
    }
}
