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

//! Core error definitions for the DynamoDB to S3 exporter.
//!
//! This module provides a centralized `ExportError` enum and a `Result` type
//! used throughout the application. Every variant maps to one step of the
//! export run, so the top-level boundary can report where a run stopped.

use thiserror::Error;

/// Error types encountered during the export process.
///
/// None of these are recovered locally. They propagate to `main`, which logs
/// the failing step and exits non-zero.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Retrieval failed for {table}: {reason}")]
    RetrievalError { table: String, reason: String },

    #[error("Encoding failed: {0}")]
    EncodingError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Credential exchange failed: {0}")]
    CredentialError(String),

    #[error("Transfer to s3://{bucket}/{key} failed: {reason}")]
    TransferError {
        bucket: String,
        key: String,
        reason: String,
    },
}

impl ExportError {
    /// Name of the pipeline step that produced this error.
    pub fn step(&self) -> &'static str {
        match self {
            ExportError::ConfigError(_) => "configuration",
            ExportError::RetrievalError { .. } => "retrieval",
            ExportError::EncodingError(_) => "encoding",
            ExportError::IoError(_) => "artifact write",
            ExportError::CredentialError(_) => "credential exchange",
            ExportError::TransferError { .. } => "transfer",
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::EncodingError(e.to_string())
    }
}

/// A specialized Result type for the exporter.
pub type Result<T> = std::result::Result<T, ExportError>;
