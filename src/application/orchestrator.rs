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

//! The core application logic that runs one export end to end.
//!
//! Scan, encode and write happen strictly in sequence into a local artifact.
//! Only when the writer reports `Done` is the artifact handed to the
//! uploader. Any error ends the run; a failed run never uploads and leaves no
//! artifact behind.

use crate::application::export_writer::ExportWriter;
use crate::application::scanner::PaginatedScanner;
use crate::application::uploader::DelegatedUploader;
use crate::config::AppConfig;
use crate::domain::codec::RecordCodec;
use crate::domain::destination::destination_key;
use crate::domain::entities::ExportReport;
use crate::domain::errors::Result;
use crate::infrastructure::local_storage::local_artifact::LocalArtifact;
use crate::ports::clock::Clock;
use crate::ports::scan_port::{ScanOptions, TableScanPort};
use log::info;
use std::sync::Arc;
use std::time::Instant;

/// Orchestrates the export of one table to one object.
pub struct ExportOrchestrator {
    scan_port: Arc<dyn TableScanPort>,
    uploader: DelegatedUploader,
    clock: Arc<dyn Clock>,
    config: AppConfig,
}

impl ExportOrchestrator {
    pub fn new(
        scan_port: Arc<dyn TableScanPort>,
        uploader: DelegatedUploader,
        clock: Arc<dyn Clock>,
        config: AppConfig,
    ) -> Self {
        Self {
            scan_port,
            uploader,
            clock,
            config,
        }
    }

    /// Entry point for running the full export.
    pub fn run(&self) -> Result<ExportReport> {
        let start_time = Instant::now();
        self.config.validate()?;

        let table = self.config.source.table.as_str();
        let options = ScanOptions {
            consistent_read: self.config.source.consistent_read.unwrap_or(false),
        };
        let scanner = PaginatedScanner::open(
            self.scan_port.clone(),
            table,
            self.config.batch_size()?,
            options,
        )?
        .with_max_page_retries(self.config.source.max_page_retries.unwrap_or(0));

        let dest = &self.config.destination;
        let sink = LocalArtifact::create(dest.local_path())?;

        info!("Exporting table {} to {}", table, dest.local_path());
        let mut writer = ExportWriter::new(RecordCodec::new(self.config.schema()));
        let (summary, artifact) = writer.run(scanner, sink)?;
        info!(
            "Total records written {} to local file {}",
            summary.records,
            artifact.path.display()
        );

        let key = destination_key(dest.key_prefix(), dest.file_prefix(), self.clock.now());
        let receipt = self.uploader.upload(&artifact, &key)?;
        info!(
            "Successfully uploaded {} to s3://{}/{}",
            table, receipt.bucket, receipt.key
        );

        Ok(ExportReport {
            table: table.to_string(),
            bucket: receipt.bucket,
            key: receipt.key,
            records: summary.records,
            batches: summary.batches,
            bytes: receipt.bytes,
            duration_secs: start_time.elapsed().as_secs_f64(),
        })
    }
}
