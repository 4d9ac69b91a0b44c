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

//! # Export Writer
//!
//! Drives the scanner and the codec together and streams each encoded batch
//! into a sink as soon as it is produced. At most one batch of records is
//! held in memory at any time.
//!
//! States: `Init -> Scanning -> Done`, or `Failed` on the first error.
//! `Failed` is terminal and the sink is dropped unfinished.

use crate::domain::codec::RecordCodec;
use crate::domain::entities::{Batch, ExportSummary};
use crate::domain::errors::{ExportError, Result};
use crate::ports::artifact_sink::ArtifactSink;
use log::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    Init,
    Scanning,
    Done,
    Failed,
}

pub struct ExportWriter {
    codec: RecordCodec,
    state: WriterState,
}

impl ExportWriter {
    pub fn new(codec: RecordCodec) -> Self {
        Self {
            codec,
            state: WriterState::Init,
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Runs a full export of `batches` into `sink`.
    ///
    /// The header row is written exactly once, ahead of the first batch, and
    /// is still written when the scan yields no records at all. On success the
    /// sink is finished and its handle returned with the run summary.
    pub fn run<I, S>(&mut self, batches: I, sink: S) -> Result<(ExportSummary, S::Handle)>
    where
        I: IntoIterator<Item = Result<Batch>>,
        S: ArtifactSink,
    {
        if self.state != WriterState::Init {
            return Err(ExportError::ConfigError(
                "export writer has already been used".to_string(),
            ));
        }
        self.state = WriterState::Scanning;

        match self.stream(batches, sink) {
            Ok(out) => {
                self.state = WriterState::Done;
                info!(
                    "Export written: {} records in {} batches ({} bytes)",
                    out.0.records, out.0.batches, out.0.bytes
                );
                Ok(out)
            }
            Err(e) => {
                self.state = WriterState::Failed;
                error!("Export aborted during {}: {}", e.step(), e);
                Err(e)
            }
        }
    }

    fn stream<I, S>(&self, batches: I, mut sink: S) -> Result<(ExportSummary, S::Handle)>
    where
        I: IntoIterator<Item = Result<Batch>>,
        S: ArtifactSink,
    {
        let mut summary = ExportSummary::default();
        let mut header_pending = true;

        for batch in batches {
            let batch = batch?;
            if batch.is_empty() {
                continue;
            }

            let encoded = self.codec.encode(&batch.records, header_pending)?;
            sink.append(&encoded)?;
            header_pending = false;

            summary.records += batch.len() as u64;
            summary.batches += 1;
            summary.bytes += encoded.len() as u64;
            debug!(
                "Batch {} appended: {} records, {} total",
                batch.sequence,
                batch.len(),
                summary.records
            );
        }

        if header_pending {
            let header = self.codec.encode(&[], true)?;
            sink.append(&header)?;
            summary.bytes += header.len() as u64;
        }

        let handle = sink.finish()?;
        Ok((summary, handle))
    }
}
