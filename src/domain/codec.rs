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

//! # Record Codec
//!
//! Turns batches of records into comma-separated rows. Every field (header
//! included) is wrapped in double quotes and embedded quotes are doubled, so
//! delimiters, quotes and line breaks inside values survive a round trip.
//!
//! The codec holds no per-export state. Whether a call emits the header row
//! is decided by the caller.

use crate::domain::entities::{Record, TableSchema};
use crate::domain::errors::{ExportError, Result};
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};

/// Stateless CSV encoder/decoder bound to a table schema.
#[derive(Debug, Clone)]
pub struct RecordCodec {
    schema: TableSchema,
    delimiter: u8,
}

impl RecordCodec {
    pub fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            delimiter: b',',
        }
    }

    /// Encodes `batch` into rows, optionally preceded by the header row.
    ///
    /// Fails with `EncodingError` if any record lacks a schema field. Nothing
    /// is returned for a failing batch, so callers never append partial rows.
    pub fn encode(&self, batch: &[Record], include_header: bool) -> Result<Vec<u8>> {
        let mut wtr = WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        if include_header {
            wtr.write_record(self.schema.fields())?;
        }

        let mut row = Vec::with_capacity(self.schema.fields().len());
        for (i, record) in batch.iter().enumerate() {
            row.clear();
            for field in self.schema.fields() {
                let value = record.get(field).ok_or_else(|| {
                    ExportError::EncodingError(format!(
                        "record {} of batch is missing field '{}' ({} attributes present)",
                        i,
                        field,
                        record.len()
                    ))
                })?;
                row.push(value);
            }
            wtr.write_record(&row)?;
        }

        wtr.into_inner()
            .map_err(|e| ExportError::EncodingError(e.to_string()))
    }

    /// Decodes a document produced by [`encode`](Self::encode) with a header.
    ///
    /// The header row must match the schema exactly.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<Record>> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_reader(data);

        let headers = rdr.headers()?.clone();
        if headers.is_empty() && data.is_empty() {
            return Ok(Vec::new());
        }
        if headers.iter().ne(self.schema.fields().iter().map(String::as_str)) {
            return Err(ExportError::EncodingError(format!(
                "header {:?} does not match schema {:?}",
                headers.iter().collect::<Vec<_>>(),
                self.schema.fields()
            )));
        }

        let mut records = Vec::new();
        for row in rdr.records() {
            let row = row?;
            records.push(Record::from_pairs(headers.iter().zip(row.iter())));
        }
        Ok(records)
    }
}
