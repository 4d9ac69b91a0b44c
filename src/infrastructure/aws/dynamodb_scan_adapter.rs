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

//! `TableScanPort` backed by the DynamoDB `Scan` API.

use crate::application::runtime::RuntimeContext;
use crate::domain::errors::{ExportError, Result};
use crate::infrastructure::aws::attributes::{decode_cursor, encode_cursor, item_to_record};
use crate::ports::scan_port::{Cursor, ScanOptions, ScanPage, TableScanPort};
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::Client;
use log::debug;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Issues one `Scan` request per page using the ambient AWS credentials.
pub struct DynamoScanAdapter {
    client: Client,
    runtime: Arc<Runtime>,
}

impl DynamoScanAdapter {
    pub fn new(ctx: &RuntimeContext) -> Self {
        Self {
            client: Client::new(&ctx.sdk_config),
            runtime: ctx.runtime.clone(),
        }
    }
}

impl TableScanPort for DynamoScanAdapter {
    fn scan_page(
        &self,
        table: &str,
        limit: usize,
        start: Option<&Cursor>,
        options: ScanOptions,
    ) -> Result<ScanPage> {
        let limit = i32::try_from(limit).map_err(|_| {
            ExportError::ConfigError(format!("page limit {} exceeds the Scan maximum", limit))
        })?;
        let start_key = start.map(|c| decode_cursor(table, c)).transpose()?;

        let request = self
            .client
            .scan()
            .table_name(table)
            .limit(limit)
            .consistent_read(options.consistent_read)
            .set_exclusive_start_key(start_key);

        let output = self
            .runtime
            .block_on(request.send())
            .map_err(|e| ExportError::RetrievalError {
                table: table.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        let records = output.items().iter().map(item_to_record).collect::<Vec<_>>();
        let next_cursor = output
            .last_evaluated_key()
            .map(|key| encode_cursor(table, key))
            .transpose()?;

        debug!(
            "Scan {} returned {} items (consumed capacity: {:?})",
            table,
            records.len(),
            output.consumed_capacity().and_then(|c| c.capacity_units())
        );

        Ok(ScanPage {
            records,
            next_cursor,
        })
    }
}
