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

//! # Runtime Context
//!
//! Sets up the resources shared by every AWS adapter for the life of a run:
//! 1. **I/O Runtime**: a single-threaded `tokio` runtime. The AWS SDK is
//!    async, but the export is strictly sequential, so each adapter blocks on
//!    this runtime at its network boundary.
//! 2. **SDK Configuration**: region and ambient credential chain, loaded once
//!    and cloned into each service client.

use crate::config::AppConfig;
use crate::domain::errors::{ExportError, Result};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use log::info;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

/// `RuntimeContext` holds shared resources that exist for the entire run.
pub struct RuntimeContext {
    /// Shared so that adapters can outlive the borrow of this context.
    pub runtime: Arc<Runtime>,
    pub sdk_config: SdkConfig,
}

impl RuntimeContext {
    /// Starts the I/O runtime and loads the region-scoped SDK configuration.
    pub fn init(config: &AppConfig) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ExportError::ConfigError(format!("Failed to start I/O runtime: {}", e)))?;

        info!("Loading AWS configuration for region {}", config.aws.region);
        let sdk_config = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(config.aws.region.clone()))
                .load(),
        );

        Ok(Self {
            runtime: Arc::new(runtime),
            sdk_config,
        })
    }
}
