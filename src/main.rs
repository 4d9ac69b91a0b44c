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

//! Command-line entry point: one export run per invocation.

use clap::Parser;
use dynamo_s3_exporter::application::credentials::{DelegatedCredentialProvider, RoleSettings};
use dynamo_s3_exporter::application::orchestrator::ExportOrchestrator;
use dynamo_s3_exporter::application::runtime::RuntimeContext;
use dynamo_s3_exporter::application::uploader::DelegatedUploader;
use dynamo_s3_exporter::config::{AppConfig, CliArgs};
use dynamo_s3_exporter::domain::entities::ExportReport;
use dynamo_s3_exporter::domain::errors::Result;
use dynamo_s3_exporter::infrastructure::aws::dynamodb_scan_adapter::DynamoScanAdapter;
use dynamo_s3_exporter::infrastructure::aws::s3_blob_adapter::S3BlobAdapter;
use dynamo_s3_exporter::infrastructure::aws::sts_role_adapter::StsRoleAdapter;
use dynamo_s3_exporter::ports::clock::SystemClock;
use log::{error, info};
use std::process;
use std::sync::Arc;

fn main() {
    // 1. Initialize Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Parse Arguments
    let args = CliArgs::parse();

    // 3. Load and validate config before touching the network
    let config = match AppConfig::load(&args).and_then(|c| c.validate().map(|_| c)) {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    match run(config) {
        Ok(report) => {
            info!(
                "Export finished: {}",
                serde_json::to_string(&report).unwrap_or_else(|_| format!("{:?}", report))
            );
        }
        Err(e) => {
            error!("Export failed during {}: {}", e.step(), e);
            process::exit(1);
        }
    }
}

fn run(config: AppConfig) -> Result<ExportReport> {
    // 4. Initialize Hexagonal Components
    let ctx = RuntimeContext::init(&config)?;
    let dest = &config.destination;

    let scan_port = Arc::new(DynamoScanAdapter::new(&ctx));
    let role_port = Arc::new(StsRoleAdapter::new(
        &ctx,
        &dest.access_key_id,
        dest.secret_access_key.as_deref().unwrap_or_default(),
    ));
    let blob_port = Arc::new(S3BlobAdapter::new(&ctx));
    let clock = Arc::new(SystemClock);

    let credentials = DelegatedCredentialProvider::new(
        role_port,
        clock.clone(),
        RoleSettings {
            role_arn: dest.role_arn.clone(),
            session_name: dest.session_name().to_string(),
            session_duration: dest.session_duration(),
            expiry_window: dest.expiry_window(),
        },
    );
    let uploader = DelegatedUploader::new(credentials, blob_port, dest.bucket.clone());

    // 5. Run Orchestrator
    let orchestrator = ExportOrchestrator::new(scan_port, uploader, clock, config);
    info!("Starting export...");
    orchestrator.run()
}
