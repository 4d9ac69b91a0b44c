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

//! # Configuration
//!
//! Settings are read once at startup into an explicit `AppConfig` value and
//! passed down to each component. Sources, lowest precedence first:
//! 1. An optional YAML or JSON file (`--config` / `EXPORT_CONFIG`).
//! 2. Command-line flags, each of which can also come from the environment
//!    (`VT_REGION`, `AWS_TABLE`, `BATCH_SIZE`, `AWS_BUCKET`, `AWS_ROLE`,
//!    `AWS_ACCESS`, `AWS_SECRET`, ...).
//!
//! `validate()` runs before any network or disk I/O.

use crate::domain::entities::TableSchema;
use crate::domain::errors::{ExportError, Result};
use chrono::Duration;
use clap::Parser;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

pub const DEFAULT_KEY_PREFIX: &str = "dynamo";
pub const DEFAULT_FILE_PREFIX: &str = "TT";
pub const DEFAULT_LOCAL_PATH: &str = "/tmp/dynamo.csv";
pub const DEFAULT_SESSION_NAME: &str = "dynamo-export";
pub const DEFAULT_SESSION_DURATION_SECS: u64 = 60 * 60;
pub const DEFAULT_EXPIRY_WINDOW_SECS: u64 = 30;

/// AssumeRole accepts durations between 15 minutes and 12 hours.
const MIN_SESSION_DURATION_SECS: u64 = 900;
const MAX_SESSION_DURATION_SECS: u64 = 43_200;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub aws: AwsConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub destination: DestinationConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AwsConfig {
    /// Region for both the table and the bucket.
    #[serde(default)]
    pub region: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SourceConfig {
    #[serde(default)]
    pub table: String,
    pub batch_size: Option<usize>,
    pub consistent_read: Option<bool>,
    /// Exported columns, in order. Defaults to `UUID`, `Customer`.
    pub fields: Option<Vec<String>>,
    /// Re-issue a failed page this many times before giving up.
    pub max_page_retries: Option<u32>,
}

#[derive(Deserialize, Clone, Default)]
pub struct DestinationConfig {
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub role_arn: String,
    #[serde(default)]
    pub access_key_id: String,
    pub secret_access_key: Option<String>,
    pub key_prefix: Option<String>,
    pub file_prefix: Option<String>,
    pub local_path: Option<String>,
    pub session_name: Option<String>,
    pub session_duration_secs: Option<u64>,
    pub expiry_window_secs: Option<u64>,
}

impl fmt::Debug for DestinationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DestinationConfig")
            .field("bucket", &self.bucket)
            .field("role_arn", &self.role_arn)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("key_prefix", &self.key_prefix)
            .field("file_prefix", &self.file_prefix)
            .field("local_path", &self.local_path)
            .field("session_name", &self.session_name)
            .field("session_duration_secs", &self.session_duration_secs)
            .field("expiry_window_secs", &self.expiry_window_secs)
            .finish()
    }
}

impl DestinationConfig {
    pub fn key_prefix(&self) -> &str {
        self.key_prefix.as_deref().unwrap_or(DEFAULT_KEY_PREFIX)
    }

    pub fn file_prefix(&self) -> &str {
        self.file_prefix.as_deref().unwrap_or(DEFAULT_FILE_PREFIX)
    }

    pub fn local_path(&self) -> &str {
        self.local_path.as_deref().unwrap_or(DEFAULT_LOCAL_PATH)
    }

    pub fn session_name(&self) -> &str {
        self.session_name.as_deref().unwrap_or(DEFAULT_SESSION_NAME)
    }

    pub fn session_duration(&self) -> Duration {
        Duration::seconds(
            self.session_duration_secs
                .unwrap_or(DEFAULT_SESSION_DURATION_SECS) as i64,
        )
    }

    pub fn expiry_window(&self) -> Duration {
        Duration::seconds(self.expiry_window_secs.unwrap_or(DEFAULT_EXPIRY_WINDOW_SECS) as i64)
    }
}

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file (YAML or JSON)
    #[arg(short, long, env = "EXPORT_CONFIG")]
    pub config: Option<String>,

    #[arg(long, env = "VT_REGION")]
    pub region: Option<String>,
    #[arg(long, env = "AWS_TABLE")]
    pub table: Option<String>,
    /// Items requested per scan page
    #[arg(long, env = "BATCH_SIZE")]
    pub batch_size: Option<usize>,
    /// Use strongly consistent reads for the scan
    #[arg(long)]
    pub consistent_read: bool,
    #[arg(long)]
    pub max_page_retries: Option<u32>,

    #[arg(long, env = "AWS_BUCKET")]
    pub bucket: Option<String>,
    /// ARN of the role assumed for the upload
    #[arg(long, env = "AWS_ROLE")]
    pub role: Option<String>,
    #[arg(long, env = "AWS_ACCESS")]
    pub access_key_id: Option<String>,
    #[arg(long, env = "AWS_SECRET", hide_env_values = true)]
    pub secret_access_key: Option<String>,
    #[arg(long, env = "EXPORT_KEY_PREFIX")]
    pub key_prefix: Option<String>,
    #[arg(long, env = "EXPORT_FILE_PREFIX")]
    pub file_prefix: Option<String>,
    /// Local path of the CSV artifact
    #[arg(short, long, env = "EXPORT_LOCAL_PATH")]
    pub output: Option<String>,
}

impl AppConfig {
    /// Builds the configuration from an optional file plus CLI/env overrides.
    pub fn load(args: &CliArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.merge_cli(args);
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ExportError::ConfigError(format!("cannot read config file {}: {}", path, e))
        })?;

        let config: AppConfig = if path.ends_with(".json") {
            serde_json::from_str(&contents)
                .map_err(|e| ExportError::ConfigError(format!("{}: {}", path, e)))?
        } else {
            serde_yaml::from_str(&contents)
                .map_err(|e| ExportError::ConfigError(format!("{}: {}", path, e)))?
        };

        Ok(config)
    }

    pub fn merge_cli(&mut self, args: &CliArgs) {
        if let Some(r) = &args.region { self.aws.region = r.clone(); }
        if let Some(t) = &args.table { self.source.table = t.clone(); }
        if let Some(b) = args.batch_size { self.source.batch_size = Some(b); }
        if args.consistent_read { self.source.consistent_read = Some(true); }
        if let Some(n) = args.max_page_retries { self.source.max_page_retries = Some(n); }
        if let Some(b) = &args.bucket { self.destination.bucket = b.clone(); }
        if let Some(r) = &args.role { self.destination.role_arn = r.clone(); }
        if let Some(a) = &args.access_key_id { self.destination.access_key_id = a.clone(); }
        if let Some(s) = &args.secret_access_key { self.destination.secret_access_key = Some(s.clone()); }
        if let Some(p) = &args.key_prefix { self.destination.key_prefix = Some(p.clone()); }
        if let Some(p) = &args.file_prefix { self.destination.file_prefix = Some(p.clone()); }
        if let Some(o) = &args.output { self.destination.local_path = Some(o.clone()); }
    }

    /// Schema of the exported rows.
    pub fn schema(&self) -> TableSchema {
        match &self.source.fields {
            Some(fields) => TableSchema::new(fields.clone()),
            None => TableSchema::default(),
        }
    }

    /// The validated, positive page size.
    pub fn batch_size(&self) -> Result<usize> {
        match self.source.batch_size {
            None => Err(ExportError::ConfigError(
                "batch size is not set (BATCH_SIZE)".to_string(),
            )),
            Some(0) => Err(ExportError::ConfigError(
                "batch size must be a positive integer".to_string(),
            )),
            Some(n) if n > i32::MAX as usize => Err(ExportError::ConfigError(format!(
                "batch size {} exceeds the maximum page size",
                n
            ))),
            Some(n) => Ok(n),
        }
    }

    /// Checks every required setting. Performs no I/O.
    pub fn validate(&self) -> Result<()> {
        fn required(value: &str, what: &str) -> Result<()> {
            if value.trim().is_empty() {
                return Err(ExportError::ConfigError(format!("{} is not set", what)));
            }
            Ok(())
        }

        required(&self.aws.region, "region (VT_REGION)")?;
        required(&self.source.table, "table (AWS_TABLE)")?;
        self.batch_size()?;

        if let Some(fields) = &self.source.fields {
            if fields.is_empty() {
                return Err(ExportError::ConfigError("field list is empty".to_string()));
            }
            let mut seen = HashSet::new();
            for f in fields {
                if f.trim().is_empty() {
                    return Err(ExportError::ConfigError("field name is empty".to_string()));
                }
                if !seen.insert(f.as_str()) {
                    return Err(ExportError::ConfigError(format!("duplicate field {}", f)));
                }
            }
        }

        let dest = &self.destination;
        required(&dest.bucket, "bucket (AWS_BUCKET)")?;
        required(&dest.role_arn, "role (AWS_ROLE)")?;
        required(&dest.access_key_id, "access key id (AWS_ACCESS)")?;
        required(
            dest.secret_access_key.as_deref().unwrap_or_default(),
            "secret access key (AWS_SECRET)",
        )?;
        required(dest.key_prefix(), "key prefix")?;
        required(dest.file_prefix(), "file prefix")?;
        required(dest.local_path(), "local artifact path")?;
        required(dest.session_name(), "session name")?;
        if dest.file_prefix().contains('/') {
            return Err(ExportError::ConfigError(
                "file prefix must not contain '/'".to_string(),
            ));
        }

        let duration = dest
            .session_duration_secs
            .unwrap_or(DEFAULT_SESSION_DURATION_SECS);
        if !(MIN_SESSION_DURATION_SECS..=MAX_SESSION_DURATION_SECS).contains(&duration) {
            return Err(ExportError::ConfigError(format!(
                "session duration {}s is outside {}..={}s",
                duration, MIN_SESSION_DURATION_SECS, MAX_SESSION_DURATION_SECS
            )));
        }
        let window = dest.expiry_window_secs.unwrap_or(DEFAULT_EXPIRY_WINDOW_SECS);
        if window >= duration {
            return Err(ExportError::ConfigError(format!(
                "expiry window {}s must be shorter than the session duration {}s",
                window, duration
            )));
        }

        Ok(())
    }
}
