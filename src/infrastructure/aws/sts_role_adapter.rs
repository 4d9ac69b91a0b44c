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

//! `RoleAssumptionPort` backed by STS `AssumeRole`.
//!
//! The exchange is signed with the static primary credentials from the
//! configuration, not with the ambient credential chain used for the table.

use crate::application::runtime::RuntimeContext;
use crate::domain::entities::DelegatedCredential;
use crate::domain::errors::{ExportError, Result};
use crate::ports::credential_port::RoleAssumptionPort;
use aws_sdk_sts::config::{Builder as StsConfigBuilder, Credentials};
use aws_sdk_sts::error::DisplayErrorContext;
use aws_sdk_sts::Client;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::runtime::Runtime;

pub struct StsRoleAdapter {
    client: Client,
    runtime: Arc<Runtime>,
}

impl StsRoleAdapter {
    pub fn new(ctx: &RuntimeContext, access_key_id: &str, secret_access_key: &str) -> Self {
        let primary = Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "exporter-primary",
        );
        let conf = StsConfigBuilder::from(&ctx.sdk_config)
            .credentials_provider(primary)
            .build();
        Self {
            client: Client::from_conf(conf),
            runtime: ctx.runtime.clone(),
        }
    }
}

impl RoleAssumptionPort for StsRoleAdapter {
    fn assume_role(
        &self,
        role: &str,
        session_name: &str,
        duration: Duration,
    ) -> Result<DelegatedCredential> {
        let seconds = i32::try_from(duration.num_seconds()).map_err(|_| {
            ExportError::CredentialError(format!("session duration {} is out of range", duration))
        })?;

        let output = self
            .runtime
            .block_on(
                self.client
                    .assume_role()
                    .role_arn(role)
                    .role_session_name(session_name)
                    .duration_seconds(seconds)
                    .send(),
            )
            .map_err(|e| {
                ExportError::CredentialError(format!(
                    "AssumeRole {} failed: {}",
                    role,
                    DisplayErrorContext(&e)
                ))
            })?;

        let creds = output.credentials().ok_or_else(|| {
            ExportError::CredentialError(format!("AssumeRole {} returned no credentials", role))
        })?;

        let exp = creds.expiration();
        let expiration = DateTime::<Utc>::from_timestamp(exp.secs(), exp.subsec_nanos())
            .ok_or_else(|| {
                ExportError::CredentialError(format!("invalid credential expiration {}s", exp.secs()))
            })?;

        Ok(DelegatedCredential {
            access_key_id: creds.access_key_id().to_string(),
            secret_access_key: creds.secret_access_key().to_string(),
            session_token: creds.session_token().to_string(),
            expiration,
        })
    }
}
