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

//! # Delegated Credentials
//!
//! Obtains the short-lived credential used for delivery and decides when it
//! must be exchanged again. A cached credential is handed out only while the
//! clock is outside its expiry safety margin; anything closer to expiry
//! triggers a fresh role assumption.

use crate::domain::entities::DelegatedCredential;
use crate::domain::errors::{ExportError, Result};
use crate::ports::clock::Clock;
use crate::ports::credential_port::RoleAssumptionPort;
use chrono::Duration;
use log::{debug, info};
use std::sync::{Arc, Mutex};

/// Settings for the role-assumption exchange.
#[derive(Debug, Clone)]
pub struct RoleSettings {
    pub role_arn: String,
    pub session_name: String,
    /// Requested validity of each delegated credential.
    pub session_duration: Duration,
    /// Safety margin before expiry during which a credential is treated as stale.
    pub expiry_window: Duration,
}

pub struct DelegatedCredentialProvider {
    port: Arc<dyn RoleAssumptionPort>,
    clock: Arc<dyn Clock>,
    settings: RoleSettings,
    cached: Mutex<Option<DelegatedCredential>>,
}

impl DelegatedCredentialProvider {
    pub fn new(
        port: Arc<dyn RoleAssumptionPort>,
        clock: Arc<dyn Clock>,
        settings: RoleSettings,
    ) -> Self {
        Self {
            port,
            clock,
            settings,
            cached: Mutex::new(None),
        }
    }

    /// Returns a credential that is fresh right now.
    pub fn credential(&self) -> Result<DelegatedCredential> {
        let mut cached = self
            .cached
            .lock()
            .map_err(|_| ExportError::CredentialError("credential cache poisoned".to_string()))?;

        let now = self.clock.now();
        if let Some(cred) = cached.as_ref() {
            if cred.is_fresh(now, self.settings.expiry_window) {
                debug!("Reusing delegated credential valid until {}", cred.expiration);
                return Ok(cred.clone());
            }
            info!(
                "Delegated credential expires at {}, within the {}s safety margin; refreshing",
                cred.expiration,
                self.settings.expiry_window.num_seconds()
            );
        }
        *cached = None;

        info!("Assuming role {} for upload", self.settings.role_arn);
        let cred = self.port.assume_role(
            &self.settings.role_arn,
            &self.settings.session_name,
            self.settings.session_duration,
        )?;

        let now = self.clock.now();
        if !cred.is_fresh(now, self.settings.expiry_window) {
            return Err(ExportError::CredentialError(format!(
                "role {} returned a credential expiring at {}, inside the safety margin",
                self.settings.role_arn, cred.expiration
            )));
        }

        *cached = Some(cred.clone());
        Ok(cred)
    }

    /// Drops any cached credential.
    pub fn discard(&self) {
        if let Ok(mut cached) = self.cached.lock() {
            *cached = None;
        }
    }
}
