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

//! # Credential Port
//!
//! Contract for the role-assumption exchange that yields the delegated,
//! time-limited credential used for delivery.

use crate::domain::entities::DelegatedCredential;
use crate::domain::errors::Result;
use chrono::Duration;

/// `RoleAssumptionPort` trades primary credentials for a delegated one.
pub trait RoleAssumptionPort: Send + Sync {
    /// Assumes `role` for `duration` under the given session name.
    fn assume_role(
        &self,
        role: &str,
        session_name: &str,
        duration: Duration,
    ) -> Result<DelegatedCredential>;
}
