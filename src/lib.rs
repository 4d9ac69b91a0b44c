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

//! # DynamoDB to S3 Exporter
//!
//! Exports a full DynamoDB table to a CSV file, page by page, then delivers
//! the file to S3 under a day-partitioned key using credentials obtained by
//! assuming a dedicated upload role.
//!
//! This crate follows the **Hexagonal Architecture** (Ports and Adapters):
//! `domain` holds the entities and the codec, `ports` the traits at every I/O
//! seam, `application` the pipeline, and `infrastructure` the AWS and
//! local-disk adapters.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;
