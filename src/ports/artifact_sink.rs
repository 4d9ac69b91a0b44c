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

//! # Artifact Sink Port
//!
//! Where the export writer appends encoded rows. A sink is append-only until
//! `finish` is called, which flushes it and hands back something the uploader
//! can read.

use crate::domain::errors::Result;

pub trait ArtifactSink {
    /// What the sink turns into once finished.
    type Handle;

    /// Appends one encoded chunk.
    fn append(&mut self, encoded: &[u8]) -> Result<()>;

    /// Flushes and closes the sink.
    fn finish(self) -> Result<Self::Handle>;
}

/// In-memory sink, handy when the artifact is small or inspected directly.
impl ArtifactSink for Vec<u8> {
    type Handle = Vec<u8>;

    fn append(&mut self, encoded: &[u8]) -> Result<()> {
        self.extend_from_slice(encoded);
        Ok(())
    }

    fn finish(self) -> Result<Self::Handle> {
        Ok(self)
    }
}
