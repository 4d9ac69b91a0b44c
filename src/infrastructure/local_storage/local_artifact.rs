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

//! Local-disk artifact sink with cleanup on failure.
//!
//! Rows are written to a temporary file in the destination's directory and
//! the file is atomically moved into place on `finish()`. If the sink is
//! dropped unfinished (a failed export), the temporary file is deleted and
//! nothing is left at the destination path.

use crate::domain::entities::ArtifactHandle;
use crate::domain::errors::{ExportError, Result};
use crate::ports::artifact_sink::ArtifactSink;
use log::debug;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub struct LocalArtifact {
    writer: BufWriter<NamedTempFile>,
    final_path: PathBuf,
    bytes: u64,
}

impl LocalArtifact {
    /// Opens a new artifact that will land at `final_path` once finished.
    ///
    /// Missing parent directories are created.
    pub fn create(final_path: impl AsRef<Path>) -> Result<Self> {
        let final_path = final_path.as_ref().to_path_buf();
        let parent_dir = match final_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if final_path.file_name().is_none() {
            return Err(ExportError::ConfigError(format!(
                "artifact path {} has no file name",
                final_path.display()
            )));
        }

        std::fs::create_dir_all(&parent_dir)?;
        let temp_file = NamedTempFile::new_in(&parent_dir)?;
        debug!(
            "Staging artifact for {} at {}",
            final_path.display(),
            temp_file.path().display()
        );

        Ok(Self {
            writer: BufWriter::with_capacity(128 * 1024, temp_file),
            final_path,
            bytes: 0,
        })
    }
}

impl ArtifactSink for LocalArtifact {
    type Handle = ArtifactHandle;

    fn append(&mut self, encoded: &[u8]) -> Result<()> {
        self.writer.write_all(encoded)?;
        self.bytes += encoded.len() as u64;
        Ok(())
    }

    fn finish(self) -> Result<ArtifactHandle> {
        let temp_file = self.writer.into_inner().map_err(|e| e.into_error())?;
        temp_file.as_file().sync_all()?;
        temp_file
            .persist(&self.final_path)
            .map_err(|e| ExportError::IoError(e.error))?;

        Ok(ArtifactHandle {
            path: self.final_path,
            bytes: self.bytes,
        })
    }
}
