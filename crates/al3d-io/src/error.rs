// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use thiserror::Error;

/// Why an asset could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file is not valid JSON or does not have the expected shape.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The image could not be decoded.
    #[error("image decoding failed: {0}")]
    Image(#[from] image::ImageError),
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The mesh parsed but its streams are inconsistent.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
}
