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

//! Provides the backend-agnostic rendering contracts.
//!
//! This module defines the "common language" between the renderer in `al3d-lanes`
//! and a concrete context in `al3d-infra`: the [`GraphicsContext`] trait, the
//! handle and value types it exchanges, the light model, and the error hierarchy.

pub mod api;
pub mod error;
pub mod light;
pub mod traits;

pub use self::api::*;
pub use self::error::{RenderError, ResourceError, ShaderError};
pub use self::light::{Attenuation, Light, LightBuckets, LightCounts, LightKind, LightType};
pub use self::traits::GraphicsContext;
