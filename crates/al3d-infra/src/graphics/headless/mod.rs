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

//! The headless backend: a recording, validating [`GraphicsContext`] for
//! tests, tools and machines without a GPU.
//!
//! [`GraphicsContext`]: al3d_core::renderer::GraphicsContext

mod command;
mod context;
mod glsl;

pub use command::{Command, DrawRecord, RecordedValue};
pub use context::HeadlessContext;
