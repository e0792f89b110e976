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

//! # AL3D Infra
//!
//! Concrete implementations of the contracts declared in `al3d-core`.
//!
//! - [`graphics::headless::HeadlessContext`]: a [`GraphicsContext`] that
//!   validates and records every call instead of driving a GPU.
//! - [`logging::init`]: the `env_logger` bootstrap binaries call first.
//!
//! [`GraphicsContext`]: al3d_core::renderer::GraphicsContext

#![warn(missing_docs)]

pub mod graphics;
pub mod logging;

pub use graphics::headless::HeadlessContext;
