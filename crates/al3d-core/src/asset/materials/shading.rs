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

//! Where lighting is evaluated, and which faces receive it.

use serde::{Deserialize, Serialize};

/// The interpolation mode used by lit materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Shading {
    /// One normal per triangle, derived from screen-space derivatives.
    Flat = 0,
    /// Lighting evaluated per vertex and interpolated.
    #[default]
    Gouraud = 1,
    /// Lighting evaluated per fragment.
    Phong = 2,
}

impl Shading {
    /// The discriminant written into program keys.
    pub fn key_digit(self) -> u8 {
        self as u8
    }

    /// Whether the lighting accumulation runs in the fragment stage.
    pub fn is_per_fragment(self) -> bool {
        !matches!(self, Shading::Gouraud)
    }
}

/// Which faces of a lit mesh are shaded.
///
/// A two-sided material accumulates a second color with the flipped normal and
/// picks between the two with `gl_FrontFacing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sides {
    /// Only the front face receives light.
    #[default]
    OneSide = 0,
    /// Both faces receive light.
    TwoSide = 1,
}
