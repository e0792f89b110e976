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

use crate::math::Color;
use serde::{Deserialize, Serialize};

/// Distance fog blended over lit and unlit materials alike.
///
/// The distance is measured in view space. The fog factor `f` is `1` for an
/// unfogged fragment and `0` for a fully fogged one:
///
/// - linear: `clamp((end - dist) / (end - start), 0, 1)`
/// - exp: `exp2(-density * dist * 1.442695)`
/// - exp2: `exp2(-density² * dist² * 1.442695)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Fog {
    /// Linear ramp between `start` and `end`.
    Linear {
        /// Fog color.
        color: Color,
        /// Distance at which fog begins.
        start: f32,
        /// Distance at which fog is total.
        end: f32,
    },
    /// Exponential falloff.
    Exp {
        /// Fog color.
        color: Color,
        /// Falloff density.
        density: f32,
    },
    /// Squared exponential falloff.
    Exp2 {
        /// Fog color.
        color: Color,
        /// Falloff density.
        density: f32,
    },
}

impl Fog {
    /// White linear fog from 1 to 10.
    pub fn linear() -> Self {
        Fog::Linear {
            color: Color::WHITE,
            start: 1.0,
            end: 10.0,
        }
    }

    /// White exponential fog of density 1.
    pub fn exp() -> Self {
        Fog::Exp {
            color: Color::WHITE,
            density: 1.0,
        }
    }

    /// White squared exponential fog of density 1.
    pub fn exp2() -> Self {
        Fog::Exp2 {
            color: Color::WHITE,
            density: 1.0,
        }
    }

    /// The fog color.
    pub fn color(&self) -> Color {
        match *self {
            Fog::Linear { color, .. } | Fog::Exp { color, .. } | Fog::Exp2 { color, .. } => color,
        }
    }

    /// Replaces the fog color.
    pub fn with_color(mut self, new_color: Color) -> Self {
        match &mut self {
            Fog::Linear { color, .. } | Fog::Exp { color, .. } | Fog::Exp2 { color, .. } => {
                *color = new_color
            }
        }
        self
    }

    /// Which formula the fog uses.
    pub fn mode(&self) -> FogMode {
        match self {
            Fog::Linear { .. } => FogMode::Linear,
            Fog::Exp { .. } => FogMode::Exp,
            Fog::Exp2 { .. } => FogMode::Exp2,
        }
    }

    /// CPU evaluation of the fog factor at view distance `dist`.
    pub fn factor(&self, dist: f32) -> f32 {
        const LOG2_E: f32 = 1.442695;
        match *self {
            Fog::Linear { start, end, .. } => {
                if end == start {
                    return if dist < end { 1.0 } else { 0.0 };
                }
                ((end - dist) / (end - start)).clamp(0.0, 1.0)
            }
            Fog::Exp { density, .. } => (-density * dist * LOG2_E).exp2(),
            Fog::Exp2 { density, .. } => (-density * density * dist * dist * LOG2_E).exp2(),
        }
    }
}

/// The fog formula, without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FogMode {
    /// See [`Fog::Linear`].
    Linear,
    /// See [`Fog::Exp`].
    Exp,
    /// See [`Fog::Exp2`].
    Exp2,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linear_factor_is_clamped() {
        let fog = Fog::linear();
        assert_eq!(fog.factor(0.0), 1.0);
        assert_abs_diff_eq!(fog.factor(5.5), 0.5, epsilon = 1e-6);
        assert_eq!(fog.factor(20.0), 0.0);
    }

    #[test]
    fn exponential_factors_decay() {
        assert_abs_diff_eq!(Fog::exp().factor(0.0), 1.0);
        assert_abs_diff_eq!(Fog::exp().factor(1.0), (-1.0f32).exp(), epsilon = 1e-5);
        assert!(Fog::exp2().factor(2.0) < Fog::exp().factor(2.0));
    }

    #[test]
    fn with_color_keeps_mode() {
        let fog = Fog::exp2().with_color(Color::BLACK);
        assert_eq!(fog.mode(), FogMode::Exp2);
        assert_eq!(fog.color(), Color::BLACK);
    }
}
