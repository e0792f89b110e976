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

use super::shaders::KERNEL_FRAG;
use super::PostEffect;
use al3d_core::renderer::{
    GraphicsContext, ProgramId, RenderTarget, ResourceError, ShaderError, UniformValue,
};

/// A 3x3 convolution over the frame.
///
/// Weights are row-major, top row first. They are divided by their sum before
/// upload, unless the sum is zero or negative (edge kernels).
#[derive(Debug, Clone, PartialEq)]
pub struct KernelEffect {
    label: String,
    kernel: [f32; 9],
}

impl KernelEffect {
    /// A convolution with arbitrary weights.
    pub fn new(label: impl Into<String>, kernel: [f32; 9]) -> Self {
        Self {
            label: label.into(),
            kernel,
        }
    }

    /// Laplacian edge detection.
    pub fn edge_detection() -> Self {
        Self::new(
            "EdgeDetection",
            [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
        )
    }

    /// Unsharp cross kernel.
    pub fn sharpen() -> Self {
        Self::new("Sharpen", [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0])
    }

    /// 3x3 binomial blur.
    pub fn gaussian_blur() -> Self {
        Self::new("GaussianBlur", [1.0, 2.0, 1.0, 2.0, 4.0, 2.0, 1.0, 2.0, 1.0])
    }

    /// The weights as uploaded.
    pub fn normalized_kernel(&self) -> [f32; 9] {
        let weight: f32 = self.kernel.iter().sum();
        if weight <= 0.0 {
            return self.kernel;
        }
        self.kernel.map(|k| k / weight)
    }
}

impl PostEffect for KernelEffect {
    fn label(&self) -> &str {
        &self.label
    }

    fn fragment_source(&self) -> &str {
        KERNEL_FRAG
    }

    fn process(
        &self,
        ctx: &mut dyn GraphicsContext,
        program: ProgramId,
        target: &RenderTarget,
    ) -> Result<(), ResourceError> {
        let missing = |name: &str| {
            ResourceError::from(ShaderError::MissingLocation {
                label: self.label.clone(),
                name: name.to_owned(),
            })
        };
        let kernel = ctx
            .uniform_location(program, "uKernel")
            .ok_or_else(|| missing("uKernel"))?;
        let size = ctx
            .uniform_location(program, "uTextureSize")
            .ok_or_else(|| missing("uTextureSize"))?;

        let weights = self.normalized_kernel();
        ctx.set_uniform(kernel, UniformValue::FloatArray(&weights))?;
        ctx.set_uniform(
            size,
            UniformValue::Vec2([target.width as f32, target.height as f32]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn blur_weights_sum_to_one() {
        let sum: f32 = KernelEffect::gaussian_blur().normalized_kernel().iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn zero_sum_kernels_are_left_alone() {
        let edge = KernelEffect::edge_detection();
        assert_eq!(edge.normalized_kernel()[4], 8.0);
        assert_eq!(edge.label(), "EdgeDetection");
    }

    #[test]
    fn all_kernels_share_one_shader() {
        assert_eq!(
            KernelEffect::sharpen().fragment_source(),
            KernelEffect::gaussian_blur().fragment_source()
        );
    }
}
