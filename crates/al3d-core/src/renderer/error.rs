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

//! Defines the hierarchy of error types for the rendering subsystem.

use crate::math::MathError;
use crate::renderer::api::ShaderStage;
use std::fmt;

/// An error raised while turning generated source into a usable program.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    /// One stage failed to compile.
    CompilationError {
        /// The program label (usually its permutation key).
        label: String,
        /// The stage that was rejected.
        stage: ShaderStage,
        /// The compiler's diagnostic.
        details: String,
    },
    /// Both stages compiled but the program failed to link.
    LinkError {
        /// The program label (usually its permutation key).
        label: String,
        /// The linker's diagnostic.
        details: String,
    },
    /// A uniform or attribute the generated source declares could not be resolved.
    MissingLocation {
        /// The program label.
        label: String,
        /// The uniform or attribute name.
        name: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::CompilationError {
                label,
                stage,
                details,
            } => {
                write!(
                    f,
                    "Shader compilation failed for '{label}' ({stage} stage): {details}"
                )
            }
            ShaderError::LinkError { label, details } => {
                write!(f, "Program link failed for '{label}': {details}")
            }
            ShaderError::MissingLocation { label, name } => {
                write!(f, "Program '{label}' has no active location named '{name}'")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error related to the creation or use of a graphics resource (buffers, textures, etc.).
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// A shader-specific error occurred.
    Shader(ShaderError),
    /// A generic resource could not be found.
    NotFound,
    /// The handle or ID used to reference a resource is invalid.
    InvalidHandle,
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
    /// An attempt was made to access a resource out of its bounds (e.g. a pixel read).
    OutOfBounds,
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
            ResourceError::NotFound => write!(f, "Resource not found with ID."),
            ResourceError::InvalidHandle => write!(f, "Invalid resource handle or ID."),
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
            ResourceError::OutOfBounds => {
                write!(f, "Resource access out of bounds.")
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

/// A high-level error returned by the renderer for a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// An error occurred while managing a graphics resource.
    ResourceError(ResourceError),
    /// A transform could not be computed (e.g. a singular model-view matrix).
    Math(MathError),
    /// A mesh reached the draw loop without a program assigned.
    MissingProgram(String),
    /// An unexpected or internal error occurred.
    Internal(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::ResourceError(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
            RenderError::Math(err) => write!(f, "Transform computation failed: {err}"),
            RenderError::MissingProgram(mesh) => {
                write!(f, "No program is assigned to mesh '{mesh}'")
            }
            RenderError::Internal(msg) => {
                write!(f, "An internal or unexpected error occurred: {msg}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
            RenderError::Math(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}

impl From<ShaderError> for RenderError {
    fn from(err: ShaderError) -> Self {
        RenderError::ResourceError(err.into())
    }
}

impl From<MathError> for RenderError {
    fn from(err: MathError) -> Self {
        RenderError::Math(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn shader_error_display_names_the_stage() {
        let err = ShaderError::CompilationError {
            label: "LambertMaterial1NOTEXTUREAL0DL1PL0".to_string(),
            stage: ShaderStage::Fragment,
            details: "0:12: 'foo' : undeclared identifier".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Shader compilation failed for 'LambertMaterial1NOTEXTUREAL0DL1PL0' (fragment stage): 0:12: 'foo' : undeclared identifier"
        );

        let link = ShaderError::LinkError {
            label: "picker".to_string(),
            details: "varying mismatch".to_string(),
        };
        assert_eq!(
            format!("{link}"),
            "Program link failed for 'picker': varying mismatch"
        );
    }

    #[test]
    fn render_error_display_wrapping_shader_error() {
        let shader_err = ShaderError::LinkError {
            label: "skybox".to_string(),
            details: "boom".to_string(),
        };
        let render_err: RenderError = shader_err.into();
        assert_eq!(
            format!("{render_err}"),
            "Graphics resource operation failed: Shader resource error: Program link failed for 'skybox': boom"
        );
        assert!(render_err.source().is_some());
        assert!(render_err.source().unwrap().source().is_some());
    }

    #[test]
    fn render_error_from_math_error() {
        let err: RenderError = MathError::SingularMatrix.into();
        assert_eq!(
            format!("{err}"),
            "Transform computation failed: Matrix is not invertible"
        );
    }
}
