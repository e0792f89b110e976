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

//! Compiled programs, their location tables, and the cache that owns them.

use super::generator::{generate, uniform_names, ShaderSource};
use super::permutation::ShaderPermutation;
use ahash::AHashMap;
use al3d_core::renderer::{
    AttribLocation, GraphicsContext, ProgramHandle, ProgramId, ProgramKey, ResourceError, ShaderError,
    ShaderStage, UniformLocation,
};
use al3d_core::scene::AttributeSlots;

/// Compiles both stages of `source` and links them.
///
/// Nothing is retained on failure; the error carries the compiler or linker
/// diagnostic and `label`.
pub fn build_program(
    ctx: &mut dyn GraphicsContext,
    label: &str,
    source: &ShaderSource,
) -> Result<ProgramId, ResourceError> {
    let vertex = ctx.compile_shader(label, ShaderStage::Vertex, &source.vertex)?;
    let fragment = ctx.compile_shader(label, ShaderStage::Fragment, &source.fragment)?;
    ctx.link_program(label, vertex, fragment)
}

/// Looks up an attribute the program cannot work without.
pub fn require_attrib(
    ctx: &dyn GraphicsContext,
    program: ProgramId,
    label: &str,
    name: &str,
) -> Result<AttribLocation, ShaderError> {
    ctx.attrib_location(program, name)
        .ok_or_else(|| ShaderError::MissingLocation {
            label: label.to_owned(),
            name: name.to_owned(),
        })
}

/// Looks up a uniform the program cannot work without.
pub fn require_uniform(
    ctx: &dyn GraphicsContext,
    program: ProgramId,
    label: &str,
    name: &str,
) -> Result<UniformLocation, ShaderError> {
    ctx.uniform_location(program, name)
        .ok_or_else(|| ShaderError::MissingLocation {
            label: label.to_owned(),
            name: name.to_owned(),
        })
}

/// The attribute slots and uniform locations resolved for one program.
#[derive(Debug, Clone, Default)]
pub struct ProgramLocations {
    /// Where the vertex streams are bound.
    pub attributes: AttributeSlots,
    uniforms: AHashMap<String, UniformLocation>,
}

impl ProgramLocations {
    /// Resolves the standard attributes and every uniform in `names`.
    ///
    /// Uniforms the program does not expose are skipped, except `uMVP`.
    ///
    /// # Errors
    ///
    /// `ShaderError::MissingLocation` when `aPosition` or `uMVP` cannot be resolved.
    pub fn resolve<'a>(
        ctx: &dyn GraphicsContext,
        program: ProgramId,
        label: &str,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, ShaderError> {
        let position = require_attrib(ctx, program, label, "aPosition")?;
        let attributes = AttributeSlots {
            position: Some(position),
            normal: ctx.attrib_location(program, "aNormal"),
            uv: ctx.attrib_location(program, "aUV"),
        };

        let mut uniforms = AHashMap::new();
        for name in names {
            if let Some(location) = ctx.uniform_location(program, name) {
                uniforms.insert(name.to_owned(), location);
            }
        }
        if !uniforms.contains_key("uMVP") {
            return Err(ShaderError::MissingLocation {
                label: label.to_owned(),
                name: "uMVP".to_owned(),
            });
        }
        Ok(Self {
            attributes,
            uniforms,
        })
    }

    /// The location of `name`, if the program exposes it.
    pub fn uniform(&self, name: &str) -> Option<UniformLocation> {
        self.uniforms.get(name).copied()
    }

    /// Number of resolved uniforms.
    pub fn uniform_count(&self) -> usize {
        self.uniforms.len()
    }
}

/// A linked material program.
#[derive(Debug, Clone)]
pub struct CompiledProgram {
    /// The context handle.
    pub id: ProgramId,
    /// The permutation it was generated from.
    pub permutation: ShaderPermutation,
    /// Resolved locations.
    pub locations: ProgramLocations,
}

/// Generated programs, filed by [`ProgramKey`].
///
/// Programs whose permutations share a key but differ on an axis the key does
/// not encode live side by side in the key's bucket; [`ProgramHandle::slot`]
/// indexes into it. Entries are never evicted.
#[derive(Debug, Default)]
pub struct ProgramCache {
    programs: AHashMap<ProgramKey, Vec<CompiledProgram>>,
}

impl ProgramCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the program for `permutation`, generating and linking it on a miss.
    ///
    /// The boolean is `true` when a program was built by this call.
    ///
    /// # Errors
    ///
    /// Compile, link and location errors are returned as is and nothing is
    /// cached, so the next call tries again.
    pub fn get_or_build(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        permutation: &ShaderPermutation,
    ) -> Result<(ProgramHandle, bool), ResourceError> {
        let key = permutation.cache_key();
        if let Some(slot) = self.programs.get(&key).and_then(|bucket| {
            bucket
                .iter()
                .position(|program| program.permutation == *permutation)
        }) {
            log::debug!("ProgramCache: hit for '{key}' (slot {slot})");
            return Ok((ProgramHandle { key, slot }, false));
        }

        let label = permutation.label();
        log::debug!("ProgramCache: miss for '{label}'");
        let source = generate(permutation);
        let id = build_program(ctx, &label, &source)?;
        let names = uniform_names(permutation);
        let locations =
            ProgramLocations::resolve(ctx, id, &label, names.iter().map(String::as_str))?;
        log::info!(
            "ProgramCache: linked '{label}' ({} uniforms, AL{} DL{} PL{})",
            locations.uniform_count(),
            permutation.ambient,
            permutation.directional,
            permutation.point
        );

        let bucket = self.programs.entry(key.clone()).or_default();
        bucket.push(CompiledProgram {
            id,
            permutation: *permutation,
            locations,
        });
        Ok((
            ProgramHandle {
                key,
                slot: bucket.len() - 1,
            },
            true,
        ))
    }

    /// The program behind `handle`.
    pub fn get(&self, handle: &ProgramHandle) -> Option<&CompiledProgram> {
        self.programs
            .get(&handle.key)
            .and_then(|bucket| bucket.get(handle.slot))
    }

    /// Whether any program is filed under `key`.
    pub fn contains_key(&self, key: &ProgramKey) -> bool {
        self.programs.contains_key(key)
    }

    /// Total number of programs.
    pub fn len(&self) -> usize {
        self.programs.values().map(Vec::len).sum()
    }

    /// Whether no program was built yet.
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use al3d_core::asset::{MaterialVariant, Sides};
    use al3d_infra::HeadlessContext;

    #[test]
    fn programs_link_under_their_full_label() {
        let mut ctx = HeadlessContext::new(8, 8);
        let mut cache = ProgramCache::new();
        let permutation = ShaderPermutation {
            variant: MaterialVariant::Lambert,
            sides: Sides::TwoSide,
            directional: 1,
            ..ShaderPermutation::basic()
        };

        let (handle, built) = cache.get_or_build(&mut ctx, &permutation).unwrap();
        assert!(built);
        let id = cache.get(&handle).map(|program| program.id).unwrap();
        assert_eq!(ctx.program_label(id), Some(permutation.label().as_str()));
        assert_eq!(
            ctx.program_label(id),
            Some("LambertMaterial1NOTEXTUREAL0DL1PL0+TWOSIDE")
        );

        let (again, built) = cache.get_or_build(&mut ctx, &permutation).unwrap();
        assert!(!built);
        assert_eq!(again, handle);
        assert_eq!(cache.len(), 1);
    }
}
