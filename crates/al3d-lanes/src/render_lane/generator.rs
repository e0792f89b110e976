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

//! GLSL source generation for material programs.
//!
//! [`generate`] is a pure function of a [`ShaderPermutation`]: it never touches
//! a graphics context, so every permutation can be inspected as text. Only the
//! light buckets that are non-empty get a struct, an array and an accumulation
//! loop; spot lights always get a fixed array of [`MAX_SPOT_LIGHTS`] counted by
//! `uSpotLightCount`.
//!
//! Gouraud programs accumulate light in the vertex stage into `fColor` (and
//! `bColor` for two-sided materials). Phong and Flat programs, and every Toon
//! program, accumulate in the fragment stage from interpolated view-space
//! position and normal. Light positions and directions are expected in view
//! space.

use super::permutation::{ShaderPermutation, MAX_SPOT_LIGHTS};
use al3d_core::asset::{MaterialVariant, Shading, Sides};
use al3d_core::scene::FogMode;

/// A generated vertex and fragment stage pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    /// The vertex stage.
    pub vertex: String,
    /// The fragment stage.
    pub fragment: String,
}

/// Line-oriented GLSL writer with indentation.
#[derive(Default)]
struct Glsl {
    buf: String,
    depth: usize,
}

impl Glsl {
    fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.buf.push_str("    ");
        }
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
    }

    fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.depth += 1;
    }

    fn close(&mut self, text: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    fn blank(&mut self) {
        self.buf.push('\n');
    }

    fn finish(self) -> String {
        self.buf
    }
}

/// Which stage a chunk is written for; decides the uv name it samples with.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    fn uv(self) -> &'static str {
        match self {
            Stage::Vertex => "aUV",
            Stage::Fragment => "vUV",
        }
    }
}

fn lights_in_vertex(p: &ShaderPermutation) -> bool {
    p.is_lit() && !p.lights_per_fragment()
}

fn lights_in_fragment(p: &ShaderPermutation) -> bool {
    p.is_lit() && p.lights_per_fragment()
}

/// Whether the program reads the interpolated vertex normal. Flat shading
/// reconstructs the face normal instead.
fn uses_vertex_normal(p: &ShaderPermutation) -> bool {
    p.is_lit() && p.shading != Shading::Flat
}

fn needs_derivatives(p: &ShaderPermutation) -> bool {
    lights_in_fragment(p) && (p.shading == Shading::Flat || p.applies_normal_map())
}

/// Specular maps only feed the specular exponent.
fn uses_specular_map(p: &ShaderPermutation) -> bool {
    p.has_specular_map && p.variant.has_specular()
}

fn has_material_block(p: &ShaderPermutation) -> bool {
    p.is_lit() && p.variant != MaterialVariant::Toon
}

/// Generates both stages for `permutation`.
///
/// # Examples
///
/// ```
/// use al3d_core::asset::{MaterialVariant, Shading};
/// use al3d_lanes::render_lane::{generate, ShaderPermutation};
///
/// let permutation = ShaderPermutation {
///     variant: MaterialVariant::Lambert,
///     shading: Shading::Gouraud,
///     directional: 1,
///     ..ShaderPermutation::basic()
/// };
/// let source = generate(&permutation);
/// assert!(source.vertex.contains("calculeDirectionalLight"));
/// assert!(!source.fragment.contains("calculeDirectionalLight"));
/// ```
pub fn generate(permutation: &ShaderPermutation) -> ShaderSource {
    ShaderSource {
        vertex: vertex_stage(permutation),
        fragment: fragment_stage(permutation),
    }
}

/// Every uniform the generated source declares, with light struct members
/// expanded per array element.
pub fn uniform_names(p: &ShaderPermutation) -> Vec<String> {
    let mut names = vec!["uMVP".to_string()];
    if p.is_lit() || p.fog.is_some() {
        names.push("uViewModel".into());
    }
    if uses_vertex_normal(p) {
        names.push("uNormalMatrix".into());
    }
    if p.has_texture {
        names.push("uSampler".into());
    }
    if p.has_specular_map {
        names.push("uSpecularMapSampler".into());
    }
    if p.has_normal_map {
        names.push("uNormalMapSampler".into());
    }
    if !p.is_lit() || p.variant == MaterialVariant::Toon {
        names.push("uBaseColor".into());
    }
    if !p.is_lit() {
        push_fog_names(&mut names, p);
        return names;
    }

    if p.variant == MaterialVariant::Toon {
        names.push("uSamplerToon".into());
    } else {
        names.push("material.diffuseColor".into());
        if p.variant.has_specular() {
            names.push("material.specularColor".into());
            names.push("material.shininess".into());
        }
    }

    let members = |names: &mut Vec<String>, array: &str, count: usize, fields: &[&str]| {
        for i in 0..count {
            for field in fields {
                names.push(format!("{array}[{i}].{field}"));
            }
        }
    };
    members(&mut names, "ambientLights", p.ambient, &["color", "intensity"]);
    members(
        &mut names,
        "directionalLights",
        p.directional,
        &["color", "intensity", "position"],
    );
    let point_fields = [
        "color",
        "intensity",
        "position",
        "constantAttenuation",
        "linearAttenuation",
        "quadraticAttenuation",
    ];
    members(&mut names, "pointLights", p.point, &point_fields);
    let spot_fields: Vec<&str> = point_fields
        .iter()
        .copied()
        .chain(["coneDirection", "spotCosCutOff", "spotExponent"])
        .collect();
    members(&mut names, "spotLights", MAX_SPOT_LIGHTS, &spot_fields);
    names.push("uSpotLightCount".into());

    push_fog_names(&mut names, p);
    names
}

fn push_fog_names(names: &mut Vec<String>, p: &ShaderPermutation) {
    match p.fog {
        Some(FogMode::Linear) => {
            names.extend(["uFogColor", "uStartFog", "uEndFog"].map(String::from));
        }
        Some(FogMode::Exp | FogMode::Exp2) => {
            names.extend(["uFogColor", "uFogDensity"].map(String::from));
        }
        None => {}
    }
}

fn vertex_stage(p: &ShaderPermutation) -> String {
    let mut w = Glsl::default();
    w.line("precision highp float;");
    w.blank();
    w.line("attribute vec3 aPosition;");
    if uses_vertex_normal(p) {
        w.line("attribute vec3 aNormal;");
    }
    if p.needs_uv() {
        w.line("attribute vec2 aUV;");
    }
    w.blank();
    w.line("uniform mat4 uMVP;");
    if p.is_lit() || p.fog.is_some() {
        w.line("uniform mat4 uViewModel;");
    }
    if uses_vertex_normal(p) {
        w.line("uniform mat3 uNormalMatrix;");
    }
    w.blank();
    declare_varyings(&mut w, p);

    if lights_in_vertex(p) {
        w.blank();
        declare_lighting(&mut w, p);
        if uses_specular_map(p) {
            w.line("uniform sampler2D uSpecularMapSampler;");
        }
        w.blank();
        light_functions(&mut w, p);
    }

    w.blank();
    w.open("void main() {");
    w.line("vec4 position = vec4(aPosition, 1.0);");
    if p.is_lit() {
        w.line("vec3 P = (uViewModel * position).xyz;");
    }
    if uses_vertex_normal(p) {
        w.line("vec3 N = normalize(uNormalMatrix * aNormal);");
    }
    if lights_in_fragment(p) {
        w.line("vPosition = P;");
        if uses_vertex_normal(p) {
            w.line("vNormal = N;");
        }
    }
    if lights_in_vertex(p) {
        w.line("vec3 E = normalize(-P);");
        shininess_prelude(&mut w, p, Stage::Vertex);
        w.line("fColor = vec4(0.0);");
        accumulate(&mut w, p, "fColor", "N");
        w.line("fColor.a = material.diffuseColor.a;");
        if p.sides == Sides::TwoSide {
            w.line("bColor = vec4(0.0);");
            accumulate(&mut w, p, "bColor", "-N");
            w.line("bColor.a = material.diffuseColor.a;");
        }
    }
    if p.needs_uv() {
        w.line("vUV = aUV;");
    }
    if p.fog.is_some() {
        w.line("vDist = length((uViewModel * position).xyz);");
    }
    w.line("gl_Position = uMVP * position;");
    w.close("}");
    w.finish()
}

fn fragment_stage(p: &ShaderPermutation) -> String {
    let mut w = Glsl::default();
    if needs_derivatives(p) {
        w.line("#extension GL_OES_standard_derivatives : enable");
    }
    w.line("precision mediump float;");
    w.blank();
    declare_varyings(&mut w, p);
    w.blank();
    if p.has_texture {
        w.line("uniform sampler2D uSampler;");
    }
    // Map samplers follow their flags so every assigned map has a location.
    if p.has_specular_map {
        w.line("uniform sampler2D uSpecularMapSampler;");
    }
    if p.has_normal_map {
        w.line("uniform sampler2D uNormalMapSampler;");
    }
    if !p.is_lit() || p.variant == MaterialVariant::Toon {
        w.line("uniform vec4 uBaseColor;");
    }

    if lights_in_fragment(p) {
        w.blank();
        declare_lighting(&mut w, p);
        w.blank();
        light_functions(&mut w, p);
        if p.applies_normal_map() {
            tangent_space_functions(&mut w);
        }
    }

    if let Some(mode) = p.fog {
        w.blank();
        fog_declarations(&mut w, mode);
    }

    w.blank();
    w.open("void main() {");
    w.line("vec4 finalColor;");
    if !p.is_lit() {
        if p.has_texture {
            w.line("finalColor = texture2D(uSampler, vUV);");
        } else {
            w.line("finalColor = uBaseColor;");
        }
    } else if lights_in_vertex(p) {
        select_side(&mut w, p);
        if p.has_texture {
            w.line("finalColor = texture2D(uSampler, vUV) * lit;");
        } else {
            w.line("finalColor = lit;");
        }
    } else {
        w.line("vec3 P = vPosition;");
        if p.shading == Shading::Flat {
            w.line("vec3 N = normalize(cross(dFdx(P), dFdy(P)));");
        } else {
            w.line("vec3 N = normalize(vNormal);");
        }
        if p.applies_normal_map() {
            w.line("mat3 tangentSpace = computeTangentSpace(N, P, vUV);");
            w.line(
                "N = transformNormalWithTangentSpace(tangentSpace, texture2D(uNormalMapSampler, vUV).rgb);",
            );
        }
        w.line("vec3 E = normalize(-P);");
        shininess_prelude(&mut w, p, Stage::Fragment);
        w.line("vec4 fColor = vec4(0.0);");
        accumulate(&mut w, p, "fColor", "N");
        if p.sides == Sides::TwoSide {
            w.line("vec4 bColor = vec4(0.0);");
            accumulate(&mut w, p, "bColor", "-N");
        }
        select_side(&mut w, p);
        if p.variant == MaterialVariant::Toon {
            if p.has_texture {
                w.line("vec4 base = texture2D(uSampler, vUV);");
            } else {
                w.line("vec4 base = uBaseColor;");
            }
            w.line("finalColor = vec4(base.rgb * lit.rgb, uBaseColor.a);");
        } else {
            w.line("lit.a = material.diffuseColor.a;");
            if p.has_texture {
                w.line("finalColor = texture2D(uSampler, vUV) * lit;");
            } else {
                w.line("finalColor = lit;");
            }
        }
    }

    if let Some(mode) = p.fog {
        let factor = match mode {
            FogMode::Linear => "calculeLinearFogFactor",
            FogMode::Exp => "calculeExpFogFactor",
            FogMode::Exp2 => "calculeExp2FogFactor",
        };
        w.line(format!("float fogFactor = {factor}(vDist);"));
        w.line("finalColor = vec4(mix(uFogColor.rgb, finalColor.rgb, fogFactor), finalColor.a);");
    }
    w.line("gl_FragColor = finalColor;");
    w.close("}");
    w.finish()
}

/// Varyings shared by both stages; the declarations must match exactly.
fn declare_varyings(w: &mut Glsl, p: &ShaderPermutation) {
    if p.needs_uv() {
        w.line("varying vec2 vUV;");
    }
    if p.fog.is_some() {
        w.line("varying float vDist;");
    }
    if lights_in_vertex(p) {
        w.line("varying vec4 fColor;");
        if p.sides == Sides::TwoSide {
            w.line("varying vec4 bColor;");
        }
    }
    if lights_in_fragment(p) {
        w.line("varying vec3 vPosition;");
        if uses_vertex_normal(p) {
            w.line("varying vec3 vNormal;");
        }
    }
}

fn select_side(w: &mut Glsl, p: &ShaderPermutation) {
    if p.sides == Sides::TwoSide {
        w.line("vec4 lit = gl_FrontFacing ? fColor : bColor;");
    } else {
        w.line("vec4 lit = fColor;");
    }
}

fn declare_lighting(w: &mut Glsl, p: &ShaderPermutation) {
    if p.ambient > 0 {
        w.open("struct AmbientLight {");
        w.line("vec4 color;");
        w.line("float intensity;");
        w.close("};");
        w.line(format!("const int MAX_AMBIENT_LIGHT = {};", p.ambient));
        w.line("uniform AmbientLight ambientLights[MAX_AMBIENT_LIGHT];");
    }
    if p.directional > 0 {
        w.open("struct DirectionalLight {");
        w.line("vec4 color;");
        w.line("float intensity;");
        w.line("vec3 position;");
        w.close("};");
        w.line(format!("const int MAX_DIRECTIONAL_LIGHT = {};", p.directional));
        w.line("uniform DirectionalLight directionalLights[MAX_DIRECTIONAL_LIGHT];");
    }
    if p.point > 0 {
        w.open("struct PointLight {");
        point_members(w);
        w.close("};");
        w.line(format!("const int MAX_POINT_LIGHT = {};", p.point));
        w.line("uniform PointLight pointLights[MAX_POINT_LIGHT];");
    }
    w.open("struct SpotLight {");
    point_members(w);
    w.line("vec3 coneDirection;");
    w.line("float spotCosCutOff;");
    w.line("float spotExponent;");
    w.close("};");
    w.line(format!("const int MAX_SPOT_LIGHT = {MAX_SPOT_LIGHTS};"));
    w.line("uniform SpotLight spotLights[MAX_SPOT_LIGHT];");
    w.line("uniform int uSpotLightCount;");

    if has_material_block(p) {
        w.open("struct Material {");
        w.line("vec4 diffuseColor;");
        if p.variant.has_specular() {
            w.line("vec4 specularColor;");
            w.line("float shininess;");
        }
        w.close("};");
        w.line("uniform Material material;");
    } else {
        w.line("uniform sampler2D uSamplerToon;");
    }
}

fn point_members(w: &mut Glsl) {
    w.line("vec4 color;");
    w.line("float intensity;");
    w.line("vec3 position;");
    w.line("float constantAttenuation;");
    w.line("float linearAttenuation;");
    w.line("float quadraticAttenuation;");
}

/// The parameter list shared by every light function of a variant.
fn light_params(p: &ShaderPermutation) -> &'static str {
    match p.variant {
        MaterialVariant::Toon => "vec3 P, vec3 N",
        MaterialVariant::Phong | MaterialVariant::Blinn => "vec3 P, vec3 N, vec3 E, float shininess",
        _ => "vec3 P, vec3 N, vec3 E",
    }
}

fn light_functions(w: &mut Glsl, p: &ShaderPermutation) {
    let params = light_params(p);
    if p.directional > 0 {
        w.open(format!(
            "vec4 calculeDirectionalLight(DirectionalLight light, {params}) {{"
        ));
        w.line("vec3 L = normalize(light.position);");
        w.line("float att = 1.0;");
        light_body(w, p);
        w.close("}");
        w.blank();
    }
    if p.point > 0 {
        w.open(format!("vec4 calculePointLight(PointLight light, {params}) {{"));
        attenuated_direction(w);
        light_body(w, p);
        w.close("}");
        w.blank();
    }
    w.open(format!("vec4 calculeSpotLight(SpotLight light, {params}) {{"));
    attenuated_direction(w);
    w.line("float spotCos = dot(-L, normalize(light.coneDirection));");
    w.open("if (spotCos < light.spotCosCutOff) {");
    w.line("return vec4(0.0);");
    w.close("}");
    w.line("att *= pow(spotCos, light.spotExponent);");
    light_body(w, p);
    w.close("}");
}

fn attenuated_direction(w: &mut Glsl) {
    w.line("vec3 L = light.position - P;");
    w.line("float dist = length(L);");
    w.line("L = normalize(L);");
    w.line(
        "float att = 1.0 / (light.constantAttenuation + light.linearAttenuation * dist + light.quadraticAttenuation * dist * dist);",
    );
}

/// Diffuse, then specular for the variants that have one. `L` and `att` are in scope.
fn light_body(w: &mut Glsl, p: &ShaderPermutation) {
    if p.variant == MaterialVariant::Toon {
        w.line("float Kd = pow(max(dot(L, N), 0.0), 5.0) * att;");
        w.line("return texture2D(uSamplerToon, vec2(Kd, 0.5));");
        return;
    }
    w.line("float lambert = dot(L, N);");
    w.line(
        "vec4 diffuse = max(lambert, 0.0) * att * light.color * light.intensity * material.diffuseColor;",
    );
    if !p.variant.has_specular() {
        w.line("return vec4(min(diffuse.rgb, vec3(1.0)), diffuse.a);");
        return;
    }
    if p.variant == MaterialVariant::Blinn {
        w.line("vec3 H = normalize(L + E);");
        w.line("float specAngle = max(dot(H, N), 0.0);");
    } else {
        w.line("vec3 R = reflect(-L, N);");
        w.line("float specAngle = max(dot(R, E), 0.0);");
    }
    w.line("float Ks = lambert < 0.0 ? 0.0 : pow(specAngle, shininess) * att;");
    w.line("vec4 specular = Ks * light.color * light.intensity * material.specularColor;");
    w.line("return vec4(min(diffuse.rgb + specular.rgb, vec3(1.0)), diffuse.a);");
}

/// Declares `shininess` (and `mapShininess` with a specular map) in `main`.
fn shininess_prelude(w: &mut Glsl, p: &ShaderPermutation, stage: Stage) {
    if !p.variant.has_specular() {
        return;
    }
    if p.has_specular_map {
        w.line(format!(
            "float mapShininess = texture2D(uSpecularMapSampler, {}).r * 255.0;",
            stage.uv()
        ));
        w.line("float shininess = mapShininess > 5.0 ? mapShininess : material.shininess;");
    } else {
        w.line("float shininess = material.shininess;");
    }
}

/// Emits one accumulation loop per light bucket into `target`.
fn accumulate(w: &mut Glsl, p: &ShaderPermutation, target: &str, normal: &str) {
    let args = |shininess: &str| match p.variant {
        MaterialVariant::Toon => format!("P, {normal}"),
        MaterialVariant::Phong | MaterialVariant::Blinn => {
            format!("P, {normal}, E, {shininess}")
        }
        _ => format!("P, {normal}, E"),
    };
    let spot_shininess = if p.has_specular_map {
        "mapShininess"
    } else {
        "shininess"
    };

    if p.ambient > 0 {
        let tint = if has_material_block(p) {
            " * material.diffuseColor"
        } else {
            ""
        };
        w.line(format!(
            "for (int i = 0; i < MAX_AMBIENT_LIGHT; i++) {target} += ambientLights[i].color * ambientLights[i].intensity{tint};"
        ));
    }
    if p.directional > 0 {
        w.line(format!(
            "for (int i = 0; i < MAX_DIRECTIONAL_LIGHT; i++) {target} += calculeDirectionalLight(directionalLights[i], {});",
            args("shininess")
        ));
    }
    if p.point > 0 {
        w.line(format!(
            "for (int i = 0; i < MAX_POINT_LIGHT; i++) {target} += calculePointLight(pointLights[i], {});",
            args("shininess")
        ));
    }
    w.open("for (int i = 0; i < MAX_SPOT_LIGHT; i++) {");
    w.line("if (i >= uSpotLightCount) break;");
    w.line(format!(
        "{target} += calculeSpotLight(spotLights[i], {});",
        args(spot_shininess)
    ));
    w.close("}");
}

fn tangent_space_functions(w: &mut Glsl) {
    w.blank();
    w.open("mat3 computeTangentSpace(vec3 N, vec3 P, vec2 uv) {");
    w.line("vec3 dp1 = dFdx(P);");
    w.line("vec3 dp2 = dFdy(P);");
    w.line("vec2 duv1 = dFdx(uv);");
    w.line("vec2 duv2 = dFdy(uv);");
    w.line("vec3 dp2perp = cross(dp2, N);");
    w.line("vec3 dp1perp = cross(N, dp1);");
    w.line("vec3 T = dp2perp * duv1.x + dp1perp * duv2.x;");
    w.line("vec3 B = dp2perp * duv1.y + dp1perp * duv2.y;");
    w.line("float invmax = inversesqrt(max(dot(T, T), dot(B, B)));");
    w.line("return mat3(T * invmax, B * invmax, N);");
    w.close("}");
    w.blank();
    w.open("vec3 transformNormalWithTangentSpace(mat3 tangentSpace, vec3 mapNormal) {");
    w.line("return normalize(tangentSpace * (mapNormal * 2.0 - 1.0));");
    w.close("}");
}

fn fog_declarations(w: &mut Glsl, mode: FogMode) {
    w.line("const float LOG2 = 1.442695;");
    w.line("uniform vec4 uFogColor;");
    match mode {
        FogMode::Linear => {
            w.line("uniform float uStartFog;");
            w.line("uniform float uEndFog;");
            w.open("float calculeLinearFogFactor(float dist) {");
            w.line("return clamp((uEndFog - dist) / (uEndFog - uStartFog), 0.0, 1.0);");
        }
        FogMode::Exp => {
            w.line("uniform float uFogDensity;");
            w.open("float calculeExpFogFactor(float dist) {");
            w.line("return clamp(exp2(-uFogDensity * dist * LOG2), 0.0, 1.0);");
        }
        FogMode::Exp2 => {
            w.line("uniform float uFogDensity;");
            w.open("float calculeExp2FogFactor(float dist) {");
            w.line(
                "return clamp(exp2(-uFogDensity * uFogDensity * dist * dist * LOG2), 0.0, 1.0);",
            );
        }
    }
    w.close("}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(variant: MaterialVariant, shading: Shading) -> ShaderPermutation {
        ShaderPermutation {
            variant,
            shading,
            directional: 1,
            ..ShaderPermutation::basic()
        }
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn basic_program_is_minimal() {
        let source = generate(&ShaderPermutation::basic());
        assert!(source.vertex.contains("attribute vec3 aPosition;"));
        assert!(source.vertex.contains("uniform mat4 uMVP;"));
        assert!(!source.vertex.contains("aNormal"));
        assert!(!source.vertex.contains("aUV"));
        assert!(source.fragment.contains("finalColor = uBaseColor;"));
        assert!(!source.fragment.contains("Light"));
        assert_eq!(
            uniform_names(&ShaderPermutation::basic()),
            vec!["uMVP".to_string(), "uBaseColor".to_string()]
        );
    }

    #[test]
    fn gouraud_lambert_accumulates_once_in_vertex_stage() {
        let source = generate(&lit(MaterialVariant::Lambert, Shading::Gouraud));
        assert_eq!(
            count(&source.vertex, "fColor += calculeDirectionalLight("),
            1
        );
        assert!(source.vertex.contains("const int MAX_DIRECTIONAL_LIGHT = 1;"));
        assert!(!source.vertex.contains("MAX_POINT_LIGHT"));
        assert!(!source.vertex.contains("MAX_AMBIENT_LIGHT"));
        assert!(source.vertex.contains("uniform SpotLight spotLights[MAX_SPOT_LIGHT];"));
        assert!(source.fragment.contains("finalColor = lit;"));
        assert!(!source.fragment.contains("calcule"));
    }

    #[test]
    fn phong_shading_moves_lighting_to_fragment_stage() {
        let source = generate(&lit(MaterialVariant::Phong, Shading::Phong));
        assert!(!source.vertex.contains("calcule"));
        assert!(source.vertex.contains("vPosition = P;"));
        assert!(source.vertex.contains("vNormal = N;"));
        assert!(source.fragment.contains("vec3 R = reflect(-L, N);"));
        assert!(source.fragment.contains("uniform Material material;"));
        assert!(source.fragment.contains("float shininess;"));
        assert!(!source.fragment.contains("#extension"));
    }

    #[test]
    fn blinn_uses_half_vector() {
        let source = generate(&lit(MaterialVariant::Blinn, Shading::Gouraud));
        assert!(source.vertex.contains("vec3 H = normalize(L + E);"));
        assert!(!source.vertex.contains("reflect("));
    }

    #[test]
    fn flat_shading_reconstructs_face_normal() {
        let source = generate(&lit(MaterialVariant::Lambert, Shading::Flat));
        assert!(source
            .fragment
            .starts_with("#extension GL_OES_standard_derivatives : enable"));
        assert!(source
            .fragment
            .contains("normalize(cross(dFdx(P), dFdy(P)))"));
        assert!(!source.vertex.contains("aNormal"));
    }

    #[test]
    fn two_sided_accumulates_back_color_with_negated_normal() {
        let permutation = ShaderPermutation {
            sides: Sides::TwoSide,
            ..lit(MaterialVariant::Lambert, Shading::Gouraud)
        };
        let source = generate(&permutation);
        assert!(source.vertex.contains("bColor += calculeDirectionalLight(directionalLights[i], P, -N, E);"));
        assert!(source.fragment.contains("gl_FrontFacing ? fColor : bColor"));
        assert!(source.vertex.contains("varying vec4 bColor;"));
        assert!(source.fragment.contains("varying vec4 bColor;"));
    }

    #[test]
    fn light_arrays_follow_bucket_counts() {
        let permutation = ShaderPermutation {
            ambient: 2,
            directional: 3,
            point: 1,
            ..lit(MaterialVariant::Lambert, Shading::Phong)
        };
        let source = generate(&permutation);
        assert!(source.fragment.contains("const int MAX_AMBIENT_LIGHT = 2;"));
        assert!(source.fragment.contains("const int MAX_DIRECTIONAL_LIGHT = 3;"));
        assert!(source.fragment.contains("const int MAX_POINT_LIGHT = 1;"));
        assert!(source
            .fragment
            .contains("ambientLights[i].color * ambientLights[i].intensity * material.diffuseColor"));

        let names = uniform_names(&permutation);
        assert!(names.contains(&"directionalLights[2].position".to_string()));
        assert!(!names.contains(&"directionalLights[3].position".to_string()));
        assert!(names.contains(&"pointLights[0].quadraticAttenuation".to_string()));
        assert!(names.contains(&"spotLights[3].spotExponent".to_string()));
        assert!(names.contains(&"uSpotLightCount".to_string()));
    }

    #[test]
    fn spot_cone_and_attenuation() {
        let source = generate(&lit(MaterialVariant::Lambert, Shading::Phong));
        assert!(source
            .fragment
            .contains("float spotCos = dot(-L, normalize(light.coneDirection));"));
        assert!(source.fragment.contains("if (i >= uSpotLightCount) break;"));
        assert!(source.fragment.contains("light.quadraticAttenuation * dist * dist"));
    }

    #[test]
    fn specular_map_overrides_shininess() {
        let permutation = ShaderPermutation {
            has_specular_map: true,
            ..lit(MaterialVariant::Phong, Shading::Gouraud)
        };
        let source = generate(&permutation);
        assert!(source.vertex.contains("attribute vec2 aUV;"));
        assert!(source
            .vertex
            .contains("texture2D(uSpecularMapSampler, aUV).r * 255.0"));
        assert!(source.vertex.contains("mapShininess > 5.0"));
        assert!(source
            .vertex
            .contains("calculeSpotLight(spotLights[i], P, N, E, mapShininess)"));
    }

    #[test]
    fn map_samplers_follow_their_flags() {
        let permutation = ShaderPermutation {
            has_specular_map: true,
            ..lit(MaterialVariant::Lambert, Shading::Gouraud)
        };
        let source = generate(&permutation);
        assert!(source
            .fragment
            .contains("uniform sampler2D uSpecularMapSampler;"));
        assert!(!source.vertex.contains("uSpecularMapSampler"));
        assert!(!source.fragment.contains("mapShininess"));
        assert!(uniform_names(&permutation)
            .iter()
            .any(|name| name == "uSpecularMapSampler"));

        let unlit = ShaderPermutation {
            has_normal_map: true,
            ..ShaderPermutation::basic()
        };
        let source = generate(&unlit);
        assert!(source.fragment.contains("uniform sampler2D uNormalMapSampler;"));
        assert!(source.vertex.contains("attribute vec2 aUV;"));
        assert!(uniform_names(&unlit)
            .iter()
            .any(|name| name == "uNormalMapSampler"));
    }

    #[test]
    fn normal_map_only_applies_per_fragment() {
        let gouraud = ShaderPermutation {
            has_normal_map: true,
            ..lit(MaterialVariant::Lambert, Shading::Gouraud)
        };
        assert!(!generate(&gouraud).vertex.contains("NormalMap"));
        assert!(!generate(&gouraud).fragment.contains("computeTangentSpace"));

        let phong = ShaderPermutation {
            shading: Shading::Phong,
            ..gouraud
        };
        let source = generate(&phong);
        assert!(source.fragment.contains("uniform sampler2D uNormalMapSampler;"));
        assert!(source.fragment.contains("transformNormalWithTangentSpace(tangentSpace"));
        assert!(source.fragment.starts_with("#extension"));
    }

    #[test]
    fn toon_samples_the_ramp() {
        let permutation = lit(MaterialVariant::Toon, Shading::Gouraud);
        let source = generate(&permutation);
        assert!(!source.vertex.contains("calcule"));
        assert!(source.fragment.contains("uniform sampler2D uSamplerToon;"));
        assert!(source.fragment.contains("pow(max(dot(L, N), 0.0), 5.0)"));
        assert!(!source.fragment.contains("uniform Material material;"));
        assert!(source.fragment.contains("uBaseColor.a"));
    }

    #[test]
    fn fog_blends_towards_fog_color() {
        for (mode, function) in [
            (FogMode::Linear, "calculeLinearFogFactor"),
            (FogMode::Exp, "calculeExpFogFactor"),
            (FogMode::Exp2, "calculeExp2FogFactor"),
        ] {
            let permutation = ShaderPermutation {
                fog: Some(mode),
                ..ShaderPermutation::basic()
            };
            let source = generate(&permutation);
            assert!(source.vertex.contains("vDist = length((uViewModel * position).xyz);"));
            assert_eq!(count(&source.fragment, function), 2);
            assert!(source.fragment.contains("mix(uFogColor.rgb, finalColor.rgb, fogFactor)"));
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let permutation = lit(MaterialVariant::Blinn, Shading::Phong);
        assert_eq!(generate(&permutation), generate(&permutation));
    }
}
