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

//! A line-based scan of GLSL ES 1.0 declarations.
//!
//! This is not a compiler. It checks the structural properties a driver would
//! reject outright (balanced delimiters, an entry point, the stage's output
//! written, known types and array sizes) and collects the top-level
//! `attribute`, `uniform` and `varying` declarations so a program's active
//! names can be resolved the way `glGetUniformLocation` resolves them.

use ahash::AHashMap;
use al3d_core::renderer::ShaderStage;

/// One top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Declaration {
    pub ty: String,
    pub name: String,
    pub array_len: Option<usize>,
}

/// A successfully scanned stage.
#[derive(Debug, Clone, Default)]
pub(crate) struct StageInterface {
    pub attributes: Vec<Declaration>,
    pub uniforms: Vec<Declaration>,
    pub varyings: Vec<Declaration>,
    pub structs: AHashMap<String, Vec<Declaration>>,
}

const BUILTIN_TYPES: &[&str] = &[
    "bool", "int", "float", "vec2", "vec3", "vec4", "ivec2", "ivec3", "ivec4", "bvec2", "bvec3",
    "bvec4", "mat2", "mat3", "mat4", "sampler2D", "samplerCube",
];

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(at) => &line[..at],
        None => line,
    }
    .trim()
}

fn check_balanced(source: &str) -> Result<(), String> {
    let mut braces = 0i64;
    let mut parens = 0i64;
    for (number, line) in source.lines().enumerate() {
        for c in strip_comment(line).chars() {
            match c {
                '{' => braces += 1,
                '}' => braces -= 1,
                '(' => parens += 1,
                ')' => parens -= 1,
                _ => {}
            }
            if braces < 0 || parens < 0 {
                return Err(format!("{}: unexpected closing delimiter", number + 1));
            }
        }
    }
    if braces != 0 {
        return Err("unbalanced braces".to_owned());
    }
    if parens != 0 {
        return Err("unbalanced parentheses".to_owned());
    }
    Ok(())
}

/// Splits `"Type name[SIZE];"` into its parts.
fn parse_declaration(
    rest: &str,
    consts: &AHashMap<String, usize>,
    number: usize,
) -> Result<Declaration, String> {
    let rest = rest
        .strip_suffix(';')
        .ok_or_else(|| format!("{number}: expected ';'"))?
        .trim();
    let mut words = rest.split_whitespace();
    let (Some(ty), Some(name), None) = (words.next(), words.next(), words.next()) else {
        return Err(format!("{number}: malformed declaration '{rest}'"));
    };

    let (name, array_len) = match name.split_once('[') {
        Some((base, size)) => {
            let size = size
                .strip_suffix(']')
                .ok_or_else(|| format!("{number}: malformed array size in '{name}'"))?;
            let len = match size.parse::<usize>() {
                Ok(len) => len,
                Err(_) => *consts
                    .get(size)
                    .ok_or_else(|| format!("{number}: '{size}' is not a constant"))?,
            };
            if len == 0 {
                return Err(format!("{number}: array '{base}' has size 0"));
            }
            (base, Some(len))
        }
        None => (name, None),
    };
    Ok(Declaration {
        ty: ty.to_owned(),
        name: name.to_owned(),
        array_len,
    })
}

/// Scans `source` as a `stage` shader.
///
/// The error string is the diagnostic a driver info log would carry.
pub(crate) fn scan(stage: ShaderStage, source: &str) -> Result<StageInterface, String> {
    check_balanced(source)?;
    if !source.contains("void main()") {
        return Err("missing entry point 'void main()'".to_owned());
    }
    let output = match stage {
        ShaderStage::Vertex => "gl_Position",
        ShaderStage::Fragment => "gl_FragColor",
    };
    if !source.contains(output) {
        return Err(format!("{stage} stage never writes {output}"));
    }

    let mut interface = StageInterface::default();
    let mut consts: AHashMap<String, usize> = AHashMap::new();
    let mut depth = 0usize;
    let mut open_struct: Option<(String, Vec<Declaration>)> = None;

    for (index, raw) in source.lines().enumerate() {
        let number = index + 1;
        let line = strip_comment(raw);
        if line.is_empty() {
            continue;
        }

        if let Some((name, members)) = open_struct.as_mut() {
            if line == "};" {
                let (name, members) = (std::mem::take(name), std::mem::take(members));
                interface.structs.insert(name, members);
                open_struct = None;
            } else {
                members.push(parse_declaration(line, &consts, number)?);
            }
            continue;
        }

        if depth == 0 {
            if let Some(name) = line
                .strip_prefix("struct ")
                .and_then(|rest| rest.strip_suffix('{'))
            {
                open_struct = Some((name.trim().to_owned(), Vec::new()));
                continue;
            }
            if let Some(rest) = line.strip_prefix("const int ") {
                let (name, value) = rest
                    .trim_end_matches(';')
                    .split_once('=')
                    .ok_or_else(|| format!("{number}: malformed constant"))?;
                let value = value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| format!("{number}: constant '{}' is not an integer", name.trim()))?;
                consts.insert(name.trim().to_owned(), value);
                continue;
            }
            let declaration = [
                ("attribute ", &mut interface.attributes),
                ("uniform ", &mut interface.uniforms),
                ("varying ", &mut interface.varyings),
            ]
            .into_iter()
            .find_map(|(keyword, list)| line.strip_prefix(keyword).map(|rest| (rest, list)));
            if let Some((rest, list)) = declaration {
                list.push(parse_declaration(rest, &consts, number)?);
                continue;
            }
        }

        for c in line.chars() {
            match c {
                '{' => depth += 1,
                '}' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
    }

    if open_struct.is_some() {
        return Err("unterminated struct".to_owned());
    }
    if stage == ShaderStage::Fragment && !interface.attributes.is_empty() {
        return Err("attributes are not allowed in a fragment stage".to_owned());
    }
    for declaration in interface.uniforms.iter().chain(&interface.attributes) {
        let known = BUILTIN_TYPES.contains(&declaration.ty.as_str())
            || interface.structs.contains_key(&declaration.ty);
        if !known {
            return Err(format!(
                "'{}' has unknown type '{}'",
                declaration.name, declaration.ty
            ));
        }
    }
    Ok(interface)
}

/// Expands a uniform into every name `glGetUniformLocation` accepts for it.
///
/// Names in the same inner vector share one location: `uKernel` and
/// `uKernel[0]` address the same element.
pub(crate) fn uniform_names(
    declaration: &Declaration,
    structs: &AHashMap<String, Vec<Declaration>>,
) -> Vec<Vec<String>> {
    let prefixes: Vec<String> = match declaration.array_len {
        Some(len) => (0..len)
            .map(|i| format!("{}[{i}]", declaration.name))
            .collect(),
        None => vec![declaration.name.clone()],
    };
    match structs.get(&declaration.ty) {
        Some(members) => prefixes
            .iter()
            .flat_map(|prefix| {
                members
                    .iter()
                    .map(move |member| vec![format!("{prefix}.{}", member.name)])
            })
            .collect(),
        None => {
            let mut names: Vec<Vec<String>> = prefixes.into_iter().map(|p| vec![p]).collect();
            if declaration.array_len.is_some() {
                if let Some(first) = names.first_mut() {
                    first.push(declaration.name.clone());
                }
            }
            names
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIT: &str = "\
precision highp float;
attribute vec3 aPosition;
struct PointLight {
    vec4 color;
    float intensity;
};
const int MAX_POINT_LIGHT = 2;
uniform PointLight pointLights[MAX_POINT_LIGHT];
uniform mat4 uMVP; // model-view-projection
varying vec3 vNormal;
void main() {
    gl_Position = uMVP * vec4(aPosition, 1.0);
}
";

    #[test]
    fn collects_top_level_declarations() {
        let interface = scan(ShaderStage::Vertex, LIT).unwrap();
        assert_eq!(interface.attributes.len(), 1);
        assert_eq!(interface.varyings[0].name, "vNormal");
        let lights = &interface.uniforms[0];
        assert_eq!(lights.ty, "PointLight");
        assert_eq!(lights.array_len, Some(2));
        assert_eq!(interface.structs["PointLight"].len(), 2);
    }

    #[test]
    fn struct_arrays_expand_per_member() {
        let interface = scan(ShaderStage::Vertex, LIT).unwrap();
        let names = uniform_names(&interface.uniforms[0], &interface.structs);
        let flat: Vec<&str> = names.iter().flatten().map(String::as_str).collect();
        assert_eq!(
            flat,
            [
                "pointLights[0].color",
                "pointLights[0].intensity",
                "pointLights[1].color",
                "pointLights[1].intensity"
            ]
        );
    }

    #[test]
    fn primitive_array_base_aliases_first_element() {
        let declaration = Declaration {
            ty: "float".into(),
            name: "uKernel".into(),
            array_len: Some(9),
        };
        let names = uniform_names(&declaration, &AHashMap::new());
        assert_eq!(names.len(), 9);
        assert_eq!(names[0], vec!["uKernel[0]".to_owned(), "uKernel".to_owned()]);
    }

    #[test]
    fn rejects_structural_errors() {
        assert!(scan(ShaderStage::Vertex, "void main() { gl_Position = vec4(1.0);")
            .unwrap_err()
            .contains("braces"));
        assert!(scan(ShaderStage::Fragment, "void helper() { gl_FragColor = vec4(1.0); }")
            .unwrap_err()
            .contains("entry point"));
        assert!(scan(ShaderStage::Fragment, "void main() { }")
            .unwrap_err()
            .contains("gl_FragColor"));
    }

    #[test]
    fn rejects_unknown_sizes_and_types() {
        let source = "uniform float uWeights[COUNT];\nvoid main() { gl_FragColor = vec4(1.0); }";
        assert!(scan(ShaderStage::Fragment, source)
            .unwrap_err()
            .contains("not a constant"));
        let source = "uniform Light uLight;\nvoid main() { gl_FragColor = vec4(1.0); }";
        assert!(scan(ShaderStage::Fragment, source)
            .unwrap_err()
            .contains("unknown type"));
    }

    #[test]
    fn declarations_inside_functions_are_ignored() {
        let source = "\
void main() {
    float uniformish = 1.0;
    gl_FragColor = vec4(uniformish);
}
";
        let interface = scan(ShaderStage::Fragment, source).unwrap();
        assert!(interface.uniforms.is_empty());
    }
}
