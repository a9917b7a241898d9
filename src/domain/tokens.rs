//! Design token bundles and their CSS / Tailwind renderings.
//!
//! Pure transformations over parsed JSON; loading lives in the token service.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{json, Map, Value};

use crate::domain::error::{DomainError, DomainResult};

/// One category of tokens (e.g. `colors`), split into metadata and payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenBundle {
    pub category: String,
    pub schema: Option<String>,
    pub meta: Map<String, Value>,
    pub payload: Map<String, Value>,
}

impl TokenBundle {
    /// Split a raw bundle document into `$schema`, `meta` and payload.
    pub fn from_value(category: &str, raw: Value) -> DomainResult<Self> {
        let Value::Object(mut object) = raw else {
            return Err(DomainError::TokenBundleInvalid {
                category: category.to_string(),
                message: "must be a JSON object".into(),
            });
        };

        let schema = object
            .shift_remove("$schema")
            .and_then(|v| v.as_str().map(str::to_string));
        let meta = match object.shift_remove("meta") {
            Some(Value::Object(meta)) => meta,
            _ => Map::new(),
        };

        if object.is_empty() {
            return Err(DomainError::TokenBundleInvalid {
                category: category.to_string(),
                message: "payload is empty".into(),
            });
        }

        Ok(Self {
            category: category.to_string(),
            schema,
            meta,
            payload: object,
        })
    }

    /// Resolve a dotted path such as `palette.primary.value`.
    pub fn get(&self, path: &str) -> DomainResult<&Value> {
        resolve_path(&self.payload, path)
    }

    pub fn get_or<'a>(&'a self, path: &str, default: &'a Value) -> &'a Value {
        self.get(path).unwrap_or(default)
    }
}

pub fn resolve_path<'a>(source: &'a Map<String, Value>, path: &str) -> DomainResult<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next().unwrap_or_default();
    let mut cursor = source.get(first).ok_or_else(|| DomainError::TokenPath {
        path: path.to_string(),
        segment: first.to_string(),
    })?;

    for segment in segments {
        cursor = cursor
            .as_object()
            .and_then(|object| object.get(segment))
            .ok_or_else(|| DomainError::TokenPath {
                path: path.to_string(),
                segment: segment.to_string(),
            })?;
    }
    Ok(cursor)
}

fn separator_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static regex"))
}

fn reference_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([^{}]+)\}").expect("static regex"))
}

/// Lower-case a token name and collapse anything outside `[a-z0-9]` to `-`.
pub fn sanitize(name: &str) -> String {
    separator_regex()
        .replace_all(&name.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn spec_value(spec: &Value) -> Option<&Value> {
    spec.get("value").filter(|v| !v.is_null() && v.as_str() != Some(""))
}

fn object_entries<'a>(source: &'a Value, key: &str) -> impl Iterator<Item = (&'a String, &'a Value)> {
    source
        .get(key)
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|object| object.iter())
}

/// The three bundles needed for exports.
#[derive(Debug, Clone, Copy)]
pub struct TokenSources<'a> {
    pub colors: &'a Value,
    pub typography: &'a Value,
    pub components: &'a Value,
}

/// Render `:root { ... }` custom properties.
///
/// Component tokens may reference other tokens as `{colors.palette.x.value}`;
/// references are rewritten to `var(...)` and component entries whose
/// references cannot be resolved are left out.
pub fn build_css_variables(sources: TokenSources<'_>, prefix: &str) -> String {
    let mut lines = vec![":root {".to_string()];
    let mut references: HashMap<String, String> = HashMap::new();
    let mut emit = |reference: String, var_name: String, value: String| {
        lines.push(format!("  {}: {};", var_name, value));
        references.insert(reference, var_name);
    };

    for (name, spec) in object_entries(sources.colors, "palette") {
        if let Some(value) = spec_value(spec) {
            emit(
                format!("colors.palette.{}.value", name),
                format!("--{}-color-{}", prefix, sanitize(name)),
                display_value(value),
            );
        }
    }
    for (name, value) in object_entries(sources.colors, "typography_support") {
        emit(
            format!("colors.typography_support.{}", name),
            format!("--{}-color-{}", prefix, sanitize(name)),
            display_value(value),
        );
    }
    for (name, value) in object_entries(sources.colors, "elevation") {
        emit(
            format!("colors.elevation.{}", name),
            format!("--{}-elevation-{}", prefix, sanitize(name)),
            display_value(value),
        );
    }
    for (name, spec) in object_entries(sources.typography, "font_families") {
        if let Some(value) = spec_value(spec) {
            emit(
                format!("typography.font_families.{}.value", name),
                format!("--{}-font-family-{}", prefix, sanitize(name)),
                display_value(value),
            );
        }
    }
    for (name, spec) in object_entries(sources.typography, "scale") {
        for (key, value) in spec.as_object().into_iter().flatten() {
            emit(
                format!("typography.scale.{}.{}", name, key),
                format!("--{}-typography-{}", prefix, sanitize(&format!("{}-{}", name, key))),
                display_value(value),
            );
        }
    }

    let mut component_lines = Vec::new();
    for (name, spec) in object_entries(sources.components, "components") {
        if spec.is_object() {
            flatten_component(
                vec![sanitize(name)],
                spec,
                prefix,
                &references,
                &mut component_lines,
            );
        }
    }
    lines.extend(component_lines);

    lines.push("}".to_string());
    lines.push(String::new());
    lines.join("\n")
}

fn flatten_component(
    path: Vec<String>,
    data: &Value,
    prefix: &str,
    references: &HashMap<String, String>,
    out: &mut Vec<String>,
) {
    // component trees are shallow; recursion depth is bounded by the JSON nesting
    for (key, value) in data.as_object().into_iter().flatten() {
        let mut next = path.clone();
        next.push(sanitize(key));
        if value.is_object() {
            flatten_component(next, value, prefix, references, out);
        } else if let Some(normalized) = normalize_value(value, references) {
            out.push(format!(
                "  --{}-component-{}: {};",
                prefix,
                next.join("-"),
                normalized
            ));
        }
    }
}

/// Rewrite `{path}` references; `None` when any reference is unresolved.
fn normalize_value(raw: &Value, references: &HashMap<String, String>) -> Option<String> {
    let Value::String(raw) = raw else {
        return Some(display_value(raw));
    };

    let replaced = reference_regex().replace_all(raw, |caps: &regex::Captures<'_>| {
        match references.get(&caps[1]) {
            Some(var_name) => format!("var({})", var_name),
            None => caps[0].to_string(),
        }
    });

    if replaced.contains('{') || replaced.contains('}') {
        None
    } else {
        Some(replaced.into_owned())
    }
}

/// Build the `theme.extend` fragment for Tailwind.
pub fn build_tailwind_extend(sources: TokenSources<'_>, prefix: &str) -> Value {
    let mut colors = Map::new();
    for (name, spec) in object_entries(sources.colors, "palette") {
        if let Some(value) = spec_value(spec) {
            colors.insert(name.clone(), value.clone());
        }
    }
    for (name, value) in object_entries(sources.colors, "typography_support") {
        colors.insert(name.replace("text.", "text-"), value.clone());
    }

    let mut font_family = Map::new();
    for (name, spec) in object_entries(sources.typography, "font_families") {
        if let Some(value) = spec_value(spec) {
            font_family.insert(name.replace('_', "-"), value.clone());
        }
    }

    let mut font_size = Map::new();
    for (name, spec) in object_entries(sources.typography, "scale") {
        let Some(size) = spec.get("font_size").filter(|v| !v.is_null()) else {
            continue;
        };
        let mut options = Map::new();
        if let Some(line_height) = spec.get("line_height").filter(|v| !v.is_null()) {
            options.insert("lineHeight".into(), line_height.clone());
        }
        if let Some(spacing) = spec.get("letter_spacing").filter(|v| !v.is_null()) {
            options.insert("letterSpacing".into(), spacing.clone());
        }
        font_size.insert(name.replace('_', "-"), json!([size, options]));
    }

    let mut border_radius = Map::new();
    for component in ["button", "card"] {
        let radius = sources
            .components
            .pointer(&format!("/components/{}/border_radius", component))
            .filter(|v| !v.is_null());
        if let Some(radius) = radius {
            border_radius.insert(component.to_string(), radius.clone());
        }
    }

    let mut box_shadow = Map::new();
    for (name, value) in object_entries(sources.colors, "elevation") {
        if !value.is_null() && value.as_str() != Some("") {
            box_shadow.insert(format!("{}-{}", prefix, name.replace('_', "-")), value.clone());
        }
    }

    json!({
        "colors": colors,
        "fontFamily": font_family,
        "fontSize": font_size,
        "borderRadius": border_radius,
        "boxShadow": box_shadow,
    })
}

/// Wrap the extend fragment in a CommonJS Tailwind config module.
pub fn render_tailwind_module(extend: &Value) -> String {
    let body = serde_json::to_string_pretty(extend).unwrap_or_else(|_| "{}".to_string());
    format!(
        "module.exports = {{\n  theme: {{\n    extend: {}\n  }}\n}};\n",
        body
    )
}
