//! Field mapping from loosely-typed JSON into a [`MeshDescription`].
//!
//! Values are converted with the same rules a JavaScript typed-array
//! constructor applies to `Object.values(x)`: any enumerable container is
//! accepted, elements go through `ToNumber`, and integer buffers wrap
//! through `ToUint32`. This lets files exported straight from a JS runtime
//! (where typed arrays serialize as index-keyed objects) load unchanged.

use serde_json::{Map, Value};

use crate::error::{IrError, Result};
use crate::load::JsonKeyType;
use crate::MeshDescription;

/// Map the fields of a parsed JSON document into a [`MeshDescription`].
///
/// Required fields (`numProp`, `triVerts`, `vertProperties`) are always
/// produced; missing ones default to `0` or an empty buffer. Optional fields
/// are set only when the input value is truthy.
pub fn map_fields(value: &Value) -> Result<MeshDescription> {
    let obj = value
        .as_object()
        .ok_or_else(|| IrError::NotAnObject(JsonKeyType::of(value).as_str()))?;

    let num_prop = match obj.get("numProp") {
        Some(v) if is_truthy(v) => to_uint32(to_number(v)),
        _ => 0,
    };

    let desc = MeshDescription {
        num_prop,
        tri_verts: obj.get("triVerts").map(u32_buffer).unwrap_or_default(),
        vert_properties: obj.get("vertProperties").map(f32_buffer).unwrap_or_default(),
        face_id: optional(obj, "faceID", u32_buffer),
        halfedge_tangent: optional(obj, "halfedgeTangent", f32_buffer),
        merge_from_vert: optional(obj, "mergeFromVert", u32_buffer),
        merge_to_vert: optional(obj, "mergeToVert", u32_buffer),
        run_index: optional(obj, "runIndex", u32_buffer),
        run_original_id: optional(obj, "runOriginalID", u32_buffer),
        run_transform: optional(obj, "runTransform", f32_buffer),
    };

    log::debug!(
        "mapped {} triangle corners, {} vertex properties (numProp = {})",
        desc.tri_verts.len(),
        desc.vert_properties.len(),
        desc.num_prop
    );

    Ok(desc)
}

fn optional<T>(obj: &Map<String, Value>, key: &str, convert: fn(&Value) -> Vec<T>) -> Option<Vec<T>> {
    obj.get(key).filter(|v| is_truthy(v)).map(convert)
}

fn u32_buffer(value: &Value) -> Vec<u32> {
    enumerable_values(value)
        .iter()
        .map(|v| to_uint32(to_number(v)))
        .collect()
}

fn f32_buffer(value: &Value) -> Vec<f32> {
    enumerable_values(value)
        .iter()
        .map(|v| to_number(v) as f32)
        .collect()
}

/// JavaScript truthiness of a JSON value.
///
/// Empty arrays and objects are truthy; `null`, `false`, `0`, `NaN` and `""`
/// are not.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The values `Object.values` would enumerate for a JSON value.
///
/// Object entries with array-index keys come first in ascending numeric
/// order, followed by the remaining keys in document order.
pub fn enumerable_values(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Object(map) => {
            let mut indexed: Vec<(u32, &Value)> = Vec::new();
            let mut named: Vec<&Value> = Vec::new();
            for (key, v) in map {
                match array_index(key) {
                    Some(i) => indexed.push((i, v)),
                    None => named.push(v),
                }
            }
            indexed.sort_by_key(|(i, _)| *i);
            indexed
                .into_iter()
                .map(|(_, v)| v)
                .chain(named)
                .cloned()
                .collect()
        }
        Value::String(s) => s.chars().map(|c| Value::String(c.to_string())).collect(),
        Value::Null | Value::Bool(_) | Value::Number(_) => Vec::new(),
    }
}

/// Canonical array-index key: decimal, no leading zeros, below `2^32 - 1`.
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse::<u32>().ok().filter(|&i| i != u32::MAX)
}

/// JavaScript `ToNumber` on a JSON value.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => string_to_number(s),
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [single] => match single {
                Value::Null => 0.0,
                Value::Array(_) | Value::Object(_) => to_number(single),
                Value::String(s) => string_to_number(s),
                Value::Bool(_) => f64::NAN,
                Value::Number(_) => to_number(single),
            },
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

fn string_to_number(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    let radix_prefixed = |prefix: [&str; 2], radix: u32| {
        prefix
            .iter()
            .find_map(|p| t.strip_prefix(p))
            .map(|digits| {
                if digits.is_empty() {
                    return f64::NAN;
                }
                // No sign allowed after the prefix; wide literals stay finite.
                digits
                    .chars()
                    .try_fold(0.0, |acc: f64, c| {
                        c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
                    })
                    .unwrap_or(f64::NAN)
            })
    };
    if let Some(v) = radix_prefixed(["0x", "0X"], 16)
        .or_else(|| radix_prefixed(["0o", "0O"], 8))
        .or_else(|| radix_prefixed(["0b", "0B"], 2))
    {
        return v;
    }
    match t {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust accepts "inf"/"nan" spellings that JS does not.
        _ if t.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') => f64::NAN,
        _ => t.parse::<f64>().unwrap_or(f64::NAN),
    }
}

/// JavaScript `ToUint32`: truncate toward zero and wrap modulo 2^32.
pub fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    let wrapped = n.trunc().rem_euclid(4_294_967_296.0);
    wrapped as u32
}
