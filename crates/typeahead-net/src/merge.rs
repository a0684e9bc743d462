//! Deep merging of paginated response payloads.
//!
//! Successive pages of a search response carry the same shape: scalar
//! bookkeeping fields (`total_count`, `incomplete_results`) and one or more
//! array fields holding the actual results. Accumulating pages means
//! concatenating the named arrays while letting every other field be
//! overwritten by the latest page.

use serde_json::Value;

/// Recursively merge `source` into `target`.
///
/// For every field present in `source`:
///
/// - if the field's key is listed in `array_keys` and both the existing
///   target value and the source value are arrays, the arrays are
///   concatenated (target items first);
/// - if both values are objects, they are merged recursively with the same
///   rule;
/// - otherwise the source value overwrites the target value.
///
/// Merging pages 1..N in order is associative: folding left-to-right yields
/// the same result as merging any grouping of consecutive pages.
pub fn merge_responses(target: &mut Value, source: Value, array_keys: &[&str]) {
    // The top level carries no field name, so the concat rule cannot apply.
    merge_field(target, source, "", array_keys);
}

fn merge_field(target: &mut Value, source: Value, key: &str, array_keys: &[&str]) {
    match (target, source) {
        (Value::Array(target_items), Value::Array(source_items))
            if array_keys.contains(&key) =>
        {
            target_items.extend(source_items);
        }
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, source_value) in source_map {
                match target_map.get_mut(&key) {
                    Some(target_value) => merge_field(target_value, source_value, &key, array_keys),
                    None => {
                        target_map.insert(key, source_value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}
