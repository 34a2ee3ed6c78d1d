//! The untyped document tree shared by manifests, test definitions and
//! snapshots, plus the helpers every validator leans on: structural
//! equality, subset checks and human-readable rendering.

use serde_yaml::{Mapping, Value};

pub mod path;

pub use path::{Path, PathError, Segment};

/// A rendered document or any node inside one.
pub type Tree = Value;

/// Deep structural equality.
///
/// Mappings compare by key set regardless of key order, sequences compare
/// element-wise. Unless `strict` is set, integers and floats compare by
/// numeric value so that `1` equals `1.0`.
pub fn structural_eq(a: &Tree, b: &Tree, strict: bool) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => {
            if strict || (x.is_f64() == y.is_f64()) {
                x == y
            } else {
                match (x.as_f64(), y.as_f64()) {
                    (Some(x), Some(y)) => x == y,
                    _ => false,
                }
            }
        }
        (Value::Sequence(xs), Value::Sequence(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys.iter())
                    .all(|(x, y)| structural_eq(x, y, strict))
        }
        (Value::Mapping(xs), Value::Mapping(ys)) => mapping_eq(xs, ys, strict),
        (Value::Tagged(x), Value::Tagged(y)) => {
            x.tag == y.tag && structural_eq(&x.value, &y.value, strict)
        }
        _ => false,
    }
}

fn mapping_eq(xs: &Mapping, ys: &Mapping, strict: bool) -> bool {
    xs.len() == ys.len()
        && xs.iter().all(|(key, x)| match ys.get(key) {
            Some(y) => structural_eq(x, y, strict),
            None => false,
        })
}

/// True when every entry of `subset` is present in `superset`, recursing into
/// nested mappings. Non-mapping nodes must be structurally equal.
pub fn is_subset(subset: &Tree, superset: &Tree, strict: bool) -> bool {
    match (subset, superset) {
        (Value::Mapping(sub), Value::Mapping(sup)) => sub.iter().all(|(key, sub_value)| {
            sup.get(key)
                .is_some_and(|sup_value| is_subset(sub_value, sup_value, strict))
        }),
        _ => structural_eq(subset, superset, strict),
    }
}

/// Name of the node type, as used by `isType` and in diagnostics.
pub fn type_name(value: &Tree) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Sequence(_) => "seq",
        Value::Mapping(_) => "map",
        Value::Tagged(_) => "tagged",
    }
}

/// Renders a node as YAML text without the trailing newline. Plain strings
/// are returned verbatim so diagnostics do not show YAML quoting.
pub fn render(value: &Tree) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end_matches('\n').to_string())
            .unwrap_or_else(|err| format!("<unrenderable: {err}>")),
    }
}

/// Explicit, checked extraction of a text value.
///
/// Strings are returned as-is. In non-strict mode booleans and numbers are
/// stringified; anything else (and any non-string in strict mode) is an
/// error naming the node type.
pub fn expect_text(value: &Tree, strict: bool) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) if !strict => Ok(b.to_string()),
        Value::Number(n) if !strict => Ok(n.to_string()),
        other => Err(format!(
            "expected a string, found {}",
            type_name(other)
        )),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn doc(text: &str) -> Tree {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn mapping_equality_ignores_key_order() {
        let a = doc("a: 1\nb: {c: [1, 2], d: x}");
        let b = doc("b: {d: x, c: [1, 2]}\na: 1");
        assert!(structural_eq(&a, &b, false));
    }

    #[test]
    fn sequence_equality_respects_order() {
        assert!(!structural_eq(&doc("[1, 2]"), &doc("[2, 1]"), false));
    }

    #[test]
    fn numeric_coercion_only_when_lenient() {
        assert!(structural_eq(&doc("1"), &doc("1.0"), false));
        assert!(!structural_eq(&doc("1"), &doc("1.0"), true));
        assert!(!structural_eq(&doc("1"), &doc("'1'"), false));
    }

    #[test]
    fn subset_recurses_into_mappings() {
        let sup = doc("metadata: {name: web, labels: {app: web, tier: fe}}");
        assert!(is_subset(&doc("metadata: {labels: {app: web}}"), &sup, false));
        assert!(!is_subset(&doc("metadata: {labels: {app: api}}"), &sup, false));
    }

    #[test]
    fn text_extraction_is_type_checked() {
        assert_eq!(expect_text(&doc("hello"), true), Ok("hello".to_string()));
        assert_eq!(expect_text(&doc("3"), false), Ok("3".to_string()));
        assert!(expect_text(&doc("3"), true).is_err());
        let err = expect_text(&doc("{a: 1}"), false).unwrap_err();
        assert!(err.contains("found map"));
    }

    #[test]
    fn render_strips_quoting_and_newline() {
        assert_eq!(render(&doc("'quoted'")), "quoted");
        assert_eq!(render(&doc("{a: 1}")), "a: 1");
    }

    proptest! {
        #[test]
        fn equality_is_insensitive_to_insertion_order(
            entries in proptest::collection::btree_map("[a-z]{1,6}", 0i64..1000, 0..12)
        ) {
            let mut forward = Mapping::new();
            for (k, v) in entries.iter() {
                forward.insert(Value::from(k.clone()), Value::from(*v));
            }
            let mut backward = Mapping::new();
            for (k, v) in entries.iter().rev() {
                backward.insert(Value::from(k.clone()), Value::from(*v));
            }
            prop_assert!(structural_eq(&Value::Mapping(forward), &Value::Mapping(backward), true));
        }
    }
}
