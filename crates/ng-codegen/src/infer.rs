//! Field type inference from `useState` initializers.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// The TypeScript type annotated on a generated field.
///
/// Inference is cosmetic: it only looks at the literal shape of the
/// initializer and falls back to `any`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// `string`
    String,
    /// `any[]`
    GenericArray,
    /// `string[]`
    StringArray,
    /// `number`
    Numeric,
    /// `any`
    Unknown,
}

impl FieldType {
    /// The TypeScript spelling.
    pub fn as_ts(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::GenericArray => "any[]",
            FieldType::StringArray => "string[]",
            FieldType::Numeric => "number",
            FieldType::Unknown => "any",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ts())
    }
}

static QUOTED: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r#"^['"].*['"]$"#).ok());
static EMPTY_ARRAY: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^\[\s*\]$").ok());
static STRING_ARRAY: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r#"^\[\s*(['"].*['"]\s*(,\s*['"].*['"]\s*)*)\]$"#).ok()
});
static NUMERIC: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^\d+(\.\d+)?$").ok());

fn is_match(re: &Lazy<Option<Regex>>, text: &str) -> bool {
    match &**re {
        Some(re) => re.is_match(text),
        None => false,
    }
}

/// Infer the field type for an initializer expression. First match wins.
pub fn infer_field_type(initializer: &str) -> FieldType {
    let init = initializer.trim();

    if is_match(&QUOTED, init) {
        FieldType::String
    } else if is_match(&EMPTY_ARRAY, init) {
        FieldType::GenericArray
    } else if is_match(&STRING_ARRAY, init) {
        FieldType::StringArray
    } else if is_match(&NUMERIC, init) {
        FieldType::Numeric
    } else {
        FieldType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_fixture_table() {
        assert_eq!(infer_field_type(r#""""#), FieldType::String);
        assert_eq!(infer_field_type("0"), FieldType::Numeric);
        assert_eq!(infer_field_type("[]"), FieldType::GenericArray);
        assert_eq!(infer_field_type(r#"["a"]"#), FieldType::StringArray);
        assert_eq!(infer_field_type("null"), FieldType::Unknown);
    }

    #[test]
    fn test_infer_more_shapes() {
        assert_eq!(infer_field_type("'hello'"), FieldType::String);
        assert_eq!(infer_field_type("  3.14  "), FieldType::Numeric);
        assert_eq!(infer_field_type("[ ]"), FieldType::GenericArray);
        assert_eq!(infer_field_type("['a', \"b\"]"), FieldType::StringArray);
        assert_eq!(infer_field_type("[1, 2]"), FieldType::Unknown);
        assert_eq!(infer_field_type("-1"), FieldType::Unknown);
        assert_eq!(infer_field_type("{ a: 1 }"), FieldType::Unknown);
        assert_eq!(infer_field_type("false"), FieldType::Unknown);
    }

    #[test]
    fn test_type_spelling() {
        assert_eq!(FieldType::GenericArray.to_string(), "any[]");
        assert_eq!(FieldType::StringArray.as_ts(), "string[]");
    }
}
