//! Parameter-list parsing.

use regex::Regex;
use std::sync::LazyLock;

use super::patterns::TYPE;
use crate::config::{Parameter, ParameterModifier};

static MODIFIED_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(ref|out|in|params)\s+({TYPE})\s+(\w+)")).unwrap()
});

static TYPED_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^({TYPE})\s+(\w+)")).unwrap());

static DEFAULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?:(?:ref|out|in|params)\s+)?{TYPE}\s+\w+\s*=\s*([\s\S]+)$"
    ))
    .unwrap()
});

/// Split `text` on commas that are not nested inside `<>`, `()`, `[]` or
/// `{}`. A single depth counter covers all four bracket kinds. Segments are
/// trimmed; empty ones are dropped.
pub fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '<' | '(' | '[' | '{' => depth += 1,
            '>' | ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                let part = text[start..i].trim();
                if !part.is_empty() {
                    parts.push(part);
                }
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = text[start..].trim();
    if !last.is_empty() {
        parts.push(last);
    }
    parts
}

/// Parse a parameter list (the text between the parentheses).
pub fn parse_parameters(list: &str) -> Vec<Parameter> {
    split_top_level(list)
        .into_iter()
        .map(parse_single_parameter)
        .collect()
}

/// Parse one parameter segment. Segments without a `type name` shape keep
/// their raw text as `name`.
pub fn parse_single_parameter(segment: &str) -> Parameter {
    let mut param = Parameter {
        definition: segment.to_string(),
        ..Default::default()
    };

    if let Some(caps) = MODIFIED_PARAM_RE.captures(segment) {
        param.modifier = ParameterModifier::parse(&caps[1]);
        param.type_name = Some(caps[2].to_string());
        param.name = caps[3].to_string();
    } else if let Some(caps) = TYPED_PARAM_RE.captures(segment) {
        param.type_name = Some(caps[1].to_string());
        param.name = caps[2].to_string();
    } else {
        param.name = segment.trim().to_string();
    }

    if let Some(caps) = DEFAULT_RE.captures(segment) {
        param.default = Some(caps[1].trim().to_string());
    }

    param
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_list() {
        assert!(parse_parameters("").is_empty());
        assert!(parse_parameters("   ").is_empty());
    }

    #[test]
    fn ref_and_default() {
        let params = parse_parameters(r#"ref int x, string y = "a""#);
        assert_eq!(params.len(), 2);

        assert_eq!(params[0].modifier, Some(ParameterModifier::Ref));
        assert_eq!(params[0].type_name.as_deref(), Some("int"));
        assert_eq!(params[0].name, "x");
        assert_eq!(params[0].default, None);

        assert_eq!(params[1].modifier, None);
        assert_eq!(params[1].type_name.as_deref(), Some("string"));
        assert_eq!(params[1].name, "y");
        assert_eq!(params[1].default.as_deref(), Some(r#""a""#));
        assert_eq!(params[1].definition, r#"string y = "a""#);
    }

    #[test]
    fn generic_commas_do_not_split() {
        let params = parse_parameters("Dictionary<string, int> map, Func<int, (int, int)> f");
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "map");
        assert_eq!(params[1].name, "f");
    }

    #[test]
    fn generic_type_is_kept_whole() {
        let param = parse_single_parameter("List<Order> orders");
        assert_eq!(param.type_name.as_deref(), Some("List<Order>"));
        assert_eq!(param.name, "orders");
    }

    #[test]
    fn params_array() {
        let param = parse_single_parameter("params object[] args");
        assert_eq!(param.modifier, Some(ParameterModifier::Params));
        assert_eq!(param.type_name.as_deref(), Some("object[]"));
        assert_eq!(param.name, "args");
    }

    #[test]
    fn default_expression_keeps_nested_commas() {
        let param = parse_single_parameter("int retries = Defaults.Count(3, 4)");
        assert_eq!(param.name, "retries");
        assert_eq!(param.default.as_deref(), Some("Defaults.Count(3, 4)"));
    }

    #[test]
    fn unrecognised_shape_falls_back_to_raw_name() {
        let param = parse_single_parameter("__arglist");
        assert_eq!(param.name, "__arglist");
        assert_eq!(param.type_name, None);
        assert_eq!(param.definition, "__arglist");
    }

    #[test]
    fn split_drops_empty_segments() {
        assert_eq!(split_top_level("a, , b ,"), vec!["a", "b"]);
    }
}
