//! Rendering parameter sets as command-line arguments.
//!
//! The output is a sequence of `--<key> <value>` tokens joined by single
//! spaces. A scalar containing whitespace or `|` is wrapped in double quotes.
//! A sequence is joined into one space-separated string after a single flag;
//! the joined string is quoted only if it contains `|`. Stage scripts parse
//! these strings with their own argument parsers, so the token grammar must
//! stay stable.

use crate::params::ParameterSet;
use serde_yaml::Value;

/// Flag prefix for every rendered key.
pub const FLAG_PREFIX: &str = "--";

/// Renders a whole parameter set, preserving its iteration order.
#[must_use]
pub fn to_cli_args(params: &ParameterSet) -> String {
    params
        .iter()
        .map(|(key, value)| format_argument(key, value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders a single `--key value` pair.
#[must_use]
pub fn format_argument(key: &str, value: &Value) -> String {
    let rendered = match value {
        Value::Sequence(_) => {
            let joined = render_value(value);
            if joined.contains('|') {
                format!("\"{joined}\"")
            } else {
                joined
            }
        }
        Value::Tagged(tagged) => return format_argument(key, &tagged.value),
        other => quote_if_needed(render_scalar(other)),
    };
    format!("{FLAG_PREFIX}{key} {rendered}")
}

/// Renders a value without quoting; a sequence becomes its elements joined
/// by single spaces.
#[must_use]
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Sequence(items) => items.iter().map(render_scalar).collect::<Vec<_>>().join(" "),
        Value::Tagged(tagged) => render_value(&tagged.value),
        other => render_scalar(other),
    }
}

/// True if the rendered value has to be quoted.
#[must_use]
pub fn needs_quotes(rendered: &str) -> bool {
    rendered.chars().any(|c| c.is_whitespace() || c == '|')
}

fn quote_if_needed(rendered: String) -> String {
    if needs_quotes(&rendered) {
        format!("\"{rendered}\"")
    } else {
        rendered
    }
}

/// String form of a single value, as stage scripts expect it.
///
/// Null is `None` and booleans are `True`/`False`, which is what the scripts'
/// none-or-string and flag converters accept.
fn render_scalar(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => {
            if n.is_nan() {
                "nan".to_string()
            } else if n.is_infinite() {
                if n.as_f64().is_some_and(f64::is_sign_negative) {
                    "-inf".to_string()
                } else {
                    "inf".to_string()
                }
            } else {
                n.to_string()
            }
        }
        Value::String(s) => s.clone(),
        Value::Sequence(items) => {
            let inner: Vec<String> = items.iter().map(render_scalar).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Mapping(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", render_scalar(k), render_scalar(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
        Value::Tagged(tagged) => render_scalar(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quotes_spaces_and_joins_sequences() {
        let params = ParameterSet::new()
            .with("a", "x y")
            .with("b", vec!["p", "q"])
            .with("c", 5);

        assert_eq!(to_cli_args(&params), r#"--a "x y" --b p q --c 5"#);
    }

    #[test]
    fn test_sequence_with_pipe_quoted_as_a_whole() {
        let params = ParameterSet::new().with("b", vec!["a|b", "c"]);
        assert_eq!(to_cli_args(&params), r#"--b "a|b c""#);
    }

    #[test]
    fn test_sequence_with_spaces_stays_unquoted() {
        let params = ParameterSet::new().with("labels", vec!["left side", "right"]);
        assert_eq!(to_cli_args(&params), "--labels left side right");
    }

    #[test]
    fn test_pipe_is_quoted() {
        let params = ParameterSet::new().with("profile", "config|mouse");
        assert_eq!(to_cli_args(&params), r#"--profile "config|mouse""#);
    }

    #[test]
    fn test_single_element_sequence_is_unquoted() {
        let params = ParameterSet::new().with("channels", vec![3]);
        assert_eq!(to_cli_args(&params), "--channels 3");
    }

    #[test]
    fn test_scalar_forms() {
        assert_eq!(render_value(&Value::Null), "None");
        assert_eq!(render_value(&Value::Bool(true)), "True");
        assert_eq!(render_value(&Value::Bool(false)), "False");
        assert_eq!(render_value(&Value::from(0.5)), "0.5");
        assert_eq!(render_value(&Value::from(f64::INFINITY)), "inf");
        assert_eq!(render_value(&Value::from(f64::NEG_INFINITY)), "-inf");
        assert_eq!(render_value(&Value::from(-3)), "-3");
    }

    #[test]
    fn test_nested_values() {
        let nested: Value = serde_yaml::from_str("[[1, 2], 3]").unwrap();
        assert_eq!(render_value(&nested), "[1, 2] 3");

        let mapping: Value = serde_yaml::from_str("{a: 1}").unwrap();
        assert_eq!(format_argument("m", &mapping), r#"--m "{a: 1}""#);
    }

    #[test]
    fn test_tabs_and_newlines_trigger_quotes() {
        assert!(needs_quotes("a\tb"));
        assert!(needs_quotes("a\nb"));
        assert!(!needs_quotes("/path/to/file.csv"));
    }

    #[test]
    fn test_empty_set() {
        assert_eq!(to_cli_args(&ParameterSet::new()), "");
    }

    #[test]
    fn test_order_is_preserved() {
        let params = ParameterSet::new().with("z", 1).with("a", 2).with("m", 3);
        assert_eq!(to_cli_args(&params), "--z 1 --a 2 --m 3");
    }
}
