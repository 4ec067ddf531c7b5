//! Function body extraction
//!
//! Schemas carry custom validation logic as the source of a whole function
//! definition. The executor only needs the body, evaluated with `value` and
//! `props` already in scope.

use super::ScriptError;

/// Turns function-definition source into an executable body
pub trait BodyExtractor: Send + Sync {
    fn extract(&self, source: &str) -> Result<String, ScriptError>;
}

/// Default extractor
///
/// Understands these shapes (parameter names are ignored; the body always
/// sees `value` and `props`):
///
/// ```text
/// fn check(value, props) { ... }
/// function check(value, props) { ... }
/// |value, props| expr
/// |value, props| { ... }
/// (value, props) => { ... }
/// (value, props) => expr
/// ```
///
/// Anything else is taken to be a body already.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefinitionExtractor;

impl BodyExtractor for DefinitionExtractor {
    fn extract(&self, source: &str) -> Result<String, ScriptError> {
        let src = source.trim();
        if src.is_empty() {
            return Err(ScriptError::Extract("function source is empty".to_string()));
        }

        let Some(params_end) = parameter_list_end(src) else {
            return Ok(src.to_string());
        };

        let rest = src[params_end..].trim_start();
        let rest = rest.strip_prefix("=>").map(str::trim_start).unwrap_or(rest);

        match rest.strip_prefix('{') {
            Some(inner) => inner
                .strip_suffix('}')
                .map(|body| body.trim().to_string())
                .ok_or_else(|| ScriptError::Extract("unterminated function body".to_string())),
            None if rest.is_empty() => {
                Err(ScriptError::Extract("function has no body".to_string()))
            }
            None => Ok(rest.to_string()),
        }
    }
}

/// Byte offset just past the parameter list, if `src` starts a definition
fn parameter_list_end(src: &str) -> Option<usize> {
    if let Some(rest) = src.strip_prefix('|') {
        return rest.find('|').map(|i| i + 2);
    }

    let keyword_len = ["function", "fn"]
        .into_iter()
        .find(|kw| {
            src.strip_prefix(kw)
                .is_some_and(|rest| rest.starts_with(|c: char| c.is_whitespace() || c == '('))
        })
        .map(str::len);

    match keyword_len {
        Some(len) => {
            let open = len + src[len..].find('(')?;
            matching_paren(src, open)
        }
        None if src.starts_with('(') => {
            let end = matching_paren(src, 0)?;
            // a parenthesised expression is a body, not an arrow function
            src[end..].trim_start().starts_with("=>").then_some(end)
        }
        None => None,
    }
}

fn matching_paren(src: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in src[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> Result<String, ScriptError> {
        DefinitionExtractor.extract(source)
    }

    #[test]
    fn test_named_function() {
        let body = extract("fn check(value, props) { let x = 1; x + value }").unwrap();
        assert_eq!(body, "let x = 1; x + value");
    }

    #[test]
    fn test_function_keyword_with_nested_braces() {
        let body = extract("function (value, props) {\n  if value { #{ isValid: true } }\n}").unwrap();
        assert_eq!(body, "if value { #{ isValid: true } }");
    }

    #[test]
    fn test_closure_forms() {
        assert_eq!(extract("|value, props| value > 1").unwrap(), "value > 1");
        assert_eq!(extract("|v, p| { v }").unwrap(), "v");
    }

    #[test]
    fn test_arrow_forms() {
        assert_eq!(extract("(value, props) => { value }").unwrap(), "value");
        assert_eq!(extract("(value, props) => value == 2").unwrap(), "value == 2");
    }

    #[test]
    fn test_plain_body_passes_through() {
        assert_eq!(extract("  (value + 1) * 2 ").unwrap(), "(value + 1) * 2");
        assert_eq!(extract("fnord(value)").unwrap(), "fnord(value)");
    }

    #[test]
    fn test_malformed_sources() {
        assert!(matches!(extract("   "), Err(ScriptError::Extract(_))));
        assert!(matches!(extract("fn f(value) { value"), Err(ScriptError::Extract(_))));
        assert!(matches!(extract("fn f(value)"), Err(ScriptError::Extract(_))));
    }
}
