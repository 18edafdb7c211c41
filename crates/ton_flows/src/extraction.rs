//! Extracting structured data from model responses.
//!
//! Model responses often wrap JSON in markdown code fences or surround it
//! with explanatory prose. These helpers pull the JSON payload out before
//! deserialization, so prompts only need to ask for JSON, not beg for it
//! to arrive bare.

use ton_error::FlowError;

/// Extract JSON from a response that may contain markdown or extra text.
///
/// Tried in order: a ```json fenced block, then the first balanced array or
/// object (whichever opens earlier).
///
/// # Errors
///
/// Returns a `ModelOutput` error if no JSON is found.
///
/// # Examples
///
/// ```
/// use ton_flows::extract_json;
///
/// let response = "Here you go:\n```json\n{\"slug\": \"kenya-tech\"}\n```\n";
/// let json = extract_json(response).unwrap();
/// assert!(json.contains("kenya-tech"));
/// ```
pub fn extract_json(response: &str) -> Result<String, FlowError> {
    if let Some(json) = extract_from_code_block(response, "json") {
        return Ok(json);
    }

    // Prefer whichever structure opens first so prose mentioning a brace
    // later in the reply does not shadow a leading array.
    let bracket = response.find('[');
    let brace = response.find('{');
    let candidates: [(char, char); 2] = match (bracket, brace) {
        (Some(b), Some(c)) if b < c => [('[', ']'), ('{', '}')],
        (Some(_), None) => [('[', ']'), ('[', ']')],
        _ => [('{', '}'), ('[', ']')],
    };
    for (open, close) in candidates {
        if let Some(json) = extract_balanced(response, open, close) {
            return Ok(json);
        }
    }

    tracing::error!(
        response_length = response.len(),
        "No JSON found in model response"
    );
    Err(FlowError::model_output(format!(
        "no JSON found in response ({} chars)",
        response.len()
    )))
}

/// Extract the content of a markdown code fence, with or without a language
/// tag. A missing closing fence is treated as a truncated response and the
/// remainder is returned.
fn extract_from_code_block(response: &str, language: &str) -> Option<String> {
    let pattern = format!("```{language}");
    if let Some(start) = response.find(&pattern) {
        let content_start = start + pattern.len();
        return Some(match response[content_start..].find("```") {
            Some(end) => response[content_start..content_start + end].trim().to_string(),
            None => response[content_start..].trim().to_string(),
        });
    }

    if let Some(start) = response.find("```") {
        let content_start = start + 3;
        // Skip a possible language tag on the fence line.
        let skip_to = response[content_start..]
            .find('\n')
            .map(|n| content_start + n + 1)
            .unwrap_or(content_start);
        return Some(match response[skip_to..].find("```") {
            Some(end) => response[skip_to..skip_to + end].trim().to_string(),
            None => response[skip_to..].trim().to_string(),
        });
    }

    None
}

/// Extract content between balanced delimiters, respecting JSON string
/// escapes so braces inside string values do not break the depth count.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + 1].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse extracted JSON into a typed value.
///
/// # Errors
///
/// Returns a `ModelOutput` error carrying a short preview of the offending
/// JSON if deserialization fails.
pub fn parse_json<T>(json_str: &str) -> Result<T, FlowError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(json_str).map_err(|e| {
        let preview: String = json_str.chars().take(100).collect();
        tracing::error!(error = %e, json_preview = %preview, "JSON parsing failed");
        FlowError::model_output(format!("failed to parse JSON: {e} (JSON: {preview}...)"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_code_block() {
        let response = "Here's the JSON you requested:\n\n```json\n{\n  \"slug\": \"test\"\n}\n```\n\nHope this helps!";
        let json = extract_json(response).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.contains("\"slug\""));
    }

    #[test]
    fn extracts_balanced_braces_from_prose() {
        let response = r#"Sure! Here it is: {"id": 456, "nested": {"value": "test"}}"#;
        let json = extract_json(response).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.ends_with('}'));
        assert!(json.contains("nested"));
    }

    #[test]
    fn prefers_leading_array() {
        let response = "Topics:\n[\n {\"topic\": \"a\"},\n {\"topic\": \"b\"}\n]";
        let json = extract_json(response).unwrap();
        assert!(json.starts_with('['));
        assert!(json.ends_with(']'));
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_depth() {
        let response = r#"{"text": "use {curly} braces and \"quotes\""}"#;
        let json = extract_json(response).unwrap();
        assert!(json.contains("curly"));
    }

    #[test]
    fn plain_text_is_an_error() {
        assert!(extract_json("This is just prose with no JSON").is_err());
    }

    #[test]
    fn truncated_fence_returns_remainder() {
        let response = "```json\n{\"slug\": \"partial\"}";
        let json = extract_json(response).unwrap();
        assert!(json.contains("partial"));
    }

    #[test]
    fn parse_json_into_struct() {
        #[derive(serde::Deserialize)]
        struct Out {
            slug: String,
        }
        let out: Out = parse_json(r#"{"slug": "kenya-tech"}"#).unwrap();
        assert_eq!(out.slug, "kenya-tech");
    }

    #[test]
    fn parse_json_reports_preview_on_failure() {
        let err = parse_json::<serde_json::Value>("not json").unwrap_err();
        assert!(err.to_string().contains("not json"));
    }
}
