use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Found(String),
    NotFound,
}

impl Extraction {
    pub fn or_else(self, f: impl FnOnce() -> Extraction) -> Extraction {
        match self {
            Extraction::Found(_) => self,
            Extraction::NotFound => f(),
        }
    }
}

fn non_empty_str(value: Option<&Value>) -> Extraction {
    match value.and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Extraction::Found(s.to_string()),
        _ => Extraction::NotFound,
    }
}

/// Pulls assistant text out of a parsed backend reply.
///
/// Looks at the first `choices`/`generations` element first, then at
/// top-level `text`, `output` and `response`.
pub fn extract_structured(parsed: &Value) -> Extraction {
    let Some(obj) = parsed.as_object() else {
        return Extraction::NotFound;
    };

    let first = obj
        .get("choices")
        .filter(|choices| !is_falsy(choices))
        .or_else(|| obj.get("generations"))
        .and_then(Value::as_array)
        .and_then(|list| list.first())
        .filter(|first| first.is_object());

    let from_choice = match first {
        Some(first) =>
            non_empty_str(first.get("content"))
                .or_else(|| non_empty_str(first.get("text")))
                .or_else(|| non_empty_str(first.pointer("/message/content")))
                .or_else(|| non_empty_str(first.get("response"))),
        None => Extraction::NotFound,
    };

    from_choice
        .or_else(|| non_empty_str(obj.get("text")))
        .or_else(|| non_empty_str(obj.get("output")))
        .or_else(|| non_empty_str(obj.get("response")))
}

/// Concatenates `response` fragments from newline-delimited JSON.
pub fn aggregate_ndjson(body: &str) -> Option<String> {
    let mut found = false;
    let mut text = String::new();
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(line) else {
            continue;
        };
        if let Some(fragment) = obj.get("response") {
            found = true;
            if let Some(s) = fragment.as_str() {
                text.push_str(s);
            }
        }
    }
    if found { Some(text) } else { None }
}

pub fn is_model_not_found(status: u16, parsed: Option<&Value>) -> bool {
    if status != 404 {
        return false;
    }
    let Some(obj) = parsed.and_then(Value::as_object) else {
        return false;
    };
    let message = [obj.get("error"), obj.get("message")]
        .into_iter()
        .flatten()
        .find(|v| !is_falsy(v))
        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
        .unwrap_or_default()
        .to_lowercase();
    message.contains("not found") && message.contains("model")
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn choice_fields_in_priority_order() {
        let v = json!({ "choices": [{ "content": "c", "text": "t" }] });
        assert_eq!(extract_structured(&v), Extraction::Found("c".into()));

        let v = json!({ "choices": [{ "text": "t", "response": "r" }] });
        assert_eq!(extract_structured(&v), Extraction::Found("t".into()));

        let v = json!({ "choices": [{ "message": { "role": "assistant", "content": "m" } }] });
        assert_eq!(extract_structured(&v), Extraction::Found("m".into()));

        let v = json!({ "generations": [{ "response": "g" }] });
        assert_eq!(extract_structured(&v), Extraction::Found("g".into()));
    }

    #[test]
    fn empty_or_null_choices_fall_through_to_generations() {
        let v = json!({ "choices": [], "generations": [{ "text": "g" }] });
        assert_eq!(extract_structured(&v), Extraction::Found("g".into()));

        let v = json!({ "choices": null, "generations": [{ "text": "g" }] });
        assert_eq!(extract_structured(&v), Extraction::Found("g".into()));

        let v = json!({ "choices": [{ "text": "c" }], "generations": [{ "text": "g" }] });
        assert_eq!(extract_structured(&v), Extraction::Found("c".into()));
    }

    #[test]
    fn top_level_fallbacks() {
        assert_eq!(extract_structured(&json!({ "text": "T" })), Extraction::Found("T".into()));
        assert_eq!(extract_structured(&json!({ "output": "O" })), Extraction::Found("O".into()));
        assert_eq!(
            extract_structured(&json!({ "model": "x", "response": "R", "done": true })),
            Extraction::Found("R".into())
        );
        assert_eq!(
            extract_structured(&json!({ "choices": [{ "index": 0 }], "output": "O" })),
            Extraction::Found("O".into())
        );
    }

    #[test]
    fn nothing_usable() {
        assert_eq!(extract_structured(&json!({ "error": "boom" })), Extraction::NotFound);
        assert_eq!(extract_structured(&json!({ "text": "" })), Extraction::NotFound);
        assert_eq!(extract_structured(&json!(["text"])), Extraction::NotFound);
        assert_eq!(extract_structured(&json!({ "choices": [] })), Extraction::NotFound);
    }

    #[test]
    fn ndjson_fragments_concatenate_in_order() {
        let body = "{\"response\":\"Hel\",\"done\":false}\n\n{\"response\":\"lo\",\"done\":false}\nnot json\n{\"done\":true,\"response\":\"\"}\n";
        assert_eq!(aggregate_ndjson(body), Some("Hello".to_string()));
        assert_eq!(aggregate_ndjson("{\"done\":true}"), None);
        assert_eq!(aggregate_ndjson(""), None);
    }

    #[test]
    fn model_not_found_heuristic() {
        let body = json!({ "error": "model \"gemma3:1b\" not found, try pulling it first" });
        assert!(is_model_not_found(404, Some(&body)));
        assert!(!is_model_not_found(500, Some(&body)));
        assert!(!is_model_not_found(404, Some(&json!({ "error": "page not found" }))));
        assert!(is_model_not_found(404, Some(&json!({ "error": "", "message": "Model Not Found" }))));
        assert!(!is_model_not_found(404, None));
    }
}
