#![allow(clippy::needless_return)]

use serde_json::json;

/// Newline-delimited `/api/generate` records, one per `(response, done)` pair.
pub fn completion_lines(parts: &[(&str, bool)]) -> String {
    return parts
        .iter()
        .map(|(response, done)| {
            return json!({ "model": "llama3", "response": response, "done": done }).to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");
}

/// A streamed response with a malformed record in the middle and a record
/// after completion that must never be read.
pub fn completion_stream_fixture() -> String {
    return [
        completion_lines(&[("Hello", false), (" world", false)]),
        "{\"response\": \"broken".to_string(),
        "".to_string(),
        completion_lines(&[("!", true), ("ignored", false)]),
    ]
    .join("\n");
}

pub fn model_list_fixture(names: &[&str]) -> String {
    let models = names
        .iter()
        .map(|name| {
            return json!({ "name": name, "size": 4_661_224_676_u64 });
        })
        .collect::<Vec<serde_json::Value>>();

    return json!({ "models": models }).to_string();
}
