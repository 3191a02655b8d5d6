//! Outbound HTTP handler.

use serde_json::{json, Map, Value};

use super::{opt_str_arg, str_arg};

type HandlerResult = std::result::Result<Value, String>;

/// Response bodies are truncated to keep tool output bounded.
const MAX_BODY_CHARS: usize = 5000;

pub(super) async fn http_request(args: Map<String, Value>) -> HandlerResult {
    let url = str_arg(&args, "url")?;
    let method = opt_str_arg(&args, "method").unwrap_or("GET");
    let method = reqwest::Method::from_bytes(method.to_uppercase().as_bytes())
        .map_err(|_| format!("invalid method: {method}"))?;

    let mut request = reqwest::Client::new().request(method, url);
    if let Some(body) = opt_str_arg(&args, "body") {
        request = request.body(body.to_string());
    }

    let response = request
        .send()
        .await
        .map_err(|e| format!("request failed: {e}"))?;

    let status = response.status().as_u16();
    let mut body = response
        .text()
        .await
        .map_err(|e| format!("read body: {e}"))?;
    if body.len() > MAX_BODY_CHARS {
        let mut cut = MAX_BODY_CHARS;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }

    Ok(json!({
        "status_code": status,
        "body": body,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_invalid_method() {
        let mut args = Map::new();
        args.insert("url".to_string(), json!("http://example.invalid"));
        args.insert("method".to_string(), json!("NOT A METHOD"));
        let err = http_request(args).await.unwrap_err();
        assert!(err.contains("invalid method"));
    }

    #[tokio::test]
    async fn unreachable_host_errors() {
        let mut args = Map::new();
        args.insert("url".to_string(), json!("http://127.0.0.1:1/"));
        let err = http_request(args).await.unwrap_err();
        assert!(err.contains("request failed"));
    }
}
