//! Request input rewriting shared by the sanitization middleware.
//!
//! The query string and JSON or URL-encoded bodies are decoded, handed to a
//! [`SanitizeRule`], and written back into the request so that downstream
//! extractors see the cleaned input. Anything that fails to decode is left
//! exactly as received for the extractors to reject.

use actix_web::{
    dev::{Payload, ServiceRequest},
    error::ErrorBadRequest,
    http::{
        header::{HeaderValue, CONTENT_LENGTH},
        Uri,
    },
    web, Error, HttpMessage,
};
use hb_shared::SanitizeRule;
use url::form_urlencoded;

/// Body encodings the sanitizers understand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    UrlEncoded,
}

impl BodyKind {
    /// Classify a request by its `Content-Type` essence
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.trim().to_ascii_lowercase();
        if essence == "application/json" || essence.ends_with("+json") {
            Some(BodyKind::Json)
        } else if essence == "application/x-www-form-urlencoded" {
            Some(BodyKind::UrlEncoded)
        } else {
            None
        }
    }
}

pub fn decode_pairs(input: &[u8]) -> Vec<(String, String)> {
    form_urlencoded::parse(input).into_owned().collect()
}

pub fn encode_pairs(pairs: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter())
        .finish()
}

/// Applies `rule` to a decoded body, returning the rewritten bytes if anything changed
pub fn sanitize_bytes(kind: BodyKind, rule: SanitizeRule, body: &[u8]) -> Option<Vec<u8>> {
    match kind {
        BodyKind::Json => {
            let mut document: serde_json::Value = serde_json::from_slice(body).ok()?;
            if rule.apply_json(&mut document) == 0 {
                return None;
            }
            serde_json::to_vec(&document).ok()
        }
        BodyKind::UrlEncoded => {
            let mut pairs = decode_pairs(body);
            if rule.apply_pairs(&mut pairs) == 0 {
                return None;
            }
            Some(encode_pairs(&pairs).into_bytes())
        }
    }
}

/// Rewrites the query string in place. Returns how many pairs changed.
pub fn sanitize_query(req: &mut ServiceRequest, rule: SanitizeRule) -> Result<usize, Error> {
    let query = req.query_string();
    if query.is_empty() {
        return Ok(0);
    }

    let mut pairs = decode_pairs(query.as_bytes());
    let changed = rule.apply_pairs(&mut pairs);
    if changed == 0 {
        return Ok(0);
    }

    let uri = &req.head().uri;
    let mut rebuilt = String::new();
    if let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) {
        rebuilt.push_str(scheme);
        rebuilt.push_str("://");
        rebuilt.push_str(authority.as_str());
    }
    rebuilt.push_str(uri.path());

    let query = encode_pairs(&pairs);
    if !query.is_empty() {
        rebuilt.push('?');
        rebuilt.push_str(&query);
    }

    req.head_mut().uri = rebuilt.parse::<Uri>().map_err(ErrorBadRequest)?;
    Ok(changed)
}

/// Rewrites a JSON or URL-encoded body in place. Returns how many values or keys changed.
pub async fn sanitize_body(req: &mut ServiceRequest, rule: SanitizeRule) -> Result<usize, Error> {
    let Some(kind) = BodyKind::from_content_type(req.content_type()) else {
        return Ok(0);
    };

    let body = req.extract::<web::Bytes>().await?;
    if body.is_empty() {
        req.set_payload(Payload::from(body));
        return Ok(0);
    }

    let changed = match sanitize_bytes(kind, rule, &body) {
        Some(cleaned) => {
            let cleaned = web::Bytes::from(cleaned);
            req.headers_mut()
                .insert(CONTENT_LENGTH, HeaderValue::from(cleaned.len()));
            req.set_payload(Payload::from(cleaned));
            1
        }
        None => {
            req.set_payload(Payload::from(body));
            0
        }
    };

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_kind_from_content_type() {
        assert_eq!(BodyKind::from_content_type("application/json"), Some(BodyKind::Json));
        assert_eq!(BodyKind::from_content_type("application/ld+json"), Some(BodyKind::Json));
        assert_eq!(
            BodyKind::from_content_type("application/x-www-form-urlencoded"),
            Some(BodyKind::UrlEncoded)
        );
        assert_eq!(BodyKind::from_content_type("text/plain"), None);
        assert_eq!(BodyKind::from_content_type(""), None);
    }

    #[test]
    fn test_sanitize_json_bytes() {
        let body = br#"{"name":" <b>Ana</b> ","$where":"1"}"#;

        let cleaned = sanitize_bytes(BodyKind::Json, SanitizeRule::Xss, body).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&cleaned).unwrap();
        assert_eq!(value["name"], " &lt;b>Ana&lt;/b> ");
        assert_eq!(value["$where"], "1");

        let cleaned = sanitize_bytes(BodyKind::Json, SanitizeRule::QueryOperators, body).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&cleaned).unwrap();
        assert_eq!(value, json!({"name": " <b>Ana</b> "}));
    }

    #[test]
    fn test_unchanged_or_malformed_body_is_left_alone() {
        assert!(sanitize_bytes(BodyKind::Json, SanitizeRule::Xss, br#"{"a":1}"#).is_none());
        assert!(sanitize_bytes(BodyKind::Json, SanitizeRule::Xss, b"{not json").is_none());
        assert!(sanitize_bytes(BodyKind::UrlEncoded, SanitizeRule::QueryOperators, b"a=1&b=2").is_none());
    }

    #[test]
    fn test_sanitize_form_bytes() {
        let cleaned = sanitize_bytes(
            BodyKind::UrlEncoded,
            SanitizeRule::QueryOperators,
            b"name=Ana&filter%5B%24gt%5D=1&a.b=2",
        )
        .unwrap();
        assert_eq!(decode_pairs(&cleaned), vec![("name".to_string(), "Ana".to_string())]);
    }

    #[test]
    fn test_sanitize_query() {
        let mut req = actix_web::test::TestRequest::get()
            .uri("/search?q=%3Cscript%3E&%24ne=1&page=2")
            .to_srv_request();

        let changed = sanitize_query(&mut req, SanitizeRule::QueryOperators).unwrap();
        assert_eq!(changed, 1);
        assert_eq!(req.path(), "/search");
        assert_eq!(
            decode_pairs(req.query_string().as_bytes()),
            vec![
                ("q".to_string(), "<script>".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );

        let changed = sanitize_query(&mut req, SanitizeRule::Xss).unwrap();
        assert_eq!(changed, 1);
        assert_eq!(decode_pairs(req.query_string().as_bytes())[0].1, "&lt;script>");
    }
}
