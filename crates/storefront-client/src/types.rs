//! Request and response types

use crate::envelope::Envelope;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Description of an outbound request, reused unchanged for every retransmission
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    /// Path relative to the client's base URL, or an absolute URL
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Extra headers, applied after the client's own
    pub headers: HeaderMap,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Set the JSON body
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Append a query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a header, overriding any the client would set
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Successful response, body already normalized
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) request_id: String,
    pub(crate) body: Value,
}

impl ApiResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Correlation id sent as `x-request-id`
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Full response body
    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }

    /// Payload inside the envelope (`data` or `rs`), or the whole body
    pub fn data(&self) -> &Value {
        Envelope::payload(&self.body)
    }

    /// Deserialize the envelope payload
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        T::deserialize(self.data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Product {
        id: u64,
        name: Option<String>,
    }

    fn response(body: Value) -> ApiResponse {
        ApiResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            request_id: "req".to_string(),
            body,
        }
    }

    #[test]
    fn test_json_reads_standard_payload() {
        let resp = response(json!({ "success": true, "data": { "id": 7, "name": null } }));
        let product: Product = resp.json().unwrap();
        assert_eq!(product, Product { id: 7, name: None });
    }

    #[test]
    fn test_json_reads_legacy_payload() {
        let resp = response(json!({ "rc": 0, "rs": [{ "id": 1, "name": "Tea" }] }));
        let products: Vec<Product> = resp.json().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name.as_deref(), Some("Tea"));
    }

    #[test]
    fn test_request_spec_builder() {
        let spec = RequestSpec::get("/products")
            .query("page", "2")
            .header(
                HeaderName::from_static("x-shop-id"),
                HeaderValue::from_static("42"),
            );
        assert_eq!(spec.method, Method::GET);
        assert_eq!(spec.query, vec![("page".to_string(), "2".to_string())]);
        assert_eq!(spec.headers["x-shop-id"], "42");
        assert!(spec.body.is_none());
    }

    #[test]
    fn test_request_spec_verbs() {
        assert_eq!(RequestSpec::put("/a").method, Method::PUT);
        assert_eq!(RequestSpec::patch("/a").method, Method::PATCH);
        assert_eq!(RequestSpec::delete("/a").method, Method::DELETE);
        assert_eq!(RequestSpec::delete("/a").path, "/a");
    }

    #[test]
    fn test_into_body_keeps_whole_envelope() {
        let body = json!({ "success": true, "data": [1, 2] });
        assert_eq!(response(body.clone()).into_body(), body);
    }
}
