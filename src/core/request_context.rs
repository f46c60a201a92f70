//! Request correlation
//!
//! A [`RequestContext`] is an opaque carrier handed to the logger alongside a
//! message. The request id lives under a private key type, so nothing outside
//! this module can shadow or overwrite it. Extraction from an inbound request
//! and injection into a context are side-effect free helpers.

use http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Header carrying the correlation id on the wire
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Field name of the correlation id in emitted records
pub const REQUEST_ID_FIELD: &str = "requestId";

struct RequestIdKey;

/// Opaque, cheaply clonable value carrier
#[derive(Clone, Default)]
pub struct RequestContext {
    values: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl RequestContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context holding a freshly generated UUID v4 request id
    pub fn with_generated_request_id() -> Self {
        new_context(&Self::new(), uuid::Uuid::new_v4().to_string())
    }

    /// Derive a context that additionally holds `value` under key type `K`
    pub fn with_value<K: 'static, V: Any + Send + Sync>(&self, value: V) -> Self {
        let mut values = self.values.clone();
        values.insert(TypeId::of::<K>(), Arc::new(value));
        Self { values }
    }

    /// Look up the value stored under `K`, if it has type `V`
    pub fn value<K: 'static, V: Any>(&self) -> Option<&V> {
        self.values.get(&TypeId::of::<K>())?.downcast_ref::<V>()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("values", &self.values.len())
            .field("request_id", &request_id(Some(self)))
            .finish()
    }
}

/// Derive a context carrying `request_id`
pub fn new_context(parent: &RequestContext, request_id: impl Into<String>) -> RequestContext {
    parent.with_value::<RequestIdKey, String>(request_id.into())
}

/// Request id stored in `ctx`, if any
pub fn request_id(ctx: Option<&RequestContext>) -> Option<&str> {
    ctx?.value::<RequestIdKey, String>().map(String::as_str)
}

/// Read the correlation id from inbound request headers
pub fn request_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// What to do with a record whose context holds no request id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingRequestIdPolicy {
    /// Emit the record without the `requestId` field
    #[default]
    Omit,
    /// Skip the record
    Drop,
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_request_id_roundtrip() {
        let ctx = new_context(&RequestContext::new(), "abc-123");
        assert_eq!(request_id(Some(&ctx)), Some("abc-123"));
    }

    #[test]
    fn test_absent_context_and_key() {
        assert_eq!(request_id(None), None);
        assert_eq!(request_id(Some(&RequestContext::new())), None);
    }

    #[test]
    fn test_wrong_type_is_not_found() {
        let ctx = RequestContext::new().with_value::<RequestIdKey, u64>(42);
        assert_eq!(request_id(Some(&ctx)), None);
    }

    #[test]
    fn test_derived_context_keeps_parent_values() {
        struct TenantKey;
        let parent = RequestContext::new().with_value::<TenantKey, &'static str>("acme");
        let child = new_context(&parent, "req-1");

        assert_eq!(child.value::<TenantKey, &'static str>(), Some(&"acme"));
        assert_eq!(request_id(Some(&child)), Some("req-1"));
        assert_eq!(request_id(Some(&parent)), None);
    }

    #[test]
    fn test_generated_request_id_is_uuid() {
        let ctx = RequestContext::with_generated_request_id();
        let id = request_id(Some(&ctx)).unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn test_request_id_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id_from_headers(&headers), None);

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc-123"));
        assert_eq!(request_id_from_headers(&headers), Some("abc-123".to_string()));

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("  "));
        assert_eq!(request_id_from_headers(&headers), None);
    }
}
