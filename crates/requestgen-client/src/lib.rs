//! Runtime support for requestgen-generated request builders.
//!
//! Generated code never carries its own plumbing: parameter maps, slug
//! substitution, default valuers and the client capability traits all live
//! here. The HTTP transport itself is an injected capability — this crate
//! only defines the request/response shapes and the traits a transport must
//! implement.

pub mod error;
pub mod params;
pub mod slugs;
pub mod valuers;

pub use crate::{
    error::{ClientError, ParamError, RequestError},
    params::{encode_query, Params, QueryParams},
};

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A fully resolved outgoing API request, ready for a transport to send.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// HTTP method, e.g. "GET" or "POST".
    pub method: String,
    /// Resolved URL or path (slugs already substituted).
    pub url: String,
    /// Query parameters in insertion order.
    pub query: QueryParams,
    /// JSON body payload, if any.
    pub body: Option<Value>,
}

/// A raw API response as returned by a transport.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl Response {
    /// Whether the response carries an error status (4xx/5xx).
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }

    /// Decode the raw body as JSON into the given type.
    pub fn decode_json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ClientError::Decode(format!("invalid JSON response body: {e}")))
    }
}

/// Request builder and transport capability for public endpoints.
///
/// `send_request` returns a boxed future so the trait stays object-safe;
/// generated request types typically hold an `Arc<dyn ApiClient>`.
pub trait ApiClient: Send + Sync {
    /// Build an HTTP request for a public endpoint.
    fn new_request(
        &self,
        method: &str,
        path: &str,
        query: QueryParams,
        body: Option<Value>,
    ) -> Result<Request, ClientError>;

    /// Send the request to the API gateway.
    fn send_request(&self, req: Request) -> BoxFuture<'_, Result<Response, ClientError>>;
}

/// Request builder capability for authentication-required endpoints.
pub trait AuthenticatedRequestBuilder: Send + Sync {
    /// Build an HTTP request carrying authentication material.
    fn new_authenticated_request(
        &self,
        method: &str,
        path: &str,
        query: QueryParams,
        body: Option<Value>,
    ) -> Result<Request, ClientError>;
}

/// A client usable for both public and authenticated endpoints.
pub trait AuthenticatedApiClient: ApiClient + AuthenticatedRequestBuilder {}

impl<T: ApiClient + AuthenticatedRequestBuilder> AuthenticatedApiClient for T {}

/// Optional capability of a decoded response type: semantic validation of
/// the payload after decoding. A failure is surfaced as the call's error.
pub trait ResponseValidator {
    fn validate(&self) -> Result<(), RequestError>;
}

/// Optional capability of a request type: compute the request path at
/// runtime instead of using a static URL template.
pub trait DynamicPath {
    fn dynamic_path(&self) -> Result<String, RequestError>;
}

/// Optional capability of a decoded response type: decode itself from the
/// raw response body instead of taking the default JSON path.
pub trait ResponseUnmarshaler: Sized {
    fn unmarshal(body: &[u8]) -> Result<Self, RequestError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_is_error() {
        let ok = Response {
            status: 200,
            body: b"{}".to_vec(),
        };
        let bad = Response {
            status: 404,
            body: Vec::new(),
        };
        assert!(!ok.is_error());
        assert!(bad.is_error());
    }

    #[test]
    fn test_decode_json() {
        #[derive(serde::Deserialize)]
        struct Body {
            code: i64,
        }

        let resp = Response {
            status: 200,
            body: br#"{"code": 7}"#.to_vec(),
        };
        let body: Body = resp.decode_json().unwrap();
        assert_eq!(body.code, 7);

        let broken = Response {
            status: 200,
            body: b"not json".to_vec(),
        };
        assert!(broken.decode_json::<Body>().is_err());
    }

    #[test]
    fn test_custom_unmarshaler() {
        struct Csv {
            fields: Vec<String>,
        }

        impl ResponseUnmarshaler for Csv {
            fn unmarshal(body: &[u8]) -> Result<Self, RequestError> {
                let text = std::str::from_utf8(body)
                    .map_err(|e| RequestError::Validation(format!("not utf-8: {e}")))?;
                Ok(Self {
                    fields: text.trim().split(',').map(str::to_string).collect(),
                })
            }
        }

        let resp = Response {
            status: 200,
            body: b"a,b,c\n".to_vec(),
        };
        let csv = Csv::unmarshal(&resp.body).unwrap();
        assert_eq!(csv.fields, vec!["a", "b", "c"]);

        let broken = Response {
            status: 200,
            body: vec![0xff, 0xfe],
        };
        assert!(Csv::unmarshal(&broken.body).is_err());
    }
}
