//! Transport primitives for API calls.
//!
//! [`ApiTransport`] is the client's only dependency on an HTTP stack. The client hands it a
//! fully resolved [`OutboundRequest`] (absolute URL, JSON body, optional bearer) and gets an
//! [`ApiResponse`] back for every status code; only failures that never produced a
//! response are reported as [`TransportError`]. Status interpretation (auth failure,
//! pass-through, refresh) stays in the client.

// self
use crate::{_prelude::*, auth::TokenSecret, error::TransportError};
#[cfg(feature = "reqwest")]
use {
	reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, RETRY_AFTER},
	time::format_description::well_known::Rfc2822,
};

/// Boxed future returned by [`ApiTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks able to execute API calls.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by every
/// clone of a client, and the futures they return must be `Send`.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes the request and returns the response for any status code.
	fn execute(&self, request: OutboundRequest) -> TransportFuture<'_>;
}

/// HTTP verbs used by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `DELETE`
	Delete,
}
impl Method {
	/// Returns the canonical verb string.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully resolved request handed to an [`ApiTransport`].
#[derive(Clone, Debug)]
pub struct OutboundRequest {
	/// HTTP verb.
	pub method: Method,
	/// Absolute request URL.
	pub url: Url,
	/// Serialized JSON body, if any.
	pub body: Option<Vec<u8>>,
	/// Bearer credential to send as `Authorization: Bearer <token>`.
	pub bearer: Option<TokenSecret>,
}
impl OutboundRequest {
	/// Returns the `Authorization` header value this request will carry.
	pub fn authorization(&self) -> Option<String> {
		self.bearer.as_ref().map(TokenSecret::bearer)
	}
}

/// Response captured by the transport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw body bytes.
	pub body: Vec<u8>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}
impl ApiResponse {
	/// Creates a response with the given status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into(), retry_after: None }
	}

	/// Creates a response whose body is the JSON encoding of `value`.
	pub fn json(status: u16, value: &serde_json::Value) -> Self {
		Self::new(status, value.to_string())
	}

	/// True for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Decodes the body as JSON, reporting the path of any mismatch.
	pub fn decode<T>(&self, context: &'static str) -> Result<T>
	where
		T: for<'de> Deserialize<'de>,
	{
		// Endpoints that answer `204 No Content` decode as JSON null.
		let body: &[u8] = if self.body.is_empty() { b"null" } else { &self.body };
		let mut de = serde_json::Deserializer::from_slice(body);

		serde_path_to_error::deserialize(&mut de).map_err(|source| Error::Decode { context, source })
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	fn execute(&self, request: OutboundRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				Method::Get => reqwest::Method::GET,
				Method::Post => reqwest::Method::POST,
				Method::Put => reqwest::Method::PUT,
				Method::Delete => reqwest::Method::DELETE,
			};
			let mut builder = client.request(method, request.url.clone());

			if let Some(value) = request.authorization() {
				builder = builder.header(AUTHORIZATION, value);
			}
			if let Some(body) = request.body {
				builder = builder.header(CONTENT_TYPE, "application/json").body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let retry_after = parse_retry_after(response.headers());
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, body, retry_after })
		})
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, Deserialize)]
	struct Probe {
		#[allow(dead_code)]
		name: String,
	}

	#[test]
	fn decode_reports_field_path() {
		let response = ApiResponse::new(200, br#"{"name": 7}"#.to_vec());
		let err = response.decode::<Probe>("probe").expect_err("Mismatched body should fail.");

		match err {
			Error::Decode { context, source } => {
				assert_eq!(context, "probe");
				assert_eq!(source.path().to_string(), "name");
			},
			other => panic!("Unexpected error: {other:?}"),
		}
	}

	#[test]
	fn empty_body_decodes_as_unit() {
		let response = ApiResponse::new(204, Vec::new());

		response.decode::<()>("delete").expect("Empty body should decode as unit.");
	}

	#[test]
	fn outbound_request_renders_bearer_header() {
		let request = OutboundRequest {
			method: Method::Get,
			url: Url::parse("http://localhost:3000/customers/").expect("Fixture URL should parse."),
			body: None,
			bearer: Some("T1".into()),
		};

		assert_eq!(request.authorization().as_deref(), Some("Bearer T1"));
		assert_eq!(request.method.to_string(), "GET");
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn retry_after_accepts_delta_seconds() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, "30".parse().expect("Header value should parse."));

		assert_eq!(parse_retry_after(&headers), Some(Duration::seconds(30)));
	}
}
