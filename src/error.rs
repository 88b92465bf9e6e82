//! Client-level error types shared across the session, customer, and store layers.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Input rejected locally before any request was made.
	#[error(transparent)]
	Validation(#[from] crate::validate::ValidationErrors),
	/// Session could not be recovered; stored credentials were cleared.
	#[error(transparent)]
	Refresh(#[from] RefreshError),

	/// API answered with a non-success status other than the auth-failure status.
	#[error("API request failed: {0}")]
	Status(StatusError),
	/// API rejected the access credential and the request will not be retried.
	#[error("API rejected the session credentials: {0}")]
	Unauthorized(StatusError),
	/// Response body did not match the expected record shape.
	#[error("Response body for {context} could not be decoded.")]
	Decode {
		/// Operation whose response failed to decode.
		context: &'static str,
		/// Path-aware parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl Error {
	/// Returns the HTTP status attached to the error, when the API produced one.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status(e) | Self::Unauthorized(e) => Some(e.status),
			Self::Refresh(RefreshError::Rejected { status, .. }) => Some(*status),
			_ => None,
		}
	}

	/// Returns the user-facing message carried by the API, when one was supplied.
	pub fn api_message(&self) -> Option<&str> {
		match self {
			Self::Status(e) | Self::Unauthorized(e) => e.message.as_deref(),
			Self::Refresh(RefreshError::Rejected { message, .. }) => message.as_deref(),
			_ => None,
		}
	}
}

/// HTTP failure surfaced unchanged from the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusError {
	/// Status code returned by the API.
	pub status: u16,
	/// Message extracted from an `{"error":{"message":..}}` or `{"message":..}` body.
	pub message: Option<String>,
	/// Raw response body, decoded lossily as UTF-8.
	pub body: String,
	/// Retry-After hint supplied by the API.
	pub retry_after: Option<Duration>,
}
impl StatusError {
	/// Builds a status error from a raw API response.
	pub fn from_response(response: &crate::http::ApiResponse) -> Self {
		Self {
			status: response.status,
			message: extract_message(&response.body),
			body: String::from_utf8_lossy(&response.body).into_owned(),
			retry_after: response.retry_after,
		}
	}
}
impl Display for StatusError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match &self.message {
			Some(message) => write!(f, "status {} ({message})", self.status),
			None => write!(f, "status {}", self.status),
		}
	}
}

/// Terminal outcome of a failed session refresh.
///
/// The type is `Clone` because a single refresh outcome is delivered to every request
/// that queued behind it.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RefreshError {
	/// Refresh endpoint answered with a non-success status.
	#[error("Refresh endpoint rejected the refresh token with status {status}.")]
	Rejected {
		/// Status code returned by the refresh endpoint.
		status: u16,
		/// Message extracted from the response body, if any.
		message: Option<String>,
	},
	/// Refresh call never produced a response.
	#[error("Network error occurred while calling the refresh endpoint: {message}.")]
	Transport {
		/// Transport failure summary.
		message: String,
	},
	/// Refresh endpoint returned a body without a usable credential pair.
	#[error("Refresh endpoint returned a malformed credential pair: {message}.")]
	MalformedResponse {
		/// Parsing failure summary.
		message: String,
	},
	/// Rotated credentials could not be persisted.
	#[error("Rotated credentials could not be persisted: {0}")]
	Storage(crate::store::StoreError),
	/// No refresh credential was stored when the session expired.
	#[error("No refresh token is stored for this session.")]
	MissingRefreshToken,
	/// The request driving the refresh was dropped before it settled.
	#[error("Session refresh was abandoned before it completed.")]
	Abandoned,
}

/// Configuration and validation failures raised while building a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed.
	#[error("API base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than http or https.
	#[error("API base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// URL that failed validation.
		url: String,
	},
	/// Base URL cannot carry a path (e.g. `mailto:`).
	#[error("API base URL cannot be used as a base: {url}.")]
	CannotBeABase {
		/// URL that failed validation.
		url: String,
	},
	/// Endpoint or redirect path is not absolute.
	#[error("The {name} path must start with '/': {path}.")]
	RelativePath {
		/// Which path failed validation.
		name: &'static str,
		/// Offending value.
		path: String,
	},
	/// Auth-failure status is outside the 4xx range.
	#[error("Auth-failure status must be a 4xx code, got {status}.")]
	InvalidAuthFailureStatus {
		/// Offending status code.
		status: u16,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	RequestBody(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Pulls a human-readable message out of common API error bodies.
pub(crate) fn extract_message(body: &[u8]) -> Option<String> {
	let value: serde_json::Value = serde_json::from_slice(body).ok()?;
	let message = value
		.pointer("/error/message")
		.or_else(|| value.get("message"))
		.or_else(|| value.get("error").filter(|e| e.is_string()))?;

	message.as_str().map(ToOwned::to_owned)
}
