//! Request description shared by every client operation.

// self
use crate::{_prelude::*, error::ConfigError, http::Method};

/// Relative API request: verb, path under the base URL, optional JSON body.
///
/// The request is kept intact so it can be replayed after a session refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
	/// HTTP verb.
	pub method: Method,
	/// Absolute path below the configured base URL, e.g. `/customers/42`.
	pub path: String,
	/// Serialized JSON body.
	pub body: Option<Vec<u8>>,
}
impl ApiRequest {
	/// Creates a body-less request.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self { method, path: path.into(), body: None }
	}

	/// `GET path`
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	/// `POST path`
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	/// `PUT path`
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::Put, path)
	}

	/// `DELETE path`
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::Delete, path)
	}

	/// Attaches `value` as the JSON body.
	pub fn json<B>(mut self, value: &B) -> Result<Self>
	where
		B: ?Sized + Serialize,
	{
		self.body = Some(serde_json::to_vec(value).map_err(ConfigError::RequestBody)?);

		Ok(self)
	}
}

/// Flattens an error and its sources into one line.
pub(crate) fn describe(error: &dyn StdError) -> String {
	let mut message = error.to_string();
	let mut source = error.source();

	while let Some(inner) = source {
		message.push_str(": ");
		message.push_str(&inner.to_string());
		source = inner.source();
	}

	message
}
