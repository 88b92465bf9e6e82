//! Client configuration: API location, session endpoints, and the auth-failure status.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable read by [`ClientConfig::from_env`].
pub const BASE_URL_ENV: &str = "TAILOR_TRACK_API_BASE_URL";
/// Base URL used when [`BASE_URL_ENV`] is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Validated client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Root of the API; endpoint paths are appended to it.
	pub base_url: Url,
	/// Credential-renewal endpoint path.
	pub refresh_path: String,
	/// Application path the navigator is sent to when a session ends.
	pub login_redirect: String,
	/// Status code meaning "the access credential was rejected".
	pub auth_failure_status: u16,
}
impl ClientConfig {
	/// Default credential-renewal endpoint.
	pub const DEFAULT_REFRESH_PATH: &str = "/users/refresh";
	/// Default login entry point.
	pub const DEFAULT_LOGIN_REDIRECT: &str = "/login";
	/// Default auth-failure status.
	pub const DEFAULT_AUTH_FAILURE_STATUS: u16 = 401;

	/// Starts a builder for the provided base URL string.
	pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
		ClientConfigBuilder::new(base_url)
	}

	/// Builds a configuration from [`BASE_URL_ENV`], falling back to [`DEFAULT_BASE_URL`].
	pub fn from_env() -> Result<Self, ConfigError> {
		let base = env::var(BASE_URL_ENV)
			.ok()
			.filter(|value| !value.trim().is_empty())
			.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

		Self::builder(base).build()
	}

	/// Resolves an absolute API path (e.g. `/customers/42`) against the base URL.
	///
	/// Any path prefix on the base URL is preserved, so a base of
	/// `https://api.example.com/v1` maps `/customers` to `https://api.example.com/v1/customers`.
	pub fn endpoint(&self, path: &str) -> Url {
		let mut url = self.base_url.clone();
		let (path, query) = match path.split_once('?') {
			Some((path, query)) => (path, Some(query)),
			None => (path, None),
		};
		let joined = format!("{}{}", self.base_url.path().trim_end_matches('/'), path);

		url.set_path(&joined);
		url.set_query(query);

		url
	}

	/// Absolute URL of the credential-renewal endpoint.
	pub fn refresh_url(&self) -> Url {
		self.endpoint(&self.refresh_path)
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	base_url: String,
	refresh_path: String,
	login_redirect: String,
	auth_failure_status: u16,
}
impl ClientConfigBuilder {
	fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
			refresh_path: ClientConfig::DEFAULT_REFRESH_PATH.to_owned(),
			login_redirect: ClientConfig::DEFAULT_LOGIN_REDIRECT.to_owned(),
			auth_failure_status: ClientConfig::DEFAULT_AUTH_FAILURE_STATUS,
		}
	}

	/// Overrides the credential-renewal endpoint path.
	pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
		self.refresh_path = path.into();

		self
	}

	/// Overrides the path handed to the navigator when a session ends.
	pub fn login_redirect(mut self, path: impl Into<String>) -> Self {
		self.login_redirect = path.into();

		self
	}

	/// Overrides the status treated as an expired access credential.
	pub fn auth_failure_status(mut self, status: u16) -> Self {
		self.auth_failure_status = status;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let base_url = Url::parse(self.base_url.trim())
			.map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		if !matches!(base_url.scheme(), "http" | "https") {
			return Err(ConfigError::UnsupportedScheme { url: base_url.to_string() });
		}
		if base_url.cannot_be_a_base() {
			return Err(ConfigError::CannotBeABase { url: base_url.to_string() });
		}

		validate_path("refresh", &self.refresh_path)?;
		validate_path("login redirect", &self.login_redirect)?;

		if !(400..500).contains(&self.auth_failure_status) {
			return Err(ConfigError::InvalidAuthFailureStatus {
				status: self.auth_failure_status,
			});
		}

		Ok(ClientConfig {
			base_url,
			refresh_path: self.refresh_path,
			login_redirect: self.login_redirect,
			auth_failure_status: self.auth_failure_status,
		})
	}
}

fn validate_path(name: &'static str, path: &str) -> Result<(), ConfigError> {
	if path.starts_with('/') {
		Ok(())
	} else {
		Err(ConfigError::RelativePath { name, path: path.to_owned() })
	}
}
