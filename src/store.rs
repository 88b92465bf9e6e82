//! Storage contracts and built-in credential stores.
//!
//! A store mirrors a browser-style key-value area with three fixed keys:
//! [`ACCESS_TOKEN_KEY`], [`REFRESH_TOKEN_KEY`], and [`USER_KEY`]. Clearing a store removes
//! all three.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, TokenSecret, UserProfile},
};

/// Key holding the access credential.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Key holding the refresh credential.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Key holding the serialized user profile.
pub const USER_KEY: &str = "user";

/// Boxed future returned by [`SessionStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for session credentials.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Reads a snapshot of every stored key.
	fn load(&self) -> StoreFuture<'_, StoredSession>;

	/// Replaces both credentials in one step.
	fn save_credentials(&self, pair: CredentialPair) -> StoreFuture<'_, ()>;

	/// Replaces the cached user profile.
	fn save_user(&self, user: UserProfile) -> StoreFuture<'_, ()>;

	/// Removes the credentials and the user profile.
	fn clear(&self) -> StoreFuture<'_, ()>;
}

/// Raw contents of a credential store.
///
/// Fields are kept independently, exactly as a key-value store holds them; use
/// [`StoredSession::credentials`] to get a pair that honors the both-or-neither rule.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
	/// Value under [`ACCESS_TOKEN_KEY`].
	#[serde(rename = "accessToken", default, skip_serializing_if = "Option::is_none")]
	pub access_token: Option<TokenSecret>,
	/// Value under [`REFRESH_TOKEN_KEY`].
	#[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<TokenSecret>,
	/// Value under [`USER_KEY`], a serialized [`UserProfile`].
	#[serde(rename = "user", default, skip_serializing_if = "Option::is_none")]
	pub user: Option<String>,
}
impl StoredSession {
	/// Returns the credential pair if both halves are present.
	pub fn credentials(&self) -> Option<CredentialPair> {
		CredentialPair::from_parts(self.access_token.clone(), self.refresh_token.clone())
	}

	/// Returns the access credential to attach to outbound requests, if any.
	pub fn access_token(&self) -> Option<&TokenSecret> {
		self.access_token.as_ref().filter(|token| !token.is_blank())
	}

	/// Parses the stored profile; an unreadable blob reads as absent.
	pub fn user(&self) -> Option<UserProfile> {
		self.user.as_deref().and_then(UserProfile::from_blob)
	}

	/// True when nothing is stored under any key.
	pub fn is_empty(&self) -> bool {
		self.access_token.is_none() && self.refresh_token.is_none() && self.user.is_none()
	}
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

pub(crate) fn user_blob(user: &UserProfile) -> Result<String, StoreError> {
	user.to_blob().map_err(|e| StoreError::Serialization {
		message: format!("Failed to serialize user profile: {e}"),
	})
}
