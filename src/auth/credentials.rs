//! Access/refresh credential pair issued by the session endpoints.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Access and refresh credentials that are only meaningful together.
///
/// The wire shape matches the API's login and refresh responses:
/// `{ "accessToken": "...", "refreshToken": "..." }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPair {
	/// Short-lived bearer credential attached to API calls.
	pub access_token: TokenSecret,
	/// Longer-lived credential exchanged for a new pair.
	pub refresh_token: TokenSecret,
}
impl CredentialPair {
	/// Pairs the provided access and refresh credentials.
	pub fn new(access: impl Into<TokenSecret>, refresh: impl Into<TokenSecret>) -> Self {
		Self { access_token: access.into(), refresh_token: refresh.into() }
	}

	/// Assembles a pair from independently stored halves.
	///
	/// Returns `None` unless both halves are present and non-blank; a partial pair is
	/// treated as no session at all.
	pub fn from_parts(access: Option<TokenSecret>, refresh: Option<TokenSecret>) -> Option<Self> {
		match (access, refresh) {
			(Some(access), Some(refresh)) if !access.is_blank() && !refresh.is_blank() =>
				Some(Self { access_token: access, refresh_token: refresh }),
			_ => None,
		}
	}
}
