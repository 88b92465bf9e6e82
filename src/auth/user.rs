//! Signed-in user profile cached next to the credential pair.

// self
use crate::_prelude::*;

/// Profile returned by the login endpoint and stored under the `user` key.
///
/// Unknown fields are preserved so a newer API does not lose data on a store round trip.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
	/// Server-side user identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Display name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub full_name: Option<String>,
	/// Login email.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Contact phone.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	/// Any additional fields the API attached.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}
impl UserProfile {
	/// Parses a serialized profile blob, returning `None` when it is unreadable.
	pub fn from_blob(blob: &str) -> Option<Self> {
		serde_json::from_str(blob).ok()
	}

	/// Serializes the profile into the blob format kept by credential stores.
	pub fn to_blob(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string(self)
	}
}
