//! Request bodies for the session, customer, and measurement endpoints.
//!
//! Every form implements [`Validate`](crate::validate::Validate); the client validates before
//! serializing, so malformed input never reaches the network.

// self
use crate::{_prelude::*, model::MeasurementKind};

/// `POST /users/login` body.
#[derive(Clone, Serialize)]
pub struct LoginForm {
	/// Account email.
	pub email: String,
	/// Account password.
	pub password: String,
}
impl LoginForm {
	/// Creates a login form.
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self { email: email.into(), password: password.into() }
	}
}
impl Debug for LoginForm {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginForm")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// `POST /users/register` body.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
	/// Shop owner's name.
	pub full_name: String,
	/// Account email.
	pub email: String,
	/// Account password.
	pub password: String,
	/// Ten-digit contact phone.
	pub phone: String,
}
impl Debug for RegisterForm {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RegisterForm")
			.field("full_name", &self.full_name)
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.field("phone", &self.phone)
			.finish()
	}
}

/// Customer create/update body.
///
/// Measurements are only sent on creation (`POST /customers/with-measurements`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerForm {
	/// Customer name.
	pub full_name: String,
	/// Ten-digit contact phone.
	pub phone: String,
	/// Optional email; an empty string counts as absent and is not sent.
	#[serde(skip_serializing_if = "is_absent")]
	pub email: Option<String>,
	/// Optional gender label.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub gender: Option<String>,
	/// Optional postal address.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub address: Option<String>,
	/// Measurement sheets created together with the customer.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub measurements: Vec<MeasurementForm>,
}
impl CustomerForm {
	/// Creates a form with the two required fields.
	pub fn new(full_name: impl Into<String>, phone: impl Into<String>) -> Self {
		Self { full_name: full_name.into(), phone: phone.into(), ..Default::default() }
	}

	/// Sets the email.
	pub fn email(mut self, email: impl Into<String>) -> Self {
		self.email = Some(email.into());

		self
	}

	/// Sets the gender label.
	pub fn gender(mut self, gender: impl Into<String>) -> Self {
		self.gender = Some(gender.into());

		self
	}

	/// Sets the address.
	pub fn address(mut self, address: impl Into<String>) -> Self {
		self.address = Some(address.into());

		self
	}

	/// Appends a measurement sheet.
	pub fn measurement(mut self, measurement: MeasurementForm) -> Self {
		self.measurements.push(measurement);

		self
	}
}

/// Measurement create/update body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MeasurementForm {
	/// Garment type label.
	#[serde(rename = "type")]
	pub kind: String,
	/// Free-form notes; sent as an empty string when unset.
	pub notes: String,
	/// Field name to measured value.
	pub data: BTreeMap<String, String>,
}
impl MeasurementForm {
	/// Starts a sheet for a built-in garment with every field blank.
	pub fn for_kind(kind: MeasurementKind) -> Self {
		Self { kind: kind.as_str().to_owned(), notes: String::new(), data: kind.template() }
	}

	/// Starts a sheet for a custom garment label with no fields.
	pub fn custom(kind: impl Into<String>) -> Self {
		Self { kind: kind.into(), ..Default::default() }
	}

	/// Sets one measured value.
	pub fn set(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
		self.data.insert(field.into(), value.into());

		self
	}

	/// Sets the notes.
	pub fn notes(mut self, notes: impl Into<String>) -> Self {
		self.notes = notes.into();

		self
	}

	/// True when at least one field carries a value.
	pub fn has_values(&self) -> bool {
		self.data.values().any(|value| !value.trim().is_empty())
	}
}

fn is_absent(value: &Option<String>) -> bool {
	value.as_deref().is_none_or(str::is_empty)
}
