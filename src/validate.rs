//! Local input validation run before any request is made.

// self
use crate::{
	_prelude::*,
	model::{CustomerForm, LoginForm, MeasurementForm, RegisterForm},
};

const MIN_NAME_LEN: usize = 2;
const MIN_PASSWORD_LEN: usize = 8;
const PHONE_DIGITS: usize = 10;

/// Types that can check themselves before being sent.
pub trait Validate {
	/// Returns every rule the value breaks, or `Ok(())`.
	fn validate(&self) -> Result<(), ValidationErrors>;
}

/// One broken rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
	/// Field path, e.g. `phone` or `measurements[0].type`.
	pub field: String,
	/// Human-readable message.
	pub message: String,
}

/// Every rule a form breaks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(Vec<FieldError>);
impl ValidationErrors {
	/// Adds a failure for `field`.
	pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
		self.0.push(FieldError { field: field.into(), message: message.into() });
	}

	/// True when no rule failed.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates over failures in the order they were found.
	pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
		self.0.iter()
	}

	/// Returns the first message recorded for `field`.
	pub fn message_for(&self, field: &str) -> Option<&str> {
		self.0.iter().find(|e| e.field == field).map(|e| e.message.as_str())
	}

	/// Converts the collection into a result.
	pub fn into_result(self) -> Result<(), Self> {
		if self.is_empty() { Ok(()) } else { Err(self) }
	}
}
impl Display for ValidationErrors {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Invalid input")?;

		for (idx, error) in self.0.iter().enumerate() {
			let sep = if idx == 0 { ": " } else { "; " };

			write!(f, "{sep}{} ({})", error.message, error.field)?;
		}

		Ok(())
	}
}
impl StdError for ValidationErrors {}

impl Validate for LoginForm {
	fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::default();

		check_email(&mut errors, "email", &self.email);
		check_min_len(
			&mut errors,
			"password",
			&self.password,
			MIN_PASSWORD_LEN,
			"Password must be at least 8 characters long",
		);

		errors.into_result()
	}
}

impl Validate for RegisterForm {
	fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::default();

		check_min_len(
			&mut errors,
			"fullName",
			&self.full_name,
			MIN_NAME_LEN,
			"Full name must be at least 2 characters long",
		);
		check_email(&mut errors, "email", &self.email);
		check_min_len(
			&mut errors,
			"password",
			&self.password,
			MIN_PASSWORD_LEN,
			"Password must be at least 8 characters long",
		);
		check_phone(&mut errors, "phone", &self.phone);

		errors.into_result()
	}
}

impl Validate for CustomerForm {
	fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::default();

		check_min_len(
			&mut errors,
			"fullName",
			&self.full_name,
			MIN_NAME_LEN,
			"Name must be at least 2 characters",
		);
		check_phone(&mut errors, "phone", &self.phone);

		if let Some(email) = self.email.as_deref().filter(|email| !email.is_empty()) {
			check_email(&mut errors, "email", email);
		}

		for (idx, measurement) in self.measurements.iter().enumerate() {
			check_kind(&mut errors, &format!("measurements[{idx}].type"), measurement);
		}

		errors.into_result()
	}
}

impl Validate for MeasurementForm {
	fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::default();

		check_kind(&mut errors, "type", self);

		errors.into_result()
	}
}

/// Validates a standalone measurement sheet, which must carry at least one value.
pub fn validate_sheet(form: &MeasurementForm) -> Result<(), ValidationErrors> {
	let mut errors = match form.validate() {
		Ok(()) => ValidationErrors::default(),
		Err(errors) => errors,
	};

	if !form.has_values() {
		errors.push("data", "Please add at least one measurement field");
	}

	errors.into_result()
}

/// Minimal structural email check: `local@domain.tld` with no whitespace.
pub fn is_valid_email(value: &str) -> bool {
	let Some((local, domain)) = value.split_once('@') else {
		return false;
	};

	!local.is_empty()
		&& !domain.contains('@')
		&& !value.chars().any(char::is_whitespace)
		&& domain.split('.').count() >= 2
		&& domain.split('.').all(|label| !label.is_empty())
}

fn check_email(errors: &mut ValidationErrors, field: &str, value: &str) {
	if !is_valid_email(value) {
		errors.push(field, "Invalid email address");
	}
}

fn check_min_len(
	errors: &mut ValidationErrors,
	field: &str,
	value: &str,
	min: usize,
	message: &str,
) {
	if value.chars().count() < min {
		errors.push(field, message);
	}
}

fn check_phone(errors: &mut ValidationErrors, field: &str, value: &str) {
	if value.chars().count() != PHONE_DIGITS {
		errors.push(field, "Phone number must be exactly 10 digits");
	}
	if !value.chars().all(|c| c.is_ascii_digit()) {
		errors.push(field, "Phone number must contain only digits");
	}
}

fn check_kind(errors: &mut ValidationErrors, field: &str, form: &MeasurementForm) {
	if form.kind.trim().is_empty() {
		errors.push(field, "Type is required");
	}
}
