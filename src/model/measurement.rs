//! Measurement records and the built-in garment templates.

// self
use crate::{_prelude::*, model::MeasurementId};

/// Measurement sheet attached to a customer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
	/// Server-assigned identifier.
	pub id: MeasurementId,
	/// Garment type label, e.g. `shirt` or `pant`.
	#[serde(rename = "type")]
	pub kind: String,
	/// Free-form tailor notes.
	#[serde(default)]
	pub notes: Option<String>,
	/// Field name to measured value.
	#[serde(default)]
	pub data: BTreeMap<String, String>,
	/// Creation instant.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
	/// Last update instant.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub updated_at: Option<OffsetDateTime>,
}
impl Measurement {
	/// Returns the template this record follows, if its type is a known garment.
	pub fn template(&self) -> Option<MeasurementKind> {
		self.kind.parse().ok()
	}
}

/// Garments with a predefined set of measurement fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementKind {
	/// Shirt measurements.
	Shirt,
	/// Trouser measurements.
	Pant,
}
impl MeasurementKind {
	/// Every known garment.
	pub const ALL: [MeasurementKind; 2] = [MeasurementKind::Shirt, MeasurementKind::Pant];

	/// Returns the wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			MeasurementKind::Shirt => "shirt",
			MeasurementKind::Pant => "pant",
		}
	}

	/// Field names captured for this garment, in sheet order.
	pub const fn fields(self) -> &'static [&'static str] {
		match self {
			MeasurementKind::Shirt =>
				&["length", "chest", "sleeve", "shoulder", "waist", "front", "neck"],
			MeasurementKind::Pant => &["length", "waist", "hip", "ankles", "thighs", "rise", "knee"],
		}
	}

	/// Blank data map with every field of the garment.
	pub fn template(self) -> BTreeMap<String, String> {
		self.fields().iter().map(|field| ((*field).to_owned(), String::new())).collect()
	}
}
impl Display for MeasurementKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for MeasurementKind {
	type Err = UnknownMeasurementKind;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
			.ok_or_else(|| UnknownMeasurementKind(s.to_owned()))
	}
}

/// Returned when a label names no built-in garment.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown measurement type: {0}.")]
pub struct UnknownMeasurementKind(pub String);
