//! Customer records as returned by the API.

// self
use crate::{
	_prelude::*,
	model::{CustomerId, Measurement},
};

/// Customer with their measurement sheets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
	/// Server-assigned identifier.
	pub id: CustomerId,
	/// Display name.
	pub full_name: String,
	/// Contact phone.
	#[serde(default)]
	pub phone: String,
	/// Optional email.
	#[serde(default)]
	pub email: Option<String>,
	/// Optional gender label.
	#[serde(default)]
	pub gender: Option<String>,
	/// Optional postal address.
	#[serde(default)]
	pub address: Option<String>,
	/// Owning shop user.
	#[serde(default)]
	pub user_id: Option<String>,
	/// Measurement sheets; list endpoints may omit them.
	#[serde(default)]
	pub measurements: Vec<Measurement>,
	/// Creation instant.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
	/// Last update instant.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub updated_at: Option<OffsetDateTime>,
}

/// `GET /customers/` body.
#[derive(Debug, Deserialize)]
pub(crate) struct CustomerList {
	pub(crate) customers: Vec<Customer>,
}

/// `GET /customers/:id` body.
#[derive(Debug, Deserialize)]
pub(crate) struct CustomerEnvelope {
	pub(crate) customer: Customer,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn list_body_parses_with_nested_measurements() {
		let list: CustomerList = serde_json::from_str(
			r#"{
				"customers": [
					{
						"id": "c-1",
						"fullName": "Kiran Desai",
						"phone": "9876543210",
						"email": "",
						"gender": "female",
						"address": null,
						"userId": "u-1",
						"createdAt": "2025-11-05T10:15:00.000Z",
						"updatedAt": "2025-11-05T10:15:00.000Z",
						"measurements": [
							{ "id": "m-1", "type": "shirt", "notes": "", "data": { "chest": "38" } }
						]
					},
					{ "id": "c-2", "fullName": "Dev Mehta", "phone": "9123456780" }
				]
			}"#,
		)
		.expect("Customer list should parse from the API shape.");

		assert_eq!(list.customers.len(), 2);
		assert_eq!(list.customers[0].measurements[0].kind, "shirt");
		assert!(list.customers[1].measurements.is_empty());
		assert_eq!(list.customers[1].created_at, None);
	}
}
