//! Customer and measurement endpoints.
//!
//! Every call validates its form locally, then goes through [`ApiClient::send`], so an expired
//! session is renewed transparently.

// self
use crate::{
	_prelude::*,
	client::{ApiClient, ApiRequest},
	http::ApiTransport,
	model::{
		Customer, CustomerForm, CustomerId, MeasurementForm, MeasurementId,
		customer::{CustomerEnvelope, CustomerList},
	},
	validate::{self, Validate},
};

const CUSTOMERS_PATH: &str = "/customers/";
const CUSTOMERS_WITH_MEASUREMENTS_PATH: &str = "/customers/with-measurements";
const MEASUREMENTS_PATH: &str = "/customers/measurements";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewMeasurement<'a> {
	customer_id: &'a CustomerId,
	#[serde(flatten)]
	form: &'a MeasurementForm,
}

impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Lists every customer of the signed-in shop.
	pub async fn list_customers(&self) -> Result<Vec<Customer>> {
		let response = self.send(ApiRequest::get(CUSTOMERS_PATH)).await?;

		Ok(response.decode::<CustomerList>("list_customers")?.customers)
	}

	/// Fetches one customer with their measurement sheets.
	pub async fn customer(&self, id: &CustomerId) -> Result<Customer> {
		let response = self.send(ApiRequest::get(customer_path(id))).await?;

		Ok(response.decode::<CustomerEnvelope>("customer")?.customer)
	}

	/// Creates a customer together with any measurement sheets on the form.
	pub async fn create_customer(&self, form: &CustomerForm) -> Result<()> {
		form.validate()?;
		self.send(ApiRequest::post(CUSTOMERS_WITH_MEASUREMENTS_PATH).json(form)?).await?;

		Ok(())
	}

	/// Updates a customer's details. Measurement sheets on the form are not sent.
	pub async fn update_customer(&self, id: &CustomerId, form: &CustomerForm) -> Result<()> {
		form.validate()?;

		let details = CustomerForm { measurements: Vec::new(), ..form.clone() };

		self.send(ApiRequest::put(customer_path(id)).json(&details)?).await?;

		Ok(())
	}

	/// Deletes a customer.
	pub async fn delete_customer(&self, id: &CustomerId) -> Result<()> {
		self.send(ApiRequest::delete(customer_path(id))).await?;

		Ok(())
	}

	/// Adds a measurement sheet to an existing customer.
	pub async fn add_measurement(
		&self,
		customer_id: &CustomerId,
		form: &MeasurementForm,
	) -> Result<()> {
		validate::validate_sheet(form)?;

		let body = NewMeasurement { customer_id, form };

		self.send(ApiRequest::post(MEASUREMENTS_PATH).json(&body)?).await?;

		Ok(())
	}

	/// Replaces a measurement sheet.
	pub async fn update_measurement(&self, id: &MeasurementId, form: &MeasurementForm) -> Result<()> {
		validate::validate_sheet(form)?;
		self.send(ApiRequest::put(measurement_path(id)).json(form)?).await?;

		Ok(())
	}

	/// Deletes a measurement sheet.
	pub async fn delete_measurement(&self, id: &MeasurementId) -> Result<()> {
		self.send(ApiRequest::delete(measurement_path(id))).await?;

		Ok(())
	}
}

fn customer_path(id: &CustomerId) -> String {
	format!("/customers/{id}")
}

fn measurement_path(id: &MeasurementId) -> String {
	format!("{MEASUREMENTS_PATH}/{id}")
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::*,
		auth::CredentialPair,
		http::{ApiResponse, Method, OutboundRequest},
		model::MeasurementKind,
		store::MemoryStore,
	};

	fn signed_in() -> MemoryStore {
		MemoryStore::with_credentials(CredentialPair::new("T1", "R1"))
	}

	fn body(request: &OutboundRequest) -> serde_json::Value {
		serde_json::from_slice(request.body.as_deref().unwrap_or(b"null"))
			.expect("Request body should be JSON.")
	}

	#[tokio::test]
	async fn customer_reads_decode_typed_records() {
		let (client, _, _, transport) =
			build_scripted_client(signed_in(), |request: &OutboundRequest| {
				match request.url.path() {
					"/customers/" => ApiResponse::json(
						200,
						&serde_json::json!({
							"customers": [{ "id": "c1", "fullName": "Kiran", "phone": "9876543210" }]
						}),
					),
					_ => ApiResponse::json(
						200,
						&serde_json::json!({
							"customer": {
								"id": "c1",
								"fullName": "Kiran",
								"phone": "9876543210",
								"measurements": [{ "id": "m1", "type": "pant", "data": { "waist": "32" } }]
							}
						}),
					),
				}
			});
		let customers = client.list_customers().await.expect("List should decode.");
		let id = CustomerId::new("c1").expect("Identifier should be valid.");
		let customer = client.customer(&id).await.expect("Customer should decode.");

		assert_eq!(customers.len(), 1);
		assert_eq!(customer.measurements[0].data["waist"], "32");
		assert_eq!(transport.requests()[1].url.path(), "/customers/c1");
		assert!(
			transport.requests().iter().all(|r| r.authorization().as_deref() == Some("Bearer T1"))
		);
	}

	#[tokio::test]
	async fn undecodable_customer_reports_the_field_path() {
		let (client, _, _, _) = build_scripted_client(signed_in(), |_: &OutboundRequest| {
			ApiResponse::json(200, &serde_json::json!({ "customers": [{ "id": "c1" }] }))
		});
		let err = client.list_customers().await.expect_err("Missing name should fail to decode.");

		match err {
			Error::Decode { context, source } => {
				assert_eq!(context, "list_customers");
				assert!(source.path().to_string().starts_with("customers[0]"));
			},
			other => panic!("Unexpected error: {other:?}"),
		}
	}

	#[tokio::test]
	async fn mutations_hit_the_expected_routes() {
		let (client, _, _, transport) =
			build_scripted_client(signed_in(), |_: &OutboundRequest| ApiResponse::new(204, ""));
		let customer = CustomerId::new("c1").expect("Identifier should be valid.");
		let measurement = MeasurementId::new("m1").expect("Identifier should be valid.");
		let sheet = MeasurementForm::for_kind(MeasurementKind::Shirt).set("chest", "38");
		let form = CustomerForm::new("Kiran", "9876543210").measurement(sheet.clone());

		client.create_customer(&form).await.expect("Create should succeed.");
		client.update_customer(&customer, &form).await.expect("Update should succeed.");
		client.delete_customer(&customer).await.expect("Delete should succeed.");
		client.add_measurement(&customer, &sheet).await.expect("Add should succeed.");
		client.update_measurement(&measurement, &sheet).await.expect("Edit should succeed.");
		client.delete_measurement(&measurement).await.expect("Delete should succeed.");

		let routes: Vec<_> = transport
			.requests()
			.iter()
			.map(|r| format!("{} {}", r.method, r.url.path()))
			.collect();

		assert_eq!(
			routes,
			[
				"POST /customers/with-measurements",
				"PUT /customers/c1",
				"DELETE /customers/c1",
				"POST /customers/measurements",
				"PUT /customers/measurements/m1",
				"DELETE /customers/measurements/m1",
			],
		);

		let requests = transport.requests();

		assert_eq!(body(&requests[0])["measurements"][0]["data"]["chest"], "38");
		assert!(body(&requests[1]).get("measurements").is_none());
		assert_eq!(requests[2].method, Method::Delete);
		assert_eq!(body(&requests[3])["customerId"], "c1");
		assert_eq!(body(&requests[3])["type"], "shirt");
		assert!(body(&requests[4]).get("customerId").is_none());
	}

	#[tokio::test]
	async fn empty_sheet_is_rejected_locally() {
		let (client, _, _, transport) =
			build_scripted_client(signed_in(), |_: &OutboundRequest| ApiResponse::new(204, ""));
		let customer = CustomerId::new("c1").expect("Identifier should be valid.");
		let err = client
			.add_measurement(&customer, &MeasurementForm::for_kind(MeasurementKind::Pant))
			.await
			.expect_err("Blank sheet should be rejected.");

		assert!(matches!(err, Error::Validation(_)));
		assert!(transport.requests().is_empty());
	}
}
