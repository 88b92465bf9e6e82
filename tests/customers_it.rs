#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use tailor_track_client::{
	_preludet::*,
	auth::CredentialPair,
	model::{CustomerForm, CustomerId, MeasurementForm, MeasurementId, MeasurementKind},
	store::MemoryStore,
};

fn signed_in() -> MemoryStore {
	MemoryStore::with_credentials(CredentialPair::new("T1", "R1"))
}

#[tokio::test]
async fn customer_lifecycle_uses_the_bearer_token() {
	let server = MockServer::start_async().await;
	let (client, _, _) = build_reqwest_test_client(&server.base_url(), signed_in());
	let create = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/customers/with-measurements")
				.header("authorization", "Bearer T1")
				.json_body(json!({
					"fullName": "Kiran Desai",
					"phone": "9876543210",
					"measurements": [{
						"type": "custom",
						"notes": "loose fit",
						"data": { "hem": "2" }
					}]
				}));
			then.status(201).json_body(json!({ "message": "Customer created" }));
		})
		.await;
	let list = server
		.mock_async(|when, then| {
			when.method(GET).path("/customers/").header("authorization", "Bearer T1");
			then.status(200).json_body(json!({
				"customers": [{
					"id": "c1",
					"fullName": "Kiran Desai",
					"phone": "9876543210",
					"createdAt": "2025-11-05T10:15:00.000Z"
				}]
			}));
		})
		.await;
	let fetch = server
		.mock_async(|when, then| {
			when.method(GET).path("/customers/c1");
			then.status(200).json_body(json!({
				"customer": {
					"id": "c1",
					"fullName": "Kiran Desai",
					"phone": "9876543210",
					"measurements": [{
						"id": "m1",
						"type": "custom",
						"notes": "loose fit",
						"data": { "hem": "2" }
					}]
				}
			}));
		})
		.await;
	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/customers/c1");
			then.status(200).json_body(json!({ "message": "Customer deleted" }));
		})
		.await;
	let form = CustomerForm::new("Kiran Desai", "9876543210")
		.measurement(MeasurementForm::custom("custom").notes("loose fit").set("hem", "2"));

	client.create_customer(&form).await.expect("Create should succeed.");

	let customers = client.list_customers().await.expect("List should succeed.");
	let id = customers[0].id.clone();
	let customer = client.customer(&id).await.expect("Fetch should succeed.");

	client.delete_customer(&id).await.expect("Delete should succeed.");

	create.assert_calls_async(1).await;
	list.assert_calls_async(1).await;
	fetch.assert_calls_async(1).await;
	delete.assert_calls_async(1).await;

	assert!(customers[0].created_at.is_some());
	assert_eq!(customer.measurements[0].notes.as_deref(), Some("loose fit"));
}

#[tokio::test]
async fn measurement_edits_hit_the_measurement_routes() {
	let server = MockServer::start_async().await;
	let (client, _, _) = build_reqwest_test_client(&server.base_url(), signed_in());
	let add = server
		.mock_async(|when, then| {
			when.method(POST).path("/customers/measurements").json_body_includes(
				r#"{ "customerId": "c1", "type": "pant" }"#,
			);
			then.status(201);
		})
		.await;
	let update = server
		.mock_async(|when, then| {
			when.method(PUT).path("/customers/measurements/m1");
			then.status(200);
		})
		.await;
	let remove = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/customers/measurements/m1");
			then.status(204);
		})
		.await;
	let customer = CustomerId::new("c1").expect("Identifier should be valid.");
	let measurement = MeasurementId::new("m1").expect("Identifier should be valid.");
	let sheet = MeasurementForm::for_kind(MeasurementKind::Pant).set("waist", "32");

	client.add_measurement(&customer, &sheet).await.expect("Add should succeed.");
	client
		.update_measurement(&measurement, &sheet.clone().set("knee", "18"))
		.await
		.expect("Update should succeed.");
	client.delete_measurement(&measurement).await.expect("Delete should succeed.");

	add.assert_calls_async(1).await;
	update.assert_calls_async(1).await;
	remove.assert_calls_async(1).await;
}

#[tokio::test]
async fn missing_customer_surfaces_the_api_status() {
	let server = MockServer::start_async().await;
	let (client, _, navigator) = build_reqwest_test_client(&server.base_url(), signed_in());
	let missing = server
		.mock_async(|when, then| {
			when.method(GET).path("/customers/ghost");
			then.status(404).json_body(json!({ "error": { "message": "Customer not found" } }));
		})
		.await;
	let id = CustomerId::new("ghost").expect("Identifier should be valid.");
	let err = client.customer(&id).await.expect_err("Unknown customer should fail.");

	missing.assert_calls_async(1).await;

	assert_eq!(err.status(), Some(404));
	assert_eq!(err.api_message(), Some("Customer not found"));
	assert!(navigator.redirects().is_empty());
}
