//! Demonstrates transparent session recovery: three concurrent requests hit an expired access
//! token, one refresh call renews the session, and every request is replayed with the new token.

// std
use std::{sync::Arc, time::Duration};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use tailor_track_client::{
	auth::CredentialPair,
	client::ApiClient,
	config::ClientConfig,
	http::ReqwestTransport,
	reqwest::Client,
	store::{MemoryStore, SessionStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/customers/").header("authorization", "Bearer demo-access-1");
			then.status(401)
				.delay(Duration::from_millis(50))
				.json_body(json!({ "message": "jwt expired" }));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/users/refresh");
			then.status(200)
				.delay(Duration::from_millis(200))
				.json_body(json!({ "accessToken": "demo-access-2", "refreshToken": "demo-refresh-2" }));
		})
		.await;
	let customers = server
		.mock_async(|when, then| {
			when.method(GET).path("/customers/").header("authorization", "Bearer demo-access-2");
			then.status(200).json_body(json!({
				"customers": [{ "id": "c1", "fullName": "Kiran Desai", "phone": "9876543210" }]
			}));
		})
		.await;
	let store = MemoryStore::with_credentials(CredentialPair::new("demo-access-1", "demo-refresh-1"));
	let backend: Arc<dyn SessionStore> = Arc::new(store.clone());
	let transport = ReqwestTransport::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let client = <ApiClient<ReqwestTransport>>::with_transport(
		ClientConfig::builder(server.base_url()).build()?,
		backend,
		transport,
	)
	.with_navigator(|target: &str| println!("Redirecting to {target}."));
	let (a, b, c) =
		tokio::join!(client.list_customers(), client.list_customers(), client.list_customers());

	for customers in [a?, b?, c?] {
		println!("Fetched {} customer(s).", customers.len());
	}

	expired.assert_calls_async(3).await;
	refresh.assert_calls_async(1).await;
	customers.assert_calls_async(3).await;

	println!(
		"Refresh calls: {}, queued requests: {}, stored access token: {:?}.",
		client.refresh_metrics.attempts(),
		client.refresh_metrics.queued(),
		store.snapshot().access_token,
	);

	Ok(())
}
