#![cfg(feature = "reqwest")]

// std
use std::time::Duration as StdDuration;
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use tailor_track_client::{
	_preludet::*,
	auth::CredentialPair,
	client::ApiRequest,
	error::RefreshError,
	store::{MemoryStore, StoredSession},
};

fn signed_in() -> MemoryStore {
	MemoryStore::with_credentials(CredentialPair::new("T1", "R1"))
}

#[tokio::test]
async fn concurrent_expiries_share_one_refresh() {
	let server = MockServer::start_async().await;
	let (client, store, navigator) = build_reqwest_test_client(&server.base_url(), signed_in());
	let expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/customers/").header("authorization", "Bearer T1");
			then.status(401)
				.delay(StdDuration::from_millis(100))
				.json_body(json!({ "message": "jwt expired" }));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/users/refresh")
				.json_body(json!({ "refreshToken": "R1" }));
			then.status(200)
				.delay(StdDuration::from_millis(300))
				.json_body(json!({ "accessToken": "T2", "refreshToken": "R2" }));
		})
		.await;
	let replayed = server
		.mock_async(|when, then| {
			when.method(GET).path("/customers/").header("authorization", "Bearer T2");
			then.status(200).json_body(json!({ "customer": { "id": "c", "fullName": "Kiran" } }));
		})
		.await;
	let (a, b, c) = tokio::join!(
		client.send(ApiRequest::get("/customers/")),
		client.send(ApiRequest::get("/customers/")),
		client.send(ApiRequest::get("/customers/")),
	);

	for response in [a, b, c] {
		assert_eq!(response.expect("Replay should succeed.").status, 200);
	}

	refresh.assert_calls_async(1).await;
	expired.assert_calls_async(3).await;
	replayed.assert_calls_async(3).await;

	assert_eq!(store.snapshot().credentials(), Some(CredentialPair::new("T2", "R2")));
	assert!(navigator.redirects().is_empty());
	assert_eq!(client.refresh_metrics.attempts(), 1);
	assert!(client.refresh_metrics.queued() <= 2);
	assert!(!client.is_refreshing());
}

#[tokio::test]
async fn queued_replays_settle_independently() {
	let server = MockServer::start_async().await;
	let (client, store, navigator) = build_reqwest_test_client(&server.base_url(), signed_in());
	let expired = server
		.mock_async(|when, then| {
			when.method(GET).header("authorization", "Bearer T1");
			then.status(401).delay(StdDuration::from_millis(100));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/users/refresh");
			then.status(200)
				.delay(StdDuration::from_millis(300))
				.json_body(json!({ "accessToken": "T2", "refreshToken": "R2" }));
		})
		.await;
	let replay_a = server
		.mock_async(|when, then| {
			when.method(GET).path("/customers/a").header("authorization", "Bearer T2");
			then.status(200).json_body(json!({ "customer": { "id": "a", "fullName": "Asha" } }));
		})
		.await;
	let replay_b = server
		.mock_async(|when, then| {
			when.method(GET).path("/customers/b").header("authorization", "Bearer T2");
			then.status(500).json_body(json!({ "message": "Database unavailable" }));
		})
		.await;
	let replay_c = server
		.mock_async(|when, then| {
			when.method(GET).path("/customers/c").header("authorization", "Bearer T2");
			then.status(401).json_body(json!({ "message": "Customer belongs to another shop" }));
		})
		.await;
	let (a, b, c) = tokio::join!(
		client.send(ApiRequest::get("/customers/a")),
		client.send(ApiRequest::get("/customers/b")),
		client.send(ApiRequest::get("/customers/c")),
	);

	assert_eq!(a.expect("Replay of a should succeed.").status, 200);
	assert!(matches!(b, Err(Error::Status(ref e)) if e.status == 500));
	assert!(matches!(c, Err(Error::Unauthorized(ref e)) if e.status == 401));

	refresh.assert_calls_async(1).await;
	expired.assert_calls_async(3).await;
	replay_a.assert_calls_async(1).await;
	replay_b.assert_calls_async(1).await;
	// A replay rejected again is surfaced, never retried a third time.
	replay_c.assert_calls_async(1).await;

	assert_eq!(store.snapshot().credentials(), Some(CredentialPair::new("T2", "R2")));
	assert!(navigator.redirects().is_empty());
	assert_eq!(client.refresh_metrics.attempts(), 1);
}

#[tokio::test]
async fn failed_refresh_rejects_every_queued_request() {
	let server = MockServer::start_async().await;
	let (client, store, navigator) = build_reqwest_test_client(&server.base_url(), signed_in());
	let expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/customers/");
			then.status(401).delay(StdDuration::from_millis(100));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/users/refresh");
			then.status(400)
				.delay(StdDuration::from_millis(300))
				.json_body(json!({ "error": { "message": "Invalid refresh token" } }));
		})
		.await;
	let (a, b, c) = tokio::join!(
		client.send(ApiRequest::get("/customers/")),
		client.send(ApiRequest::get("/customers/")),
		client.send(ApiRequest::get("/customers/")),
	);

	for result in [a, b, c] {
		let err = result.expect_err("Every request should fail with the refresh error.");

		assert!(matches!(err, Error::Refresh(RefreshError::Rejected { status: 400, .. })));
		assert_eq!(err.api_message(), Some("Invalid refresh token"));
	}

	refresh.assert_calls_async(1).await;
	// No request is replayed after a failed refresh.
	expired.assert_calls_async(3).await;

	assert!(store.snapshot().is_empty());
	assert_eq!(navigator.redirects(), vec!["/login".to_owned()]);
	assert_eq!(client.refresh_metrics.failures(), 1);
}

#[tokio::test]
async fn missing_refresh_token_surfaces_the_original_failure() {
	let server = MockServer::start_async().await;
	let snapshot = StoredSession {
		access_token: Some("T1".into()),
		refresh_token: None,
		user: Some(r#"{"id":"u1"}"#.into()),
	};
	let (client, store, navigator) =
		build_reqwest_test_client(&server.base_url(), MemoryStore::with_snapshot(snapshot));
	let expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/customers/d");
			then.status(401).json_body(json!({ "message": "jwt expired" }));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/users/refresh");
			then.status(200).json_body(json!({ "accessToken": "T2", "refreshToken": "R2" }));
		})
		.await;
	let err = client
		.send(ApiRequest::get("/customers/d"))
		.await
		.expect_err("Request should fail without a refresh token.");

	assert!(matches!(err, Error::Unauthorized(_)));
	assert_eq!(err.status(), Some(401));
	assert_eq!(err.api_message(), Some("jwt expired"));

	expired.assert_calls_async(1).await;
	refresh.assert_calls_async(0).await;

	assert!(store.snapshot().is_empty());
	assert_eq!(navigator.last().as_deref(), Some("/login"));
}

#[tokio::test]
async fn other_failures_pass_through_without_refresh() {
	let server = MockServer::start_async().await;
	let (client, store, navigator) = build_reqwest_test_client(&server.base_url(), signed_in());
	let failing = server
		.mock_async(|when, then| {
			when.method(GET).path("/customers/e");
			then.status(500)
				.header("retry-after", "7")
				.json_body(json!({ "error": { "message": "Database unavailable" } }));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/users/refresh");
			then.status(200).json_body(json!({ "accessToken": "T2", "refreshToken": "R2" }));
		})
		.await;
	let err = client
		.send(ApiRequest::get("/customers/e"))
		.await
		.expect_err("Server errors should surface unchanged.");

	match &err {
		Error::Status(status) => {
			assert_eq!(status.status, 500);
			assert_eq!(status.message.as_deref(), Some("Database unavailable"));
			assert_eq!(status.retry_after, Some(Duration::seconds(7)));
		},
		other => panic!("Unexpected error: {other:?}"),
	}

	failing.assert_calls_async(1).await;
	refresh.assert_calls_async(0).await;

	assert_eq!(store.snapshot().credentials(), Some(CredentialPair::new("T1", "R1")));
	assert!(navigator.redirects().is_empty());
}

#[tokio::test]
async fn replay_rejection_is_not_retried_twice() {
	let server = MockServer::start_async().await;
	let (client, _, navigator) = build_reqwest_test_client(&server.base_url(), signed_in());
	let rejected = server
		.mock_async(|when, then| {
			when.method(PUT).path("/customers/f");
			then.status(401);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/users/refresh");
			then.status(200).json_body(json!({ "accessToken": "T2", "refreshToken": "R2" }));
		})
		.await;
	let request = ApiRequest::put("/customers/f")
		.json(&json!({ "fullName": "Kiran", "phone": "9876543210" }))
		.expect("Body should serialize.");
	let err = client.send(request).await.expect_err("Second rejection should surface.");

	assert!(matches!(err, Error::Unauthorized(_)));

	rejected.assert_calls_async(2).await;
	refresh.assert_calls_async(1).await;

	assert!(navigator.redirects().is_empty());
}
