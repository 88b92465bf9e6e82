//! Authenticated client for the Tailor Track customer and measurement API.
//!
//! Requests carry the stored bearer credential. When the API rejects an expired credential,
//! exactly one refresh call renews the session for every request in flight, each request is
//! replayed once with the new token, and an unrecoverable session is torn down (credentials
//! cleared, navigator sent to the login path) before any caller sees the failure.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod http;
pub mod model;
pub mod nav;
pub mod obs;
pub mod store;
pub mod validate;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	#[cfg(feature = "reqwest")]
	use crate::{client::ReqwestApiClient, http::ReqwestTransport};
	use crate::{
		client::ApiClient,
		config::{ClientConfig, DEFAULT_BASE_URL},
		http::{ApiResponse, ApiTransport, OutboundRequest, TransportFuture},
		nav::RecordingNavigator,
		store::{MemoryStore, SessionStore},
	};

	type Responder = Box<dyn Fn(&OutboundRequest) -> ApiResponse + Send + Sync>;

	/// In-process transport that answers every request from a closure and records it.
	pub struct ScriptedTransport {
		respond: Responder,
		requests: Mutex<Vec<OutboundRequest>>,
	}
	impl ScriptedTransport {
		/// Creates a transport answering with `respond`.
		pub fn new(respond: impl 'static + Fn(&OutboundRequest) -> ApiResponse + Send + Sync) -> Self {
			Self { respond: Box::new(respond), requests: Default::default() }
		}

		/// Returns every request received so far, oldest first.
		pub fn requests(&self) -> Vec<OutboundRequest> {
			self.requests.lock().clone()
		}

		/// Counts the requests sent to `path`.
		pub fn calls_to(&self, path: &str) -> usize {
			self.requests.lock().iter().filter(|request| request.url.path() == path).count()
		}
	}
	impl ApiTransport for ScriptedTransport {
		fn execute(&self, request: OutboundRequest) -> TransportFuture<'_> {
			let response = (self.respond)(&request);

			self.requests.lock().push(request);

			Box::pin(async move { Ok(response) })
		}
	}
	impl Debug for ScriptedTransport {
		fn fmt(&self, f: &mut Formatter) -> FmtResult {
			f.debug_struct("ScriptedTransport").field("requests", &self.requests.lock().len()).finish()
		}
	}

	/// Builds a client over a [`ScriptedTransport`], returning handles to its store,
	/// navigator, and transport.
	pub fn build_scripted_client(
		store: MemoryStore,
		respond: impl 'static + Fn(&OutboundRequest) -> ApiResponse + Send + Sync,
	) -> (ApiClient<ScriptedTransport>, MemoryStore, RecordingNavigator, Arc<ScriptedTransport>) {
		let config = ClientConfig::builder(DEFAULT_BASE_URL)
			.build()
			.expect("Default client configuration should be valid.");
		let transport = Arc::new(ScriptedTransport::new(respond));
		let navigator = RecordingNavigator::default();
		let backend: Arc<dyn SessionStore> = Arc::new(store.clone());
		let client: ApiClient<ScriptedTransport> =
			ApiClient::with_transport(config, backend, transport.clone())
				.with_navigator(navigator.clone());

		(client, store, navigator, transport)
	}

	/// Builds a reqwest transport that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Constructs a reqwest-backed client pointed at `base_url` (usually an `httpmock`
	/// server), returning handles to its store and navigator.
	#[cfg(feature = "reqwest")]
	pub fn build_reqwest_test_client(
		base_url: &str,
		store: MemoryStore,
	) -> (ReqwestApiClient, MemoryStore, RecordingNavigator) {
		let config =
			ClientConfig::builder(base_url).build().expect("Mock server URL should be valid.");
		let navigator = RecordingNavigator::default();
		let backend: Arc<dyn SessionStore> = Arc::new(store.clone());
		let client: ReqwestApiClient =
			ApiClient::with_transport(config, backend, test_reqwest_transport())
				.with_navigator(navigator.clone());

		(client, store, navigator)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
