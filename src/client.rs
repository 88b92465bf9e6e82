//! Authenticated API client with transparent session refresh.

pub mod common;
pub mod refresh;

mod customers;
mod session;

pub use common::*;
pub use refresh::*;
pub use session::LoginResponse;

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::ClientConfig,
	coordinator::SessionCoordinator,
	error::StatusError,
	http::{ApiResponse, ApiTransport, OutboundRequest},
	nav::{Navigator, NoopNavigator},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::SessionStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Issues API requests with the stored bearer credential and recovers expired sessions.
///
/// Clones share the transport, credential store, navigator, and refresh coordinator, so
/// every clone observes the same refresh-in-flight state. Requests that hit the configured
/// auth-failure status are parked behind a single refresh and replayed once with the new
/// access token; see [`ApiClient::send`].
pub struct ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// HTTP transport used for every outbound request.
	pub transport: Arc<T>,
	/// Credential store holding the session.
	pub store: Arc<dyn SessionStore>,
	/// Redirect capability invoked when the session ends.
	pub navigator: Arc<dyn Navigator>,
	/// Endpoint and status configuration.
	pub config: ClientConfig,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	coordinator: Arc<SessionCoordinator>,
}
impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(
		config: ClientConfig,
		store: Arc<dyn SessionStore>,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			transport: transport.into(),
			store,
			navigator: Arc::new(NoopNavigator),
			config,
			refresh_metrics: Default::default(),
			coordinator: Default::default(),
		}
	}

	/// Sets the navigator invoked on logout and unrecoverable session failures.
	pub fn with_navigator(mut self, navigator: impl 'static + Navigator) -> Self {
		self.navigator = Arc::new(navigator);

		self
	}

	/// True while a refresh call is outstanding for this session.
	pub fn is_refreshing(&self) -> bool {
		self.coordinator.is_refreshing()
	}

	/// Sends `request` with the stored access credential attached.
	///
	/// - 2xx responses are returned as-is.
	/// - Other non-auth failures surface as [`Error::Status`] with no retry.
	/// - The first auth failure joins or starts a session refresh and replays the request once
	///   with the renewed token. A second auth failure surfaces as [`Error::Unauthorized`].
	/// - When the session cannot be renewed the store is cleared, the navigator is sent to the
	///   login path, and the caller gets [`Error::Refresh`] (or [`Error::Unauthorized`] when no
	///   refresh credential was stored at all).
	pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		const KIND: FlowKind = FlowKind::Request;

		let span = FlowSpan::new(KIND, "send");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let session = self.store.load().await?;
				let sent_with = session.access_token().cloned();
				let response = self.dispatch(&request, sent_with.clone()).await?;

				if !self.is_auth_failure(&response) {
					return pass_through(response);
				}

				let original = StatusError::from_response(&response);
				let token = self.recover_session(sent_with.as_ref(), original).await?;
				let replay = self.dispatch(&request, Some(token)).await?;

				if self.is_auth_failure(&replay) {
					return Err(Error::Unauthorized(StatusError::from_response(&replay)));
				}

				pass_through(replay)
			})
			.await;

		obs::finish(KIND, result)
	}

	/// Sends `request` without a bearer credential and without the refresh protocol.
	///
	/// Used for session endpoints where an auth failure means "wrong credentials".
	pub async fn send_public(&self, request: ApiRequest) -> Result<ApiResponse> {
		let response = self.dispatch(&request, None).await?;

		if self.is_auth_failure(&response) {
			return Err(Error::Unauthorized(StatusError::from_response(&response)));
		}

		pass_through(response)
	}

	async fn dispatch(
		&self,
		request: &ApiRequest,
		bearer: Option<TokenSecret>,
	) -> Result<ApiResponse> {
		let outbound = OutboundRequest {
			method: request.method,
			url: self.config.endpoint(&request.path),
			body: request.body.clone(),
			bearer,
		};

		Ok(self.transport.execute(outbound).await?)
	}

	fn is_auth_failure(&self, response: &ApiResponse) -> bool {
		response.status == self.config.auth_failure_status
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(config: ClientConfig, store: Arc<dyn SessionStore>) -> Self {
		Self::with_transport(config, store, ReqwestTransport::default())
	}
}
impl<T> Clone for ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			store: self.store.clone(),
			navigator: self.navigator.clone(),
			config: self.config.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			coordinator: self.coordinator.clone(),
		}
	}
}
impl<T> Debug for ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("refreshing", &self.coordinator.is_refreshing())
			.finish()
	}
}

fn pass_through(response: ApiResponse) -> Result<ApiResponse> {
	if response.is_success() {
		Ok(response)
	} else {
		Err(Error::Status(StatusError::from_response(&response)))
	}
}
