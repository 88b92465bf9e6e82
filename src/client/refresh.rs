//! Session recovery for requests rejected with the auth-failure status.
//!
//! The first request to observe an expired credential leads the recovery: it reads the
//! stored refresh token, issues exactly one call to the refresh endpoint, persists the
//! rotated pair, and publishes the new access token to every request that queued behind it
//! through the [`SessionCoordinator`](crate::coordinator::SessionCoordinator). When the
//! session cannot be renewed the store is cleared and the navigator is sent to the login
//! path before any caller observes the failure.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, TokenSecret},
	client::{ApiClient, common},
	coordinator::{RefreshLease, RefreshRole},
	error::{RefreshError, StatusError, extract_message},
	http::{ApiTransport, Method, OutboundRequest},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::StoreError,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshBody<'a> {
	refresh_token: &'a str,
}

impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Joins or leads the session refresh and resolves to the access token to replay with.
	///
	/// `sent_with` is the access token the failed request carried; `original` is its
	/// auth-failure response, surfaced only when no refresh credential is stored.
	pub(crate) async fn recover_session(
		&self,
		sent_with: Option<&TokenSecret>,
		original: StatusError,
	) -> Result<TokenSecret> {
		const KIND: FlowKind = FlowKind::Refresh;

		let lease = match self.coordinator.begin() {
			RefreshRole::Leader(lease) => lease,
			RefreshRole::Follower(waiter) => {
				self.refresh_metrics.record_queued();

				return Ok(waiter.wait().await?);
			},
		};
		let span = FlowSpan::new(KIND, "recover_session");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.lead_refresh(lease, sent_with, original)).await;

		obs::finish(KIND, result)
	}

	/// Clears every stored credential and sends the navigator to the login path.
	///
	/// The redirect fires even when the store cannot be cleared; that failure is logged and
	/// returned.
	pub(crate) async fn end_session(&self) -> Result<(), StoreError> {
		let cleared = self.store.clear().await;

		if let Err(e) = &cleared {
			obs::session_clear_failed(e);
		}

		self.navigator.redirect(&self.config.login_redirect);

		cleared
	}

	async fn lead_refresh(
		&self,
		lease: RefreshLease,
		sent_with: Option<&TokenSecret>,
		original: StatusError,
	) -> Result<TokenSecret> {
		let session = match self.store.load().await {
			Ok(session) => session,
			Err(e) => {
				// The refresh credential cannot be read, so the session cannot be renewed.
				let _ = self.end_session().await;
				let error = RefreshError::Storage(e);
				let waiters = lease.settle(Err(error.clone()));

				obs::session_ended("store_unreadable", waiters);
				self.refresh_metrics.record_failure();

				return Err(Error::Refresh(error));
			},
		};
		let Some(pair) = session.credentials() else {
			let _ = self.end_session().await;

			let waiters = lease.settle(Err(RefreshError::MissingRefreshToken));

			obs::session_ended("missing_refresh_token", waiters);
			self.refresh_metrics.record_failure();

			return Err(Error::Unauthorized(original));
		};

		// Another request already rotated the pair after this one was sent.
		if sent_with != Some(&pair.access_token) {
			lease.settle(Ok(pair.access_token.clone()));

			return Ok(pair.access_token);
		}

		self.refresh_metrics.record_attempt();

		let renewed = match self.refresh_credentials(&pair.refresh_token).await {
			Ok(renewed) => self
				.store
				.save_credentials(renewed.clone())
				.await
				.map(|()| renewed.access_token)
				.map_err(RefreshError::Storage),
			Err(e) => Err(e),
		};

		match renewed {
			Ok(token) => {
				let waiters = lease.settle(Ok(token.clone()));

				obs::session_renewed(waiters);
				self.refresh_metrics.record_success();

				Ok(token)
			},
			Err(e) => {
				let _ = self.end_session().await;

				let waiters = lease.settle(Err(e.clone()));

				obs::session_ended("refresh_failed", waiters);
				self.refresh_metrics.record_failure();

				Err(Error::Refresh(e))
			},
		}
	}

	/// Exchanges `refresh_token` for a new credential pair. Never carries a bearer.
	async fn refresh_credentials(
		&self,
		refresh_token: &TokenSecret,
	) -> Result<CredentialPair, RefreshError> {
		let body = serde_json::to_vec(&RefreshBody { refresh_token: refresh_token.expose() })
			.map_err(|e| RefreshError::Transport { message: common::describe(&e) })?;
		let request = OutboundRequest {
			method: Method::Post,
			url: self.config.refresh_url(),
			body: Some(body),
			bearer: None,
		};
		let response = self
			.transport
			.execute(request)
			.await
			.map_err(|e| RefreshError::Transport { message: common::describe(&e) })?;

		if !response.is_success() {
			return Err(RefreshError::Rejected {
				status: response.status,
				message: extract_message(&response.body),
			});
		}

		let pair = response
			.decode::<CredentialPair>("refresh")
			.map_err(|e| RefreshError::MalformedResponse { message: common::describe(&e) })?;

		if pair.access_token.is_blank() || pair.refresh_token.is_blank() {
			return Err(RefreshError::MalformedResponse {
				message: "credential pair contains a blank token".into(),
			});
		}

		Ok(pair)
	}
}
