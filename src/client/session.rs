//! Sign-in, sign-up, and sign-out against the session endpoints.

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, UserProfile},
	client::{ApiClient, ApiRequest},
	error::RefreshError,
	http::ApiTransport,
	model::{LoginForm, RegisterForm},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	validate::Validate,
};

const LOGIN_PATH: &str = "/users/login";
const REGISTER_PATH: &str = "/users/register";
const LOGOUT_PATH: &str = "/users/logout";

/// Body returned by `POST /users/login`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LoginResponse {
	/// Fresh credential pair.
	#[serde(flatten)]
	pub credentials: CredentialPair,
	/// Profile of the signed-in user, when the API includes one.
	#[serde(default)]
	pub user: Option<UserProfile>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LogoutBody<'a> {
	refresh_token: &'a str,
}

impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Signs in and persists the issued credential pair and profile.
	///
	/// Wrong credentials surface as [`Error::Unauthorized`]; the refresh protocol never
	/// runs for this call.
	pub async fn login(&self, form: &LoginForm) -> Result<Option<UserProfile>> {
		const KIND: FlowKind = FlowKind::Login;

		let span = FlowSpan::new(KIND, "login");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				form.validate()?;

				let response = self.send_public(ApiRequest::post(LOGIN_PATH).json(form)?).await?;
				let LoginResponse { credentials, user } = response.decode("login")?;

				self.store.save_credentials(credentials).await?;

				if let Some(user) = &user {
					self.store.save_user(user.clone()).await?;
				}

				Ok(user)
			})
			.await;

		obs::finish(KIND, result)
	}

	/// Creates an account. The caller signs in separately afterwards.
	pub async fn register(&self, form: &RegisterForm) -> Result<()> {
		const KIND: FlowKind = FlowKind::Register;

		let span = FlowSpan::new(KIND, "register");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				form.validate()?;
				self.send_public(ApiRequest::post(REGISTER_PATH).json(form)?).await?;

				Ok(())
			})
			.await;

		obs::finish(KIND, result)
	}

	/// Signs out.
	///
	/// The server is told to revoke the stored refresh token when one exists. The local
	/// session is cleared and the navigator redirected regardless of the server's answer;
	/// a server failure is returned only after that cleanup, and takes precedence over a
	/// failure to clear the store.
	pub async fn logout(&self) -> Result<()> {
		const KIND: FlowKind = FlowKind::Logout;

		let span = FlowSpan::new(KIND, "logout");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let revoked = match self.store.load().await {
					Ok(session) => match session.refresh_token.filter(|token| !token.is_blank()) {
						Some(token) => self.revoke(token.expose()).await,
						None => Ok(()),
					},
					Err(e) => Err(e.into()),
				};

				// A failed session refresh has already cleared the store and redirected.
				if matches!(&revoked, Err(Error::Refresh(e)) if *e != RefreshError::Abandoned) {
					return revoked;
				}

				let cleared = self.end_session().await;

				obs::session_ended("logout", 0);

				revoked.and(cleared.map_err(Error::from))
			})
			.await;

		obs::finish(KIND, result)
	}

	/// True when a complete credential pair is stored.
	pub async fn is_authenticated(&self) -> Result<bool> {
		Ok(self.store.load().await?.credentials().is_some())
	}

	/// Returns the stored profile; an unreadable profile blob reads as `None`.
	pub async fn current_user(&self) -> Result<Option<UserProfile>> {
		Ok(self.store.load().await?.user())
	}

	async fn revoke(&self, refresh_token: &str) -> Result<()> {
		let request = ApiRequest::post(LOGOUT_PATH).json(&LogoutBody { refresh_token })?;

		self.send(request).await?;

		Ok(())
	}
}
