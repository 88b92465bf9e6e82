//! Thread-safe in-memory [`SessionStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, UserProfile},
	store::{SessionStore, StoreError, StoreFuture, StoredSession},
};

type StoreCell = Arc<RwLock<StoredSession>>;

/// Storage backend that keeps the session in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreCell);
impl MemoryStore {
	/// Creates a store seeded with an existing credential pair.
	pub fn with_credentials(pair: CredentialPair) -> Self {
		let session = StoredSession {
			access_token: Some(pair.access_token),
			refresh_token: Some(pair.refresh_token),
			user: None,
		};

		Self(Arc::new(RwLock::new(session)))
	}

	/// Creates a store from a raw snapshot, including partial pairs.
	pub fn with_snapshot(session: StoredSession) -> Self {
		Self(Arc::new(RwLock::new(session)))
	}

	/// Returns the current contents without going through the async contract.
	pub fn snapshot(&self) -> StoredSession {
		self.0.read().clone()
	}

	fn save_credentials_now(cell: StoreCell, pair: CredentialPair) {
		let mut guard = cell.write();

		guard.access_token = Some(pair.access_token);
		guard.refresh_token = Some(pair.refresh_token);
	}

	fn save_user_now(cell: StoreCell, user: UserProfile) -> Result<(), StoreError> {
		let blob = crate::store::user_blob(&user)?;

		cell.write().user = Some(blob);

		Ok(())
	}
}
impl SessionStore for MemoryStore {
	fn load(&self) -> StoreFuture<'_, StoredSession> {
		let cell = self.0.clone();

		Box::pin(async move { Ok(cell.read().clone()) })
	}

	fn save_credentials(&self, pair: CredentialPair) -> StoreFuture<'_, ()> {
		let cell = self.0.clone();

		Box::pin(async move {
			Self::save_credentials_now(cell, pair);

			Ok(())
		})
	}

	fn save_user(&self, user: UserProfile) -> StoreFuture<'_, ()> {
		let cell = self.0.clone();

		Box::pin(async move { Self::save_user_now(cell, user) })
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let cell = self.0.clone();

		Box::pin(async move {
			*cell.write() = StoredSession::default();

			Ok(())
		})
	}
}
