//! Single-flight coordination of session refreshes.
//!
//! A [`SessionCoordinator`] hands out exactly one [`RefreshLease`] at a time. Every request
//! that hits an expired credential while a lease is outstanding receives a [`RefreshWaiter`]
//! instead and parks on the lease's [`RefreshTicket`], a one-shot broadcast slot that the
//! lease holder fills with either the new access token or the refresh error. Settling the
//! lease publishes the outcome and clears the in-flight state in one step, so a request
//! that arrives afterwards starts a fresh refresh instead of reading a stale outcome.

// std
use std::sync::atomic::{AtomicUsize, Ordering};
// crates.io
use async_lock::OnceCell;
// self
use crate::{_prelude::*, auth::TokenSecret, error::RefreshError};

/// Result of one refresh, shared with every waiter.
pub type RefreshOutcome = Result<TokenSecret, RefreshError>;

/// Tracks whether a refresh is in flight for one session.
#[derive(Debug, Default)]
pub struct SessionCoordinator {
	in_flight: Mutex<Option<Arc<RefreshTicket>>>,
}
impl SessionCoordinator {
	/// Claims the refresh slot or joins the refresh already in flight.
	///
	/// The check and the claim happen under one lock with nothing awaited in between.
	pub fn begin(self: &Arc<Self>) -> RefreshRole {
		let mut slot = self.in_flight.lock();

		if let Some(ticket) = slot.as_ref() {
			ticket.waiters.fetch_add(1, Ordering::Relaxed);

			return RefreshRole::Follower(RefreshWaiter { ticket: ticket.clone() });
		}

		let ticket = Arc::new(RefreshTicket::default());

		*slot = Some(ticket.clone());

		RefreshRole::Leader(RefreshLease { coordinator: self.clone(), ticket, settled: false })
	}

	/// True while a lease is outstanding.
	pub fn is_refreshing(&self) -> bool {
		self.in_flight.lock().is_some()
	}

	/// Number of requests parked behind the current refresh.
	pub fn waiting(&self) -> usize {
		self.in_flight.lock().as_ref().map_or(0, |ticket| ticket.waiters.load(Ordering::Relaxed))
	}
}

/// Role assigned by [`SessionCoordinator::begin`].
#[derive(Debug)]
pub enum RefreshRole {
	/// Caller must perform the refresh and settle the lease.
	Leader(RefreshLease),
	/// Caller must wait for the outstanding refresh.
	Follower(RefreshWaiter),
}

/// One-shot broadcast slot for a single refresh.
#[derive(Debug, Default)]
pub struct RefreshTicket {
	outcome: OnceCell<RefreshOutcome>,
	waiters: AtomicUsize,
}

/// Exclusive right to perform the in-flight refresh.
///
/// Dropping the lease without settling it settles it with [`RefreshError::Abandoned`].
#[derive(Debug)]
pub struct RefreshLease {
	coordinator: Arc<SessionCoordinator>,
	ticket: Arc<RefreshTicket>,
	settled: bool,
}
impl RefreshLease {
	/// Publishes the outcome to every waiter and clears the in-flight state.
	///
	/// Returns how many waiters were parked on this refresh.
	pub fn settle(mut self, outcome: RefreshOutcome) -> usize {
		self.settle_now(outcome)
	}

	fn settle_now(&mut self, outcome: RefreshOutcome) -> usize {
		self.settled = true;

		let mut slot = self.coordinator.in_flight.lock();

		// Only this lease ever fills the cell, so this never contends.
		let _ = self.ticket.outcome.set_blocking(outcome);

		if slot.as_ref().is_some_and(|current| Arc::ptr_eq(current, &self.ticket)) {
			*slot = None;
		}

		self.ticket.waiters.load(Ordering::Relaxed)
	}
}
impl Drop for RefreshLease {
	fn drop(&mut self) {
		if !self.settled {
			self.settle_now(Err(RefreshError::Abandoned));
		}
	}
}

/// Parked request waiting on the in-flight refresh.
#[derive(Debug)]
pub struct RefreshWaiter {
	ticket: Arc<RefreshTicket>,
}
impl RefreshWaiter {
	/// Resolves once the lease holder settles the refresh.
	pub async fn wait(self) -> RefreshOutcome {
		self.ticket.outcome.wait().await.clone()
	}
}
