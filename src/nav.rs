//! Navigation capability invoked when a session ends.

// self
use crate::_prelude::*;

/// Receives redirect requests from the client.
///
/// The client calls [`Navigator::redirect`] with the configured login path after it has
/// torn down an unrecoverable session and after an explicit logout. Front ends map the
/// path onto their own router; headless callers can record it or ignore it.
pub trait Navigator
where
	Self: Send + Sync,
{
	/// Navigates to `target`, an absolute application path such as `/login`.
	fn redirect(&self, target: &str);
}
impl<F> Navigator for F
where
	F: Fn(&str) + Send + Sync,
{
	fn redirect(&self, target: &str) {
		self(target)
	}
}

/// Navigator that ignores redirects, for headless tools.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNavigator;
impl Navigator for NoopNavigator {
	fn redirect(&self, _target: &str) {}
}

/// Navigator that remembers every redirect it receives.
#[derive(Clone, Debug, Default)]
pub struct RecordingNavigator(Arc<Mutex<Vec<String>>>);
impl RecordingNavigator {
	/// Returns every redirect target received so far, oldest first.
	pub fn redirects(&self) -> Vec<String> {
		self.0.lock().clone()
	}

	/// Returns the most recent redirect target.
	pub fn last(&self) -> Option<String> {
		self.0.lock().last().cloned()
	}
}
impl Navigator for RecordingNavigator {
	fn redirect(&self, target: &str) {
		self.0.lock().push(target.to_owned());
	}
}
