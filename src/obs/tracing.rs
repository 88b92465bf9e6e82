// self
use crate::{_prelude::*, obs::FlowKind, store::StoreError};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by client flows.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("tailor_track.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a warn-level event when stored credentials are discarded.
pub fn session_ended(reason: &'static str, waiters: usize) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(reason, waiters, "Session ended; stored credentials cleared.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (reason, waiters);
	}
}

/// Emits a warn-level event when the store could not discard the session.
pub fn session_clear_failed(error: &StoreError) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(%error, "Stored credentials could not be cleared.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = error;
	}
}

/// Emits a debug-level event after a refresh rotated the credentials.
pub fn session_renewed(waiters: usize) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(waiters, "Session credentials renewed.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = waiters;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn session_events_are_noops_without_subscriber() {
		session_ended("test", 0);
		session_renewed(3);
		session_clear_failed(&StoreError::Backend { message: "read-only".into() });
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = FlowSpan::new(FlowKind::Refresh, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
