//! Platform abstraction for timers and task spawning.
//!
//! The navigation core runs on two schedulers: the browser event loop
//! (wasm32) and a Tokio current-thread runtime (native tests). This module
//! papers over the difference so the rest of the crate can sleep, bound a
//! wait, or spawn a task without caring which scheduler is underneath.

use std::future::Future;
use std::time::Duration;

/// Error returned by [`timeout`] when the bound elapses first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed;

impl std::fmt::Display for Elapsed {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "deadline elapsed")
	}
}

impl std::error::Error for Elapsed {}

/// Suspends the current task for the given duration.
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub async fn sleep(duration: Duration) {
	gloo_timers::future::TimeoutFuture::new(duration.as_millis() as u32).await;
}

/// Suspends the current task for the given duration.
#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
pub async fn sleep(duration: Duration) {
	tokio::time::sleep(duration).await;
}

/// Awaits `future`, giving up once `bound` has elapsed.
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub async fn timeout<F: Future>(bound: Duration, future: F) -> Result<F::Output, Elapsed> {
	use futures::future::{Either, select};

	let future = std::pin::pin!(future);
	let deadline = std::pin::pin!(sleep(bound));
	match select(future, deadline).await {
		Either::Left((value, _)) => Ok(value),
		Either::Right(((), _)) => Err(Elapsed),
	}
}

/// Awaits `future`, giving up once `bound` has elapsed.
#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
pub async fn timeout<F: Future>(bound: Duration, future: F) -> Result<F::Output, Elapsed> {
	tokio::time::timeout(bound, future).await.map_err(|_| Elapsed)
}

/// Spawns a task onto the browser event loop.
///
/// Navigation futures are not `Send`; they stay on the single UI thread.
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub fn spawn_local<F>(future: F)
where
	F: Future<Output = ()> + 'static,
{
	wasm_bindgen_futures::spawn_local(future);
}
