//! Completion signal returned by `Message::fetch`.
//!
//! One side (the [`Settler`]) stays on the message, the other (the
//! [`FetchHandle`]) goes to whoever awaits the fetch. Both halves carry the
//! generation of the message at the time of the fetch, which is how a late
//! settlement of a pre-cleanup signal is recognized and ignored.

use std::fmt;
use std::future::{Future, IntoFuture};
use std::pin::Pin;

use tokio::sync::oneshot;

use crate::domain::FetchError;

pub type FetchResult = Result<(), FetchError>;

/// Cleanup counter of a message; every signal is tagged with one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub const ZERO: Generation = Generation(0);

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}

/// Create a fresh, unsettled signal for `generation`.
pub fn channel(generation: Generation) -> (Settler, FetchHandle) {
    let (tx, rx) = oneshot::channel();
    (Settler { generation, tx }, FetchHandle { generation, rx })
}

/// Settling half. Consumed by `resolve`/`reject`, so a signal settles at
/// most once.
#[derive(Debug)]
pub struct Settler {
    generation: Generation,
    tx: oneshot::Sender<FetchResult>,
}

impl Settler {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Fulfil the signal. Returns `false` if nobody is waiting anymore.
    pub fn resolve(self) -> bool {
        self.tx.send(Ok(())).is_ok()
    }

    /// Reject the signal. Returns `false` if nobody is waiting anymore.
    pub fn reject(self, error: FetchError) -> bool {
        self.tx.send(Err(error)).is_ok()
    }
}

/// Awaiting half, handed to the caller of `fetch`.
///
/// ```ignore
/// let handle = message.fetch(client, properties, interested);
/// // ... driver looks properties up, then resolves or marks an error ...
/// handle.await?;
/// ```
#[derive(Debug)]
pub struct FetchHandle {
    generation: Generation,
    rx: oneshot::Receiver<FetchResult>,
}

impl FetchHandle {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Wait for the signal to settle. A settler dropped without settling
    /// (message dropped mid-flight) yields [`FetchError::Abandoned`].
    pub async fn wait(self) -> FetchResult {
        self.rx.await.unwrap_or(Err(FetchError::Abandoned))
    }

    /// Non-blocking peek. `None` while the signal is still pending.
    ///
    /// Once this returns `Some`, the handle is spent and must not be awaited.
    pub fn try_result(&mut self) -> Option<FetchResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(FetchError::Abandoned)),
        }
    }
}

impl IntoFuture for FetchHandle {
    type Output = FetchResult;
    type IntoFuture = Pin<Box<dyn Future<Output = FetchResult> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.wait())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolve_fulfils_handle() {
        let (settler, handle) = channel(Generation::ZERO);
        assert!(settler.resolve());
        assert_eq!(handle.await, Ok(()));
    }

    #[tokio::test]
    async fn reject_carries_error() {
        let (settler, handle) = channel(Generation::ZERO.next());
        assert_eq!(handle.generation(), Generation::ZERO.next());
        settler.reject(FetchError::Superseded);
        assert_eq!(handle.await, Err(FetchError::Superseded));
    }

    #[tokio::test]
    async fn dropped_settler_abandons_handle() {
        let (settler, handle) = channel(Generation::ZERO);
        drop(settler);
        assert_eq!(handle.wait().await, Err(FetchError::Abandoned));
    }

    #[test]
    fn try_result_is_none_while_pending() {
        let (settler, mut handle) = channel(Generation::ZERO);
        assert_eq!(handle.try_result(), None);
        settler.resolve();
        assert_eq!(handle.try_result(), Some(Ok(())));
    }

    #[test]
    fn resolve_without_listener_reports_false() {
        let (settler, handle) = channel(Generation::ZERO);
        drop(handle);
        assert!(!settler.resolve());
    }
}
