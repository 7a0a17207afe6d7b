//! Snapshot publish/subscribe abstraction (mechanics only).
//!
//! The document store pushes the *complete* ledger on every change, and the
//! analytics engine publishes the *complete* dashboard view after every
//! recomputation. Both sides of that flow share the same lightweight pattern:
//! broadcast a self-contained value to whoever is listening.
//!
//! Contract notes:
//!
//! - **Last write wins**: every message is a full replacement, never a delta.
//!   A consumer that misses an intermediate message loses nothing once the
//!   next one arrives, so delivery only needs to be best-effort.
//! - **Transport-agnostic**: in-memory channels here; a store-backed listener
//!   or websocket fan-out can implement the same trait in the application.
//! - **No persistence**: the bus distributes; the document store remains the
//!   source of truth.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to a feed.
///
/// Each subscription receives a copy of every message published after it was
/// created (broadcast semantics). Designed for single-threaded consumption:
/// one subscription, one consumer loop.
///
/// Consumers that only care about the latest state should drain with
/// [`Subscription::try_recv`] and keep the last message.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain everything currently queued and return only the newest message.
    ///
    /// This is the natural receive mode for full-replacement feeds: recomputing
    /// against a stale intermediate snapshot is wasted work.
    pub fn latest(&self) -> Option<M> {
        let mut newest = None;
        while let Ok(message) = self.receiver.try_recv() {
            newest = Some(message);
        }
        newest
    }
}

/// Domain-agnostic broadcast feed.
///
/// Publishing hands a self-contained value to every live subscriber. There is
/// no replay: a new subscriber starts from the next published message, which
/// is always sufficient because messages are full replacements.
pub trait FeedBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> FeedBus<M> for Arc<B>
where
    B: FeedBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
