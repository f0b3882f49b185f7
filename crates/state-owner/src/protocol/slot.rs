use crate::domain::StateError;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Owner-side end of a single-use reply channel.
#[derive(Debug)]
pub struct ResponseSlot<T> {
    sender: oneshot::Sender<T>,
}

/// Caller-side end of a single-use reply channel.
///
/// Resolves to the delivered value, or `OwnerStopped` if the slot was dropped
/// without an answer.
#[derive(Debug)]
pub struct PendingResponse<T> {
    receiver: oneshot::Receiver<T>,
}

impl<T> ResponseSlot<T> {
    /// Create a fresh slot and the matching pending response.
    pub fn channel() -> (ResponseSlot<T>, PendingResponse<T>) {
        let (sender, receiver) = oneshot::channel();
        (ResponseSlot { sender }, PendingResponse { receiver })
    }

    /// Deliver the reply. Returns false if the caller is no longer waiting.
    pub fn deliver(self, value: T) -> bool {
        self.sender.send(value).is_ok()
    }

    /// True once the caller has stopped waiting (timed out or dropped).
    pub fn is_abandoned(&self) -> bool {
        self.sender.is_closed()
    }
}

impl<T> Future for PendingResponse<T> {
    type Output = Result<T, StateError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| result.map_err(|_| StateError::OwnerStopped))
    }
}
