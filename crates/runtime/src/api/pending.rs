//! Future returned by queued collection operations.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use super::{CollectionError, Result};

/// Outcome of a store operation that was queued when the method was called.
///
/// The in-memory part of the operation has already happened by the time a
/// `Pending` exists. Dropping it does not cancel the queued store operation;
/// only the result is discarded.
#[must_use = "the store outcome is only observable by awaiting the pending operation"]
pub struct Pending<T> {
    inner: Inner<T>,
}

enum Inner<T> {
    Waiting(oneshot::Receiver<Result<T>>),
    Failed(Option<CollectionError>),
}

impl<T> Pending<T> {
    pub(crate) fn waiting(reply_rx: oneshot::Receiver<Result<T>>) -> Self {
        Self {
            inner: Inner::Waiting(reply_rx),
        }
    }

    pub(crate) fn failed(error: CollectionError) -> Self {
        Self {
            inner: Inner::Failed(Some(error)),
        }
    }
}

impl<T> Future for Pending<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.inner {
            Inner::Waiting(reply_rx) => match Pin::new(reply_rx).poll(cx) {
                Poll::Ready(Ok(result)) => Poll::Ready(result),
                Poll::Ready(Err(e)) => Poll::Ready(Err(CollectionError::ReplyChannelClosed(e))),
                Poll::Pending => Poll::Pending,
            },
            Inner::Failed(error) => {
                Poll::Ready(Err(error.take().unwrap_or(CollectionError::WorkerClosed)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_with_reply() {
        let (tx, rx) = oneshot::channel();
        let pending: Pending<u32> = Pending::waiting(rx);
        tx.send(Ok(7)).unwrap();
        assert_eq!(pending.await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_dropped_sender_is_reply_closed() {
        let (tx, rx) = oneshot::channel::<Result<()>>();
        drop(tx);
        let err = Pending::waiting(rx).await.unwrap_err();
        assert!(matches!(err, CollectionError::ReplyChannelClosed(_)));
    }

    #[tokio::test]
    async fn test_failed_resolves_immediately() {
        let err = Pending::<()>::failed(CollectionError::WorkerClosed)
            .await
            .unwrap_err();
        assert!(matches!(err, CollectionError::WorkerClosed));
    }
}
