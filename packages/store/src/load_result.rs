//! Future returned by [`StoreCtx::load_all`](crate::StoreCtx::load_all)

use crate::{Result, StoreError, StoreInfo};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Every object of a context, collected on a blocking task
pub struct LoadAllResult {
    receiver: oneshot::Receiver<Result<Vec<StoreInfo>>>,
}

/// Load result with user-defined handler
pub struct LoadAllResultWithHandler<F> {
    receiver: oneshot::Receiver<Result<Vec<StoreInfo>>>,
    handler: Option<F>,
}

impl LoadAllResult {
    /// Create a new `LoadAllResult` from a oneshot receiver
    pub(crate) fn new(receiver: oneshot::Receiver<Result<Vec<StoreInfo>>>) -> Self {
        Self { receiver }
    }

    /// Create a `LoadAllResult` that's already completed
    #[must_use]
    pub fn ready(result: Result<Vec<StoreInfo>>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self { receiver: rx }
    }

    /// Create a `LoadAllResult` that yields an error
    #[must_use]
    pub fn error(error: StoreError) -> Self {
        Self::ready(Err(error))
    }

    /// Map the outcome through `handler` once it is available
    pub fn on_result<F, T>(self, handler: F) -> LoadAllResultWithHandler<F>
    where
        F: FnOnce(Result<Vec<StoreInfo>>) -> T,
    {
        LoadAllResultWithHandler {
            receiver: self.receiver,
            handler: Some(handler),
        }
    }
}

impl Future for LoadAllResult {
    type Output = Result<Vec<StoreInfo>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(StoreError::internal("Load task dropped"))),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<F, T> Future for LoadAllResultWithHandler<F>
where
    F: FnOnce(Result<Vec<StoreInfo>>) -> T + Unpin,
{
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        // Handler already consumed; never complete twice
        let Some(handler) = this.handler.take() else {
            return Poll::Pending;
        };

        match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(handler(result)),
            Poll::Ready(Err(_)) => {
                Poll::Ready(handler(Err(StoreError::internal("Load task dropped"))))
            }
            Poll::Pending => {
                this.handler = Some(handler);
                Poll::Pending
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ready_result_resolves() {
        let items = LoadAllResult::ready(Ok(vec![StoreInfo::new_name("a")]))
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn dropped_sender_is_internal_error() {
        let (tx, rx) = oneshot::channel::<Result<Vec<StoreInfo>>>();
        drop(tx);
        let err = LoadAllResult::new(rx).await.unwrap_err();
        assert!(matches!(err, StoreError::Internal(_)));
    }

    #[tokio::test]
    async fn handler_sees_error() {
        let message = LoadAllResult::error(StoreError::loader("boom"))
            .on_result(|result| match result {
                Ok(items) => format!("{} items", items.len()),
                Err(e) => format!("error: {e}"),
            })
            .await;
        assert_eq!(message, "error: Loader error: boom");
    }
}
