//! Run cancellation and per-call deadlines.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

use crate::error::{WorkerError, WorkerResult};

/// Triggers cancellation of a run.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Cancel once `after` elapses.
    pub fn cancel_after(self, after: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            info!("Run deadline of {:?} reached, cancelling", after);
            self.cancel();
        })
    }
}

/// Observes cancellation of a run. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// A token with its handle.
    pub fn channel() -> (CancelHandle, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, CancelToken { rx })
    }

    /// A token that is never cancelled.
    pub fn never() -> CancelToken {
        let (tx, rx) = watch::channel(false);
        // A closed channel keeps its last value
        drop(tx);
        CancelToken { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled; pending forever if the handle is dropped uncancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|c| *c).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Run `fut` under this token and a deadline.
    ///
    /// Cancellation wins over the deadline and over the result.
    pub async fn guard<F, T, E>(&self, deadline: Duration, fut: F) -> WorkerResult<T>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<WorkerError>,
    {
        if self.is_cancelled() {
            return Err(WorkerError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = self.cancelled() => Err(WorkerError::Cancelled),
            res = tokio::time::timeout(deadline, fut) => match res {
                Ok(inner) => inner.map_err(Into::into),
                Err(_) => Err(WorkerError::DeadlineExceeded(deadline)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swing_ml_client::MlError;

    #[tokio::test(start_paused = true)]
    async fn test_guard_times_out() {
        let token = CancelToken::never();
        let res: WorkerResult<()> = token
            .guard(Duration::from_secs(5), async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok::<_, MlError>(())
            })
            .await;
        assert!(matches!(res, Err(WorkerError::DeadlineExceeded(d)) if d == Duration::from_secs(5)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_guard_observes_cancellation() {
        let (handle, token) = CancelToken::channel();
        let _timer = handle.cancel_after(Duration::from_secs(1));

        let res: WorkerResult<()> = token
            .guard(Duration::from_secs(60), async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, MlError>(())
            })
            .await;
        assert!(matches!(res, Err(WorkerError::Cancelled)));
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_guard_passes_through_errors() {
        let token = CancelToken::never();
        let res: WorkerResult<()> = token
            .guard(Duration::from_secs(1), async {
                Err(MlError::InvalidResponse("bad".into()))
            })
            .await;
        assert!(matches!(res, Err(WorkerError::Oracle(MlError::InvalidResponse(_)))));
    }
}
