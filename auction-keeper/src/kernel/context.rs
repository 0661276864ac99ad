use {
    crate::auction::entities::StoreError,
    std::{
        future::Future,
        time::Duration,
    },
    tokio::time::Instant,
    tokio_util::sync::CancellationToken,
};

/// Cancellation and deadline carried by every store and sweeper call.
#[derive(Clone, Debug, Default)]
pub struct OperationContext {
    cancellation_token: CancellationToken,
    deadline:           Option<Instant>,
}

impl OperationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation_token(cancellation_token: CancellationToken) -> Self {
        Self {
            cancellation_token,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    pub fn check(&self) -> Result<(), StoreError> {
        if self.cancellation_token.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(StoreError::Timeout),
            _ => Ok(()),
        }
    }

    /// Runs `operation` unless the context is already done, and abandons it as soon as
    /// the context is cancelled or its deadline passes.
    pub async fn run<T, F>(&self, operation: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        self.check()?;
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::select! {
            biased;
            _ = self.cancellation_token.cancelled() => Err(StoreError::Cancelled),
            _ = deadline => Err(StoreError::Timeout),
            result = operation => result,
        }
    }
}
