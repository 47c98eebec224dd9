//! Permit pools shared by all year jobs.
//!
//! The archive server rejects a second simultaneous session, so network
//! phases go through a single-permit connection gate. A separate job pool
//! caps how many years run any phase at once. Permits are RAII guards and
//! are released when dropped, whichever way the guarded section exits.

use std::sync::Arc;

use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

pub const CONNECTION_CAPACITY: usize = 1;

#[derive(Debug, Clone)]
pub struct Gates {
    jobs: Arc<Semaphore>,
    connection: Arc<Semaphore>,
}

impl Gates {
    pub fn new(jobs: usize) -> Self {
        Gates {
            jobs: Arc::new(Semaphore::new(jobs)),
            connection: Arc::new(Semaphore::new(CONNECTION_CAPACITY)),
        }
    }

    /// Held by a job for its whole pipeline.
    pub async fn job_permit(&self) -> Result<OwnedSemaphorePermit, AcquireError> {
        Arc::clone(&self.jobs).acquire_owned().await
    }

    /// Held only while a remote session is open.
    pub async fn connection_permit(&self) -> Result<OwnedSemaphorePermit, AcquireError> {
        Arc::clone(&self.connection).acquire_owned().await
    }

    #[cfg(test)]
    pub fn available_jobs(&self) -> usize {
        self.jobs.available_permits()
    }

    #[cfg(test)]
    pub fn available_connections(&self) -> usize {
        self.connection.available_permits()
    }
}

#[cfg(test)]
mod tests {

    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use futures::future::join_all;

    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn should_never_exceed_job_capacity() {
        let gates = Gates::new(2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let gates = gates.clone();
                let running = Arc::clone(&running);
                let peak = Arc::clone(&peak);
                tokio::spawn(async move {
                    let _permit = gates.job_permit().await.unwrap();
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();
        join_all(tasks).await;

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(gates.available_jobs(), 2);
    }

    #[tokio::test]
    async fn should_release_connection_permit_on_drop() {
        let gates = Gates::new(4);

        {
            let _permit = gates.connection_permit().await.unwrap();
            assert_eq!(gates.available_connections(), 0);
        }

        assert_eq!(gates.available_connections(), CONNECTION_CAPACITY);
    }

    #[tokio::test]
    async fn should_release_permit_when_section_fails() {
        let gates = Gates::new(1);

        let guarded = async {
            let _permit = gates.job_permit().await?;
            Err::<(), _>(anyhow::anyhow!("boom"))
        };
        assert!(guarded.await.is_err());

        assert_eq!(gates.available_jobs(), 1);
    }
}
