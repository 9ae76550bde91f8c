//! Single-writer actor for SQLite.
//!
//! SQLite allows one writer at a time; funneling every write through one
//! dedicated connection turns lock contention into queueing. Each job runs
//! inside an immediate transaction, which is what makes the repository's
//! insert-or-ignore-then-read and upsert operations atomic per call.

use diesel::SqliteConnection;
use tokio::sync::{mpsc, oneshot};

use crate::db::DbPool;
use crate::errors::StorageError;
use sharemarket_core::errors::{DatabaseError, Error, Result};

use std::sync::Arc;

/// A queued write. The closure owns its reply channel, so the actor itself
/// stays oblivious to job result types.
type WriteJob = Box<dyn FnOnce(&mut SqliteConnection) + Send + 'static>;

/// Handle for submitting write jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<WriteJob>,
}

impl WriteHandle {
    /// Executes a database job on the writer's dedicated connection, inside
    /// an immediate transaction, and awaits its typed result.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (ret_tx, ret_rx) = oneshot::channel::<Result<T>>();

        let wrapped: WriteJob = Box::new(move |conn| {
            let result = conn
                .immediate_transaction::<T, StorageError, _>(|c| {
                    job(c).map_err(StorageError::from)
                })
                .map_err(Error::from);
            // Receiver may have been dropped (caller cancelled); nothing to do.
            let _ = ret_tx.send(result);
        });

        self.tx.send(wrapped).await.map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "database writer is not running".to_string(),
            ))
        })?;

        ret_rx.await.map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "database writer dropped the reply".to_string(),
            ))
        })?
    }
}

/// Spawns the writer task. It holds one pooled connection for its lifetime
/// and processes jobs serially; it terminates when every [`WriteHandle`] has
/// been dropped.
pub fn spawn_writer(pool: Arc<DbPool>) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<WriteJob>(1024);

    tokio::spawn(async move {
        let mut conn = pool
            .get()
            .expect("Failed to check out the writer connection from the pool");

        while let Some(job) = rx.recv().await {
            job(&mut conn);
        }
    });

    WriteHandle { tx }
}
