use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use log::{debug, error};
use std::any::Any;
use storefront_core::errors::Result;
use tokio::sync::{mpsc, oneshot};

// A write job runs against the actor's connection and returns a core Result so
// domain errors (validation, not found) survive the trip back to the caller.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

type AnyBox = Box<dyn Any + Send + 'static>;
type Envelope = (Job<AnyBox>, oneshot::Sender<Result<AnyBox>>);

/// Capacity of the job queue; senders wait once it is full.
const QUEUE_CAPACITY: usize = 1024;

/// Handle for sending jobs to the writer actor.
///
/// Every category and product write goes through one handle, so writes are
/// applied one at a time, each inside its own `IMMEDIATE` transaction.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<Envelope>,
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection.
    ///
    /// The job's error rolls the transaction back and is returned as-is.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as AnyBox)),
                ret_tx,
            ))
            .await
            .map_err(|_| StorageError::WriterUnavailable("writer actor stopped".to_string()))?;

        let boxed = ret_rx.await.map_err(|_| {
            StorageError::WriterUnavailable("writer actor dropped the reply".to_string())
        })??;

        boxed.downcast::<T>().map(|v| *v).map_err(|_| {
            StorageError::WriterUnavailable("unexpected writer result type".to_string()).into()
        })
    }
}

/// Spawns a background Tokio task that acts as a single writer to the database.
///
/// The actor holds one pooled connection for its whole lifetime and stops
/// when every `WriteHandle` has been dropped.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<Envelope>(QUEUE_CAPACITY);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                // Dropping `rx` here makes every pending and future `exec`
                // fail with WriterUnavailable.
                error!("Writer actor could not acquire a connection: {}", e);
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<AnyBox> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(|e: StorageError| e.into());

            // The requester may have gone away (cancelled request).
            let _ = reply_tx.send(result);
        }
        debug!("Writer actor stopped");
    });

    WriteHandle { tx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, get_connection, init, run_migrations};
    use crate::schema::categories;
    use diesel::prelude::*;
    use storefront_core::errors::{Error, ValidationError};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_failed_job_rolls_back() {
        let dir = tempdir().unwrap();
        let db_path = init(dir.path().join("w.db").to_str().unwrap()).unwrap();
        let pool = create_pool(&db_path).unwrap();
        run_migrations(&pool).unwrap();
        let writer = spawn_writer((*pool).clone());

        let err = writer
            .exec(|conn| -> Result<()> {
                diesel::insert_into(categories::table)
                    .values(categories::name.eq("Lighting"))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Err(ValidationError::InvalidInput("abort".to_string()).into())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let mut conn = get_connection(&pool).unwrap();
        let count: i64 = categories::table.count().get_result(&mut conn).unwrap();
        assert_eq!(count, 0);

        let id = writer
            .exec(|conn| -> Result<i32> {
                diesel::insert_into(categories::table)
                    .values(categories::name.eq("Lighting"))
                    .returning(categories::id)
                    .get_result(conn)
                    .map_err(|e| StorageError::from(e).into())
            })
            .await
            .unwrap();
        assert!(id > 0);
    }
}
