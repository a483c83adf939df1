//! Unit of work: one database transaction with a car repository bound to it
//!
//! ```ignore
//! let car = CarUnitOfWork::run(&db, |uow| {
//!     Box::pin(async move { uow.cars().create(new_car).await })
//! })
//! .await?;
//! ```
//!
//! `run` commits when the closure returns `Ok` and rolls back on `Err`.
//! A unit of work that is dropped before `commit`/`rollback` (cancelled
//! future, panic) is rolled back by the transaction's own drop.

use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::{debug, warn};

use super::repositories::SeaOrmCarRepository;
use crate::domain::{DomainError, DomainResult};

pub struct CarUnitOfWork {
    txn: DatabaseTransaction,
    guard: ReleaseGuard,
}

impl CarUnitOfWork {
    /// Opens a session from the pool and begins a transaction.
    pub async fn begin(db: &DatabaseConnection) -> DomainResult<Self> {
        let txn = db.begin().await?;
        debug!("Unit of work opened");
        Ok(Self {
            txn,
            guard: ReleaseGuard { released: false },
        })
    }

    /// Repository scoped to this transaction.
    pub fn cars(&self) -> SeaOrmCarRepository<'_> {
        SeaOrmCarRepository::new(&self.txn)
    }

    /// The underlying transaction, for statements outside the repository.
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.txn
    }

    pub async fn commit(self) -> DomainResult<()> {
        let Self { txn, mut guard } = self;
        guard.released = true;
        txn.commit().await?;
        debug!("Unit of work committed");
        Ok(())
    }

    pub async fn rollback(self) -> DomainResult<()> {
        let Self { txn, mut guard } = self;
        guard.released = true;
        txn.rollback().await?;
        debug!("Unit of work rolled back");
        Ok(())
    }

    /// Runs `work` inside a fresh unit of work.
    ///
    /// On `Ok` the transaction is committed; a failing commit is returned as
    /// the error. On `Err` the transaction is rolled back and the original
    /// error is returned even if the rollback fails (that failure is logged).
    pub async fn run<F, T, E>(db: &DatabaseConnection, work: F) -> Result<T, E>
    where
        F: for<'c> FnOnce(&'c CarUnitOfWork) -> Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'c>>
            + Send,
        T: Send,
        E: From<DomainError> + Display + Send,
    {
        let uow = Self::begin(db).await?;
        let outcome = work(&uow).await;

        match outcome {
            Ok(value) => {
                uow.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = uow.rollback().await {
                    warn!("Rollback failed after '{}': {}", err, rollback_err);
                }
                Err(err)
            }
        }
    }
}

struct ReleaseGuard {
    released: bool,
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        if !self.released {
            warn!("Unit of work dropped without commit or rollback; rolling back");
        }
    }
}
