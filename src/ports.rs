//! Repository traits the services depend on.
//! Adapters in `crate::adapters` provide the backing implementations.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{NewOrder, Order, OrderStatus, Transaction, TransactionFilter};

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Transactions passing `filter`, in store order.
    async fn find(&self, filter: &TransactionFilter) -> RepositoryResult<Vec<Transaction>>;

    async fn count(&self) -> RepositoryResult<usize>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Assigns the next id and stores the order at the head of the collection.
    async fn insert(&self, order: NewOrder) -> RepositoryResult<Order>;

    async fn get_by_id(&self, id: &str) -> RepositoryResult<Option<Order>>;

    /// All orders, newest first.
    async fn list(&self) -> RepositoryResult<Vec<Order>>;

    /// Applies a validated status transition.
    ///
    /// Returns `NotFound` for an unknown id and `Conflict` for an illegal transition.
    async fn update_status(&self, id: &str, status: OrderStatus) -> RepositoryResult<Order>;

    async fn count(&self) -> RepositoryResult<usize>;
}
