//! In-memory implementations of the repository ports.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{NewOrder, Order, OrderStatus, Transaction, TransactionFilter};
use crate::ports::{OrderRepository, RepositoryError, RepositoryResult, TransactionRepository};

/// First human-readable order number; seeded orders count up from here.
pub const ORDER_ID_BASE: u64 = 10000;

/// A thread-safe in-memory transaction store.
///
/// Populated once at construction and read-only afterwards.
#[derive(Default, Clone)]
pub struct InMemoryTransactionRepository {
    transactions: Arc<RwLock<Vec<Transaction>>>,
}

impl InMemoryTransactionRepository {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions: Arc::new(RwLock::new(transactions)),
        }
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn find(&self, filter: &TransactionFilter) -> RepositoryResult<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions
            .iter()
            .filter(|tx| filter.matches(tx))
            .cloned()
            .collect())
    }

    async fn count(&self) -> RepositoryResult<usize> {
        Ok(self.transactions.read().await.len())
    }
}

/// A thread-safe in-memory order store.
///
/// Orders are kept newest first. Ids come from an atomic sequence so they stay
/// unique no matter how many handlers create orders at once.
#[derive(Clone)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<Vec<Order>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl InMemoryOrderRepository {
    /// Creates a store holding `seed`, with the sequence positioned past every seeded id.
    pub fn new(seed: Vec<Order>) -> Self {
        let highest_seeded = seed
            .iter()
            .filter_map(|order| order.id.parse::<u64>().ok())
            .max()
            .map(|id| id + 1)
            .unwrap_or(0);
        let next = (ORDER_ID_BASE + seed.len() as u64 + 1).max(highest_seeded);

        Self {
            orders: Arc::new(RwLock::new(seed)),
            next_id: Arc::new(AtomicU64::new(next)),
        }
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert(&self, order: NewOrder) -> RepositoryResult<Order> {
        let mut orders = self.orders.write().await;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let order = order.into_order(id.to_string(), Utc::now());
        orders.insert(0, order.clone());
        Ok(order)
    }

    async fn get_by_id(&self, id: &str) -> RepositoryResult<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|order| order.id == id).cloned())
    }

    async fn list(&self) -> RepositoryResult<Vec<Order>> {
        Ok(self.orders.read().await.clone())
    }

    async fn update_status(&self, id: &str, status: OrderStatus) -> RepositoryResult<Order> {
        let mut orders = self.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or_else(|| RepositoryError::NotFound(format!("Order {} not found", id)))?;

        order
            .transition_to(status)
            .map_err(|e| RepositoryError::Conflict(e.to_string()))?;

        Ok(order.clone())
    }

    async fn count(&self) -> RepositoryResult<usize> {
        Ok(self.orders.read().await.len())
    }
}
