//! Framework-agnostic storefront entities.

pub mod money;
pub mod order;
pub mod transaction;

pub use order::{InvalidTransition, NewOrder, Order, OrderItem, OrderStatus, UnknownStatus};
pub use transaction::{Transaction, TransactionFilter, TransactionStatus, TransactionType};
