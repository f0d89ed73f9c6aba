pub mod csv_export;
pub mod order_service;
pub mod seed;
pub mod transaction_query;

pub use csv_export::CsvTimeZone;
pub use order_service::OrderService;
pub use transaction_query::{TransactionQueryParams, TransactionQueryService};
