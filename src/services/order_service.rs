use serde::Deserialize;
use std::sync::Arc;

use crate::domain::{NewOrder, Order, OrderItem, OrderStatus};
use crate::error::AppError;
use crate::ports::OrderRepository;
use crate::services::csv_export::{write_csv, CsvExportError};
use crate::validation::{
    required_text, sanitize_string, validate_max_len, validate_price, validate_quantity,
    ValidationError, CATEGORY_MAX_LEN, IMAGE_URL_MAX_LEN, MAX_CHECKOUT_ITEMS,
    PRODUCT_ID_MAX_LEN, PRODUCT_NAME_MAX_LEN,
};

pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/400x400";

pub const ORDER_CSV_HEADER: [&str; 7] = [
    "id",
    "customerName",
    "customerEmail",
    "total",
    "status",
    "createdAt",
    "items",
];

/// A line item as submitted at checkout, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItemInput {
    pub product_id: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

impl CheckoutItemInput {
    pub fn into_order_item(self) -> Result<OrderItem, ValidationError> {
        let product_id = required_text("productId", self.product_id.as_deref(), PRODUCT_ID_MAX_LEN)?;
        let name = required_text("name", self.name.as_deref(), PRODUCT_NAME_MAX_LEN)?;

        let image = self
            .image
            .map(|image| image.trim().to_string())
            .filter(|image| !image.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());
        validate_max_len("image", &image, IMAGE_URL_MAX_LEN)?;

        let category = self
            .category
            .map(|c| sanitize_string(&c))
            .filter(|c| !c.is_empty());
        if let Some(category) = &category {
            validate_max_len("category", category, CATEGORY_MAX_LEN)?;
        }

        Ok(OrderItem {
            product_id,
            name,
            image,
            category,
            price: validate_price("price", self.price)?,
            quantity: validate_quantity("quantity", self.quantity)?,
        })
    }
}

/// Validates a checkout basket. An empty basket is rejected.
pub fn checkout_items(inputs: Vec<CheckoutItemInput>) -> Result<Vec<OrderItem>, ValidationError> {
    if inputs.is_empty() {
        return Err(ValidationError::new("items", "must contain at least one item"));
    }
    if inputs.len() > MAX_CHECKOUT_ITEMS {
        return Err(ValidationError::new(
            "items",
            format!("must contain at most {} items", MAX_CHECKOUT_ITEMS),
        ));
    }

    inputs
        .into_iter()
        .enumerate()
        .map(|(i, input)| input.into_order_item().map_err(|e| e.at("items", i)))
        .collect()
}

pub fn orders_to_csv(orders: &[Order]) -> Result<String, CsvExportError> {
    let rows = orders.iter().map(|order| {
        let items = order
            .items
            .iter()
            .map(|item| format!("{} x {}", item.name, item.quantity))
            .collect::<Vec<_>>()
            .join("; ");
        vec![
            order.id.clone(),
            order.customer_name.clone(),
            order.customer_email.clone(),
            order.total.with_scale(2).to_string(),
            order.status.to_string(),
            order.created_at.to_rfc3339(),
            items,
        ]
    });

    write_csv(&ORDER_CSV_HEADER, rows)
}

/// Creation, lookup and status lifecycle over the order store.
#[derive(Clone)]
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_order(
        &self,
        customer_name: &str,
        customer_email: &str,
        items: Vec<OrderItem>,
    ) -> Result<Order, AppError> {
        let order = self
            .repo
            .insert(NewOrder::new(
                customer_name.to_string(),
                customer_email.to_string(),
                items,
            ))
            .await?;

        tracing::info!(
            order_id = %order.id,
            items = order.items.len(),
            total = %order.total,
            "Order created"
        );

        Ok(order)
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, AppError> {
        Ok(self.repo.list().await?)
    }

    /// Orders owned by `email`, compared case-insensitively.
    pub async fn list_orders_for(&self, email: &str) -> Result<Vec<Order>, AppError> {
        let orders = self.repo.list().await?;
        Ok(orders
            .into_iter()
            .filter(|order| order.belongs_to(email))
            .collect())
    }

    pub async fn get_order(&self, id: &str) -> Result<Option<Order>, AppError> {
        Ok(self.repo.get_by_id(id).await?)
    }

    pub async fn update_status(&self, id: &str, status: OrderStatus) -> Result<Order, AppError> {
        let order = self.repo.update_status(id, status).await?;
        tracing::info!(order_id = %order.id, status = %order.status, "Order status updated");
        Ok(order)
    }

    pub async fn count(&self) -> Result<usize, AppError> {
        Ok(self.repo.count().await?)
    }
}
