//! Synthetic datasets the stores start with.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Builder;

use crate::adapters::in_memory::ORDER_ID_BASE;
use crate::domain::{
    Order, OrderItem, OrderStatus, Transaction, TransactionStatus, TransactionType,
};

pub const DEFAULT_TRANSACTION_COUNT: usize = 600;
pub const DEFAULT_ORDER_COUNT: usize = 120;

const CURRENCIES: [&str; 3] = ["USD", "EUR", "VND"];
const MS_PER_DAY: i64 = 86_400_000;

struct DemoProduct {
    id: &'static str,
    name: &'static str,
    price_cents: i64,
    image: &'static str,
    category: &'static str,
}

const DEMO_PRODUCTS: [DemoProduct; 8] = [
    DemoProduct { id: "1", name: "iPhone 15", price_cents: 79_900, image: "https://placehold.co/400x400?text=iphone", category: "Electronics" },
    DemoProduct { id: "8", name: "Vitamix E310 Blender", price_cents: 34_999, image: "https://placehold.co/400x400?text=blender", category: "Home & Kitchen" },
    DemoProduct { id: "57", name: "Kindle Paperwhite", price_cents: 14_999, image: "https://placehold.co/400x400?text=kindle", category: "Electronics" },
    DemoProduct { id: "83", name: "Cuisinart 4-Slice Toaster", price_cents: 8_999, image: "https://placehold.co/400x400?text=toaster", category: "Home & Kitchen" },
    DemoProduct { id: "30", name: "TrailMaster Hiking Boots", price_cents: 17_500, image: "https://placehold.co/400x400?text=boots", category: "Sports & Outdoors" },
    DemoProduct { id: "121", name: "Pro V1 Golf Balls", price_cents: 5_200, image: "https://placehold.co/400x400?text=golf+balls", category: "Sports & Outdoors" },
    DemoProduct { id: "45", name: "Urban Fleece Hoodie", price_cents: 3_999, image: "https://placehold.co/400x400?text=hoodie", category: "Clothing" },
    DemoProduct { id: "12", name: "Apple Watch Series 9", price_cents: 39_999, image: "https://placehold.co/400x400?text=watch", category: "Accessories" },
];

const DEMO_CUSTOMERS: [(&str, &str); 5] = [
    ("Alice Nguyen", "alice@example.com"),
    ("Bob Tran", "bob@example.com"),
    ("Carol Pham", "carol@example.com"),
    ("David Le", "david@example.com"),
    ("Eve Nguyen", "eve@example.com"),
];

fn cents(value: i64) -> BigDecimal {
    (BigDecimal::from(value) / BigDecimal::from(100)).with_scale(2)
}

/// A random instant up to `max_days` whole days plus up to one extra day before `now`.
fn random_past<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>, max_days: i64) -> DateTime<Utc> {
    let days = rng.gen_range(0..max_days);
    let ms = rng.gen_range(0..MS_PER_DAY);
    now - Duration::days(days) - Duration::milliseconds(ms)
}

/// Builds `count` transactions ending at `now`, sorted newest first.
///
/// Type, status and currency cycle with the index; refunds carry negative
/// amounts. Ids are `tx_<n>` and references are random UUIDs.
pub fn generate_transactions<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    now: DateTime<Utc>,
) -> Vec<Transaction> {
    let mut out: Vec<Transaction> = (0..count)
        .map(|i| {
            let kind = TransactionType::ALL[i % TransactionType::ALL.len()];
            let status = TransactionStatus::ALL[i % TransactionStatus::ALL.len()];
            let currency = CURRENCIES[i % CURRENCIES.len()];

            let base_cents = if kind == TransactionType::Refund {
                -(2_000 + (i as i64 % 50) * 300)
            } else {
                2_000 + (i as i64 % 200) * 250
            };
            let jitter_cents = rng.gen_range(-500..=500);

            Transaction {
                id: format!("tx_{}", i + 1),
                reference: Builder::from_random_bytes(rng.gen()).into_uuid().to_string(),
                timestamp: random_past(rng, now, 180),
                kind,
                amount: cents(base_cents + jitter_cents),
                currency: currency.to_string(),
                status,
            }
        })
        .collect();

    out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    out
}

/// Builds `count` demo orders with ids counting up from the order id base,
/// sorted newest first.
pub fn generate_orders<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    now: DateTime<Utc>,
) -> Vec<Order> {
    let mut out: Vec<Order> = (0..count)
        .map(|i| {
            let item_count = rng.gen_range(1..=4);
            let items = (0..item_count)
                .map(|_| {
                    let product = &DEMO_PRODUCTS[rng.gen_range(0..DEMO_PRODUCTS.len())];
                    OrderItem {
                        product_id: product.id.to_string(),
                        name: product.name.to_string(),
                        image: product.image.to_string(),
                        category: Some(product.category.to_string()),
                        price: cents(product.price_cents),
                        quantity: rng.gen_range(1..=3),
                    }
                })
                .collect();

            let status = *OrderStatus::ALL
                .choose(rng)
                .unwrap_or(&OrderStatus::Processing);
            let (name, email) = DEMO_CUSTOMERS[rng.gen_range(0..DEMO_CUSTOMERS.len())];

            Order::new(
                (ORDER_ID_BASE + i as u64).to_string(),
                name.to_string(),
                email.to_string(),
                items,
                status,
                random_past(rng, now, 90),
            )
        })
        .collect();

    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::order_total;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_transactions_have_unique_ids_and_references() {
        let mut rng = StdRng::seed_from_u64(7);
        let txs = generate_transactions(&mut rng, DEFAULT_TRANSACTION_COUNT, Utc::now());

        assert_eq!(txs.len(), DEFAULT_TRANSACTION_COUNT);
        let ids: HashSet<_> = txs.iter().map(|t| t.id.as_str()).collect();
        let refs: HashSet<_> = txs.iter().map(|t| t.reference.as_str()).collect();
        assert_eq!(ids.len(), txs.len());
        assert_eq!(refs.len(), txs.len());
    }

    #[test]
    fn test_transactions_sorted_newest_first_within_window() {
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(11);
        let txs = generate_transactions(&mut rng, 200, now);

        assert!(txs.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        let oldest = now - Duration::days(181);
        assert!(txs.iter().all(|t| t.timestamp <= now && t.timestamp > oldest));
    }

    #[test]
    fn test_refunds_are_negative_and_others_positive() {
        let mut rng = StdRng::seed_from_u64(3);
        let zero = BigDecimal::from(0);
        for tx in generate_transactions(&mut rng, 300, Utc::now()) {
            if tx.kind == TransactionType::Refund {
                assert!(tx.amount < zero, "{} should be negative", tx.id);
            } else {
                assert!(tx.amount > zero, "{} should be positive", tx.id);
            }
            assert!(CURRENCIES.contains(&tx.currency.as_str()));
        }
    }

    #[test]
    fn test_orders_are_consistent() {
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(5);
        let orders = generate_orders(&mut rng, DEFAULT_ORDER_COUNT, now);

        assert_eq!(orders.len(), DEFAULT_ORDER_COUNT);
        let ids: HashSet<_> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids.len(), orders.len());
        assert!(orders.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        for order in &orders {
            assert!((1..=4).contains(&order.items.len()));
            assert!(order.items.iter().all(|i| (1..=3).contains(&i.quantity)));
            assert_eq!(order.total, order_total(&order.items));
        }
    }

    #[test]
    fn test_same_seed_same_data() {
        let now = Utc::now();
        let a = generate_orders(&mut StdRng::seed_from_u64(9), 10, now);
        let b = generate_orders(&mut StdRng::seed_from_u64(9), 10, now);
        assert_eq!(a, b);
    }
}
