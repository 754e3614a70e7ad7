//! # Purchase Coordinator
//!
//! Quantity policy in front of the stock ledger.
//!
//! The coordinator owns no stock arithmetic of its own. It validates
//! the requested quantity and delegates to [`InventoryLedger::sell`],
//! which performs the decrement and the sold-counter update in one
//! transaction. Overselling is prevented by the ledger's conditional
//! update, not by a check here, so concurrent purchases racing for the
//! same stock cannot both win.

use std::sync::Arc;

use tracing::{info, warn};
use vendio_core::validation::validate_quantity;
use vendio_core::Product;

use crate::error::{ServiceError, ServiceResult};
use crate::store::InventoryLedger;

/// Validates and executes purchases and restocks.
pub struct PurchaseCoordinator {
    ledger: Arc<dyn InventoryLedger>,
}

impl PurchaseCoordinator {
    pub fn new(ledger: Arc<dyn InventoryLedger>) -> Self {
        Self { ledger }
    }

    /// Purchases `quantity` units of a product.
    ///
    /// Succeeds only if stock covers the full quantity; a short request
    /// fails whole with [`ServiceError::InsufficientStock`] and changes
    /// nothing. No partial fulfilment.
    pub async fn purchase(&self, product_id: &str, quantity: i64) -> ServiceResult<()> {
        validate_quantity(quantity)?;

        match self.ledger.sell(product_id, quantity).await {
            Ok(()) => {
                info!(product_id = %product_id, quantity, "Purchase completed");
                Ok(())
            }
            Err(ServiceError::InsufficientStock {
                product_id,
                available,
                requested,
            }) => {
                warn!(product_id = %product_id, available, requested, "Purchase rejected, insufficient stock");
                Err(ServiceError::InsufficientStock {
                    product_id,
                    available,
                    requested,
                })
            }
            Err(other) => Err(other),
        }
    }

    /// Adds `quantity` units back to a product's stock.
    pub async fn restock_product(&self, product_id: &str, quantity: i64) -> ServiceResult<()> {
        validate_quantity(quantity)?;
        self.ledger.restock(product_id, quantity).await?;
        info!(product_id = %product_id, quantity, "Restocked");
        Ok(())
    }

    /// Current stock level for a product.
    pub async fn stock_level(&self, product_id: &str) -> ServiceResult<i64> {
        self.ledger.check_stock(product_id).await
    }

    /// Products that have sold out.
    pub async fn out_of_stock_report(&self) -> ServiceResult<Vec<Product>> {
        self.ledger.out_of_stock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vendio_db::{generate_product_id, Database, DbConfig};

    async fn coordinator_with_product(stock: i64) -> (PurchaseCoordinator, Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            title: "Mechanical Keyboard".to_string(),
            description: None,
            price_cents: 8_900,
            stock_quantity: stock,
            sold_quantity: 0,
            created_at: now,
            updated_at: now,
        };
        db.inventory().insert_product(&product).await.unwrap();
        let coordinator = PurchaseCoordinator::new(Arc::new(db.inventory()));
        (coordinator, db, product.id)
    }

    #[tokio::test]
    async fn purchase_decrements_and_records_sale() {
        let (coordinator, db, id) = coordinator_with_product(10).await;

        coordinator.purchase(&id, 3).await.unwrap();
        assert_eq!(coordinator.stock_level(&id).await.unwrap(), 7);

        let product = db.inventory().get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(product.sold_quantity, 3);
    }

    #[tokio::test]
    async fn short_stock_fails_whole_with_counts() {
        let (coordinator, db, id) = coordinator_with_product(2).await;

        match coordinator.purchase(&id, 5).await {
            Err(ServiceError::InsufficientStock {
                available,
                requested,
                ..
            }) => {
                assert_eq!(available, 2);
                assert_eq!(requested, 5);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // Nothing moved
        assert_eq!(coordinator.stock_level(&id).await.unwrap(), 2);
        let product = db.inventory().get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(product.sold_quantity, 0);
    }

    #[tokio::test]
    async fn quantity_policy_rejects_bad_requests() {
        let (coordinator, _db, id) = coordinator_with_product(10).await;

        assert!(matches!(
            coordinator.purchase(&id, 0).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            coordinator.purchase(&id, -4).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            coordinator.purchase(&id, 1_000).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            coordinator.restock_product(&id, 0).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let (coordinator, _db, _id) = coordinator_with_product(10).await;
        assert!(matches!(
            coordinator.purchase("missing-product", 1).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn restock_revives_a_sold_out_product() {
        let (coordinator, _db, id) = coordinator_with_product(1).await;

        coordinator.purchase(&id, 1).await.unwrap();
        let report = coordinator.out_of_stock_report().await.unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].id, id);

        coordinator.restock_product(&id, 4).await.unwrap();
        assert_eq!(coordinator.stock_level(&id).await.unwrap(), 4);
        assert!(coordinator.out_of_stock_report().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_purchases_never_oversell() {
        let (coordinator, _db, id) = coordinator_with_product(3).await;
        let coordinator = Arc::new(coordinator);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let coordinator = coordinator.clone();
            let id = id.clone();
            handles.push(tokio::spawn(
                async move { coordinator.purchase(&id, 1).await },
            ));
        }

        let mut successes = 0;
        let mut rejections = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => successes += 1,
                Err(ServiceError::InsufficientStock { .. }) => rejections += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(successes, 3);
        assert_eq!(rejections, 5);
        assert_eq!(coordinator.stock_level(&id).await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_multi_unit_purchases_are_all_or_nothing() {
        let (coordinator, db, id) = coordinator_with_product(5).await;
        let coordinator = Arc::new(coordinator);

        let a = {
            let coordinator = coordinator.clone();
            let id = id.clone();
            tokio::spawn(async move { coordinator.purchase(&id, 3).await })
        };
        let b = {
            let coordinator = coordinator.clone();
            let id = id.clone();
            tokio::spawn(async move { coordinator.purchase(&id, 3).await })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();

        // Only one 3-unit request fits in 5; no partial fills
        assert_eq!(successes, 1);
        assert_eq!(coordinator.stock_level(&id).await.unwrap(), 2);
        let product = db.inventory().get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(product.sold_quantity, 3);
    }
}
