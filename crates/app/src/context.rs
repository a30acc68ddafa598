//! App Context

use std::sync::Arc;

use cartwright::fixtures::Fixture;
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::info;

use crate::{
    documents::{DocumentStore, MemoryDocumentStore},
    domain::{
        carts::{CartsService, StoreCartsService},
        catalog::{CatalogService, FixtureCatalog},
        checkout::{CatalogCheckoutService, CheckoutService},
        coupons::{CouponsService, CouponsServiceError, StoreCouponsService},
        orders::{OrdersService, StoreOrdersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to seed coupon {code}")]
    SeedCoupon {
        code: String,
        #[source]
        source: CouponsServiceError,
    },
}

#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub coupons: Arc<dyn CouponsService>,
    pub catalog: Arc<dyn CatalogService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub currency: &'static Currency,
}

impl AppContext {
    /// Build application context over an in-memory store seeded from a fixture set.
    ///
    /// # Errors
    ///
    /// Returns an error when a fixture coupon cannot be stored.
    pub async fn from_fixture(
        fixture: &Fixture,
        currency: &'static Currency,
    ) -> Result<Self, AppInitError> {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());

        let orders: Arc<dyn OrdersService> = Arc::new(StoreOrdersService::new(store.clone()));
        let coupons: Arc<dyn CouponsService> = Arc::new(StoreCouponsService::new(store.clone()));
        let catalog: Arc<dyn CatalogService> = Arc::new(FixtureCatalog::from_fixture(fixture));

        for coupon in fixture.coupons() {
            coupons
                .create_coupon(coupon.clone())
                .await
                .map_err(|source| AppInitError::SeedCoupon {
                    code: coupon.code.clone(),
                    source,
                })?;
        }

        info!(
            products = fixture.products().len(),
            coupons = fixture.coupons().len(),
            currency = currency.iso_alpha_code,
            "seeded store from fixtures"
        );

        Ok(Self {
            carts: Arc::new(StoreCartsService::new(store, orders.clone())),
            checkout: Arc::new(CatalogCheckoutService::new(
                catalog.clone(),
                coupons.clone(),
                currency,
            )),
            orders,
            coupons,
            catalog,
            currency,
        })
    }
}
