//! Catalog service.

use async_trait::async_trait;
use cartwright::fixtures::Fixture;
use mockall::automock;
use rustc_hash::FxHashMap;

use crate::domain::catalog::{
    errors::CatalogServiceError,
    models::{Product, ProductId},
};

/// Catalogue backed by a loaded fixture set.
#[derive(Debug, Clone, Default)]
pub struct FixtureCatalog {
    products: FxHashMap<ProductId, Product>,
}

impl FixtureCatalog {
    #[must_use]
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: products
                .into_iter()
                .map(|product| (product.id.clone(), product))
                .collect(),
        }
    }

    #[must_use]
    pub fn from_fixture(fixture: &Fixture) -> Self {
        Self::new(fixture.products().into_iter().map(|(id, product)| Product {
            id: ProductId::new(id),
            name: product.name.clone(),
            price: product.price,
        }))
    }
}

#[async_trait]
impl CatalogService for FixtureCatalog {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogServiceError> {
        let mut products: Vec<Product> = self.products.values().cloned().collect();

        products.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(products)
    }

    async fn get_product(&self, product: &ProductId) -> Result<Product, CatalogServiceError> {
        self.products
            .get(product)
            .cloned()
            .ok_or_else(|| CatalogServiceError::NotFound(product.clone()))
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// List every product, ordered by id.
    async fn list_products(&self) -> Result<Vec<Product>, CatalogServiceError>;

    /// Resolve a product id to its name and unit price.
    async fn get_product(&self, product: &ProductId) -> Result<Product, CatalogServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    fn catalog() -> FixtureCatalog {
        FixtureCatalog::new([
            Product {
                id: ProductId::new("tea"),
                name: "Tea".to_string(),
                price: dec!(5.00),
            },
            Product {
                id: ProductId::new("mug"),
                name: "Mug".to_string(),
                price: dec!(12.50),
            },
        ])
    }

    #[tokio::test]
    async fn get_product_resolves_known_ids() -> TestResult {
        let product = catalog().get_product(&ProductId::new("mug")).await?;

        assert_eq!(product.name, "Mug");
        assert_eq!(product.price, dec!(12.50));

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_id_returns_not_found() {
        let result = catalog().get_product(&ProductId::new("kettle")).await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound(ref id)) if id.as_str() == "kettle"),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_products_is_ordered_by_id() -> TestResult {
        let ids: Vec<String> = catalog()
            .list_products()
            .await?
            .into_iter()
            .map(|product| product.id.to_string())
            .collect();

        assert_eq!(ids, ["mug", "tea"]);

        Ok(())
    }
}
