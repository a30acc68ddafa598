//! Coupons Repository

use cartwright::coupons::CouponCode;

use crate::documents::{DocumentStore, StoreError, decode, encode};

const COUPONS_COLLECTION: &str = "coupon_codes";

fn coupon_path(id: &str) -> String {
    format!("{COUPONS_COLLECTION}/{id}")
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CouponsRepository;

impl CouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Every coupon, with ids taken from their document paths.
    pub(crate) async fn list_coupons(
        &self,
        store: &dyn DocumentStore,
    ) -> Result<Vec<CouponCode>, StoreError> {
        store
            .list(COUPONS_COLLECTION)
            .await?
            .into_iter()
            .map(|(id, document)| {
                let mut coupon: CouponCode = decode(&coupon_path(&id), document)?;

                coupon.id = id;

                Ok(coupon)
            })
            .collect()
    }

    pub(crate) async fn get_coupon(
        &self,
        store: &dyn DocumentStore,
        id: &str,
    ) -> Result<CouponCode, StoreError> {
        let path = coupon_path(id);

        let document = store
            .get(&path)
            .await?
            .ok_or_else(|| StoreError::NotFound(path.clone()))?;

        let mut coupon: CouponCode = decode(&path, document)?;

        coupon.id = id.to_string();

        Ok(coupon)
    }

    pub(crate) async fn create_coupon(
        &self,
        store: &dyn DocumentStore,
        coupon: &CouponCode,
    ) -> Result<(), StoreError> {
        store.create(&coupon_path(&coupon.id), encode(coupon)?).await
    }

    /// Overwrite every field of an existing coupon.
    pub(crate) async fn update_coupon(
        &self,
        store: &dyn DocumentStore,
        coupon: &CouponCode,
    ) -> Result<(), StoreError> {
        store
            .update(&coupon_path(&coupon.id), encode(coupon)?, None)
            .await
    }

    pub(crate) async fn delete_coupon(
        &self,
        store: &dyn DocumentStore,
        id: &str,
    ) -> Result<(), StoreError> {
        store.delete(&coupon_path(id)).await
    }
}
