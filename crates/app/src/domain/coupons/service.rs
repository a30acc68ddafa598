//! Coupons service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use cartwright::coupons::{CouponCode, compute_discount, explain_invalidity};
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::{Span, info};
use uuid::Uuid;

use crate::{
    documents::DocumentStore,
    domain::coupons::{
        errors::CouponsServiceError, models::CouponEvaluation, repository::CouponsRepository,
    },
};

#[derive(Clone)]
pub struct StoreCouponsService {
    store: Arc<dyn DocumentStore>,
    repository: CouponsRepository,
}

impl fmt::Debug for StoreCouponsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreCouponsService")
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}

impl StoreCouponsService {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            repository: CouponsRepository::new(),
        }
    }

    /// Reject blank codes, out-of-range discounts and codes used by another coupon.
    async fn validate(
        &self,
        coupon: &CouponCode,
    ) -> Result<(), CouponsServiceError> {
        if coupon.code.trim().is_empty() {
            return Err(CouponsServiceError::MissingRequiredData);
        }

        if coupon.discount.is_sign_negative()
            || (coupon.is_percentage && coupon.discount > Decimal::ONE_HUNDRED)
        {
            return Err(CouponsServiceError::InvalidData);
        }

        if let Some(existing) = self.find_by_code(&coupon.code).await?
            && existing.id != coupon.id
        {
            return Err(CouponsServiceError::AlreadyExists);
        }

        Ok(())
    }
}

#[async_trait]
impl CouponsService for StoreCouponsService {
    #[tracing::instrument(name = "coupons.service.list_coupons", skip(self), err)]
    async fn list_coupons(&self) -> Result<Vec<CouponCode>, CouponsServiceError> {
        let mut coupons = self.repository.list_coupons(self.store.as_ref()).await?;

        coupons.sort_by(|a, b| a.code.cmp(&b.code));

        Ok(coupons)
    }

    #[tracing::instrument(name = "coupons.service.get_coupon", skip(self), err)]
    async fn get_coupon(&self, id: &str) -> Result<CouponCode, CouponsServiceError> {
        Ok(self.repository.get_coupon(self.store.as_ref(), id).await?)
    }

    #[tracing::instrument(name = "coupons.service.find_by_code", skip(self), err)]
    async fn find_by_code(&self, code: &str) -> Result<Option<CouponCode>, CouponsServiceError> {
        let code = code.trim();

        Ok(self
            .repository
            .list_coupons(self.store.as_ref())
            .await?
            .into_iter()
            .find(|coupon| coupon.code == code))
    }

    #[tracing::instrument(
        name = "coupons.service.create_coupon",
        skip(self, coupon),
        fields(code = %coupon.code, coupon_id = tracing::field::Empty),
        err
    )]
    async fn create_coupon(
        &self,
        mut coupon: CouponCode,
    ) -> Result<CouponCode, CouponsServiceError> {
        if coupon.id.is_empty() {
            coupon.id = Uuid::now_v7().to_string();
        }

        coupon.code = coupon.code.trim().to_string();

        Span::current().record("coupon_id", coupon.id.as_str());

        self.validate(&coupon).await?;

        self.repository
            .create_coupon(self.store.as_ref(), &coupon)
            .await?;

        info!(coupon_id = %coupon.id, code = %coupon.code, "created coupon");

        Ok(coupon)
    }

    #[tracing::instrument(
        name = "coupons.service.update_coupon",
        skip(self, coupon),
        fields(code = %coupon.code),
        err
    )]
    async fn update_coupon(
        &self,
        id: &str,
        mut coupon: CouponCode,
    ) -> Result<CouponCode, CouponsServiceError> {
        coupon.id = id.to_string();
        coupon.code = coupon.code.trim().to_string();

        self.validate(&coupon).await?;

        self.repository
            .update_coupon(self.store.as_ref(), &coupon)
            .await?;

        info!(coupon_id = %coupon.id, code = %coupon.code, "updated coupon");

        Ok(coupon)
    }

    #[tracing::instrument(name = "coupons.service.delete_coupon", skip(self), err)]
    async fn delete_coupon(&self, id: &str) -> Result<(), CouponsServiceError> {
        self.repository.delete_coupon(self.store.as_ref(), id).await?;

        info!(coupon_id = %id, "deleted coupon");

        Ok(())
    }

    #[tracing::instrument(
        name = "coupons.service.evaluate",
        skip(self),
        fields(subtotal = %subtotal, verdict = tracing::field::Empty),
        err
    )]
    async fn evaluate(
        &self,
        code: &str,
        subtotal: Decimal,
        now: Timestamp,
    ) -> Result<CouponEvaluation, CouponsServiceError> {
        let coupon = self.find_by_code(code).await?;
        let verdict = explain_invalidity(coupon.as_ref(), Some(subtotal), now);

        let discount = coupon
            .as_ref()
            .map(|coupon| compute_discount(coupon, subtotal, now))
            .unwrap_or_default();

        Span::current().record("verdict", tracing::field::debug(&verdict));

        Ok(CouponEvaluation {
            coupon,
            verdict,
            discount,
        })
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Every coupon, ordered by code.
    async fn list_coupons(&self) -> Result<Vec<CouponCode>, CouponsServiceError>;

    /// Retrieve a coupon by document id.
    async fn get_coupon(&self, id: &str) -> Result<CouponCode, CouponsServiceError>;

    /// Look a coupon up by the code a shopper types.
    async fn find_by_code(&self, code: &str) -> Result<Option<CouponCode>, CouponsServiceError>;

    /// Create a coupon, generating an id when none is given.
    async fn create_coupon(&self, coupon: CouponCode) -> Result<CouponCode, CouponsServiceError>;

    /// Replace an existing coupon's rules.
    async fn update_coupon(
        &self,
        id: &str,
        coupon: CouponCode,
    ) -> Result<CouponCode, CouponsServiceError>;

    /// Delete a coupon.
    async fn delete_coupon(&self, id: &str) -> Result<(), CouponsServiceError>;

    /// Check `code` against `subtotal` at `now`.
    async fn evaluate(
        &self,
        code: &str,
        subtotal: Decimal,
        now: Timestamp,
    ) -> Result<CouponEvaluation, CouponsServiceError>;
}
