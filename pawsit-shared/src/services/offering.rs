/// Sitter service offerings and the public search
use std::sync::Arc;

use tracing::info;

use crate::auth::authorization::{require_role, require_self_or_admin};
use crate::auth::middleware::AuthContext;
use crate::error::{ServiceError, ServiceResult};
use crate::models::offering::{
    CreateOffering, Offering, OfferingListing, OfferingSearch, UpdateOffering,
};
use crate::models::sitter::SitterStatus;
use crate::models::user::Role;
use crate::repository::{OfferingRepository, SitterRepository};

#[derive(Clone)]
pub struct OfferingService {
    offerings: Arc<dyn OfferingRepository>,
    sitters: Arc<dyn SitterRepository>,
}

impl OfferingService {
    pub fn new(offerings: Arc<dyn OfferingRepository>, sitters: Arc<dyn SitterRepository>) -> Self {
        Self { offerings, sitters }
    }

    /// Publishes an offering for the calling sitter
    ///
    /// Pending sitters may prepare offerings; they only show up in search
    /// once the sitter is approved. Rejected sitters cannot publish.
    pub async fn create(
        &self,
        ctx: &AuthContext,
        fields: UpdateOffering,
    ) -> ServiceResult<Offering> {
        require_role(ctx, &[Role::Sitter])?;
        validate_price(fields.price_per_hour)?;

        let sitter = self
            .sitters
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("sitter profile"))?;
        if sitter.status == SitterStatus::Rejected {
            return Err(ServiceError::Forbidden(
                "rejected sitters cannot publish services".to_string(),
            ));
        }

        let offering = self
            .offerings
            .create(CreateOffering {
                sitter_id: sitter.id,
                service_type: fields.service_type,
                price_per_hour: fields.price_per_hour,
                description: fields.description.trim().to_string(),
            })
            .await?;

        info!(
            service_id = offering.id,
            sitter_id = offering.sitter_id,
            service_type = %offering.service_type,
            "Service published"
        );
        Ok(offering)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Offering> {
        self.offerings
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("service"))
    }

    pub async fn list_by_sitter(&self, sitter_id: i64) -> ServiceResult<Vec<Offering>> {
        Ok(self.offerings.list_by_sitter(sitter_id).await?)
    }

    /// Offerings of approved sitters, best rated first
    pub async fn search(&self, filter: &OfferingSearch) -> ServiceResult<Vec<OfferingListing>> {
        Ok(self.offerings.search(filter).await?)
    }

    pub async fn update(
        &self,
        ctx: &AuthContext,
        id: i64,
        mut fields: UpdateOffering,
    ) -> ServiceResult<Offering> {
        let offering = self.get(id).await?;
        require_self_or_admin(ctx, offering.sitter_id)?;
        validate_price(fields.price_per_hour)?;
        fields.description = fields.description.trim().to_string();

        self.offerings
            .update(id, fields)
            .await?
            .ok_or_else(|| ServiceError::not_found("service"))
    }

    pub async fn delete(&self, ctx: &AuthContext, id: i64) -> ServiceResult<()> {
        let offering = self.get(id).await?;
        require_self_or_admin(ctx, offering.sitter_id)?;

        if !self.offerings.delete(id).await? {
            return Err(ServiceError::not_found("service"));
        }

        info!(service_id = id, "Service removed");
        Ok(())
    }
}

fn validate_price(price: f64) -> ServiceResult<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ServiceError::Validation(
            "price_per_hour must be greater than 0".to_string(),
        ));
    }
    Ok(())
}
