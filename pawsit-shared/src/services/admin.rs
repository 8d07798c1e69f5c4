/// Admin moderation
///
/// Every operation requires the admin role. Sitter approval and rejection
/// are only allowed while the sitter is still pending.

use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::authorization::require_role;
use crate::auth::middleware::AuthContext;
use crate::error::{ServiceError, ServiceResult};
use crate::models::sitter::{Sitter, SitterDetails, SitterProfile, SitterStatus};
use crate::models::user::{Role, User};
use crate::repository::{SitterRepository, UserRepository};

#[derive(Clone)]
pub struct AdminService {
    users: Arc<dyn UserRepository>,
    sitters: Arc<dyn SitterRepository>,
}

impl AdminService {
    pub fn new(users: Arc<dyn UserRepository>, sitters: Arc<dyn SitterRepository>) -> Self {
        Self { users, sitters }
    }

    pub async fn pending_sitters(&self, ctx: &AuthContext) -> ServiceResult<Vec<SitterProfile>> {
        require_role(ctx, &[Role::Admin])?;
        Ok(self.sitters.list_by_status(SitterStatus::Pending).await?)
    }

    pub async fn sitter_details(&self, ctx: &AuthContext, id: i64) -> ServiceResult<SitterDetails> {
        require_role(ctx, &[Role::Admin])?;
        self.sitters
            .find_details(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("sitter"))
    }

    pub async fn approve_sitter(&self, ctx: &AuthContext, id: i64) -> ServiceResult<Sitter> {
        self.decide(ctx, id, SitterStatus::Approved).await
    }

    pub async fn reject_sitter(&self, ctx: &AuthContext, id: i64) -> ServiceResult<Sitter> {
        self.decide(ctx, id, SitterStatus::Rejected).await
    }

    pub async fn list_users(&self, ctx: &AuthContext) -> ServiceResult<Vec<User>> {
        require_role(ctx, &[Role::Admin])?;
        Ok(self.users.list().await?)
    }

    pub async fn get_user(&self, ctx: &AuthContext, id: i64) -> ServiceResult<User> {
        require_role(ctx, &[Role::Admin])?;
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user"))
    }

    /// Deletes a user together with their pets, offerings, bookings and reviews
    pub async fn delete_user(&self, ctx: &AuthContext, id: i64) -> ServiceResult<()> {
        require_role(ctx, &[Role::Admin])?;
        if id == ctx.user_id {
            return Err(ServiceError::Validation(
                "admins cannot delete their own account".to_string(),
            ));
        }

        if !self.users.delete(id).await? {
            return Err(ServiceError::not_found("user"));
        }

        info!(user_id = id, admin_id = ctx.user_id, "User deleted");
        Ok(())
    }

    async fn decide(
        &self,
        ctx: &AuthContext,
        id: i64,
        status: SitterStatus,
    ) -> ServiceResult<Sitter> {
        require_role(ctx, &[Role::Admin])?;

        if let Some(sitter) = self
            .sitters
            .update_status(id, status, &[SitterStatus::Pending])
            .await?
        {
            info!(sitter_id = id, status = %status, admin_id = ctx.user_id, "Sitter reviewed");
            return Ok(sitter);
        }

        let current = self
            .sitters
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("sitter"))?;

        warn!(sitter_id = id, current = %current.status, "Sitter already reviewed");
        Err(ServiceError::Conflict(format!(
            "sitter is already {}",
            current.status
        )))
    }
}
