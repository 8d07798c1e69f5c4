/// Public sitter profiles
use std::sync::Arc;

use crate::error::{ServiceError, ServiceResult};
use crate::models::sitter::{SitterDetails, SitterStatus};
use crate::repository::SitterRepository;

#[derive(Clone)]
pub struct SitterService {
    sitters: Arc<dyn SitterRepository>,
}

impl SitterService {
    pub fn new(sitters: Arc<dyn SitterRepository>) -> Self {
        Self { sitters }
    }

    /// Profile with rating of an approved sitter
    ///
    /// Pending and rejected sitters are reported as not found.
    pub async fn public_profile(&self, id: i64) -> ServiceResult<SitterDetails> {
        match self.sitters.find_details(id).await? {
            Some(details) if details.profile.status == SitterStatus::Approved => Ok(details),
            _ => Err(ServiceError::not_found("sitter")),
        }
    }
}
