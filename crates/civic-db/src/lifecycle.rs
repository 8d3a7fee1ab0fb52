//! Complaint lifecycle: submission and status transitions
//!
//! `pending` is the initial state. Admins may move a complaint to
//! `in-progress` or straight to `solved`, and may reopen a solved one.
//! `resolved_at` is non-null exactly while the status is `solved`.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::Set, IntoActiveModel};
use thiserror::Error;
use uuid::Uuid;

use crate::entities::complaint::{self, ComplaintCategory, ComplaintStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("{0}")]
    Invalid(String),

    #[error("A solution image is required to mark a complaint as solved")]
    MissingSolutionImage,

    #[error("A resolution note is required to mark a complaint as solved")]
    MissingResolutionNote,
}

/// A complaint as submitted by a citizen
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub category: ComplaintCategory,
    pub description: String,
    pub image_urls: Vec<String>,
    pub voice_note_url: Option<String>,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub ward_number: i32,
}

impl NewComplaint {
    pub fn validate(&self) -> Result<(), LifecycleError> {
        if self.description.trim().is_empty() {
            return Err(LifecycleError::Invalid("description is required".to_string()));
        }
        if !self.image_urls.iter().any(|u| !u.trim().is_empty()) {
            return Err(LifecycleError::Invalid(
                "at least one image URL is required".to_string(),
            ));
        }
        if self.address.trim().is_empty() {
            return Err(LifecycleError::Invalid("address is required".to_string()));
        }
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude)
        {
            return Err(LifecycleError::Invalid(
                "latitude/longitude out of range".to_string(),
            ));
        }
        if self.ward_number < 1 {
            return Err(LifecycleError::Invalid(
                "wardNumber must be a positive ward".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate and stamp owner, id and the initial `pending` status
    pub fn into_active_model(
        self,
        owner: Uuid,
        now: DateTime<Utc>,
    ) -> Result<complaint::ActiveModel, LifecycleError> {
        self.validate()?;

        let images: Vec<String> = self
            .image_urls
            .into_iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();

        Ok(complaint::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(owner),
            category: Set(self.category),
            description: Set(self.description.trim().to_string()),
            image_urls: Set(complaint::encode_images(&images)),
            voice_note_url: Set(self.voice_note_url.filter(|u| !u.trim().is_empty())),
            address: Set(self.address.trim().to_string()),
            latitude: Set(self.latitude),
            longitude: Set(self.longitude),
            ward_number: Set(self.ward_number),
            status: Set(ComplaintStatus::Pending),
            created_at: Set(now),
            resolved_at: Set(None),
            solution_image_url: Set(None),
            resolution_note: Set(None),
        })
    }
}

/// Admin-requested status change
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub status: ComplaintStatus,
    pub solution_image_url: Option<String>,
    pub resolution_note: Option<String>,
}

impl StatusUpdate {
    /// Apply the transition to `complaint`
    ///
    /// Moving to `solved` requires a solution image and a resolution note and
    /// stamps `resolved_at`. Any other status clears the resolution fields.
    pub fn apply(
        self,
        complaint: complaint::Model,
        now: DateTime<Utc>,
    ) -> Result<complaint::ActiveModel, LifecycleError> {
        let mut active = complaint.into_active_model();
        active.status = Set(self.status);

        if self.status == ComplaintStatus::Solved {
            let image = non_blank(self.solution_image_url)
                .ok_or(LifecycleError::MissingSolutionImage)?;
            let note =
                non_blank(self.resolution_note).ok_or(LifecycleError::MissingResolutionNote)?;

            active.solution_image_url = Set(Some(image));
            active.resolution_note = Set(Some(note));
            active.resolved_at = Set(Some(now));
        } else {
            active.solution_image_url = Set(None);
            active.resolution_note = Set(None);
            active.resolved_at = Set(None);
        }

        Ok(active)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
