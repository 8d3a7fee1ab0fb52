use chrono::{DateTime, Utc};
use civic_db::entities::{alert, complaint, user, voter};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Resident who files complaints
    Citizen,
    /// Municipal administrator
    Admin,
}

impl From<user::UserRole> for UserRole {
    fn from(role: user::UserRole) -> Self {
        match role {
            user::UserRole::Citizen => UserRole::Citizen,
            user::UserRole::Admin => UserRole::Admin,
        }
    }
}

impl From<UserRole> for user::UserRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Citizen => user::UserRole::Citizen,
            UserRole::Admin => user::UserRole::Admin,
        }
    }
}

/// User account as seen by clients (the provider subject id is never exposed)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ward_number: Option<i32>,
    /// Profile photo URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// ID-document photo URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aadhar_photo: Option<String>,
    /// National voter id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epic_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    pub role: UserRole,
    pub is_verified: bool,
    pub is_profile_complete: bool,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for User {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            mobile: u.mobile,
            address: u.address,
            ward_number: u.ward_number,
            photo: u.photo,
            aadhar_photo: u.aadhar_photo,
            epic_number: u.epic_number,
            language: u.language,
            district: u.district,
            municipality: u.municipality,
            role: u.role.into(),
            is_verified: u.is_verified,
            is_profile_complete: u.is_profile_complete,
            created_at: u.created_at,
        }
    }
}

/// Google sign-in request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GoogleAuthRequest {
    /// Google ID token returned by the sign-in widget
    pub credential: String,
}

/// Google sign-in response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GoogleAuthResponse {
    /// Session token for `Authorization: Bearer`
    pub token: String,
    pub user: User,
}

/// Profile update; absent or empty fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub ward_number: Option<i32>,
    pub epic_number: Option<String>,
    pub photo: Option<String>,
    pub aadhar_photo: Option<String>,
    pub language: Option<String>,
    pub district: Option<String>,
    pub municipality: Option<String>,
}

/// Electoral roll entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Voter {
    pub id: Uuid,
    pub epic_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ward_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl From<voter::Model> for Voter {
    fn from(v: voter::Model) -> Self {
        Self {
            id: v.id,
            epic_number: v.epic_number,
            name: v.name,
            father_name: v.father_name,
            email: v.email,
            mobile: v.mobile,
            address: v.address,
            ward_number: v.ward_number,
            district: v.district,
            municipality: v.municipality,
            photo: v.photo,
        }
    }
}

/// Complaint status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ComplaintStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "solved")]
    Solved,
}

impl From<complaint::ComplaintStatus> for ComplaintStatus {
    fn from(status: complaint::ComplaintStatus) -> Self {
        match status {
            complaint::ComplaintStatus::Pending => ComplaintStatus::Pending,
            complaint::ComplaintStatus::InProgress => ComplaintStatus::InProgress,
            complaint::ComplaintStatus::Solved => ComplaintStatus::Solved,
        }
    }
}

impl From<ComplaintStatus> for complaint::ComplaintStatus {
    fn from(status: ComplaintStatus) -> Self {
        match status {
            ComplaintStatus::Pending => complaint::ComplaintStatus::Pending,
            ComplaintStatus::InProgress => complaint::ComplaintStatus::InProgress,
            ComplaintStatus::Solved => complaint::ComplaintStatus::Solved,
        }
    }
}

/// Complaint category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ComplaintCategory {
    Roads,
    Streetlights,
    Garbage,
    Water,
    Drainage,
    PublicToilet,
    Mosquito,
    Trees,
    Encroachment,
    Other,
}

impl From<complaint::ComplaintCategory> for ComplaintCategory {
    fn from(category: complaint::ComplaintCategory) -> Self {
        use complaint::ComplaintCategory as C;
        match category {
            C::Roads => ComplaintCategory::Roads,
            C::Streetlights => ComplaintCategory::Streetlights,
            C::Garbage => ComplaintCategory::Garbage,
            C::Water => ComplaintCategory::Water,
            C::Drainage => ComplaintCategory::Drainage,
            C::PublicToilet => ComplaintCategory::PublicToilet,
            C::Mosquito => ComplaintCategory::Mosquito,
            C::Trees => ComplaintCategory::Trees,
            C::Encroachment => ComplaintCategory::Encroachment,
            C::Other => ComplaintCategory::Other,
        }
    }
}

impl From<ComplaintCategory> for complaint::ComplaintCategory {
    fn from(category: ComplaintCategory) -> Self {
        use complaint::ComplaintCategory as C;
        match category {
            ComplaintCategory::Roads => C::Roads,
            ComplaintCategory::Streetlights => C::Streetlights,
            ComplaintCategory::Garbage => C::Garbage,
            ComplaintCategory::Water => C::Water,
            ComplaintCategory::Drainage => C::Drainage,
            ComplaintCategory::PublicToilet => C::PublicToilet,
            ComplaintCategory::Mosquito => C::Mosquito,
            ComplaintCategory::Trees => C::Trees,
            ComplaintCategory::Encroachment => C::Encroachment,
            ComplaintCategory::Other => C::Other,
        }
    }
}

/// Complaint record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: Uuid,
    /// Citizen who filed the complaint
    pub user_id: Uuid,
    pub category: ComplaintCategory,
    pub description: String,
    /// First image, for list views
    pub image_url: String,
    pub image_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_note_url: Option<String>,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub ward_number: i32,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub solution_image_url: Option<String>,
    pub resolution_note: Option<String>,
}

impl From<complaint::Model> for Complaint {
    fn from(c: complaint::Model) -> Self {
        let image_urls = c.images();
        Self {
            id: c.id,
            user_id: c.user_id,
            category: c.category.into(),
            description: c.description,
            image_url: image_urls.first().cloned().unwrap_or_default(),
            image_urls,
            voice_note_url: c.voice_note_url,
            address: c.address,
            latitude: c.latitude,
            longitude: c.longitude,
            ward_number: c.ward_number,
            status: c.status.into(),
            created_at: c.created_at,
            resolved_at: c.resolved_at,
            solution_image_url: c.solution_image_url,
            resolution_note: c.resolution_note,
        }
    }
}

/// Request to file a complaint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateComplaintRequest {
    pub category: ComplaintCategory,
    pub description: String,
    /// Single image URL (merged ahead of `imageUrls`)
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub voice_note_url: Option<String>,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub ward_number: i32,
}

/// Admin status change
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComplaintRequest {
    pub status: ComplaintStatus,
    /// Required when status is "solved"
    #[serde(default)]
    pub solution_image_url: Option<String>,
    /// Required when status is "solved"
    #[serde(default)]
    pub resolution_note: Option<String>,
}

/// Optional filters for the admin complaint list
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ComplaintQuery {
    /// Exact ward number
    pub ward: Option<i32>,
    pub category: Option<ComplaintCategory>,
    pub status: Option<ComplaintStatus>,
    /// Address substring
    pub address: Option<String>,
}

/// Ward alert
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    /// Ward number, or "all"
    pub ward: String,
    pub date: String,
    pub time: String,
    pub created_at: DateTime<Utc>,
}

impl From<alert::Model> for Alert {
    fn from(a: alert::Model) -> Self {
        Self {
            id: a.id,
            title: a.title,
            message: a.message,
            ward: a.ward,
            date: a.date,
            time: a.time,
            created_at: a.created_at,
        }
    }
}

/// Request to broadcast an alert
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateAlertRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    /// Ward number or "all" (default)
    pub ward: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

/// Response after broadcasting an alert
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendAlertResponse {
    pub message: String,
    pub alert: Alert,
}

/// Response after seeding the voter registry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SeedVotersResponse {
    pub message: String,
    pub count: usize,
}

/// Response after clearing the voter registry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearVotersResponse {
    pub message: String,
    pub deleted_count: u64,
}

/// Uploaded media location
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Public URL of the stored file
    pub url: String,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message
    pub message: String,
    /// Stable error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Upstream detail, when a dependency failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, code: &str) -> Self {
        Self {
            message: message.into(),
            code: Some(code.to_string()),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Handler error: status plus JSON body
pub type ApiError = (axum::http::StatusCode, axum::Json<ErrorResponse>);

/// Handler result
pub type ApiResult<T> = Result<T, ApiError>;
