//! Complaint entity: a citizen-filed civic issue and its resolution

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Resolution progress of a complaint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ComplaintStatus {
    #[sea_orm(string_value = "pending")]
    #[serde(rename = "pending")]
    Pending,

    #[sea_orm(string_value = "in-progress")]
    #[serde(rename = "in-progress")]
    InProgress,

    #[sea_orm(string_value = "solved")]
    #[serde(rename = "solved")]
    Solved,
}

/// Issue category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "camelCase")]
pub enum ComplaintCategory {
    /// Roads & footpath
    #[sea_orm(string_value = "roads")]
    Roads,
    #[sea_orm(string_value = "streetlights")]
    Streetlights,
    /// Garbage & waste
    #[sea_orm(string_value = "garbage")]
    Garbage,
    /// Water supply
    #[sea_orm(string_value = "water")]
    Water,
    /// Drainage & sewer
    #[sea_orm(string_value = "drainage")]
    Drainage,
    #[sea_orm(string_value = "publicToilet")]
    PublicToilet,
    #[sea_orm(string_value = "mosquito")]
    Mosquito,
    /// Trees & parks
    #[sea_orm(string_value = "trees")]
    Trees,
    #[sea_orm(string_value = "encroachment")]
    Encroachment,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "complaints")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Citizen who filed the complaint
    pub user_id: Uuid,

    pub category: ComplaintCategory,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// JSON array of image URLs (at least one)
    #[sea_orm(column_type = "Text")]
    pub image_urls: String,

    pub voice_note_url: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub address: String,

    #[sea_orm(column_type = "Double")]
    pub latitude: f64,

    #[sea_orm(column_type = "Double")]
    pub longitude: f64,

    pub ward_number: i32,

    pub status: ComplaintStatus,

    pub created_at: ChronoDateTimeUtc,

    /// Set exactly while status is solved
    pub resolved_at: Option<ChronoDateTimeUtc>,

    pub solution_image_url: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub resolution_note: Option<String>,
}

impl Model {
    /// Decoded image URL list
    pub fn images(&self) -> Vec<String> {
        serde_json::from_str(&self.image_urls).unwrap_or_default()
    }
}

/// Encode image URLs for the `image_urls` column
pub fn encode_images(urls: &[String]) -> String {
    serde_json::to_string(urls).unwrap_or_else(|_| "[]".to_string())
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Complaint belongs to the citizen who filed it
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
