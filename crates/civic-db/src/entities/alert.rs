//! Alert entity: admin-authored, ward-targeted notices

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ward value addressing every ward
pub const ALL_WARDS: &str = "all";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alerts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub message: String,

    /// Target ward number, or "all"
    pub ward: String,

    /// Event date as entered by the admin
    pub date: String,

    /// Event time as entered by the admin
    pub time: String,

    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
