//! Voter entity: read-only electoral roll used to pre-fill onboarding

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "voters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// National voter id (EPIC number, unique)
    #[sea_orm(unique)]
    pub epic_number: String,

    pub name: Option<String>,
    pub father_name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub ward_number: Option<i32>,
    pub district: Option<String>,
    pub municipality: Option<String>,

    /// Photo URL, if the roll carries one
    pub photo: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
