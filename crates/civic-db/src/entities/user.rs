//! User entity for citizens and administrators

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User role in the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Resident who files complaints
    #[sea_orm(string_value = "citizen")]
    Citizen,

    /// Municipal administrator
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Citizen => "citizen",
            UserRole::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "citizen" => Some(UserRole::Citizen),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// User UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Identity-provider subject id (unique)
    #[sea_orm(unique)]
    pub google_id: String,

    /// User email (unique)
    #[sea_orm(unique)]
    pub email: String,

    pub name: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub ward_number: Option<i32>,

    /// Profile photo URL
    pub photo: Option<String>,

    /// ID-document photo URL
    pub aadhar_photo: Option<String>,

    /// National voter id (EPIC number)
    pub epic_number: Option<String>,

    /// Preferred language code (en, hi, bn)
    pub language: Option<String>,
    pub district: Option<String>,
    pub municipality: Option<String>,

    pub role: UserRole,
    pub is_verified: bool,
    pub is_profile_complete: bool,

    pub created_at: ChronoDateTimeUtc,
}

impl Model {
    /// Whether every field required for a complete profile is present
    pub fn has_required_profile_fields(&self) -> bool {
        filled(&self.language)
            && filled(&self.epic_number)
            && filled(&self.mobile)
            && filled(&self.address)
            && self.ward_number.is_some()
            && filled(&self.photo)
    }
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// User files complaints
    #[sea_orm(has_many = "super::complaint::Entity")]
    Complaints,
}

impl Related<super::complaint::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Complaints.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn citizen() -> Model {
        Model {
            id: Uuid::new_v4(),
            google_id: "g-1".to_string(),
            email: "c@example.com".to_string(),
            name: Some("Amit Das".to_string()),
            mobile: Some("9876543212".to_string()),
            address: Some("78, Netaji Subhas Road, Halisahar".to_string()),
            ward_number: Some(7),
            photo: Some("https://img/p.jpg".to_string()),
            aadhar_photo: None,
            epic_number: Some("WBJ3456789012".to_string()),
            language: Some("bn".to_string()),
            district: None,
            municipality: None,
            role: UserRole::Citizen,
            is_verified: false,
            is_profile_complete: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_complete_profile() {
        assert!(citizen().has_required_profile_fields());
    }

    #[test]
    fn test_each_required_field_matters() {
        let mut u = citizen();
        u.language = None;
        assert!(!u.has_required_profile_fields());

        let mut u = citizen();
        u.epic_number = Some("   ".to_string());
        assert!(!u.has_required_profile_fields());

        let mut u = citizen();
        u.ward_number = None;
        assert!(!u.has_required_profile_fields());

        let mut u = citizen();
        u.photo = Some(String::new());
        assert!(!u.has_required_profile_fields());
    }

    #[test]
    fn test_optional_fields_do_not_matter() {
        let mut u = citizen();
        u.district = None;
        u.aadhar_photo = None;
        u.name = None;
        assert!(u.has_required_profile_fields());
    }

    #[test]
    fn test_role_round_trip_names() {
        assert_eq!(UserRole::parse("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("citizen"), Some(UserRole::Citizen));
        assert_eq!(UserRole::parse("root"), None);
        assert_eq!(UserRole::Admin.as_str(), "admin");
    }
}
