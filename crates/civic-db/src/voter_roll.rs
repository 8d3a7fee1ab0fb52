//! Halisahar electoral roll fixture and seeding helpers

use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, SqlErr, TransactionTrait,
};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::entities::voter;

/// One row of the fixture roll
#[derive(Debug, Clone, Copy)]
pub struct VoterRecord {
    pub epic_number: &'static str,
    pub name: &'static str,
    pub father_name: &'static str,
    pub mobile: &'static str,
    pub address: &'static str,
    pub ward_number: i32,
}

const DISTRICT: &str = "North 24 Parganas";
const MUNICIPALITY: &str = "Halisahar";

pub const VOTER_ROLL: [VoterRecord; 15] = [
    VoterRecord {
        epic_number: "WBJ1234567890",
        name: "Rajesh Kumar Singh",
        father_name: "Ramesh Singh",
        mobile: "9876543210",
        address: "Plot 45, Rabindranath Tagore Road, Halisahar",
        ward_number: 5,
    },
    VoterRecord {
        epic_number: "WBJ2345678901",
        name: "Priya Sharma",
        father_name: "Vijay Sharma",
        mobile: "9876543211",
        address: "12/A, Gandhi Street, Halisahar",
        ward_number: 3,
    },
    VoterRecord {
        epic_number: "WBJ3456789012",
        name: "Amit Das",
        father_name: "Subhas Das",
        mobile: "9876543212",
        address: "78, Netaji Subhas Road, Halisahar",
        ward_number: 7,
    },
    VoterRecord {
        epic_number: "WBJ4567890101",
        name: "Shubham Chowdhury",
        father_name: "Siv Narayan Chowdhury",
        mobile: "9876543213",
        address: "34, B.T. Road, Halisahar",
        ward_number: 12,
    },
    VoterRecord {
        epic_number: "WBJ5678901234",
        name: "Sanjay Ghosh",
        father_name: "Ramesh Ghosh",
        mobile: "9876543214",
        address: "56, Station Road, Halisahar",
        ward_number: 8,
    },
    VoterRecord {
        epic_number: "WBJ6789012345",
        name: "Meera Banerjee",
        father_name: "Dipak Banerjee",
        mobile: "9876543215",
        address: "23, Vivekananda Road, Halisahar",
        ward_number: 15,
    },
    VoterRecord {
        epic_number: "WBJ7890123456",
        name: "Rahul Chatterjee",
        father_name: "Partha Chatterjee",
        mobile: "9876543216",
        address: "89, Market Road, Halisahar",
        ward_number: 10,
    },
    VoterRecord {
        epic_number: "WBJ8901234567",
        name: "Sunita Roy",
        father_name: "Ashok Roy",
        mobile: "9876543217",
        address: "67, College Street, Halisahar",
        ward_number: 6,
    },
    VoterRecord {
        epic_number: "WBJ9012345678",
        name: "Vikram Dey",
        father_name: "Sunil Dey",
        mobile: "9876543218",
        address: "101, Park Street, Halisahar",
        ward_number: 9,
    },
    VoterRecord {
        epic_number: "WBJ0123456789",
        name: "Kavita Sengupta",
        father_name: "Bijoy Sengupta",
        mobile: "9876543219",
        address: "45, Lake Road, Halisahar",
        ward_number: 14,
    },
    VoterRecord {
        epic_number: "WBJ1357924680",
        name: "Debasis Kar",
        father_name: "Ajit Kar",
        mobile: "9876543220",
        address: "22, Hospital Road, Halisahar",
        ward_number: 4,
    },
    VoterRecord {
        epic_number: "WBJ2468013579",
        name: "Rina Bhattacharya",
        father_name: "Kalyan Bhattacharya",
        mobile: "9876543221",
        address: "88, Temple Road, Halisahar",
        ward_number: 11,
    },
    VoterRecord {
        epic_number: "WBJ3691478520",
        name: "Somnath Mondal",
        father_name: "Nirmal Mondal",
        mobile: "9876543222",
        address: "55, River Bank Road, Halisahar",
        ward_number: 1,
    },
    VoterRecord {
        epic_number: "WBJ4826159370",
        name: "Dipti Majumdar",
        father_name: "Tapan Majumdar",
        mobile: "9876543223",
        address: "33, School Street, Halisahar",
        ward_number: 13,
    },
    VoterRecord {
        epic_number: "WBJ5937284610",
        name: "Ranjan Pal",
        father_name: "Gopal Pal",
        mobile: "9876543224",
        address: "99, New Market, Halisahar",
        ward_number: 2,
    },
];

impl VoterRecord {
    pub fn to_active_model(&self) -> voter::ActiveModel {
        voter::ActiveModel {
            id: Set(Uuid::new_v4()),
            epic_number: Set(self.epic_number.to_string()),
            name: Set(Some(self.name.to_string())),
            father_name: Set(Some(self.father_name.to_string())),
            email: Set(None),
            mobile: Set(Some(self.mobile.to_string())),
            address: Set(Some(self.address.to_string())),
            ward_number: Set(Some(self.ward_number)),
            district: Set(Some(DISTRICT.to_string())),
            municipality: Set(Some(MUNICIPALITY.to_string())),
            photo: Set(None),
        }
    }
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database already has {0} voter records. Clear them first if you want to re-seed.")]
    AlreadySeeded(u64),

    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Insert the fixture roll if the registry is empty
///
/// Returns the number of inserted records. A seed that loses a race with
/// another one hits the unique EPIC index and reports `AlreadySeeded`.
pub async fn seed(db: &DatabaseConnection) -> Result<usize, SeedError> {
    let txn = db.begin().await?;

    let existing = voter::Entity::find().count(&txn).await?;
    if existing > 0 {
        return Err(SeedError::AlreadySeeded(existing));
    }

    let rows = VOTER_ROLL.iter().map(VoterRecord::to_active_model);
    let inserted = voter::Entity::insert_many(rows).exec(&txn).await;
    if let Err(e) = inserted {
        txn.rollback().await?;
        if is_duplicate_epic(&e) {
            let existing = voter::Entity::find().count(db).await?;
            return Err(SeedError::AlreadySeeded(existing));
        }
        return Err(e.into());
    }
    txn.commit().await?;

    info!("Seeded {} voter records", VOTER_ROLL.len());
    Ok(VOTER_ROLL.len())
}

/// Whether `err` is the unique EPIC index rejecting an insert
pub fn is_duplicate_epic(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Delete every voter record, returning how many were removed
pub async fn clear(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let result = voter::Entity::delete_many().exec(db).await?;
    info!("Cleared {} voter records", result.rows_affected);
    Ok(result.rows_affected)
}

pub async fn find_by_epic(
    db: &DatabaseConnection,
    epic_number: &str,
) -> Result<Option<voter::Model>, DbErr> {
    voter::Entity::find()
        .filter(voter::Column::EpicNumber.eq(epic_number))
        .one(db)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_roll_epic_numbers_unique() {
        let epics: HashSet<_> = VOTER_ROLL.iter().map(|v| v.epic_number).collect();
        assert_eq!(epics.len(), VOTER_ROLL.len());
    }

    #[test]
    fn test_fixture_row_mapping() {
        let model = VOTER_ROLL[0].to_active_model();
        assert_eq!(model.epic_number, Set("WBJ1234567890".to_string()));
        assert_eq!(model.name, Set(Some("Rajesh Kumar Singh".to_string())));
        assert_eq!(model.municipality, Set(Some("Halisahar".to_string())));
    }
}
