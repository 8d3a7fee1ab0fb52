//! Database entities

pub mod alert;
pub mod complaint;
pub mod user;
pub mod voter;

pub use alert::Entity as Alert;
pub use complaint::Entity as Complaint;
pub use user::Entity as User;
pub use voter::Entity as Voter;

pub mod prelude {
    pub use super::alert::Entity as Alert;
    pub use super::complaint::Entity as Complaint;
    pub use super::user::Entity as User;
    pub use super::voter::Entity as Voter;
}
