//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod business_profile;
pub mod category;
pub mod transaction;

pub use business_profile::{
    Column as BusinessProfileColumn, Entity as BusinessProfile, Model as BusinessProfileModel,
};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
