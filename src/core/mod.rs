/// Pure totals, monthly series and category breakdowns over a transaction list
pub mod aggregation;

/// Voice and receipt capture providers
pub mod capture;

/// Per-user category lists and seeding
pub mod category;

/// Transaction filter criteria, evaluated locally or as a SQL condition
pub mod filter;

/// Business profile lookup and creation
pub mod profile;

/// Dashboard and analytics reports plus currency formatting
pub mod report;

/// Session-scoped transaction state manager
pub mod state;

/// Record store interface and its backends
pub mod store;

/// Transaction CRUD against the database
pub mod transaction;
