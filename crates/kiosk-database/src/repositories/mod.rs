//! PostgreSQL-backed store implementations.

pub mod registration;

pub use registration::PgRegistrationStore;
