//! Registration (one waiting party) entities.

pub mod contact;
pub mod model;

pub use contact::Contact;
pub use model::{NewRegistration, Registration};
