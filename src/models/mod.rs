// Models module - Record representations

pub mod revision;

pub use revision::{NewRevision, Revision};
