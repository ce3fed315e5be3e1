//! Core logic for the Doctrack document-tracking client: QR tracking-code
//! decoding, supplier leaderboards and the signed-in user profile.

pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod profile;
pub mod ranking;
pub mod report;
pub mod scanner;
pub mod tracking;

pub use error::{AuthError, DoctrackError, Result, ValidationError};
pub use models::{DecodedTrackingCode, RankedSupplier, SupplierRecord, UserProfile};
