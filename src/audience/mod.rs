//! Audience resource: typed operations built from item parameters and the
//! JSON:API payloads the Marketing Solutions endpoints expect.

pub mod params;
pub mod operation;
pub mod payload;

pub use operation::AudienceOperation;
