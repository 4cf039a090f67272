//! Custom extractors for Axum handlers.
//!
//! Reusable extractors that reduce boilerplate and route every rejection
//! through [`AppError`](crate::AppError).

pub mod id_path;
pub mod validated_json;

pub use id_path::IdPath;
pub use validated_json::ValidatedJson;
