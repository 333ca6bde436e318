//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource. Handlers
//! delegate to `datalab_core` and the repositories in `datalab_db`, and map
//! errors via [`AppError`](crate::error::AppError).

pub mod export;
pub mod images;
pub mod products;
pub mod reports;
pub mod upload;
