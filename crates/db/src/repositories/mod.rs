//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod product_image_repo;
pub mod product_repo;
pub mod report_repo;

pub use product_image_repo::ProductImageRepo;
pub use product_repo::ProductRepo;
pub use report_repo::ReportRepo;
