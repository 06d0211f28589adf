//! Response shapes for the hub API.
//!
//! - [`page`] - paginated listings
//! - [`file`] - file-style backup downloads

pub mod file;
pub mod page;

pub use file::file_response;
pub use page::page_response;
