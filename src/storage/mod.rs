mod json_file;
pub mod notified;
pub mod subscribers;

pub use json_file::StoreError;
