pub mod report;
pub mod upload;

pub use report::*;
pub use upload::UploadedFile;
