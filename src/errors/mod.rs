pub mod types;

pub use types::LabsightError;
