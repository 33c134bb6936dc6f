pub mod links;
pub mod required;
pub mod submission;
pub mod upload;
