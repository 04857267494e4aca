pub mod clients;
pub mod documents;
pub mod progress;
pub mod projects;
pub mod reports;
