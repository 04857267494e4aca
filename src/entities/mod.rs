pub mod client;
pub mod document;
pub mod project;
