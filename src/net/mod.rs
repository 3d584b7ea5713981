pub mod content;
pub mod fetch;
pub mod image;
