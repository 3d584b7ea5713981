pub mod anim;
pub mod config;
pub mod engine;
pub mod error;
pub mod markdown;
pub mod net;
pub mod page;
pub mod scene;
