//! Data models for the GuildLink backend.
//!
//! All models use camelCase serialization to match the frontend contract.

mod guild;
mod link_config;
mod settings;
mod user;

pub use guild::*;
pub use link_config::*;
pub use settings::*;
pub use user::*;
