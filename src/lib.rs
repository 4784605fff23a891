// Tracemark: traceable photo publishing bot

pub mod access;
pub mod bot;
pub mod callback;
pub mod config;
pub mod constants;
pub mod error;
pub mod fetch;
pub mod identity;
pub mod imaging;
pub mod logging;
pub mod publish;
pub mod registry;
pub mod revoke;
pub mod transport;
pub mod watermark;
