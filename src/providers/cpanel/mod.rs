//! cPanel manage2 provider

pub mod config;
pub mod provider;

pub use config::CpanelConfiguration;
pub use provider::CpanelProvider;
