//! Generic provider
//!
//! A provider whose endpoints, methods and credentials come entirely from
//! configuration.

pub mod config;
pub mod provider;

pub use config::{
    EndpointConfig, GenericConfiguration, GenericConfigurationBuilder, GenericConfigurationData,
    Operation,
};
pub use provider::GenericProvider;
