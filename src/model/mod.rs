//! Domain entities.
//!
//! Entities are rebuilt from each list query and compare by identity
//! (name, plus namespace where one applies). Child collections are cached in
//! a [`Cache`] and only replaced by an explicit refresh; mutations that can
//! change membership mark the owning cache stale.

mod application;
mod cache;
mod cluster_config;
mod namespace;
mod record;
mod service;

pub use application::Application;
pub use cache::{Cache, CacheState};
pub use cluster_config::ClusterConfig;
pub use namespace::Namespace;
pub use record::{AppRecord, NamespaceRecord, ServiceRecord};
pub use service::Service;
