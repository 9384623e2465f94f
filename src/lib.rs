//! End-to-end test harness for the TDEI management API.
//!
//! Provides a typed REST client for the organization, project group,
//! GTFS-Flex, GTFS-Pathways and user management endpoints, a fake-object
//! generator for valid payloads, and a seed manager that provisions (or
//! reloads from cache) the fixture graph the live suites run against.
//!
//! # Modules
//!
//! - [`auth`] — Login handshake, refresh tokens, cached token provider.
//! - [`client`] — Authenticated/anonymous HTTP wrapper with 401 retry.
//! - [`config`] — `test-harness.json` settings file.
//! - [`error`] — `HarnessError` for API calls, `SeedError` for seeding.
//! - [`faker`] — Random, server-valid payloads.
//! - [`geo`] — GeoJSON polygons and bounding boxes.
//! - [`gtfs_flex`] — Service endpoints.
//! - [`gtfs_pathways`] — Station endpoints.
//! - [`organization`] — Organization endpoints.
//! - [`project_group`] — Project group endpoints.
//! - [`seed`] — Fixture bundle, cache stores, single-flight seed manager.
//! - [`user_management`] — Registration and role assignment.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use tdei_harness::config::HarnessConfig;
//! use tdei_harness::seed::{FileSeedStore, SeedManager};
//!
//! let config = HarnessConfig::discover()?;
//! let manager = SeedManager::new(config, Arc::new(FileSeedStore::default()));
//! let seed = manager.generate(false).await?;
//! println!("seeded organization {}", seed.org_id());
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod faker;
pub mod geo;
pub mod gtfs_flex;
pub mod gtfs_pathways;
pub mod organization;
pub mod project_group;
pub mod seed;
pub mod user_management;
