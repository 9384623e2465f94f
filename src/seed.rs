//! Seed-data lifecycle: provisions the fixture bundle the suites depend on.
//!
//! A [`SeedManager`] produces one [`SeedDetails`] per process:
//!
//! 1. Unless a fresh seed is requested, ask the [`SeedStore`] for a cached
//!    bundle. A hit is returned without any remote call.
//! 2. Otherwise provision, strictly in order: admin login → organization →
//!    (optional) project group → service → station → producer user →
//!    (optional) POC user → role assignments. Each step feeds the id from the
//!    previous one, and any failure aborts the run with a tagged
//!    [`SeedError`] before anything is persisted.
//! 3. Save the bundle through the store.
//!
//! The outcome, success or failure, is memoized in a `tokio::sync::OnceCell`,
//! so concurrent callers that arrive before provisioning finishes await the
//! same run instead of creating duplicate organizations and users.
//!
//! Missing and empty caches mean "provision". Corrupt caches (bad JSON, a
//! different `schema_version`, a missing server-assigned id) are logged and
//! treated the same way.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::client::TdeiClient;
use crate::config::HarnessConfig;
use crate::error::{HarnessError, SeedError};
use crate::faker;
use crate::gtfs_flex::{Service, ServiceUpdate, create_service};
use crate::gtfs_pathways::{Station, StationUpdate, create_station};
use crate::organization::{Organization, create_organization};
use crate::project_group::{ProjectGroup, create_project_group};
use crate::user_management::{RoleDetails, TdeiRole, User, permission, register_user};

/// Version stamped into every cache file. Bump when `SeedDetails` changes
/// shape; older caches are then regenerated instead of misread.
pub const SEED_SCHEMA_VERSION: u32 = 1;

/// Cache file written next to the test binary's working directory.
pub const DEFAULT_CACHE_PATH: &str = "seed.data.json";

/// The fixture bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedDetails {
    pub schema_version: u32,
    pub organization: Organization,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_group: Option<ProjectGroup>,
    /// User holding the data generator roles in the organization.
    pub producer_user: User,
    /// User holding the POC role in the organization, when seeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poc_user: Option<User>,
    pub service: Service,
    pub station: Station,
}

impl SeedDetails {
    /// Id of the seeded organization (the scope id for services, stations
    /// and role assignments).
    pub fn org_id(&self) -> &str {
        self.organization.tdei_org_id.as_deref().unwrap_or_default()
    }

    /// Update payload for the seeded service.
    pub fn update_service(&self) -> ServiceUpdate {
        ServiceUpdate {
            tdei_service_id: self.service.tdei_service_id.clone().unwrap_or_default(),
            service_name: self.service.service_name.clone(),
            polygon: self.service.polygon.clone(),
        }
    }

    /// Update payload for the seeded station.
    pub fn update_station(&self) -> StationUpdate {
        StationUpdate {
            tdei_station_id: self.station.tdei_station_id.clone().unwrap_or_default(),
            station_name: self.station.station_name.clone(),
            polygon: self.station.polygon.clone(),
        }
    }

    pub fn update_organization(&self) -> Organization {
        self.organization.clone()
    }

    pub fn update_project_group(&self) -> Option<ProjectGroup> {
        self.project_group.clone()
    }

    /// Name of the first server-assigned field that is absent or empty, if
    /// any. A bundle with a gap cannot be served to the suites.
    pub fn missing_field(&self) -> Option<&'static str> {
        fn blank(value: Option<&str>) -> bool {
            value.is_none_or(str::is_empty)
        }
        if blank(self.organization.tdei_org_id.as_deref()) {
            return Some("organization.tdei_org_id");
        }
        if blank(self.service.tdei_service_id.as_deref()) {
            return Some("service.tdei_service_id");
        }
        if blank(self.station.tdei_station_id.as_deref()) {
            return Some("station.tdei_station_id");
        }
        if self.producer_user.id.is_empty() {
            return Some("producer_user.id");
        }
        if self.producer_user.email.is_empty() {
            return Some("producer_user.email");
        }
        if let Some(pg) = &self.project_group {
            if blank(pg.tdei_project_group_id.as_deref()) {
                return Some("project_group.tdei_project_group_id");
            }
        }
        if let Some(poc) = &self.poc_user {
            if poc.id.is_empty() || poc.email.is_empty() {
                return Some("poc_user");
            }
        }
        None
    }
}

/// Where the fixture bundle is cached between runs.
#[async_trait]
pub trait SeedStore: Send + Sync {
    /// `Ok(None)` when nothing usable is cached yet.
    async fn load(&self) -> Result<Option<SeedDetails>, SeedError>;

    async fn save(&self, details: &SeedDetails) -> Result<(), SeedError>;
}

/// JSON file cache (`seed.data.json` by default).
#[derive(Debug, Clone)]
pub struct FileSeedStore {
    path: PathBuf,
}

impl FileSeedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSeedStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corrupt(&self, reason: impl Into<String>) -> SeedError {
        SeedError::CacheCorrupt {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn io(&self, err: std::io::Error) -> SeedError {
        SeedError::CacheIo {
            path: self.path.clone(),
            source: Arc::new(err),
        }
    }

    fn decode(&self, content: &str) -> Result<SeedDetails, SeedError> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| self.corrupt(e.to_string()))?;
        let version = value.get("schema_version").and_then(serde_json::Value::as_u64);
        if version != Some(u64::from(SEED_SCHEMA_VERSION)) {
            return Err(self.corrupt(format!(
                "schema version {version:?}, expected {SEED_SCHEMA_VERSION}"
            )));
        }
        let details: SeedDetails =
            serde_json::from_value(value).map_err(|e| self.corrupt(e.to_string()))?;
        if let Some(field) = details.missing_field() {
            return Err(self.corrupt(format!("{field} is missing or empty")));
        }
        Ok(details)
    }
}

impl Default for FileSeedStore {
    fn default() -> Self {
        FileSeedStore::new(DEFAULT_CACHE_PATH)
    }
}

#[async_trait]
impl SeedStore for FileSeedStore {
    async fn load(&self) -> Result<Option<SeedDetails>, SeedError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io(e)),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        self.decode(&content).map(Some)
    }

    /// Writes to a sibling temp file and renames it over the cache, so a
    /// crash mid-write never leaves a truncated cache behind.
    async fn save(&self, details: &SeedDetails) -> Result<(), SeedError> {
        let json = serde_json::to_string_pretty(details).map_err(|e| self.corrupt(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(|e| self.io(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io(e))
    }
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemorySeedStore {
    details: Mutex<Option<SeedDetails>>,
    saves: AtomicUsize,
}

impl MemorySeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `details`, as if a previous run cached them.
    pub fn with_details(details: SeedDetails) -> Self {
        MemorySeedStore {
            details: Mutex::new(Some(details)),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn snapshot(&self) -> Option<SeedDetails> {
        self.details.lock().map(|d| d.clone()).unwrap_or_default()
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SeedStore for MemorySeedStore {
    async fn load(&self) -> Result<Option<SeedDetails>, SeedError> {
        Ok(self.snapshot())
    }

    async fn save(&self, details: &SeedDetails) -> Result<(), SeedError> {
        if let Ok(mut slot) = self.details.lock() {
            *slot = Some(details.clone());
            self.saves.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// Which optional entities a provisioning run creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOptions {
    /// Register a second user and grant it the POC role.
    pub with_poc_user: bool,
    /// Create a project group alongside the organization.
    pub with_project_group: bool,
}

impl Default for SeedOptions {
    fn default() -> Self {
        SeedOptions {
            with_poc_user: true,
            with_project_group: false,
        }
    }
}

/// Provides the fixture bundle, provisioning it at most once per instance.
///
/// Construct one per test process and share it (e.g. through a `OnceLock`).
pub struct SeedManager {
    config: HarnessConfig,
    store: Arc<dyn SeedStore>,
    options: SeedOptions,
    outcome: OnceCell<Result<Arc<SeedDetails>, SeedError>>,
}

impl SeedManager {
    pub fn new(config: HarnessConfig, store: Arc<dyn SeedStore>) -> Self {
        SeedManager {
            config,
            store,
            options: SeedOptions::default(),
            outcome: OnceCell::new(),
        }
    }

    /// Manager caching to [`DEFAULT_CACHE_PATH`].
    pub fn file_backed(config: HarnessConfig) -> Self {
        Self::new(config, Arc::new(FileSeedStore::default()))
    }

    pub fn with_options(mut self, options: SeedOptions) -> Self {
        self.options = options;
        self
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Returns the fixture bundle, loading or provisioning it on first use.
    ///
    /// `fresh_seed` only matters for the first call: it skips the cache and
    /// always provisions. Later calls get the memoized outcome.
    ///
    /// # Errors
    ///
    /// - `SeedError::Auth` — the admin login failed.
    /// - `SeedError::Provision` — a create/register/permission call failed.
    /// - `SeedError::CacheIo` / `SeedError::CacheCorrupt` — saving failed.
    pub async fn generate(&self, fresh_seed: bool) -> Result<Arc<SeedDetails>, SeedError> {
        self.outcome
            .get_or_init(|| self.load_or_provision(fresh_seed))
            .await
            .clone()
    }

    /// The bundle, if a previous `generate` succeeded.
    pub fn current(&self) -> Option<Arc<SeedDetails>> {
        self.outcome.get().and_then(|r| r.as_ref().ok().cloned())
    }

    /// Client signed in as the seeded producer user.
    pub fn producer_client(&self, details: &SeedDetails) -> crate::error::Result<TdeiClient> {
        TdeiClient::for_user(
            &self.config,
            &details.producer_user.email,
            faker::DEFAULT_PASSWORD,
        )
    }

    async fn load_or_provision(&self, fresh_seed: bool) -> Result<Arc<SeedDetails>, SeedError> {
        if !fresh_seed {
            match self.store.load().await {
                Ok(Some(details)) => {
                    info!(org_id = details.org_id(), "serving seed data from cache");
                    return Ok(Arc::new(details));
                }
                Ok(None) => info!("no cached seed data"),
                Err(err) => warn!(error = %err, "ignoring unusable seed cache"),
            }
        }

        info!("generating seed data");
        let details = self.provision().await?;
        self.store.save(&details).await?;
        info!(org_id = details.org_id(), "seed data ready");
        Ok(Arc::new(details))
    }

    async fn provision(&self) -> Result<SeedDetails, SeedError> {
        let admin = TdeiClient::new(&self.config)
            .map_err(|e| SeedError::provision("build API client", e))?;
        let anonymous = TdeiClient::anonymous(&self.config.base_url())
            .map_err(|e| SeedError::provision("build API client", e))?;

        info!(username = self.config.username(), "authenticating seed admin");
        admin.ensure_token().await.map_err(|e| SeedError::Auth {
            username: self.config.username().to_string(),
            source: Arc::new(e),
        })?;

        info!("creating organization");
        let mut organization = faker::organization();
        let org_id = create_organization(&admin, &organization)
            .await
            .map_err(|e| SeedError::provision("create organization", e))?;
        organization.tdei_org_id = Some(org_id.clone());

        let project_group = if self.options.with_project_group {
            info!("creating project group");
            let mut project_group = faker::project_group();
            let id = create_project_group(&admin, &project_group)
                .await
                .map_err(|e| SeedError::provision("create project group", e))?;
            project_group.tdei_project_group_id = Some(id);
            Some(project_group)
        } else {
            None
        };

        info!(%org_id, "creating service");
        let mut service = faker::service(&org_id);
        service.tdei_service_id = Some(
            create_service(&admin, &service)
                .await
                .map_err(|e| SeedError::provision("create service", e))?,
        );

        info!(%org_id, "creating station");
        let mut station = faker::station(&org_id);
        station.tdei_station_id = Some(
            create_station(&admin, &station)
                .await
                .map_err(|e| SeedError::provision("create station", e))?,
        );

        info!("registering producer user");
        let producer_user = register(&anonymous, "register producer user").await?;

        let poc_user = if self.options.with_poc_user {
            info!("registering poc user");
            Some(register(&anonymous, "register poc user").await?)
        } else {
            None
        };

        info!(user = %producer_user.email, "assigning producer roles");
        assign(
            &admin,
            RoleDetails::for_org(&TdeiRole::DATA_GENERATORS, &org_id, &producer_user.email),
            "assign producer roles",
        )
        .await?;

        if let Some(poc) = &poc_user {
            info!(user = %poc.email, "assigning poc role");
            assign(
                &admin,
                RoleDetails::for_org(&[TdeiRole::Poc], &org_id, &poc.email),
                "assign poc role",
            )
            .await?;
        }

        Ok(SeedDetails {
            schema_version: SEED_SCHEMA_VERSION,
            organization,
            project_group,
            producer_user,
            poc_user,
            service,
            station,
        })
    }
}

async fn register(client: &TdeiClient, step: &'static str) -> Result<User, SeedError> {
    register_user(client, &faker::user())
        .await
        .map_err(|e| SeedError::provision(step, e))
}

async fn assign(
    client: &TdeiClient,
    details: RoleDetails,
    step: &'static str,
) -> Result<(), SeedError> {
    permission(client, &details)
        .await
        .map(|_| ())
        .map_err(|e: HarnessError| SeedError::provision(step, e))
}
