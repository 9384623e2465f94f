//! Live suites against a real TDEI gateway.
//!
//! Every test here is `#[ignore]`d: they need `test-harness.json` (or
//! `TDEI_HARNESS_CONFIG`) pointing at a reachable gateway with an admin
//! account. Run them with
//!
//! ```text
//! cargo test --test live -- --ignored
//! ```
//!
//! All suites live in one binary so the seed manager in `common` is shared
//! and the fixture graph is provisioned (or loaded from `seed.data.json`) at
//! most once per run. Set `TDEI_FRESH_SEED=1` to ignore the cache.


mod gtfs_pathways;
mod organization;
mod seed_scenario;
mod user_management;
