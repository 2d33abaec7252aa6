//! Shared JSON fixtures for stagehand crates: stored machine schemas and pool
//! configurations, addressed by short name through `fixtures/manifest.json`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    machines: HashMap<String, String>,
    pools: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let raw = read_to_string(rel)?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse fixture '{rel}'"))
}

/// Raw JSON for the named stored-machine fixture.
pub fn machine_schema_json(name: &str) -> Result<String> {
    let rel = MANIFEST
        .machines
        .get(name)
        .ok_or_else(|| anyhow!("unknown machine fixture '{name}'"))?;
    read_to_string(rel)
}

/// Deserialize the named pool-config fixture into `T`.
pub fn pool_cfg_json<T: DeserializeOwned>(name: &str) -> Result<T> {
    let rel = MANIFEST
        .pools
        .get(name)
        .ok_or_else(|| anyhow!("unknown pool fixture '{name}'"))?;
    load_json(rel)
}

/// Names of all stored-machine fixtures, sorted.
pub fn machine_names() -> Vec<String> {
    let mut names: Vec<String> = MANIFEST.machines.keys().cloned().collect();
    names.sort();
    names
}

/// Names of all pool-config fixtures, sorted.
pub fn pool_names() -> Vec<String> {
    let mut names: Vec<String> = MANIFEST.pools.keys().cloned().collect();
    names.sort();
    names
}
