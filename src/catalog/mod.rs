//! Catalog access: the distro catalog and the optional profile table.
//!
//! Both documents are JSON objects keyed by distro id. The catalog is a hard
//! dependency of ranking, so every load failure is propagated with the path
//! that failed. The profile table only enriches the explanation text; any
//! problem reading it degrades to an empty table.
//!
//! # Example
//!
//! ```rust
//! use distro_match::catalog::{Catalog, ProfileTable};
//!
//! let catalog = Catalog::from_json_str(
//!     r#"{"fedora": {"name": "Fedora", "category": ["work"], "desktop": "gnome"}}"#,
//! )
//! .unwrap();
//! assert_eq!(catalog.len(), 1);
//! assert_eq!(catalog.get("fedora").unwrap().name(), "Fedora");
//!
//! let profiles = ProfileTable::from_json_str(r#"{"Fedora": {"notes": "upstream GNOME"}}"#).unwrap();
//! assert!(profiles.get("fedora").is_some());
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Support score assumed for a GPU vendor the distro does not list.
pub const DEFAULT_GPU_SUPPORT: f64 = 5.0;
/// Minimum RAM (GB) assumed when a distro does not declare one.
pub const DEFAULT_RAM_MIN: f64 = 2.0;
/// Comfortable RAM (GB) assumed when a distro does not declare one.
pub const DEFAULT_RAM_OPTIMAL: f64 = 4.0;
/// Stability and performance rating assumed when absent.
pub const DEFAULT_RATING: f64 = 7.0;

/// One catalog entry.
///
/// Every attribute is optional in the document; the accessors apply the
/// documented defaults so scoring never fails on a sparse entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Distro {
    /// Catalog key. Filled from the document key, not from the entry body.
    #[serde(skip)]
    pub id: String,
    pub name: Option<String>,
    pub category: Vec<String>,
    pub desktop: Option<String>,
    pub gpu_support: BTreeMap<String, f64>,
    pub ram_min: Option<f64>,
    pub ram_optimal: Option<f64>,
    pub skill: BTreeMap<String, f64>,
    pub stability: Option<f64>,
    pub performance: Option<f64>,
}

impl Distro {
    /// Display name, falling back to the catalog id.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Case-insensitive category membership.
    pub fn has_category(&self, tag: &str) -> bool {
        self.category.iter().any(|c| c.eq_ignore_ascii_case(tag))
    }

    /// Lower-cased desktop environment, empty when absent.
    pub fn desktop_key(&self) -> String {
        self.desktop
            .as_deref()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }

    /// Whether the desktop environment is one of `desktops` (lower-case names).
    pub fn desktop_in(&self, desktops: &[&str]) -> bool {
        let desktop = self.desktop_key();
        desktops.iter().any(|d| *d == desktop)
    }

    /// Whether the lower-cased display name contains any of `needles`.
    pub fn name_contains_any(&self, needles: &[&str]) -> bool {
        let name = self.name().to_ascii_lowercase();
        needles.iter().any(|n| name.contains(n))
    }

    pub fn gpu_support_for(&self, vendor_tag: &str) -> f64 {
        self.gpu_support
            .get(vendor_tag)
            .copied()
            .unwrap_or(DEFAULT_GPU_SUPPORT)
    }

    pub fn ram_min(&self) -> f64 {
        self.ram_min.unwrap_or(DEFAULT_RAM_MIN)
    }

    pub fn ram_optimal(&self) -> f64 {
        self.ram_optimal.unwrap_or(DEFAULT_RAM_OPTIMAL)
    }

    /// Base skill score for a skill level; the level is lower-cased before lookup.
    pub fn skill_base(&self, skill_level: &str) -> f64 {
        self.skill
            .get(&skill_level.to_lowercase())
            .copied()
            .unwrap_or(0.0)
    }

    pub fn stability(&self) -> f64 {
        self.stability.unwrap_or(DEFAULT_RATING)
    }

    pub fn performance(&self) -> f64 {
        self.performance.unwrap_or(DEFAULT_RATING)
    }
}

/// The distro catalog in document order.
///
/// Order matters: ranking breaks score ties by catalog position.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<Distro>,
}

impl Catalog {
    pub fn from_entries(entries: Vec<Distro>) -> Self {
        Self { entries }
    }

    /// Parse a catalog document, keeping key order.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let document: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(raw).context("parsing distro catalog document")?;

        let mut entries = Vec::with_capacity(document.len());
        for (id, value) in document {
            let mut distro: Distro = serde_json::from_value(value)
                .with_context(|| format!("parsing catalog entry '{id}'"))?;
            distro.id = id;
            entries.push(distro);
        }
        Ok(Self { entries })
    }

    /// Load the catalog from disk. Missing or unreadable files are fatal.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading distro catalog '{}'", path.display()))?;
        let catalog = Self::from_json_str(&raw)
            .with_context(|| format!("loading distro catalog '{}'", path.display()))?;
        info!(path = %path.display(), entries = catalog.len(), "loaded distro catalog");
        Ok(catalog)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Distro> {
        self.entries.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Distro> {
        self.entries.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Curated enrichment text for one distro. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub pros: Option<Vec<String>>,
    pub cons: Option<Vec<String>>,
    pub best_for: Option<String>,
    pub avoid_if: Option<String>,
    pub package_manager: Option<String>,
    pub release_cycle: Option<String>,
    pub notes: Option<String>,
}

/// Profiles keyed by lower-cased distro id.
#[derive(Debug, Clone, Default)]
pub struct ProfileTable {
    profiles: BTreeMap<String, Profile>,
}

impl ProfileTable {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let document: BTreeMap<String, Profile> =
            serde_json::from_str(raw).context("parsing distro profile document")?;
        let profiles = document
            .into_iter()
            .map(|(id, profile)| (id.to_lowercase(), profile))
            .collect();
        Ok(Self { profiles })
    }

    /// Strict load, used when the caller wants to report problems itself.
    pub fn try_load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading distro profiles '{}'", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("loading distro profiles '{}'", path.display()))
    }

    /// Best-effort load: any failure yields an empty table.
    pub fn load_or_empty(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::try_load(path) {
            Ok(table) => table,
            Err(err) => {
                warn!("continuing without distro profiles: {err:#}");
                Self::default()
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Profile> {
        self.profiles.get(&id.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
