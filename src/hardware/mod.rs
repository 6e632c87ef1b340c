//! Hardware snapshot consumed by scoring and explanation.
//!
//! The snapshot mirrors the scanner's JSON document:
//!
//! ```text
//! {
//!   "gpu":     { "gpu_model": "NVIDIA GeForce RTX 3060" },
//!   "ram":     { "total_gb": 15.5 },
//!   "storage": { "type": "NVMe SSD" },
//!   "is_laptop": true, "touchscreen": false, "hidpi": false,
//!   "optimus": true, "amd_apu": false, "egpu": false,
//!   "cpu":     { "cpu_model": "AMD Ryzen 7 5800H", "architecture": "x86_64",
//!                "cores": 16, "flags": ["sse4_2", "avx2"] },
//!   "system":  { "os": "Linux", "os_version": "#1 SMP PREEMPT_DYNAMIC ...",
//!                "machine": "x86_64", "distribution": "Fedora Linux 40" }
//! }
//! ```
//!
//! Any field may be missing or oddly typed. Such values are neutral, never
//! errors: flags use JSON truthiness, text fields accept numbers, and a
//! section of the wrong shape is dropped. `cpu` and `system` are
//! informational and take no part in scoring.

pub mod scan;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuInfo {
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub gpu_model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RamInfo {
    #[serde(
        default,
        deserialize_with = "lenient_gb",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_gb: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageInfo {
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub cpu_model: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub architecture: Option<String>,
    /// Logical processors.
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub cores: Option<u32>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Kernel name, e.g. `Linux`.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub os: Option<String>,
    /// Kernel build string (`uname -v`).
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub os_version: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub machine: Option<String>,
    /// `PRETTY_NAME` from os-release.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub distribution: Option<String>,
}

/// Detected hardware facts plus six independent environment flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareSnapshot {
    #[serde(
        default,
        deserialize_with = "lenient_section",
        skip_serializing_if = "Option::is_none"
    )]
    pub gpu: Option<GpuInfo>,
    #[serde(
        default,
        deserialize_with = "lenient_section",
        skip_serializing_if = "Option::is_none"
    )]
    pub ram: Option<RamInfo>,
    #[serde(
        default,
        deserialize_with = "lenient_section",
        skip_serializing_if = "Option::is_none"
    )]
    pub storage: Option<StorageInfo>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_laptop: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub touchscreen: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub hidpi: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub optimus: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub amd_apu: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub egpu: bool,
    #[serde(
        default,
        deserialize_with = "lenient_section",
        skip_serializing_if = "Option::is_none"
    )]
    pub cpu: Option<CpuInfo>,
    #[serde(
        default,
        deserialize_with = "lenient_section",
        skip_serializing_if = "Option::is_none"
    )]
    pub system: Option<SystemInfo>,
}

impl HardwareSnapshot {
    pub fn gpu_model(&self) -> Option<&str> {
        self.gpu.as_ref().and_then(|g| g.gpu_model.as_deref())
    }

    /// Total RAM in GB, if known.
    pub fn ram_total_gb(&self) -> Option<f64> {
        self.ram.as_ref().and_then(|r| r.total_gb)
    }

    /// Total RAM for scoring; unknown counts as 0 GB.
    pub fn ram_gb(&self) -> f64 {
        self.ram_total_gb().unwrap_or(0.0)
    }

    pub fn storage_type(&self) -> Option<&str> {
        self.storage.as_ref().and_then(|s| s.kind.as_deref())
    }

    pub fn flag(&self, flag: HardwareFlag) -> bool {
        match flag {
            HardwareFlag::Laptop => self.is_laptop,
            HardwareFlag::Touchscreen => self.touchscreen,
            HardwareFlag::HiDpi => self.hidpi,
            HardwareFlag::Optimus => self.optimus,
            HardwareFlag::AmdApu => self.amd_apu,
            HardwareFlag::Egpu => self.egpu,
        }
    }

    /// Flags that are set, in declaration order.
    pub fn active_flags(&self) -> impl Iterator<Item = HardwareFlag> + '_ {
        HardwareFlag::ALL
            .into_iter()
            .filter(move |flag| self.flag(*flag))
    }
}

/// Boolean environment conditions the scanner can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardwareFlag {
    /// A battery is present.
    Laptop,
    Touchscreen,
    /// Display density of 140 dpi or more.
    HiDpi,
    /// NVIDIA Optimus hybrid graphics.
    Optimus,
    /// AMD integrated graphics.
    AmdApu,
    /// External GPU over Thunderbolt.
    Egpu,
}

impl HardwareFlag {
    pub const ALL: [HardwareFlag; 6] = [
        HardwareFlag::Laptop,
        HardwareFlag::Touchscreen,
        HardwareFlag::HiDpi,
        HardwareFlag::Optimus,
        HardwareFlag::AmdApu,
        HardwareFlag::Egpu,
    ];

    /// Key used in the snapshot document.
    pub fn key(self) -> &'static str {
        match self {
            HardwareFlag::Laptop => "is_laptop",
            HardwareFlag::Touchscreen => "touchscreen",
            HardwareFlag::HiDpi => "hidpi",
            HardwareFlag::Optimus => "optimus",
            HardwareFlag::AmdApu => "amd_apu",
            HardwareFlag::Egpu => "egpu",
        }
    }
}

impl fmt::Display for HardwareFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Accept a number or a numeric string; anything else is unknown.
fn lenient_gb<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// JSON truthiness: `false`, `null`, zero, `""`, `[]` and `{}` are unset.
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().is_some_and(is_truthy))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Strings as-is, numbers and booleans as their text; anything else is unknown.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| scalar_text(&value)))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// A list of scalars; non-scalar items are skipped.
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    })
}

/// A section that is not an object of the expected shape is dropped.
fn lenient_section<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    })
}
