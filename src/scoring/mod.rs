//! Scoring engine.
//!
//! Turns one catalog entry plus the user context into a single number.
//! The score is a weighted sum of five sub-scores:
//!
//! - **hardware** - GPU support, RAM headroom and storage, clamped to `0..=10`,
//!   plus an unclamped bonus for special hardware conditions
//! - **use-case** - category fit, with a hard veto for gaming distros on
//!   work/browsing requests
//! - **skill** - the distro's per-skill-level rating, adjusted for use-case
//! - **stability** and **performance** - static ratings
//!
//! All functions here are pure. Substring heuristics are kept as ordered
//! tables; the first matching row wins.

use crate::catalog::Distro;
use crate::hardware::{HardwareFlag, HardwareSnapshot};
use std::fmt;

/// Use-case score for a gaming distro on a work/browsing request.
pub const USECASE_VETO: f64 = -999.0;

/// Desktops that get the laptop, touch and HiDPI bonuses.
pub const MODERN_DESKTOPS: &[&str] = &["gnome", "kde", "cosmic"];

/// Desktops penalised on spinning disks and excluded for browsing.
pub const HEAVY_DESKTOPS: &[&str] = &["gnome", "cosmic"];

/// Declared intent of the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UseCase {
    Work,
    Browsing,
    Gaming,
    /// Anything else; scored with the default branches.
    Other(String),
}

impl UseCase {
    /// Case-insensitive parse. Unknown values are kept, never rejected.
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "work" => UseCase::Work,
            "browsing" => UseCase::Browsing,
            "gaming" => UseCase::Gaming,
            other => UseCase::Other(other.to_string()),
        }
    }

    /// Work and browsing share weights, vetoes and the GPU discount.
    pub fn is_productivity(&self) -> bool {
        matches!(self, UseCase::Work | UseCase::Browsing)
    }

    pub fn as_str(&self) -> &str {
        match self {
            UseCase::Work => "work",
            UseCase::Browsing => "browsing",
            UseCase::Gaming => "gaming",
            UseCase::Other(other) => other,
        }
    }
}

impl From<&str> for UseCase {
    fn from(raw: &str) -> Self {
        UseCase::parse(raw)
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuVendor {
    Nvidia,
    Amd,
    Intel,
    Unknown,
}

impl GpuVendor {
    /// Key into a distro's `gpu_support` table.
    pub fn tag(self) -> &'static str {
        match self {
            GpuVendor::Nvidia => "nvidia",
            GpuVendor::Amd => "amd",
            GpuVendor::Intel => "intel",
            GpuVendor::Unknown => "unknown",
        }
    }
}

const GPU_VENDOR_RULES: &[(GpuVendor, &[&str])] = &[
    (GpuVendor::Nvidia, &["nvidia", "geforce", "rtx", "gtx"]),
    (GpuVendor::Amd, &["amd", "radeon"]),
    (GpuVendor::Intel, &["intel", "uhd", "iris"]),
];

/// Classify a GPU model string by vendor.
pub fn detect_gpu_vendor(gpu_model: &str) -> GpuVendor {
    let model = gpu_model.to_lowercase();
    GPU_VENDOR_RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| model.contains(n)))
        .map(|(vendor, _)| *vendor)
        .unwrap_or(GpuVendor::Unknown)
}

/// Base hardware fit in `0..=10`.
pub fn hardware_score(distro: &Distro, hardware: &HardwareSnapshot, usecase: &UseCase) -> f64 {
    let vendor = detect_gpu_vendor(hardware.gpu_model().unwrap_or("Unknown GPU"));
    let mut gpu = distro.gpu_support_for(vendor.tag());
    if usecase.is_productivity() {
        gpu *= 0.1;
    }

    let ram_gb = hardware.ram_gb();
    let ram = if ram_gb < distro.ram_min() {
        2.0
    } else if ram_gb < distro.ram_optimal() {
        7.0
    } else {
        10.0
    };

    let storage = hardware.storage_type().unwrap_or("unknown").to_lowercase();
    let storage_adjustment = if storage.contains("hdd") {
        if distro.desktop_in(HEAVY_DESKTOPS) {
            -2.0
        } else {
            1.0
        }
    } else if storage.contains("ssd") || storage.contains("nvme") {
        1.0
    } else {
        0.0
    };

    (gpu * 0.2 + ram * 0.8 + storage_adjustment).clamp(0.0, 10.0)
}

/// Distros favoured by name for a hardware condition.
struct NameRule {
    flag: HardwareFlag,
    names: &'static [&'static str],
    bonus: f64,
}

const NAME_RULES: &[NameRule] = &[
    NameRule {
        flag: HardwareFlag::Optimus,
        names: &["pop", "fedora", "ubuntu"],
        bonus: 3.0,
    },
    NameRule {
        flag: HardwareFlag::AmdApu,
        names: &["fedora", "ubuntu", "mint"],
        bonus: 2.0,
    },
    NameRule {
        flag: HardwareFlag::Egpu,
        names: &["fedora", "ubuntu"],
        bonus: 2.0,
    },
];

/// Additive bonus for special hardware conditions. Not clamped.
pub fn intelligence_bonus(distro: &Distro, hardware: &HardwareSnapshot) -> f64 {
    let modern_desktop = distro.desktop_in(MODERN_DESKTOPS);
    let mut bonus = 0.0;

    if hardware.is_laptop {
        if distro.has_category("work") {
            bonus += 2.0;
        }
        if modern_desktop {
            bonus += 1.0;
        }
    }

    for flag in [HardwareFlag::Touchscreen, HardwareFlag::HiDpi] {
        if hardware.flag(flag) {
            bonus += if modern_desktop { 2.0 } else { -1.0 };
        }
    }

    for rule in NAME_RULES {
        if hardware.flag(rule.flag) && distro.name_contains_any(rule.names) {
            bonus += rule.bonus;
        }
    }

    if hardware.optimus && distro.has_category("gaming") {
        bonus -= 2.0;
    }

    bonus
}

const WORK_FIT: &[(&str, f64)] = &[("work", 15.0), ("general", 10.0), ("lightweight", 8.0)];
const BROWSING_FIT: &[(&str, f64)] = &[("lightweight", 15.0), ("general", 10.0), ("work", 8.0)];
const GAMING_FIT: &[(&str, f64)] = &[("gaming", 15.0), ("general", 10.0)];
const FALLBACK_FIT: f64 = 5.0;

/// Category fit for the use-case.
pub fn usecase_score(distro: &Distro, usecase: &UseCase) -> f64 {
    if usecase.is_productivity() && distro.has_category("gaming") {
        return USECASE_VETO;
    }

    let table = match usecase {
        UseCase::Work => WORK_FIT,
        UseCase::Browsing => BROWSING_FIT,
        UseCase::Gaming => GAMING_FIT,
        UseCase::Other(_) => return FALLBACK_FIT,
    };

    table
        .iter()
        .find(|(category, _)| distro.has_category(category))
        .map(|(_, score)| *score)
        .unwrap_or(FALLBACK_FIT)
}

pub fn skill_score(distro: &Distro, skill_level: &str, usecase: &UseCase) -> f64 {
    let mut score = distro.skill_base(skill_level);

    if usecase.is_productivity() {
        if distro.has_category("work") {
            score += 15.0;
        }
        if *usecase == UseCase::Browsing && distro.has_category("lightweight") {
            score += 15.0;
        }
        if distro.has_category("gaming") {
            score -= 20.0;
        }
    }

    score
}

pub fn stability_score(distro: &Distro) -> f64 {
    distro.stability()
}

/// Raw throughput does not count for work or browsing.
pub fn performance_score(distro: &Distro, usecase: &UseCase) -> f64 {
    if usecase.is_productivity() {
        0.0
    } else {
        distro.performance()
    }
}

/// Relative weight of each sub-score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub hardware: f64,
    pub usecase: f64,
    pub skill: f64,
    pub stability: f64,
    pub performance: f64,
}

impl Weights {
    pub const PRODUCTIVITY: Weights = Weights {
        hardware: 0.10,
        usecase: 0.45,
        skill: 0.40,
        stability: 0.05,
        performance: 0.00,
    };

    pub const DEFAULT: Weights = Weights {
        hardware: 0.35,
        usecase: 0.30,
        skill: 0.20,
        stability: 0.10,
        performance: 0.05,
    };

    pub fn for_usecase(usecase: &UseCase) -> Self {
        if usecase.is_productivity() {
            Self::PRODUCTIVITY
        } else {
            Self::DEFAULT
        }
    }
}

/// Every input to a final score, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub hardware: f64,
    pub intelligence_bonus: f64,
    pub usecase: f64,
    pub skill: f64,
    pub stability: f64,
    pub performance: f64,
    pub weights: Weights,
    /// Weighted sum rounded to two decimals.
    pub final_score: f64,
}

pub fn score_breakdown(
    distro: &Distro,
    hardware: &HardwareSnapshot,
    usecase: &UseCase,
    skill_level: &str,
) -> ScoreBreakdown {
    let weights = Weights::for_usecase(usecase);
    let hardware_part = hardware_score(distro, hardware, usecase);
    let bonus = intelligence_bonus(distro, hardware);
    let usecase_part = usecase_score(distro, usecase);
    let skill = skill_score(distro, skill_level, usecase);
    let stability = stability_score(distro);
    let performance = performance_score(distro, usecase);

    let weighted = (hardware_part + bonus) * weights.hardware
        + usecase_part * weights.usecase
        + skill * weights.skill
        + stability * weights.stability
        + performance * weights.performance;

    ScoreBreakdown {
        hardware: hardware_part,
        intelligence_bonus: bonus,
        usecase: usecase_part,
        skill,
        stability,
        performance,
        weights,
        final_score: round2(weighted),
    }
}

/// Final score of `distro` for this request.
pub fn score(
    distro: &Distro,
    hardware: &HardwareSnapshot,
    usecase: &UseCase,
    skill_level: &str,
) -> f64 {
    score_breakdown(distro, hardware, usecase, skill_level).final_score
}

/// Round to two decimals. Never returns `-0.0`, so equal scores compare equal.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}
