//! Ranking engine: hard exclusions, scoring, stable sort, top three.

use crate::catalog::{Catalog, Distro};
use crate::hardware::HardwareSnapshot;
use crate::scoring::{self, UseCase, HEAVY_DESKTOPS};
use std::fmt;
use tracing::debug;

/// Number of candidates kept in a recommendation.
pub const TOP_N: usize = 3;

/// Why a distro was removed before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Gaming distros are never offered for work or browsing.
    GamingForProductivity,
    /// GNOME/COSMIC without a lightweight tag, on a browsing request.
    HeavyDesktopForBrowsing,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::GamingForProductivity => write!(f, "gaming distro on a work/browsing request"),
            Exclusion::HeavyDesktopForBrowsing => {
                write!(f, "heavy desktop without lightweight tag on a browsing request")
            }
        }
    }
}

/// Hard exclusion for `distro`, if any. KDE does not count as heavy here.
pub fn exclusion_for(distro: &Distro, usecase: &UseCase) -> Option<Exclusion> {
    if usecase.is_productivity() && distro.has_category("gaming") {
        return Some(Exclusion::GamingForProductivity);
    }
    if *usecase == UseCase::Browsing
        && distro.desktop_in(HEAVY_DESKTOPS)
        && !distro.has_category("lightweight")
    {
        return Some(Exclusion::HeavyDesktopForBrowsing);
    }
    None
}

/// A distro that survived exclusion, with its final score.
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    pub id: String,
    pub name: String,
    pub score: f64,
    pub distro: &'a Distro,
}

/// Ranked survivors, best first.
#[derive(Debug, Clone, Default)]
pub struct Recommendation<'a> {
    top: Vec<ScoredCandidate<'a>>,
}

impl<'a> Recommendation<'a> {
    pub fn top(&self) -> &[ScoredCandidate<'a>] {
        &self.top
    }

    pub fn winner(&self) -> Option<&ScoredCandidate<'a>> {
        self.top.first()
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty()
    }
}

/// Score every surviving catalog entry and keep the best [`TOP_N`].
///
/// Equal scores keep catalog order.
pub fn recommend<'a>(
    hardware: &HardwareSnapshot,
    usecase: &UseCase,
    skill_level: &str,
    catalog: &'a Catalog,
) -> Recommendation<'a> {
    let mut candidates = rank_all(hardware, usecase, skill_level, catalog);
    candidates.truncate(TOP_N);
    Recommendation { top: candidates }
}

/// Every surviving entry, sorted best first.
pub fn rank_all<'a>(
    hardware: &HardwareSnapshot,
    usecase: &UseCase,
    skill_level: &str,
    catalog: &'a Catalog,
) -> Vec<ScoredCandidate<'a>> {
    let mut candidates = Vec::with_capacity(catalog.len());

    for distro in catalog.iter() {
        if let Some(reason) = exclusion_for(distro, usecase) {
            debug!(distro = %distro.id, %reason, "excluded");
            continue;
        }

        let score = scoring::score(distro, hardware, usecase, skill_level);
        debug!(distro = %distro.id, score, "scored");
        candidates.push(ScoredCandidate {
            id: distro.id.clone(),
            name: distro.name().to_string(),
            score,
            distro,
        });
    }

    // sort_by is stable
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(json: &str) -> Catalog {
        Catalog::from_json_str(json).unwrap()
    }

    fn names<'a>(rec: &'a Recommendation<'_>) -> Vec<&'a str> {
        rec.top().iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_single_entry_scenario() {
        let catalog = catalog(
            r#"{"fedora": {"name": "Fedora", "category": ["work", "general"], "desktop": "gnome",
                "gpu_support": {"nvidia": 6}, "ram_min": 4, "ram_optimal": 8,
                "skill": {"beginner": 5}, "stability": 8, "performance": 7}}"#,
        );
        let hw: HardwareSnapshot = serde_json::from_str(
            r#"{"gpu": {"gpu_model": "Intel UHD"}, "ram": {"total_gb": 16}, "storage": {"type": "ssd"}}"#,
        )
        .unwrap();
        let rec = recommend(&hw, &UseCase::Work, "beginner", &catalog);
        assert_eq!(rec.top().len(), 1);
        let winner = rec.winner().unwrap();
        assert_eq!(winner.id, "fedora");
        assert_eq!(winner.score, 16.06);
    }

    #[test]
    fn test_gaming_distros_excluded_for_productivity() {
        let catalog = catalog(
            r#"{"nobara": {"name": "Nobara", "category": ["gaming", "work"], "skill": {"beginner": 100}},
                "debian": {"name": "Debian", "category": ["general"]}}"#,
        );
        for usecase in [UseCase::Work, UseCase::Browsing] {
            let rec = recommend(&HardwareSnapshot::default(), &usecase, "beginner", &catalog);
            assert_eq!(names(&rec), vec!["Debian"]);
        }
        let rec = recommend(&HardwareSnapshot::default(), &UseCase::Gaming, "beginner", &catalog);
        assert_eq!(rec.top().len(), 2);
    }

    #[test]
    fn test_heavy_desktop_excluded_for_browsing_only() {
        let catalog = catalog(
            r#"{"fedora": {"name": "Fedora", "desktop": "GNOME", "category": ["work"]},
                "cosmic": {"name": "Pop!_OS", "desktop": "cosmic"},
                "lite": {"name": "Lite GNOME", "desktop": "gnome", "category": ["lightweight"]},
                "kde": {"name": "Kubuntu", "desktop": "kde"}}"#,
        );
        let rec = recommend(&HardwareSnapshot::default(), &UseCase::Browsing, "x", &catalog);
        let mut got = names(&rec);
        got.sort();
        assert_eq!(got, vec!["Kubuntu", "Lite GNOME"]);

        let rec = recommend(&HardwareSnapshot::default(), &UseCase::Work, "x", &catalog);
        assert_eq!(rec.top().len(), 3);
    }

    #[test]
    fn test_exclusion_reasons() {
        let catalog = catalog(
            r#"{"g": {"category": ["gaming"], "desktop": "gnome"}, "h": {"desktop": "gnome"}}"#,
        );
        let g = catalog.get("g").unwrap();
        let h = catalog.get("h").unwrap();
        assert_eq!(
            exclusion_for(g, &UseCase::Browsing),
            Some(Exclusion::GamingForProductivity)
        );
        assert_eq!(
            exclusion_for(h, &UseCase::Browsing),
            Some(Exclusion::HeavyDesktopForBrowsing)
        );
        assert_eq!(exclusion_for(h, &UseCase::Work), None);
        assert_eq!(exclusion_for(g, &UseCase::Gaming), None);
    }

    #[test]
    fn test_sorted_descending_and_truncated() {
        let catalog = catalog(
            r#"{"a": {"name": "A", "skill": {"pro": 1}},
                "b": {"name": "B", "skill": {"pro": 40}},
                "c": {"name": "C", "skill": {"pro": 20}},
                "d": {"name": "D", "skill": {"pro": 30}}}"#,
        );
        let rec = recommend(&HardwareSnapshot::default(), &UseCase::Gaming, "pro", &catalog);
        assert_eq!(names(&rec), vec!["B", "D", "C"]);
        let scores: Vec<f64> = rec.top().iter().map(|c| c.score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog = catalog(
            r#"{"zeta": {"name": "Zeta"}, "alpha": {"name": "Alpha"},
                "mid": {"name": "Mid"}, "last": {"name": "Last"}}"#,
        );
        let rec = recommend(&HardwareSnapshot::default(), &UseCase::Gaming, "any", &catalog);
        assert_eq!(names(&rec), vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_scores_rounding_to_zero_tie_in_catalog_order() {
        // b lands just below zero and a just above; both round to 0.00
        let catalog = catalog(
            r#"{"b": {"name": "B", "gpu_support": {"unknown": 0}, "skill": {"pro": -10.31},
                      "stability": 0, "performance": 0},
                "a": {"name": "A", "gpu_support": {"unknown": 0}, "skill": {"pro": -10.29},
                      "stability": 0, "performance": 0}}"#,
        );
        let rec = recommend(&HardwareSnapshot::default(), &UseCase::Gaming, "pro", &catalog);
        assert_eq!(names(&rec), vec!["B", "A"]);
        for candidate in rec.top() {
            assert_eq!(candidate.score, 0.0);
            assert!(candidate.score.is_sign_positive(), "{}", candidate.name);
        }
    }

    #[test]
    fn test_empty_catalog_yields_empty_recommendation() {
        let empty = Catalog::default();
        let rec = recommend(&HardwareSnapshot::default(), &UseCase::Work, "beginner", &empty);
        assert!(rec.is_empty());
        assert!(rec.winner().is_none());
    }

    #[test]
    fn test_rank_all_keeps_every_survivor() {
        let catalog = catalog(
            r#"{"a": {}, "b": {}, "c": {}, "d": {}, "e": {"category": ["gaming"]}}"#,
        );
        let all = rank_all(&HardwareSnapshot::default(), &UseCase::Work, "x", &catalog);
        assert_eq!(all.len(), 4);
    }
}
