//! Hardware-aware Linux distribution recommender.
//!
//! Given a hardware snapshot, a use-case (work / browsing / gaming) and a
//! skill level, ranks a distro catalog and explains the top pick.
//!
//! - **Catalog access** - distro catalog and optional profile table
//! - **Scoring** - five sub-scores combined with use-case weights
//! - **Ranking** - hard exclusions, stable sort, top three
//! - **Explanation** - deterministic narrative for the winner
//!
//! # Architecture
//!
//! ```text
//! hardware::scan ──> HardwareSnapshot ─┐
//!                                      ├──> ranking ──> explain ──> MatchResult
//! catalog ──> Catalog ──> scoring ─────┘                  ^
//! catalog ──> ProfileTable ───────────────────────────────┘
//! ```
//!
//! The catalog and profile table are passed in explicitly; nothing here
//! reads a fixed location behind the caller's back.
//!
//! # Example
//!
//! ```rust
//! use distro_match::{recommend_and_explain, Catalog, HardwareSnapshot, ProfileTable};
//!
//! let catalog = Catalog::from_json_str(
//!     r#"{"mint": {"name": "Linux Mint", "category": ["general"], "desktop": "cinnamon"}}"#,
//! )
//! .unwrap();
//! let result = recommend_and_explain(
//!     &HardwareSnapshot::default(),
//!     "browsing",
//!     "beginner",
//!     &catalog,
//!     &ProfileTable::default(),
//! );
//! assert_eq!(result.top_3[0].name, "Linux Mint");
//! ```

pub mod catalog;
pub mod config;
pub mod explain;
pub mod hardware;
pub mod logging;
pub mod preflight;
pub mod ranking;
pub mod report;
pub mod scoring;

pub use catalog::{Catalog, Distro, Profile, ProfileTable};
pub use hardware::{HardwareFlag, HardwareSnapshot};
pub use ranking::{recommend, Recommendation, ScoredCandidate};
pub use scoring::{score, UseCase};

use serde::{Deserialize, Serialize};

/// One ranked entry as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopEntry {
    pub name: String,
    pub score: f64,
}

/// Ranked names plus the explanation for the winner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub top_3: Vec<TopEntry>,
    pub explanation: String,
}

/// Rank `catalog` for this request and explain the winner.
///
/// `usecase` and `skill_level` are echoed verbatim in the explanation and
/// matched case-insensitively for scoring.
pub fn recommend_and_explain(
    hardware: &HardwareSnapshot,
    usecase: &str,
    skill_level: &str,
    catalog: &Catalog,
    profiles: &ProfileTable,
) -> MatchResult {
    let parsed = UseCase::parse(usecase);
    let recommendation = ranking::recommend(hardware, &parsed, skill_level, catalog);
    let explanation = explain::explain(
        recommendation.top(),
        hardware,
        usecase,
        skill_level,
        profiles,
    );

    MatchResult {
        top_3: recommendation
            .top()
            .iter()
            .map(|c| TopEntry {
                name: c.name.clone(),
                score: c.score,
            })
            .collect(),
        explanation,
    }
}
