//! Explanation builder.
//!
//! Narrates the ranking decision for the winning distro. The text is an
//! ordered list of sections; each section is a plain function that returns
//! its lines (or nothing), so each can be checked on its own. Lines are
//! joined with `\n`; a section header that starts with `\n` leaves a blank
//! line before it.

use crate::catalog::{Profile, ProfileTable};
use crate::hardware::{HardwareFlag, HardwareSnapshot};
use crate::ranking::ScoredCandidate;

/// Returned verbatim when nothing survived ranking.
pub const NO_MATCH: &str = "No suitable distros were found based on your hardware and preferences.";

/// Emitted when none of the hardware flags is set.
pub const NO_SPECIAL_HARDWARE: &str =
    "- No special hardware conditions detected; using general scoring rules.";

/// Everything a section may look at.
pub struct ExplainContext<'a> {
    pub subject: &'a ScoredCandidate<'a>,
    pub hardware: &'a HardwareSnapshot,
    pub usecase: &'a str,
    pub skill_level: &'a str,
    pub profiles: &'a ProfileTable,
}

type Section = fn(&ExplainContext<'_>) -> Vec<String>;

const SECTIONS: &[Section] = &[
    headline,
    user_choices,
    hardware_summary,
    hardware_reasoning,
    distro_characteristics,
    profile_details,
    closing,
];

/// Build the explanation for the first (best) candidate in `top`.
pub fn explain(
    top: &[ScoredCandidate<'_>],
    hardware: &HardwareSnapshot,
    usecase: &str,
    skill_level: &str,
    profiles: &ProfileTable,
) -> String {
    let Some(subject) = top.first() else {
        return NO_MATCH.to_string();
    };

    let ctx = ExplainContext {
        subject,
        hardware,
        usecase,
        skill_level,
        profiles,
    };

    SECTIONS
        .iter()
        .flat_map(|section| section(&ctx))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn headline(ctx: &ExplainContext<'_>) -> Vec<String> {
    vec![format!(
        "{} is the best match for your system based on your hardware, skill level, and selected use-case.\n",
        ctx.subject.name
    )]
}

pub fn user_choices(ctx: &ExplainContext<'_>) -> Vec<String> {
    vec![
        format!("Use-case selected: {}", ctx.usecase),
        format!("Skill level: {}\n", ctx.skill_level),
    ]
}

pub fn hardware_summary(ctx: &ExplainContext<'_>) -> Vec<String> {
    let hw = ctx.hardware;
    let ram = hw
        .ram_total_gb()
        .map(|gb| gb.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    vec![
        "=== Hardware Detected ===".to_string(),
        format!("- GPU: {}", hw.gpu_model().unwrap_or("Unknown GPU")),
        format!("- RAM: {ram} GB"),
        format!("- Storage: {}", hw.storage_type().unwrap_or("Unknown")),
    ]
}

/// Fixed prose for a hardware flag, mirroring the bonus rules.
pub fn flag_reason(flag: HardwareFlag) -> &'static str {
    match flag {
        HardwareFlag::Laptop => {
            "- Laptop detected: prioritizing distros with strong power management and good laptop support."
        }
        HardwareFlag::Touchscreen => {
            "- Touchscreen detected: recommending distros with excellent touch support (GNOME, KDE, COSMIC)."
        }
        HardwareFlag::HiDpi => {
            "- HiDPI display detected: prioritizing distros with strong scaling support (GNOME, KDE, COSMIC)."
        }
        HardwareFlag::Optimus => {
            "- NVIDIA Optimus hybrid GPU detected: recommending distros with reliable hybrid graphics support (Pop!_OS, Fedora, Ubuntu)."
        }
        HardwareFlag::AmdApu => {
            "- AMD APU detected: prioritizing distros with strong Mesa support (Fedora, Ubuntu, Mint)."
        }
        HardwareFlag::Egpu => {
            "- External GPU detected: recommending distros with strong Thunderbolt/eGPU support (Fedora, Ubuntu)."
        }
    }
}

pub fn hardware_reasoning(ctx: &ExplainContext<'_>) -> Vec<String> {
    let mut lines = vec!["\n=== Hardware-Based Reasoning ===".to_string()];
    let before = lines.len();
    lines.extend(ctx.hardware.active_flags().map(|f| flag_reason(f).to_string()));
    if lines.len() == before {
        lines.push(NO_SPECIAL_HARDWARE.to_string());
    }
    lines
}

pub fn distro_characteristics(ctx: &ExplainContext<'_>) -> Vec<String> {
    let distro = ctx.subject.distro;
    vec![
        "\n=== Distro Characteristics ===".to_string(),
        format!("- Category: {}", distro.category.join(", ")),
        format!(
            "- Desktop environment: {}",
            distro.desktop.as_deref().unwrap_or("Unknown")
        ),
    ]
}

/// Enrichment from the profile table; empty when the distro has no profile.
pub fn profile_details(ctx: &ExplainContext<'_>) -> Vec<String> {
    match ctx.profiles.get(&ctx.subject.id) {
        Some(profile) => profile_lines(profile),
        None => Vec::new(),
    }
}

fn profile_lines(profile: &Profile) -> Vec<String> {
    let mut lines = vec!["\n=== Additional Distro Information ===".to_string()];

    if let Some(pros) = &profile.pros {
        lines.push("\nPros:".to_string());
        lines.extend(pros.iter().map(|item| format!("- {item}")));
    }
    if let Some(cons) = &profile.cons {
        lines.push("\nCons:".to_string());
        lines.extend(cons.iter().map(|item| format!("- {item}")));
    }
    if let Some(best_for) = &profile.best_for {
        lines.push(format!("\nBest for: {best_for}"));
    }
    if let Some(avoid_if) = &profile.avoid_if {
        lines.push(format!("Avoid if: {avoid_if}"));
    }
    if let Some(package_manager) = &profile.package_manager {
        lines.push(format!("Package manager: {package_manager}"));
    }
    if let Some(release_cycle) = &profile.release_cycle {
        lines.push(format!("Release cycle: {release_cycle}"));
    }
    if let Some(notes) = &profile.notes {
        lines.push(format!("Notes: {notes}"));
    }

    lines
}

pub fn closing(ctx: &ExplainContext<'_>) -> Vec<String> {
    vec![format!(
        "\nOverall, {} scored highest for your selected use-case and hardware profile.",
        ctx.subject.name
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn fixture() -> Catalog {
        Catalog::from_json_str(
            r#"{"Fedora": {"name": "Fedora", "category": ["work", "general"], "desktop": "gnome"}}"#,
        )
        .unwrap()
    }

    fn candidate(catalog: &Catalog) -> ScoredCandidate<'_> {
        let distro = catalog.get("Fedora").unwrap();
        ScoredCandidate {
            id: distro.id.clone(),
            name: distro.name().to_string(),
            score: 16.06,
            distro,
        }
    }

    fn with_ctx<R>(
        hardware: &HardwareSnapshot,
        profiles: &ProfileTable,
        f: impl FnOnce(&ExplainContext<'_>) -> R,
    ) -> R {
        let catalog = fixture();
        let subject = candidate(&catalog);
        let ctx = ExplainContext {
            subject: &subject,
            hardware,
            usecase: "Work",
            skill_level: "Beginner",
            profiles,
        };
        f(&ctx)
    }

    #[test]
    fn test_empty_top_list_returns_no_match() {
        let text = explain(
            &[],
            &HardwareSnapshot::default(),
            "work",
            "beginner",
            &ProfileTable::default(),
        );
        assert_eq!(text, NO_MATCH);
    }

    #[test]
    fn test_hardware_summary_defaults() {
        let lines = with_ctx(
            &HardwareSnapshot::default(),
            &ProfileTable::default(),
            hardware_summary,
        );
        assert_eq!(
            lines,
            vec![
                "=== Hardware Detected ===",
                "- GPU: Unknown GPU",
                "- RAM: Unknown GB",
                "- Storage: Unknown",
            ]
        );
    }

    #[test]
    fn test_hardware_summary_values() {
        let hw: HardwareSnapshot = serde_json::from_str(
            r#"{"gpu": {"gpu_model": "Intel UHD"}, "ram": {"total_gb": 15.5}, "storage": {"type": "ssd"}}"#,
        )
        .unwrap();
        let lines = with_ctx(&hw, &ProfileTable::default(), hardware_summary);
        assert_eq!(lines[1], "- GPU: Intel UHD");
        assert_eq!(lines[2], "- RAM: 15.5 GB");
        assert_eq!(lines[3], "- Storage: ssd");
    }

    #[test]
    fn test_ram_echo_is_normalised() {
        let summary = |json: &str| {
            let hw: HardwareSnapshot = serde_json::from_str(json).unwrap();
            with_ctx(&hw, &ProfileTable::default(), hardware_summary)[2].clone()
        };
        assert_eq!(summary(r#"{"ram": {"total_gb": 16.0}}"#), "- RAM: 16 GB");
        assert_eq!(summary(r#"{"ram": {"total_gb": "7.50"}}"#), "- RAM: 7.5 GB");
        assert_eq!(summary(r#"{"ram": {"total_gb": "lots"}}"#), "- RAM: Unknown GB");
    }

    #[test]
    fn test_reasoning_fallback_when_no_flags() {
        let lines = with_ctx(
            &HardwareSnapshot::default(),
            &ProfileTable::default(),
            hardware_reasoning,
        );
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], NO_SPECIAL_HARDWARE);
    }

    #[test]
    fn test_reasoning_lists_each_flag_in_order() {
        let hw = HardwareSnapshot {
            egpu: true,
            is_laptop: true,
            hidpi: true,
            ..Default::default()
        };
        let lines = with_ctx(&hw, &ProfileTable::default(), hardware_reasoning);
        assert_eq!(
            lines[1..],
            [
                flag_reason(HardwareFlag::Laptop).to_string(),
                flag_reason(HardwareFlag::HiDpi).to_string(),
                flag_reason(HardwareFlag::Egpu).to_string(),
            ]
        );
        assert!(!lines.iter().any(|l| l == NO_SPECIAL_HARDWARE));
    }

    #[test]
    fn test_characteristics_preserve_catalog_case() {
        let lines = with_ctx(
            &HardwareSnapshot::default(),
            &ProfileTable::default(),
            distro_characteristics,
        );
        assert_eq!(lines[1], "- Category: work, general");
        assert_eq!(lines[2], "- Desktop environment: gnome");
    }

    #[test]
    fn test_profile_section_absent_without_profile() {
        let lines = with_ctx(
            &HardwareSnapshot::default(),
            &ProfileTable::default(),
            profile_details,
        );
        assert!(lines.is_empty());
    }

    #[test]
    fn test_profile_section_skips_missing_fields() {
        let profiles = ProfileTable::from_json_str(
            r#"{"fedora": {"cons": ["Short support window"], "release_cycle": "~6 months"}}"#,
        )
        .unwrap();
        let lines = with_ctx(&HardwareSnapshot::default(), &profiles, profile_details);
        assert_eq!(
            lines,
            vec![
                "\n=== Additional Distro Information ===",
                "\nCons:",
                "- Short support window",
                "Release cycle: ~6 months",
            ]
        );
    }

    #[test]
    fn test_profile_section_full_order() {
        let profiles = ProfileTable::from_json_str(
            r#"{"fedora": {"notes": "N", "pros": ["P1", "P2"], "cons": ["C"],
                "best_for": "B", "avoid_if": "A", "package_manager": "dnf",
                "release_cycle": "R"}}"#,
        )
        .unwrap();
        let lines = with_ctx(&HardwareSnapshot::default(), &profiles, profile_details);
        assert_eq!(
            lines,
            vec![
                "\n=== Additional Distro Information ===",
                "\nPros:",
                "- P1",
                "- P2",
                "\nCons:",
                "- C",
                "\nBest for: B",
                "Avoid if: A",
                "Package manager: dnf",
                "Release cycle: R",
                "Notes: N",
            ]
        );
    }

    #[test]
    fn test_full_explanation_text() {
        let catalog = fixture();
        let top = vec![candidate(&catalog)];
        let text = explain(
            &top,
            &HardwareSnapshot::default(),
            "Work",
            "Beginner",
            &ProfileTable::default(),
        );
        let expected = "\
Fedora is the best match for your system based on your hardware, skill level, and selected use-case.

Use-case selected: Work
Skill level: Beginner

=== Hardware Detected ===
- GPU: Unknown GPU
- RAM: Unknown GB
- Storage: Unknown

=== Hardware-Based Reasoning ===
- No special hardware conditions detected; using general scoring rules.

=== Distro Characteristics ===
- Category: work, general
- Desktop environment: gnome

Overall, Fedora scored highest for your selected use-case and hardware profile.";
        assert_eq!(text, expected);
    }
}
