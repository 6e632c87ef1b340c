//! Text renderings of a result for the terminal or a saved report.

use crate::catalog::Profile;
use crate::MatchResult;

pub const RESULTS_HEADER: &str = "=== Top 3 Linux Distro Recommendations ===";

/// Ranked list followed by the full explanation.
pub fn render_results(result: &MatchResult) -> String {
    let mut out = format!("{RESULTS_HEADER}\n\n");
    for (rank, entry) in result.top_3.iter().enumerate() {
        out.push_str(&format!("{}. {} — Score: {}\n", rank + 1, entry.name, entry.score));
    }
    out.push('\n');
    out.push_str(&result.explanation);
    out
}

/// Profile key guessed from a display name: `"Pop!_OS"` becomes `"pop_os"`.
pub fn profile_id_for_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| *c != ' ' && *c != '!')
        .collect()
}

/// Detailed profile view.
pub fn render_profile_card(name: &str, profile: &Profile) -> String {
    let mut out = format!("=== {name} — Detailed Profile ===\n\n");

    if let Some(pros) = &profile.pros {
        out.push_str("Pros:\n");
        for item in pros {
            out.push_str(&format!("- {item}\n"));
        }
        out.push('\n');
    }
    if let Some(cons) = &profile.cons {
        out.push_str("Cons:\n");
        for item in cons {
            out.push_str(&format!("- {item}\n"));
        }
        out.push('\n');
    }
    if let Some(best_for) = &profile.best_for {
        out.push_str(&format!("Best for: {best_for}\n\n"));
    }
    if let Some(avoid_if) = &profile.avoid_if {
        out.push_str(&format!("Avoid if: {avoid_if}\n\n"));
    }
    if let Some(package_manager) = &profile.package_manager {
        out.push_str(&format!("Package manager: {package_manager}\n"));
    }
    if let Some(release_cycle) = &profile.release_cycle {
        out.push_str(&format!("Release cycle: {release_cycle}\n"));
    }
    if let Some(notes) = &profile.notes {
        out.push_str(&format!("\nNotes:\n{notes}\n"));
    }

    out
}
