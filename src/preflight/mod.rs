//! Preflight checks for hardware scanning.
//!
//! The scanner shells out to a handful of inspection tools. None of them is
//! required, but each missing one silently weakens the snapshot, so the CLI
//! reports them up front.
//!
//! # Example
//!
//! ```rust
//! use distro_match::preflight::{command_exists, missing_tools};
//!
//! if !command_exists("lspci") {
//!     println!("pciutils not installed; GPU detection disabled");
//! }
//!
//! for (tool, package) in missing_tools(&[("lsusb", "usbutils")]) {
//!     eprintln!("{tool} missing (install: {package})");
//! }
//! ```

use std::path::Path;

/// Check if a command exists in PATH.
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Inspection tools used by the scanner.
///
/// Each tuple is (command_name, package_name).
pub const PROBE_TOOLS: &[(&str, &str)] = &[
    ("lspci", "pciutils"),
    ("lsusb", "usbutils"),
    ("xinput", "xinput"),
    ("xdpyinfo", "xdpyinfo"),
];

/// Tools from `tools` that are not installed.
pub fn missing_tools<'a>(tools: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
    tools
        .iter()
        .filter(|(tool, _)| !command_exists(tool))
        .copied()
        .collect()
}

/// Probe tools from [`PROBE_TOOLS`] that are not installed.
pub fn missing_probe_tools() -> Vec<(&'static str, &'static str)> {
    missing_tools(PROBE_TOOLS)
}

/// Human-readable notice for missing probe tools, or `None` if all exist.
pub fn probe_notice(missing: &[(&str, &str)]) -> Option<String> {
    if missing.is_empty() {
        return None;
    }
    let list = missing
        .iter()
        .map(|(t, p)| format!("  {} (install: {})", t, p))
        .collect::<Vec<_>>()
        .join("\n");
    Some(format!(
        "Some hardware probes are unavailable; related checks will be skipped:\n{}",
        list
    ))
}

/// Whether the scanner can read kernel memory and block-device info.
pub fn sysfs_available(root: &Path) -> bool {
    root.join("proc/meminfo").is_file() && root.join("sys/block").is_dir()
}
