mod parse;

use anyhow::{bail, Context, Result};
use distro_match::config::MatchConfig;
use distro_match::hardware::scan;
use distro_match::ranking::{exclusion_for, rank_all};
use distro_match::scoring::score_breakdown;
use distro_match::{
    preflight, recommend_and_explain, report, Catalog, HardwareSnapshot, ProfileTable, UseCase,
};
use std::fs;
use std::path::Path;
use tracing::info;

pub(crate) use parse::{parse_invocation, Command};

pub(crate) fn run(command: Command, config: &MatchConfig) -> Result<()> {
    match command {
        Command::Recommend {
            usecase,
            skill,
            hardware,
            json,
        } => recommend_cmd(config, &usecase, &skill, hardware.as_deref(), json),
        Command::Scores {
            usecase,
            skill,
            hardware,
        } => scores_cmd(config, &usecase, &skill, hardware.as_deref()),
        Command::Scan { output } => scan_cmd(output.as_deref()),
        Command::Info { distro_id } => info_cmd(config, &distro_id),
    }
}

fn recommend_cmd(
    config: &MatchConfig,
    usecase: &str,
    skill: &str,
    hardware: Option<&Path>,
    json: bool,
) -> Result<()> {
    let catalog = Catalog::load(&config.catalog_path)?;
    let profiles = ProfileTable::load_or_empty(config.profiles_path.as_deref());
    let snapshot = obtain_hardware(hardware)?;

    let result = recommend_and_explain(&snapshot, usecase, skill, &catalog, &profiles);
    info!(candidates = result.top_3.len(), "recommendation ready");

    if json {
        let rendered =
            serde_json::to_string_pretty(&result).context("serializing recommendation")?;
        println!("{rendered}");
    } else {
        println!("{}", report::render_results(&result));
    }
    Ok(())
}

fn scores_cmd(
    config: &MatchConfig,
    usecase: &str,
    skill: &str,
    hardware: Option<&Path>,
) -> Result<()> {
    let catalog = Catalog::load(&config.catalog_path)?;
    let snapshot = obtain_hardware(hardware)?;
    let usecase = UseCase::parse(usecase);

    println!(
        "{:<20} {:>8} {:>6} {:>8} {:>7} {:>6} {:>6} {:>7}",
        "distro", "hardware", "bonus", "usecase", "skill", "stab", "perf", "final"
    );
    for candidate in rank_all(&snapshot, &usecase, skill, &catalog) {
        let b = score_breakdown(candidate.distro, &snapshot, &usecase, skill);
        println!(
            "{:<20} {:>8.2} {:>6.1} {:>8.1} {:>7.1} {:>6.1} {:>6.1} {:>7.2}",
            candidate.name,
            b.hardware,
            b.intelligence_bonus,
            b.usecase,
            b.skill,
            b.stability,
            b.performance,
            b.final_score
        );
    }
    for distro in catalog.iter() {
        if let Some(reason) = exclusion_for(distro, &usecase) {
            println!("{:<20} excluded: {}", distro.name(), reason);
        }
    }
    Ok(())
}

fn scan_cmd(output: Option<&Path>) -> Result<()> {
    let snapshot = scan_host();
    let rendered = serde_json::to_string_pretty(&snapshot).context("serializing hardware snapshot")?;
    match output {
        Some(path) => {
            fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("writing hardware snapshot '{}'", path.display()))?;
            println!("[scan] hardware snapshot written to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn info_cmd(config: &MatchConfig, distro_id: &str) -> Result<()> {
    let profiles_path = config
        .profiles_path
        .as_deref()
        .context("no profiles file configured")?;
    let profiles = ProfileTable::try_load(profiles_path)?;

    let Some(profile) = profiles
        .get(distro_id)
        .or_else(|| profiles.get(&report::profile_id_for_name(distro_id)))
    else {
        bail!("no profile found for '{}'", distro_id);
    };

    let name = Catalog::load(&config.catalog_path)
        .ok()
        .and_then(|catalog| catalog.get(distro_id).map(|d| d.name().to_string()))
        .unwrap_or_else(|| distro_id.to_string());
    print!("{}", report::render_profile_card(&name, profile));
    Ok(())
}

fn obtain_hardware(path: Option<&Path>) -> Result<HardwareSnapshot> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading hardware snapshot '{}'", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing hardware snapshot '{}'", path.display()))
        }
        None => Ok(scan_host()),
    }
}

fn scan_host() -> HardwareSnapshot {
    if !preflight::sysfs_available(Path::new("/")) {
        eprintln!("[scan] /proc or /sys not readable; memory and storage will be unknown");
    }
    if let Some(notice) = preflight::probe_notice(&preflight::missing_probe_tools()) {
        eprintln!("[scan] {notice}");
    }
    scan::scan_system()
}
