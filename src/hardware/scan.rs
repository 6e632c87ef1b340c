//! Best-effort Linux hardware scanner.
//!
//! Reads `/proc`, `/sys` and os-release directly and shells out to the usual
//! inspection tools (`lspci`, `lsusb`, `xinput`, `xdpyinfo`). A probe that
//! cannot run simply leaves its field unset; scanning never fails.

use super::{CpuInfo, GpuInfo, HardwareSnapshot, RamInfo, StorageInfo, SystemInfo};
use std::env::consts::ARCH;
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Displays at or above this density count as HiDPI.
pub const HIDPI_THRESHOLD_DPI: u32 = 140;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Raw text captured from the external inspection tools.
#[derive(Debug, Clone, Default)]
pub struct ProbeOutputs {
    pub lspci: Option<String>,
    pub lsusb: Option<String>,
    pub xinput: Option<String>,
    pub xdpyinfo: Option<String>,
}

impl ProbeOutputs {
    /// Run every available probe on the host.
    pub fn capture() -> Self {
        Self {
            lspci: command_output("lspci", &[]),
            lsusb: command_output("lsusb", &[]),
            xinput: command_output("xinput", &["--list"]),
            xdpyinfo: command_output("xdpyinfo", &[]),
        }
    }
}

/// Scan the running system.
pub fn scan_system() -> HardwareSnapshot {
    snapshot_from(Path::new("/"), &ProbeOutputs::capture())
}

/// Build a snapshot from a filesystem root and captured tool output.
pub fn snapshot_from(root: &Path, probes: &ProbeOutputs) -> HardwareSnapshot {
    let lspci = probes.lspci.as_deref().unwrap_or_default();
    let lsusb = probes.lsusb.as_deref().unwrap_or_default();

    let gpu_model = parse_gpu_model(lspci);
    let total_gb = fs::read_to_string(root.join("proc/meminfo"))
        .ok()
        .and_then(|meminfo| parse_meminfo_total_gb(&meminfo));
    let storage = detect_storage(&root.join("sys/block"));

    let snapshot = HardwareSnapshot {
        gpu: gpu_model.map(|model| GpuInfo {
            gpu_model: Some(model),
        }),
        ram: total_gb.map(|gb| RamInfo { total_gb: Some(gb) }),
        storage: storage.map(|kind| StorageInfo {
            kind: Some(kind.to_string()),
        }),
        is_laptop: has_battery(&root.join("sys/class/power_supply")),
        touchscreen: probes
            .xinput
            .as_deref()
            .is_some_and(mentions_touchscreen),
        hidpi: probes
            .xdpyinfo
            .as_deref()
            .and_then(parse_dpi)
            .is_some_and(|dpi| dpi >= HIDPI_THRESHOLD_DPI),
        optimus: is_optimus(lspci),
        amd_apu: is_amd_apu(lspci),
        egpu: is_egpu(lsusb),
        cpu: fs::read_to_string(root.join("proc/cpuinfo"))
            .ok()
            .map(|cpuinfo| parse_cpuinfo(&cpuinfo)),
        system: Some(system_info(root)),
    };
    debug!(?snapshot, "hardware scan complete");
    snapshot
}

fn read_trimmed(path: &Path) -> Option<String> {
    let text = fs::read_to_string(path).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn system_info(root: &Path) -> SystemInfo {
    let os_release = ["etc/os-release", "usr/lib/os-release"]
        .iter()
        .find_map(|rel| fs::read_to_string(root.join(rel)).ok());
    SystemInfo {
        os: read_trimmed(&root.join("proc/sys/kernel/ostype")),
        os_version: read_trimmed(&root.join("proc/sys/kernel/version")),
        machine: Some(ARCH.to_string()),
        distribution: os_release.as_deref().and_then(parse_os_release_name),
    }
}

fn command_output(cmd: &str, args: &[&str]) -> Option<String> {
    let path = which::which(cmd).ok()?;
    let output = Command::new(path).args(args).output().ok()?;
    if !output.status.success() {
        debug!(cmd, status = %output.status, "probe exited unsuccessfully");
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// First display controller in `lspci` output, without the bus/class prefix.
///
/// `00:02.0 VGA compatible controller: Intel Corporation UHD Graphics 620`
/// yields `Intel Corporation UHD Graphics 620`.
pub fn parse_gpu_model(lspci: &str) -> Option<String> {
    let line = lspci
        .lines()
        .find(|line| line.contains("VGA") || line.contains("3D"))?;
    let model = match line.split_once(": ") {
        Some((_, model)) => model.trim(),
        None => line.trim(),
    };
    (!model.is_empty()).then(|| model.to_string())
}

/// `MemTotal` from `/proc/meminfo`, in GB rounded to two decimals.
pub fn parse_meminfo_total_gb(meminfo: &str) -> Option<f64> {
    let line = meminfo.lines().find(|l| l.starts_with("MemTotal:"))?;
    let kib: f64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(((kib * 1024.0 / GIB) * 100.0).round() / 100.0)
}

/// CPU model, logical processor count and feature flags from `/proc/cpuinfo`.
///
/// x86 kernels report `model name` and `flags`; ARM kernels use `Model` (or
/// `Hardware`) and `Features`.
pub fn parse_cpuinfo(cpuinfo: &str) -> CpuInfo {
    let field = |keys: &[&str]| {
        cpuinfo.lines().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            keys.contains(&key.trim()).then(|| value.trim().to_string())
        })
    };
    let cores = cpuinfo
        .lines()
        .filter(|line| line.split(':').next().is_some_and(|key| key.trim() == "processor"))
        .count();

    CpuInfo {
        cpu_model: field(&["model name", "Model", "Hardware"]).filter(|m| !m.is_empty()),
        architecture: Some(ARCH.to_string()),
        cores: u32::try_from(cores).ok().filter(|n| *n > 0),
        flags: field(&["flags", "Features"])
            .map(|flags| flags.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default(),
    }
}

/// `PRETTY_NAME` (or `NAME`) from an os-release file, unquoted.
pub fn parse_os_release_name(os_release: &str) -> Option<String> {
    let lookup = |key: &str| {
        os_release.lines().find_map(|line| {
            let value = line.strip_prefix(key)?.strip_prefix('=')?;
            let value = value.trim().trim_matches(|c: char| c == '"' || c == '\'');
            (!value.is_empty()).then(|| value.to_string())
        })
    };
    lookup("PRETTY_NAME").or_else(|| lookup("NAME"))
}

fn detect_storage(sys_block: &Path) -> Option<&'static str> {
    if sys_block.join("nvme0n1").exists() {
        return Some("NVMe SSD");
    }
    let rotational = fs::read_to_string(sys_block.join("sda/queue/rotational")).ok()?;
    match rotational.trim() {
        "0" => Some("SSD"),
        _ => Some("HDD"),
    }
}

fn has_battery(power_supply: &Path) -> bool {
    let Ok(entries) = fs::read_dir(power_supply) else {
        return false;
    };
    entries
        .flatten()
        .any(|entry| entry.file_name().to_string_lossy().starts_with("BAT"))
}

pub fn mentions_touchscreen(xinput: &str) -> bool {
    let text = xinput.to_lowercase();
    text.contains("touchscreen") || text.contains("touch screen")
}

/// Horizontal dpi from `xdpyinfo`'s `resolution: 163x163 dots per inch` line.
pub fn parse_dpi(xdpyinfo: &str) -> Option<u32> {
    let line = xdpyinfo.lines().find(|l| l.contains("dots per inch"))?;
    let before = line.split("dots per inch").next()?;
    let token = before.split_whitespace().last()?;
    token.split('x').next()?.parse().ok()
}

pub fn is_optimus(lspci: &str) -> bool {
    let text = lspci.to_lowercase();
    text.contains("nvidia") && text.contains("intel")
}

pub fn is_amd_apu(lspci: &str) -> bool {
    let text = lspci.to_lowercase();
    text.contains("amd") && text.contains("graphics") && !text.contains("radeon")
}

pub fn is_egpu(lsusb: &str) -> bool {
    let text = lsusb.to_lowercase();
    text.contains("thunderbolt") && (text.contains("nvidia") || text.contains("amd"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LSPCI_OPTIMUS: &str = "\
00:00.0 Host bridge: Intel Corporation Xeon E3-1200 v6/7th Gen Core Processor Host Bridge
00:02.0 VGA compatible controller: Intel Corporation UHD Graphics 620 (rev 07)
01:00.0 3D controller: NVIDIA Corporation GP108M [GeForce MX150] (rev a1)
";

    #[test]
    fn test_parse_gpu_model_takes_first_display_controller() {
        assert_eq!(
            parse_gpu_model(LSPCI_OPTIMUS).as_deref(),
            Some("Intel Corporation UHD Graphics 620 (rev 07)")
        );
        assert_eq!(parse_gpu_model("00:1f.3 Audio device: Intel"), None);
    }

    #[test]
    fn test_parse_meminfo() {
        let meminfo = "MemTotal:       16303740 kB\nMemFree:         1234567 kB\n";
        assert_eq!(parse_meminfo_total_gb(meminfo), Some(15.55));
        assert_eq!(parse_meminfo_total_gb("MemFree: 1 kB"), None);
    }

    #[test]
    fn test_parse_dpi() {
        let out = "screen #0:\n  dimensions:    3840x2160 pixels (598x336 millimeters)\n  resolution:    163x163 dots per inch\n";
        assert_eq!(parse_dpi(out), Some(163));
        assert_eq!(parse_dpi("no display"), None);
    }

    #[test]
    fn test_gpu_environment_detection() {
        assert!(is_optimus(LSPCI_OPTIMUS));
        assert!(!is_amd_apu(LSPCI_OPTIMUS));
        assert!(is_amd_apu(
            "05:00.0 VGA compatible controller: Advanced Micro Devices, Inc. [AMD] Cezanne Graphics"
        ));
        assert!(!is_amd_apu("AMD/ATI Navi 23 [Radeon RX 6600] graphics"));
        assert!(is_egpu("Bus 003: Thunderbolt controller, NVIDIA enclosure"));
        assert!(!is_egpu("Bus 001: Logitech USB Receiver"));
    }

    #[test]
    fn test_touchscreen_detection() {
        assert!(mentions_touchscreen("⎜   ↳ ELAN Touchscreen  id=11"));
        assert!(mentions_touchscreen("Wacom Touch Screen Finger"));
        assert!(!mentions_touchscreen("SynPS/2 Synaptics TouchPad"));
    }

    #[test]
    fn test_snapshot_from_fake_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("proc")).unwrap();
        fs::write(root.join("proc/meminfo"), "MemTotal: 8388608 kB\n").unwrap();
        fs::create_dir_all(root.join("sys/block/sda/queue")).unwrap();
        fs::write(root.join("sys/block/sda/queue/rotational"), "1\n").unwrap();
        fs::create_dir_all(root.join("sys/class/power_supply/BAT0")).unwrap();

        let probes = ProbeOutputs {
            lspci: Some(LSPCI_OPTIMUS.to_string()),
            xdpyinfo: Some("  resolution:    96x96 dots per inch".to_string()),
            ..Default::default()
        };
        let hw = snapshot_from(root, &probes);

        assert_eq!(hw.ram_total_gb(), Some(8.0));
        assert_eq!(hw.storage_type(), Some("HDD"));
        assert!(hw.is_laptop);
        assert!(hw.optimus);
        assert!(!hw.hidpi);
        assert!(!hw.touchscreen);
        assert!(!hw.egpu);
    }

    #[test]
    fn test_parse_cpuinfo_x86() {
        let cpuinfo = "\
processor\t: 0
model name\t: AMD Ryzen 7 5800H with Radeon Graphics
flags\t\t: fpu sse2 avx2

processor\t: 1
model name\t: AMD Ryzen 7 5800H with Radeon Graphics
flags\t\t: fpu sse2 avx2
";
        let cpu = parse_cpuinfo(cpuinfo);
        assert_eq!(
            cpu.cpu_model.as_deref(),
            Some("AMD Ryzen 7 5800H with Radeon Graphics")
        );
        assert_eq!(cpu.cores, Some(2));
        assert_eq!(cpu.flags, vec!["fpu", "sse2", "avx2"]);
        assert_eq!(cpu.architecture.as_deref(), Some(ARCH));
    }

    #[test]
    fn test_parse_cpuinfo_arm_and_empty() {
        let cpu = parse_cpuinfo("processor\t: 0\nFeatures\t: fp asimd\nModel\t\t: Raspberry Pi 4 Model B\n");
        assert_eq!(cpu.cpu_model.as_deref(), Some("Raspberry Pi 4 Model B"));
        assert_eq!(cpu.flags, vec!["fp", "asimd"]);
        assert_eq!(cpu.cores, Some(1));

        let cpu = parse_cpuinfo("");
        assert_eq!(cpu.cpu_model, None);
        assert_eq!(cpu.cores, None);
        assert!(cpu.flags.is_empty());
    }

    #[test]
    fn test_parse_os_release_name() {
        let release = "NAME=\"Fedora Linux\"\nVERSION_ID=40\nPRETTY_NAME=\"Fedora Linux 40 (Workstation Edition)\"\n";
        assert_eq!(
            parse_os_release_name(release).as_deref(),
            Some("Fedora Linux 40 (Workstation Edition)")
        );
        assert_eq!(parse_os_release_name("NAME=Alpine\n").as_deref(), Some("Alpine"));
        assert_eq!(parse_os_release_name("ID=arch\n"), None);
    }

    #[test]
    fn test_snapshot_reads_cpu_and_system() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("proc/sys/kernel")).unwrap();
        fs::write(root.join("proc/cpuinfo"), "processor : 0\nmodel name : Test CPU\n").unwrap();
        fs::write(root.join("proc/sys/kernel/ostype"), "Linux\n").unwrap();
        fs::write(root.join("proc/sys/kernel/version"), "#1 SMP PREEMPT_DYNAMIC\n").unwrap();
        fs::create_dir_all(root.join("etc")).unwrap();
        fs::write(root.join("etc/os-release"), "PRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"\n").unwrap();

        let hw = snapshot_from(root, &ProbeOutputs::default());
        let cpu = hw.cpu.as_ref().unwrap();
        assert_eq!(cpu.cpu_model.as_deref(), Some("Test CPU"));
        assert_eq!(cpu.cores, Some(1));
        let system = hw.system.as_ref().unwrap();
        assert_eq!(system.os.as_deref(), Some("Linux"));
        assert_eq!(system.os_version.as_deref(), Some("#1 SMP PREEMPT_DYNAMIC"));
        assert_eq!(system.machine.as_deref(), Some(ARCH));
        assert_eq!(
            system.distribution.as_deref(),
            Some("Debian GNU/Linux 12 (bookworm)")
        );

        let json = serde_json::to_value(&hw).unwrap();
        assert_eq!(json["cpu"]["cpu_model"], "Test CPU");
        assert_eq!(json["system"]["os"], "Linux");
    }

    #[test]
    fn test_snapshot_prefers_nvme() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("sys/block/nvme0n1")).unwrap();
        let hw = snapshot_from(temp.path(), &ProbeOutputs::default());
        assert_eq!(hw.storage_type(), Some("NVMe SSD"));
        assert_eq!(hw.gpu_model(), None);
        assert_eq!(hw.ram_total_gb(), None);
        assert!(!hw.is_laptop);
    }
}
