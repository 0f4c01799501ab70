//! Descriptive host metadata attached to parallel results.
//!
//! Nothing here influences search behaviour.
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

static HOST_INFO: Lazy<HostInfo> = Lazy::new(HostInfo::detect);

/// Processor, OS and memory description of the machine running a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostInfo {
    pub available_cores: usize,
    pub operating_system: String,
    pub cpu_architecture: String,
    pub total_memory_mb: Option<u64>,
}

impl HostInfo {
    /// Returns the host description, detected once per process
    pub fn current() -> HostInfo {
        HOST_INFO.clone()
    }

    fn detect() -> HostInfo {
        let info = HostInfo {
            available_cores: num_cpus::get(),
            operating_system: std::env::consts::OS.to_string(),
            cpu_architecture: std::env::consts::ARCH.to_string(),
            total_memory_mb: total_memory_mb(),
        };
        debug!("Probed host: {:?}", info);
        info
    }
}

#[cfg(target_os = "linux")]
fn total_memory_mb() -> Option<u64> {
    let meminfo = std::fs::read_to_string("/proc/meminfo").ok()?;
    parse_mem_total_kb(&meminfo).map(|kb| kb / 1024)
}

#[cfg(not(target_os = "linux"))]
fn total_memory_mb() -> Option<u64> {
    None
}

// "MemTotal:       16318480 kB"
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_mem_total_kb(meminfo: &str) -> Option<u64> {
    meminfo
        .lines()
        .find_map(|line| line.strip_prefix("MemTotal:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|kb| kb.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_host() {
        let host = HostInfo::current();
        assert!(host.available_cores >= 1);
        assert_eq!(host.operating_system, std::env::consts::OS);
        assert_eq!(host.cpu_architecture, std::env::consts::ARCH);
        assert_eq!(host, HostInfo::current());
    }

    #[test]
    fn test_parse_mem_total() {
        let meminfo = "MemTotal:       16318480 kB\nMemFree:         1234 kB\n";
        assert_eq!(parse_mem_total_kb(meminfo), Some(16_318_480));
        assert_eq!(parse_mem_total_kb("MemFree: 12 kB\n"), None);
        assert_eq!(parse_mem_total_kb(""), None);
    }
}
