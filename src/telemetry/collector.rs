// src/telemetry/collector.rs
// Host metrics snapshot, read synchronously at request time.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use sysinfo::{Disks, Networks, System};
use tracing::warn;

/// How many processes the snapshot reports, sorted by CPU usage.
const TOP_PROCESSES: usize = 20;

#[derive(Debug, Clone, Serialize)]
pub struct MemoryUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiskUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub memory_percent: f32,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddressInfo {
    pub address: String,
    pub prefix: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterfaceStats {
    /// Link state from the OS where exposed; null elsewhere.
    pub up: Option<bool>,
    pub duplex: Option<String>,
    pub speed_mbps: Option<u64>,
    pub mtu: u64,
    pub mac_address: String,
    pub bytes_received: u64,
    pub bytes_transmitted: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterfaceInfo {
    pub addresses: Vec<AddressInfo>,
    pub stats: InterfaceStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemInfoSnapshot {
    /// Seconds since boot.
    pub uptime: u64,
    pub cpu_usage: f32,
    pub cpu_count: usize,
    pub memory_usage: MemoryUsage,
    /// Root volume usage; omitted when no mounted volume is visible.
    pub disk_usage: Option<DiskUsage>,
    /// 1/5/15-minute load averages, zero-filled on platforms without them.
    pub load_average: [f64; 3],
    pub processes: usize,
    pub top_processes: Vec<ProcessInfo>,
    pub network: BTreeMap<String, InterfaceInfo>,
    pub hostname: Option<String>,
    pub platform: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Collects host metrics using sysinfo. A fresh System is refreshed per
/// request; nothing is cached between snapshots.
pub struct SystemInfoCollector {
    /// Interval between the two CPU refreshes that produce the utilization
    /// percentage. The snapshot deliberately waits this long per request to
    /// get an interval-based figure rather than an instantaneous guess.
    cpu_sample_interval: Duration,
}

impl Default for SystemInfoCollector {
    fn default() -> Self {
        Self {
            cpu_sample_interval: Duration::from_secs(1),
        }
    }
}

impl SystemInfoCollector {
    pub fn with_cpu_sample_interval(interval: Duration) -> Self {
        Self {
            cpu_sample_interval: interval,
        }
    }

    /// Capture a full snapshot of host state. Sub-metric failures degrade
    /// to omitted or zeroed fields, never an error.
    pub async fn snapshot(&self) -> SystemInfoSnapshot {
        let mut system = System::new_all();
        system.refresh_all();

        // Second CPU refresh after the sample interval; utilization is
        // computed over the elapsed window.
        tokio::time::sleep(self.cpu_sample_interval).await;
        system.refresh_cpu_usage();
        // Refresh per-process CPU over the same window.
        system.refresh_processes(sysinfo::ProcessesToUpdate::All, true);

        let total_memory = system.total_memory();
        let used_memory = system.used_memory();
        let memory_usage = MemoryUsage {
            total: total_memory,
            used: used_memory,
            free: system.available_memory(),
            percentage: percentage(used_memory, total_memory),
        };

        let load = System::load_average();

        SystemInfoSnapshot {
            uptime: System::uptime(),
            cpu_usage: system.global_cpu_usage(),
            cpu_count: system.cpus().len(),
            memory_usage,
            disk_usage: root_disk_usage(),
            load_average: [load.one, load.five, load.fifteen],
            processes: system.processes().len(),
            top_processes: top_processes(&system, TOP_PROCESSES),
            network: network_interfaces(),
            hostname: System::host_name(),
            platform: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
            timestamp: chrono::Utc::now(),
        }
    }

    /// Top processes by CPU usage over a short sampling window.
    pub async fn processes(&self) -> Vec<ProcessInfo> {
        let mut system = System::new_all();
        system.refresh_all();
        tokio::time::sleep(self.cpu_sample_interval).await;
        system.refresh_processes(sysinfo::ProcessesToUpdate::All, true);
        top_processes(&system, TOP_PROCESSES)
    }

    pub fn network(&self) -> BTreeMap<String, InterfaceInfo> {
        network_interfaces()
    }
}

fn percentage(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    used as f64 / total as f64 * 100.0
}

/// Usage for the root volume. Falls back to the largest mounted volume
/// when nothing is mounted at "/" (e.g. Windows).
fn root_disk_usage() -> Option<DiskUsage> {
    let disks = Disks::new_with_refreshed_list();
    let disk = disks
        .list()
        .iter()
        .find(|d| d.mount_point() == std::path::Path::new("/"))
        .or_else(|| disks.list().iter().max_by_key(|d| d.total_space()))?;

    let total = disk.total_space();
    if total == 0 {
        warn!("Root volume reports zero capacity, omitting disk usage");
        return None;
    }
    let free = disk.available_space();
    let used = total.saturating_sub(free);
    Some(DiskUsage {
        total,
        used,
        free,
        percentage: percentage(used, total),
    })
}

fn top_processes(system: &System, limit: usize) -> Vec<ProcessInfo> {
    let total_memory = system.total_memory();
    let mut processes: Vec<ProcessInfo> = system
        .processes()
        .iter()
        .map(|(pid, proc)| ProcessInfo {
            pid: pid.as_u32(),
            name: proc.name().to_string_lossy().into_owned(),
            cpu_percent: proc.cpu_usage(),
            memory_percent: percentage(proc.memory(), total_memory) as f32,
            status: proc.status().to_string(),
        })
        .collect();
    processes.sort_by(|a, b| {
        b.cpu_percent
            .partial_cmp(&a.cpu_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    processes.truncate(limit);
    processes
}

fn network_interfaces() -> BTreeMap<String, InterfaceInfo> {
    let networks = Networks::new_with_refreshed_list();
    networks
        .iter()
        .map(|(name, data)| {
            let addresses = data
                .ip_networks()
                .iter()
                .map(|ip| AddressInfo {
                    address: ip.addr.to_string(),
                    prefix: ip.prefix,
                })
                .collect();
            let (up, duplex, speed_mbps) = link_state(name);
            let info = InterfaceInfo {
                addresses,
                stats: InterfaceStats {
                    up,
                    duplex,
                    speed_mbps,
                    mtu: data.mtu(),
                    mac_address: data.mac_address().to_string(),
                    bytes_received: data.total_received(),
                    bytes_transmitted: data.total_transmitted(),
                },
            };
            (name.clone(), info)
        })
        .collect()
}

/// Link state, duplex, and speed from /sys/class/net. Any unreadable
/// attribute is reported as null; virtual interfaces routinely lack them.
#[cfg(target_os = "linux")]
fn link_state(name: &str) -> (Option<bool>, Option<String>, Option<u64>) {
    fn read_attr(name: &str, attr: &str) -> Option<String> {
        std::fs::read_to_string(format!("/sys/class/net/{}/{}", name, attr))
            .ok()
            .map(|s| s.trim().to_string())
    }

    let up = read_attr(name, "operstate").map(|s| s == "up");
    let duplex = read_attr(name, "duplex");
    let speed_mbps = read_attr(name, "speed")
        .and_then(|s| s.parse::<i64>().ok())
        .filter(|v| *v > 0)
        .map(|v| v as u64);
    (up, duplex, speed_mbps)
}

#[cfg(not(target_os = "linux"))]
fn link_state(_name: &str) -> (Option<bool>, Option<String>, Option<u64>) {
    (None, None, None)
}
