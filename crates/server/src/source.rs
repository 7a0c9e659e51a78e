//! Fontes de métricas do host.
//!
//! [`MetricSource`] é a fronteira entre o sampler e o sistema operacional.
//! [`ProcSource`] é a implementação Linux baseada em `/proc`, sysfs e
//! `nvidia-smi`. A fonte não guarda estado: CPU e rede devolvem contadores
//! acumulados e os deltas ficam no [`Sampler`](crate::sampler::Sampler).
//!
//! Nenhuma leitura falha com erro: `None` significa "indisponível".

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::gpu::GpuQuery;
use crate::procfs::{parse_loadavg, parse_millidegrees, CpuTimes, MemInfo, NetCounters};

/// Interfaces de rede monitoradas, em ordem de preferência no arquivo.
pub const NET_INTERFACES: [&str; 2] = ["eth0", "wlan0"];

/// Leituras pontuais do host, chamadas em paralelo por várias sessões.
pub trait MetricSource: Send + Sync {
    /// Contadores acumulados de CPU (user, nice, system, idle).
    fn cpu_times(&self) -> Option<CpuTimes>;
    fn cpu_temp(&self) -> Option<f32>;
    fn ram_usage(&self) -> Option<f32>;
    /// Pode levar centenas de ms (processo externo).
    fn gpu_temp(&self) -> Option<f32>;
    /// Bytes acumulados da primeira interface monitorada encontrada.
    fn net_counters(&self) -> Option<NetCounters>;
    fn load_avg(&self) -> Option<f32>;
}

/// Caminhos lidos pelo [`ProcSource`].
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub stat: PathBuf,
    pub meminfo: PathBuf,
    pub net_dev: PathBuf,
    pub loadavg: PathBuf,
    pub thermal: PathBuf,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self::under("/proc", "/sys/class/thermal/thermal_zone0/temp")
    }
}

impl SourcePaths {
    /// Layout de `/proc` a partir de outra raiz.
    pub fn under(proc_root: impl AsRef<Path>, thermal: impl Into<PathBuf>) -> Self {
        let root = proc_root.as_ref();
        Self {
            stat: root.join("stat"),
            meminfo: root.join("meminfo"),
            net_dev: root.join("net").join("dev"),
            loadavg: root.join("loadavg"),
            thermal: thermal.into(),
        }
    }
}

/// Fonte Linux.
pub struct ProcSource {
    paths: SourcePaths,
    gpu: GpuQuery,
}

impl ProcSource {
    pub fn new(paths: SourcePaths) -> Self {
        Self {
            paths,
            gpu: GpuQuery::default(),
        }
    }
}

fn read(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            debug!("Falha ao ler {}: {e}", path.display());
            None
        }
    }
}

impl MetricSource for ProcSource {
    fn cpu_times(&self) -> Option<CpuTimes> {
        CpuTimes::parse(&read(&self.paths.stat)?)
    }

    fn cpu_temp(&self) -> Option<f32> {
        parse_millidegrees(&read(&self.paths.thermal)?)
    }

    fn ram_usage(&self) -> Option<f32> {
        MemInfo::parse(&read(&self.paths.meminfo)?)?.usage_percent()
    }

    fn gpu_temp(&self) -> Option<f32> {
        self.gpu.temperature()
    }

    fn net_counters(&self) -> Option<NetCounters> {
        NetCounters::parse(&read(&self.paths.net_dev)?, &NET_INTERFACES)
    }

    fn load_avg(&self) -> Option<f32> {
        parse_loadavg(&read(&self.paths.loadavg)?)
    }
}

// ──────────────────────────────────────────────
// /proc falso para testes
// ──────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Diretório temporário com um `/proc` falso, removido no drop.
    pub struct FakeProc {
        pub root: PathBuf,
    }

    impl FakeProc {
        pub fn new(name: &str) -> Self {
            let root = std::env::temp_dir().join(format!(
                "monitor-server-{}-{name}",
                std::process::id()
            ));
            fs::create_dir_all(root.join("net")).unwrap();
            Self { root }
        }

        pub fn write(&self, rel: &str, content: &str) {
            fs::write(self.root.join(rel), content).unwrap();
        }

        pub fn source(&self) -> ProcSource {
            ProcSource {
                gpu: GpuQuery::new("/nonexistent/bin/nvidia-smi-missing", ["-q"]),
                ..ProcSource::new(SourcePaths::under(&self.root, self.root.join("thermal_temp")))
            }
        }
    }

    impl Drop for FakeProc {
        fn drop(&mut self) {
            fs::remove_dir_all(&self.root).ok();
        }
    }

    pub fn net_dev(rx: u64, tx: u64) -> String {
        format!(
            "Inter-|   Receive |  Transmit\n face |bytes packets|bytes packets\n\
                 lo: 5 1 0 0 0 0 0 0 5 1 0 0 0 0 0 0\n\
               eth0: {rx} 10 0 0 0 0 0 0 {tx} 10 0 0 0 0 0 0\n"
        )
    }
}
