//! Parsers dos arquivos texto de `/proc` e `/sys`.
//!
//! Funções puras: recebem o conteúdo já lido e devolvem `None` quando o
//! formato não bate. A leitura dos arquivos fica em [`crate::source`].

// ──────────────────────────────────────────────
// /proc/stat
// ──────────────────────────────────────────────

/// Contadores acumulados da linha agregada `cpu ` (em ticks).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
}

impl CpuTimes {
    /// Extrai user, nice, system e idle da linha `cpu ` de `/proc/stat`.
    pub fn parse(stat: &str) -> Option<Self> {
        let line = stat.lines().find(|l| l.starts_with("cpu "))?;
        let mut nums = line
            .split_whitespace()
            .skip(1)
            .map(|x| x.parse::<u64>().ok());

        Some(Self {
            user: nums.next()??,
            nice: nums.next()??,
            system: nums.next()??,
            idle: nums.next()??,
        })
    }

    fn busy(&self) -> u64 {
        self.user
            .wrapping_add(self.nice)
            .wrapping_add(self.system)
    }

    /// Percentual ocupado entre `prev` e `self`.
    ///
    /// Diferenças com sinal: se um contador voltar (wraparound) o valor sai
    /// de [0, 100] nesse tick. Sem ticks decorridos, retorna 0.
    pub fn usage_since(&self, prev: &CpuTimes) -> f32 {
        let busy = self.busy().wrapping_sub(prev.busy()) as i64;
        let idle = self.idle.wrapping_sub(prev.idle) as i64;
        let total = busy.wrapping_add(idle);

        if total == 0 {
            0.0
        } else {
            (100.0 * busy as f64 / total as f64) as f32
        }
    }
}

// ──────────────────────────────────────────────
// /proc/meminfo
// ──────────────────────────────────────────────

/// Campos de `/proc/meminfo` usados no cálculo de RAM (kB).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemInfo {
    pub total_kb: u64,
    pub available_kb: u64,
}

impl MemInfo {
    /// Exige `MemTotal` e `MemAvailable`, em qualquer ordem.
    pub fn parse(meminfo: &str) -> Option<Self> {
        let mut total = None;
        let mut available = None;

        for line in meminfo.lines() {
            let Some((key, rest)) = line.split_once(':') else {
                continue;
            };
            let slot = match key.trim() {
                "MemTotal" => &mut total,
                "MemAvailable" => &mut available,
                _ => continue,
            };
            *slot = rest.split_whitespace().next().and_then(|v| v.parse().ok());
        }

        Some(Self {
            total_kb: total?,
            available_kb: available?,
        })
    }

    /// `100 * (total - available) / total`; `None` se `total == 0`.
    pub fn usage_percent(&self) -> Option<f32> {
        if self.total_kb == 0 {
            return None;
        }
        let used = self.total_kb.saturating_sub(self.available_kb);
        Some((100.0 * used as f64 / self.total_kb as f64) as f32)
    }
}

// ──────────────────────────────────────────────
// /proc/net/dev
// ──────────────────────────────────────────────

/// Bytes acumulados de uma interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetCounters {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

/// KB trafegados entre duas leituras.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NetUsage {
    pub recv_kb: f32,
    pub sent_kb: f32,
}

impl NetCounters {
    /// Primeira linha cuja interface está em `interfaces`, na ordem do arquivo.
    ///
    /// Recebidos = 1º contador, enviados = 9º contador.
    pub fn parse(net_dev: &str, interfaces: &[&str]) -> Option<Self> {
        for line in net_dev.lines() {
            let Some((name, counters)) = line.split_once(':') else {
                continue;
            };
            if !interfaces.contains(&name.trim()) {
                continue;
            }

            let fields: Vec<&str> = counters.split_whitespace().collect();
            return Some(Self {
                rx_bytes: fields.first()?.parse().ok()?,
                tx_bytes: fields.get(8)?.parse().ok()?,
            });
        }
        None
    }

    pub fn usage_since(&self, prev: &NetCounters) -> NetUsage {
        let recv = self.rx_bytes.wrapping_sub(prev.rx_bytes) as i64;
        let sent = self.tx_bytes.wrapping_sub(prev.tx_bytes) as i64;
        NetUsage {
            recv_kb: (recv as f64 / 1024.0) as f32,
            sent_kb: (sent as f64 / 1024.0) as f32,
        }
    }
}

// ──────────────────────────────────────────────
// /proc/loadavg e thermal_zone
// ──────────────────────────────────────────────

/// Load average de 1 minuto (primeiro campo).
pub fn parse_loadavg(loadavg: &str) -> Option<f32> {
    loadavg.split_whitespace().next()?.parse().ok()
}

/// Converte miligraus (`45000`) em °C (`45.0`).
pub fn parse_millidegrees(raw: &str) -> Option<f32> {
    let milli: i64 = raw.trim().parse().ok()?;
    Some(milli as f32 / 1000.0)
}
