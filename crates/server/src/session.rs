//! Sessão de um cliente: amostra, envia 32 bytes, dorme, repete.
//!
//! A primeira falha de escrita encerra a sessão. A conexão é liberada uma
//! única vez, no drop ao sair de [`run_session`].

use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use monitor_core::protocol::encode_snapshot;
use tracing::{debug, error};

use crate::sampler::Sampler;
use crate::source::MetricSource;

/// Como uma sessão terminou.
#[derive(Debug)]
pub struct SessionEnd {
    /// Registros completos enviados
    pub records_sent: u64,
    /// Erro de escrita que encerrou a sessão
    pub cause: io::Error,
}

/// Transmite snapshots para `conn` até a escrita falhar.
pub fn run_session<S, C>(sampler: &Sampler<S>, mut conn: C, interval: Duration) -> SessionEnd
where
    S: MetricSource,
    C: Write,
{
    let mut records_sent = 0u64;

    loop {
        let cycle_start = Instant::now();

        let snapshot = sampler.take_snapshot();
        match encode_snapshot(&snapshot) {
            Ok(frame) => {
                if let Err(cause) = conn.write_all(&frame) {
                    return SessionEnd {
                        records_sent,
                        cause,
                    };
                }
                records_sent += 1;
                debug!(
                    "→ #{records_sent} | CPU {:.1}% {:.0}°C | RAM {:.0}% | GPU {:.0}°C | ↓{:.1}KB ↑{:.1}KB | load {:.2} (máx {:.2})",
                    snapshot.cpu_usage,
                    snapshot.cpu_temp,
                    snapshot.ram_usage,
                    snapshot.gpu_temp,
                    snapshot.net_recv,
                    snapshot.net_sent,
                    snapshot.load_avg,
                    snapshot.max_load
                );
            }
            Err(e) => error!("Erro ao serializar snapshot: {e}"),
        }

        // Dormir pelo tempo restante do intervalo
        let elapsed = cycle_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}
