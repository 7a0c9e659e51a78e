//! Sampler – combina as leituras da fonte em um [`Snapshot`].
//!
//! Um único sampler é compartilhado (via `Arc`) por todas as sessões. Só o
//! estado de processo fica atrás do `Mutex`: contadores anteriores de CPU e
//! rede e o `max_load`. As leituras sem estado (temperaturas, RAM, GPU, load)
//! rodam fora do lock, então um `nvidia-smi` lento não segura as outras
//! sessões.

use std::sync::{Mutex, PoisonError};

use monitor_core::Snapshot;
use tracing::debug;

use crate::procfs::{CpuTimes, NetCounters, NetUsage};
use crate::source::MetricSource;

/// Estado de processo, zerado na criação.
#[derive(Debug, Default)]
struct SamplerState {
    /// Contadores de CPU da leitura anterior
    prev_cpu: CpuTimes,
    /// Bytes de rede da leitura anterior
    prev_net: NetCounters,
    /// Maior load average visto desde o início do processo
    max_load: f32,
}

impl SamplerState {
    /// Delta contra a leitura anterior; leitura falha não mexe nos contadores.
    fn cpu_usage(&mut self, source: &impl MetricSource) -> Option<f32> {
        let now = source.cpu_times()?;
        let usage = now.usage_since(&self.prev_cpu);
        self.prev_cpu = now;
        Some(usage)
    }

    fn net_usage(&mut self, source: &impl MetricSource) -> Option<NetUsage> {
        let now = source.net_counters()?;
        let usage = now.usage_since(&self.prev_net);
        self.prev_net = now;
        Some(usage)
    }
}

pub struct Sampler<S> {
    source: S,
    state: Mutex<SamplerState>,
}

/// Leitura indisponível vira 0 no fio.
fn or_zero(reading: Option<f32>, metric: &'static str) -> f32 {
    reading.unwrap_or_else(|| {
        debug!(metric, "Métrica indisponível, enviando 0");
        0.0
    })
}

impl<S: MetricSource> Sampler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(SamplerState::default()),
        }
    }

    /// Lê todas as métricas e atualiza o máximo de load.
    pub fn take_snapshot(&self) -> Snapshot {
        let cpu_temp = or_zero(self.source.cpu_temp(), "cpu_temp");
        let ram_usage = or_zero(self.source.ram_usage(), "ram_usage");
        let gpu_temp = or_zero(self.source.gpu_temp(), "gpu_temp");
        let load_avg = or_zero(self.source.load_avg(), "load_avg");

        // O estado é só números; um lock envenenado continua utilizável.
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let cpu_usage = or_zero(state.cpu_usage(&self.source), "cpu_usage");
        let net = state.net_usage(&self.source).unwrap_or_else(|| {
            debug!(metric = "net", "Métrica indisponível, enviando 0");
            NetUsage::default()
        });
        if load_avg > state.max_load {
            state.max_load = load_avg;
        }
        let max_load = state.max_load;
        drop(state);

        Snapshot {
            cpu_usage,
            cpu_temp,
            ram_usage,
            gpu_temp,
            net_recv: net.recv_kb,
            net_sent: net.sent_kb,
            load_avg,
            max_load,
        }
    }
}

// ──────────────────────────────────────────────
// Fonte roteirizada para testes
// ──────────────────────────────────────────────


#[cfg(test)]
mod tests {
    use super::testing::ScriptedSource;
    use super::*;
    use crate::source::testing::{net_dev, FakeProc};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn max_load_tracks_running_maximum() {
        let sampler = Sampler::new(ScriptedSource::with_loads(&[0.5, 0.3, 1.2, 0.9]));
        let maxes: Vec<f32> = (0..4).map(|_| sampler.take_snapshot().max_load).collect();
        assert_eq!(maxes, vec![0.5, 0.5, 1.2, 1.2]);
    }

    #[test]
    fn snapshot_carries_every_reading() {
        let sampler = Sampler::new(ScriptedSource::with_loads(&[0.7]));
        let snap = sampler.take_snapshot();
        assert_eq!(
            snap,
            Snapshot {
                cpu_usage: 12.5,
                cpu_temp: 48.0,
                ram_usage: 75.0,
                gpu_temp: 0.0,
                net_recv: 3.0,
                net_sent: 1.5,
                load_avg: 0.7,
                max_load: 0.7,
            }
        );

        // Mesmos contadores: deltas zerados
        let next = sampler.take_snapshot();
        assert_eq!((next.cpu_usage, next.net_recv, next.net_sent), (0.0, 0.0, 0.0));
    }

    #[test]
    fn max_load_never_decreases() {
        let loads = [0.1, 2.0, 0.0, 1.9, 2.5, 0.3, 2.4];
        let sampler = Sampler::new(ScriptedSource::with_loads(&loads));
        let mut last = 0.0;
        for load in loads {
            let snap = sampler.take_snapshot();
            assert_eq!(snap.load_avg, load);
            assert!(snap.max_load >= last);
            assert!(snap.max_load >= snap.load_avg);
            last = snap.max_load;
        }
        assert_eq!(sampler.take_snapshot().max_load, 2.5);
    }

    #[test]
    fn concurrent_sessions_do_not_lose_the_maximum() {
        let loads: Vec<f32> = (0..400).map(|i| i as f32 / 100.0).collect();
        let sampler = Arc::new(Sampler::new(ScriptedSource::with_loads(&loads)));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let sampler = Arc::clone(&sampler);
                thread::spawn(move || {
                    for _ in 0..100 {
                        sampler.take_snapshot();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        // Fila vazia: load 0.25, máximo preservado
        assert_eq!(sampler.take_snapshot().max_load, 3.99);
    }

    #[test]
    fn slow_gpu_query_does_not_serialize_sessions() {
        let sampler = Arc::new(Sampler::new(ScriptedSource::with_gpu_delay(
            Duration::from_millis(100),
        )));

        let start = Instant::now();
        let handles: Vec<_> = (0..15)
            .map(|_| {
                let sampler = Arc::clone(&sampler);
                thread::spawn(move || sampler.take_snapshot())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        // Em série seriam 1.5s; em paralelo, ~100ms.
        assert!(
            start.elapsed() < Duration::from_millis(800),
            "15 amostras levaram {:?}",
            start.elapsed()
        );
    }

    #[test]
    fn cpu_deltas_against_previous_sample() {
        let fake = FakeProc::new("sampler-cpu");
        fake.write("stat", "cpu  100 0 100 800 0 0 0 0 0 0\n");
        let sampler = Sampler::new(fake.source());

        // Primeira amostra: delta contra zero (ocupação desde o boot)
        assert_eq!(sampler.take_snapshot().cpu_usage, 20.0);
        assert_eq!(sampler.take_snapshot().cpu_usage, 0.0);

        fake.write("stat", "cpu  175 0 100 825 0 0 0 0 0 0\n");
        assert_eq!(sampler.take_snapshot().cpu_usage, 75.0);
    }

    #[test]
    fn unreadable_stat_keeps_previous_counters() {
        let fake = FakeProc::new("sampler-cpu-missing");
        fake.write("stat", "cpu  100 0 100 800 0 0 0 0 0 0\n");
        let sampler = Sampler::new(fake.source());
        sampler.take_snapshot();

        std::fs::remove_file(fake.root.join("stat")).unwrap();
        assert_eq!(sampler.take_snapshot().cpu_usage, 0.0);

        fake.write("stat", "cpu  150 0 100 850 0 0 0 0 0 0\n");
        assert_eq!(sampler.take_snapshot().cpu_usage, 50.0);
    }

    #[test]
    fn net_deltas_anchor_at_zero_and_skip_missing_interface() {
        let fake = FakeProc::new("sampler-net");
        fake.write("net/dev", &net_dev(10_240, 2_048));
        let sampler = Sampler::new(fake.source());

        let first = sampler.take_snapshot();
        assert_eq!((first.net_recv, first.net_sent), (10.0, 2.0));

        fake.write("net/dev", "Inter-|\n face |\n lo: 1 0 0 0 0 0 0 0 1 0 0 0 0 0 0 0\n");
        let missing = sampler.take_snapshot();
        assert_eq!((missing.net_recv, missing.net_sent), (0.0, 0.0));

        fake.write("net/dev", &net_dev(11_264, 2_048));
        let next = sampler.take_snapshot();
        assert_eq!((next.net_recv, next.net_sent), (1.0, 0.0));
    }
}
