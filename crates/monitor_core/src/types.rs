//! Registro de telemetria transmitido a cada intervalo.
//!
//! Um [`Snapshot`] é montado a cada tick, enviado e descartado.
//! A ordem dos campos é a ordem no fio; não reordenar.

use serde::{Deserialize, Serialize};

/// Amostra das métricas do host em um instante.
///
/// Todos os campos são `f32`. O valor `0.0` também representa
/// "indisponível" (sensor ausente, ferramenta ausente, arquivo ilegível).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    /// Uso total da CPU desde a amostra anterior (0–100%)
    pub cpu_usage: f32,
    /// Temperatura da CPU (°C)
    pub cpu_temp: f32,
    /// Uso de RAM (0–100%)
    pub ram_usage: f32,
    /// Temperatura da GPU (°C)
    pub gpu_temp: f32,
    /// KB recebidos desde a amostra anterior
    pub net_recv: f32,
    /// KB enviados desde a amostra anterior
    pub net_sent: f32,
    /// Load average de 1 minuto
    pub load_avg: f32,
    /// Maior `load_avg` visto desde o início do processo
    pub max_load: f32,
}

impl Snapshot {
    /// Campos na ordem do fio.
    pub fn fields(&self) -> [f32; 8] {
        [
            self.cpu_usage,
            self.cpu_temp,
            self.ram_usage,
            self.gpu_temp,
            self.net_recv,
            self.net_sent,
            self.load_avg,
            self.max_load,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_is_zeroed() {
        let s = Snapshot::default();
        assert!(s.fields().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn fields_follow_wire_order() {
        let s = Snapshot {
            cpu_usage: 1.0,
            cpu_temp: 2.0,
            ram_usage: 3.0,
            gpu_temp: 4.0,
            net_recv: 5.0,
            net_sent: 6.0,
            load_avg: 7.0,
            max_load: 8.0,
        };
        assert_eq!(s.fields(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }
}
