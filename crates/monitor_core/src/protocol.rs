//! Protocolo de streaming sobre TCP.
//!
//! Sem handshake, sem header, sem prefixo de tamanho. O cliente conecta e
//! recebe um registro por intervalo:
//!
//! ```text
//! ┌───────────┬──────────┬───────────┬──────────┬──────────┬──────────┬──────────┬──────────┐
//! │ cpu_usage │ cpu_temp │ ram_usage │ gpu_temp │ net_recv │ net_sent │ load_avg │ max_load │
//! └───────────┴──────────┴───────────┴──────────┴──────────┴──────────┴──────────┴──────────┘
//!    8 × f32 IEEE-754 little-endian, sem padding = 32 bytes
//! ```
//!
//! O encoding legado do bincode 1 (inteiros fixos, little-endian) produz
//! exatamente esse layout para uma struct de oito `f32`.

use std::time::Duration;

use crate::types::Snapshot;

/// Tamanho de um registro no fio.
pub const RECORD_SIZE: usize = 32;

/// Porta TCP padrão.
pub const DEFAULT_PORT: u16 = 4444;

/// Intervalo entre registros de uma sessão.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Um registro pronto para `write_all`.
pub type Frame = [u8; RECORD_SIZE];

/// Erros do protocolo.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Registro muito curto ({0} bytes, esperado {RECORD_SIZE})")]
    TooShort(usize),

    #[error("Registro com tamanho inesperado: {0} bytes (esperado {RECORD_SIZE})")]
    SizeMismatch(usize),

    #[error("Erro de serialização: {0}")]
    Serialize(String),

    #[error("Erro de deserialização: {0}")]
    Deserialize(String),
}

/// Codifica um [`Snapshot`] em um registro de 32 bytes.
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<Frame, ProtocolError> {
    let body =
        bincode::serialize(snapshot).map_err(|e| ProtocolError::Serialize(e.to_string()))?;
    let len = body.len();
    body.try_into()
        .map_err(|_| ProtocolError::SizeMismatch(len))
}

/// Decodifica o primeiro registro de `data`.
///
/// Bytes além dos 32 primeiros são ignorados; o chamador avança o buffer.
pub fn decode_snapshot(data: &[u8]) -> Result<Snapshot, ProtocolError> {
    if data.len() < RECORD_SIZE {
        return Err(ProtocolError::TooShort(data.len()));
    }

    bincode::deserialize(&data[..RECORD_SIZE])
        .map_err(|e| ProtocolError::Deserialize(e.to_string()))
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
