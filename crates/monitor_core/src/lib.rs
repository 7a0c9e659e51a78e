//! # Monitor Core
//!
//! Crate compartilhada com o registro de telemetria, o codec binário de
//! 32 bytes e a configuração TOML do servidor.
//!
//! ## Módulos
//! - [`types`] – [`Snapshot`], as oito métricas de um tick
//! - [`protocol`] – Encode/decode do registro e constantes do fio
//! - [`config`] – Configuração via TOML

pub mod types;
pub mod protocol;
pub mod config;

// Re-exports convenientes
pub use types::Snapshot;
pub use protocol::{decode_snapshot, encode_snapshot, RECORD_SIZE, SAMPLE_INTERVAL};
pub use config::AppConfig;
