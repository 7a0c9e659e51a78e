//! # Monitor Server
//!
//! Amostra métricas do host (CPU, temperaturas, RAM, rede, load) a cada
//! segundo e transmite um registro binário de 32 bytes para cada cliente
//! TCP conectado.
//!
//! ## Uso
//! ```bash
//! monitor_server                 # escuta em 0.0.0.0:4444
//! nc 127.0.0.1 4444 | xxd -c 32  # um registro por linha
//! ```

mod gpu;
mod procfs;
mod sampler;
mod server;
mod session;
mod source;

use monitor_core::config::AppConfig;
use monitor_core::{RECORD_SIZE, SAMPLE_INTERVAL};
use sampler::Sampler;
use server::Server;
use source::{ProcSource, SourcePaths};
use std::sync::Arc;
use tracing::{error, info};

fn main() {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Carregar config ──
    let config_path = AppConfig::default_path();
    let config = AppConfig::load(&config_path);

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("Configuração inválida: {e}");
        }
        std::process::exit(1);
    }

    let addr = match config.server.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    // ── Socket TCP ──
    let server = match Server::bind(addr) {
        Ok(server) => server,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    // Porta efetivamente aberta
    let listen_addr = server.local_addr().unwrap_or(addr);

    // ── Sampler ──
    let sampler = Arc::new(Sampler::new(ProcSource::new(SourcePaths::default())));
    info!("Sampler inicializado");

    // ── Banner ──
    println!();
    println!("══════════════════════════════════════════════");
    println!("   MONITOR SERVER – ATIVO");
    println!("══════════════════════════════════════════════");
    println!("  Porta:     {} ({listen_addr})", listen_addr.port());
    println!("  Intervalo: {:.1}s", SAMPLE_INTERVAL.as_secs_f64());
    println!("  Registro:  {RECORD_SIZE} bytes (8 × f32 LE)");
    println!("══════════════════════════════════════════════");
    println!();

    server.serve(sampler, SAMPLE_INTERVAL);
}
