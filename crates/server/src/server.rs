//! Listener TCP: aceita conexões e cria uma thread de sessão por cliente.
//!
//! Sem limite de conexões e sem backpressure. O loop de accept nunca espera
//! uma sessão.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::sampler::Sampler;
use crate::session::run_session;
use crate::source::MetricSource;

/// Pausa após um `accept` com erro (ex.: EMFILE) antes de tentar de novo.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Erros do servidor.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Falha ao bind em {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },
}

pub struct Server {
    listener: TcpListener,
}

impl Server {
    /// Abre a porta de escuta. Falha aqui é fatal para o processo.
    pub fn bind(addr: SocketAddr) -> Result<Self, ServerError> {
        let listener =
            TcpListener::bind(addr).map_err(|source| ServerError::Bind { addr, source })?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Loop de accept. Não retorna.
    pub fn serve<S>(self, sampler: Arc<Sampler<S>>, interval: Duration)
    where
        S: MetricSource + 'static,
    {
        loop {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    info!("Cliente conectado: {peer}");
                    spawn_session(Arc::clone(&sampler), stream, peer, interval);
                }
                Err(e) => {
                    warn!("Erro no accept: {e}");
                    thread::sleep(ACCEPT_RETRY_DELAY);
                }
            }
        }
    }
}

fn spawn_session<S>(
    sampler: Arc<Sampler<S>>,
    stream: TcpStream,
    peer: SocketAddr,
    interval: Duration,
) where
    S: MetricSource + 'static,
{
    let spawned = thread::Builder::new()
        .name(format!("session-{peer}"))
        .spawn(move || {
            let end = run_session(&sampler, stream, interval);
            info!(
                "Cliente desconectado: {peer} ({} registros enviados, {})",
                end.records_sent, end.cause
            );
        });

    // Se a thread não subiu, o stream já foi dropado junto com a closure.
    if let Err(e) = spawned {
        error!("Falha ao criar thread de sessão para {peer}: {e}");
    }
}
