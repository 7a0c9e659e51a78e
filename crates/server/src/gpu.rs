//! Temperatura da GPU NVIDIA via `nvidia-smi`.
//!
//! Sem driver ou sem a ferramenta no PATH, a consulta retorna `None` e o
//! sampler envia `0`.

use std::ffi::OsString;
use std::process::{Command, Stdio};
use tracing::debug;

/// Consulta externa que imprime a temperatura da GPU em stdout.
#[derive(Debug, Clone)]
pub struct GpuQuery {
    program: OsString,
    args: Vec<OsString>,
}

impl Default for GpuQuery {
    fn default() -> Self {
        Self::new(
            "nvidia-smi",
            [
                "--query-gpu=temperature.gpu",
                "--format=csv,noheader,nounits",
            ],
        )
    }
}

impl GpuQuery {
    pub fn new<I, A>(program: impl Into<OsString>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Executa a consulta. Qualquer falha vira `None`.
    pub fn temperature(&self) -> Option<f32> {
        let output = match Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                debug!("{} não disponível: {e}", self.program.to_string_lossy());
                return None;
            }
        };

        if !output.status.success() {
            debug!(
                "{} terminou com {}",
                self.program.to_string_lossy(),
                output.status
            );
            return None;
        }

        parse_temperature(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Primeira linha da saída CSV (uma linha por GPU; usa a GPU 0).
pub fn parse_temperature(stdout: &str) -> Option<f32> {
    stdout
        .lines()
        .next()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}
