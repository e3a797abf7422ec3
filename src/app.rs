use anyhow::Context;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::cli::Config;
use crate::error::Result;
use crate::lsp::inbound::InboundTransformer;
use crate::lsp::outbound::OutboundSanitizer;
use crate::lsp::pump::{Pump, PumpStats};
use crate::lsp::stdio_transport::{exit_code, spawn_server, ServerProcess};
use crate::lsp::transport::Direction;

/// How long server output may keep draining after the server has exited.
/// Descendants that inherited its stdout can hold the pipe open forever.
const OUTBOUND_DRAIN: Duration = Duration::from_millis(500);

/// Launch the server, proxy both directions, and return the server's exit code.
pub async fn run(config: Config) -> anyhow::Result<i32> {
    serve(config, tokio::io::stdin(), tokio::io::stdout()).await
}

/// Run one session against the given client streams.
///
/// The server's exit ends the session: server output gets a bounded drain,
/// the client stream is shut down, and the inbound pump is dropped.
pub async fn serve<CI, CO>(config: Config, client_in: CI, client_out: CO) -> anyhow::Result<i32>
where
    CI: AsyncRead + Unpin,
    CO: AsyncWrite + Unpin,
{
    let (program, args) = config.command_line();
    let ServerProcess {
        mut child,
        stdin,
        stdout,
    } = spawn_server(&program, &args).with_context(|| format!("cannot launch {program}"))?;
    info!(command = %program, pid = ?child.id(), "Language server started");

    let mut client_out = client_out;
    let status = {
        let (inbound, outbound) = proxy(client_in, &mut client_out, stdin, stdout);
        tokio::pin!(inbound);
        tokio::pin!(outbound);

        let mut inbound_done = false;
        let mut outbound_done = false;
        let status = loop {
            tokio::select! {
                result = &mut inbound, if !inbound_done => {
                    inbound_done = true;
                    report(Direction::Inbound, result);
                }
                result = &mut outbound, if !outbound_done => {
                    outbound_done = true;
                    report(Direction::Outbound, result);
                }
                status = child.wait() => break status,
            }
        };

        if !outbound_done {
            match tokio::time::timeout(OUTBOUND_DRAIN, &mut outbound).await {
                Ok(result) => report(Direction::Outbound, result),
                Err(_) => warn!("Server output still open after exit, closing client stream"),
            }
        }
        status
    };

    if let Err(e) = client_out.flush().await {
        warn!(error = %e, "Failed to flush client stream");
    }
    if let Err(e) = client_out.shutdown().await {
        warn!(error = %e, "Failed to close client stream");
    }

    let status = status.context("failed to wait for language server")?;
    let code = exit_code(status);
    info!(code, "Language server exited");
    Ok(code)
}

/// Build both pumps: client → server and server → client.
pub fn proxy<CI, CO, SI, SO>(
    client_in: CI,
    client_out: CO,
    server_in: SI,
    server_out: SO,
) -> (
    impl std::future::Future<Output = Result<PumpStats>>,
    impl std::future::Future<Output = Result<PumpStats>>,
)
where
    CI: AsyncRead + Unpin,
    CO: AsyncWrite + Unpin,
    SI: AsyncWrite + Unpin,
    SO: AsyncRead + Unpin,
{
    let inbound = Pump::new(Direction::Inbound, InboundTransformer).run(client_in, server_in);
    let outbound = Pump::new(Direction::Outbound, OutboundSanitizer).run(server_out, client_out);
    (inbound, outbound)
}

fn report(direction: Direction, result: Result<PumpStats>) {
    match result {
        Ok(stats) => info!(
            direction = %direction,
            frames_in = stats.frames_in,
            frames_out = stats.frames_out,
            faults = stats.faults,
            "Stream finished"
        ),
        Err(e) => warn!(direction = %direction, error = %e, "Stream stopped"),
    }
}
