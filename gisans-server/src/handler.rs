//! Per-connection protocol state machine.
//!
//! One handler task per accepted socket, multiplexed cooperatively; the
//! only suspension points are socket reads and polls of the worker's
//! output channel. All simulation work happens on the connection's worker
//! thread, so the event loop never blocks on computation.

use std::time::Duration;

use gisans_config::ServerSettings;
use gisans_core::parse_event_line;
use gisans_sim::{spawn_worker, WorkerConfig, WorkerHandle};
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use crate::protocol::{Handshake, ACK};
use crate::ServerError;

/// Drives one connection from handshake to close.
///
/// A malformed or missing handshake closes the connection without an ACK;
/// so does an unknown model name, turning the upstream silent-hang failure
/// into an explicit rejection. After a successful handshake the handler
/// answers one request at a time, in order, until the peer disconnects.
pub async fn handle_client(
    stream: TcpStream,
    settings: ServerSettings,
) -> Result<(), ServerError> {
    let peer = stream.peer_addr()?;
    info!("connection from {peer}");
    let (read_half, mut writer) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    // AWAITING_HANDSHAKE
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        warn!("{peer} closed before sending a handshake");
        return Ok(());
    }
    let handshake = match Handshake::parse(&line) {
        Ok(handshake) => handshake,
        Err(err) => {
            warn!("could not establish handshake with {peer}: {err} (got {:?})", line.trim());
            return Ok(());
        }
    };
    let mut worker = match spawn_worker(WorkerConfig {
        odim: handshake.odim,
        ang_range: handshake.ang_range,
        model: handshake.model.clone(),
    }) {
        Ok(worker) => worker,
        Err(err) => {
            warn!("rejecting {peer}: {err}");
            return Ok(());
        }
    };
    writer.write_all(ACK).await?;
    info!(
        "session with {peer} ('{}'): odim={}, ang_range={}, model={}",
        handshake.client_tag, handshake.odim, handshake.ang_range, handshake.model
    );

    // ACTIVE
    let mut processed = 0u64;
    let result = exchange_events(&mut reader, &mut writer, &worker, &settings, &mut processed).await;

    // CLOSING: drain the worker whatever ended the exchange, so it is
    // never orphaned. In-flight simulation runs to completion first.
    worker.send_quit();
    let deadline =
        tokio::time::Instant::now() + Duration::from_millis(settings.worker_join_timeout_ms);
    while !worker.is_finished() && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(settings.poll_interval_ms)).await;
    }
    if !worker.reap() {
        warn!("worker for {peer} did not stop within {}ms", settings.worker_join_timeout_ms);
    }
    forward_worker_log(&worker);
    info!("received {processed} events from {peer}");
    result
}

async fn exchange_events(
    reader: &mut BufReader<OwnedReadHalf>,
    writer: &mut OwnedWriteHalf,
    worker: &WorkerHandle,
    settings: &ServerSettings,
    processed: &mut u64,
) -> Result<(), ServerError> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            // peer disconnect is the normal end of a session
            return Ok(());
        }
        let event = match parse_event_line(&line) {
            Ok(event) => event,
            Err(err) => {
                warn!("malformed event record ({err}), closing session");
                return Ok(());
            }
        };
        if worker.send_event(event).is_err() {
            return Err(ServerError::WorkerDied);
        }
        *processed += 1;

        let message = wait_for_response(worker, settings).await?;
        writer.write_all(message.as_bytes()).await?;
    }
}

/// Polls the worker's output channel, forwarding its log records while
/// waiting. A worker that exits without answering is a dead session.
async fn wait_for_response(
    worker: &WorkerHandle,
    settings: &ServerSettings,
) -> Result<String, ServerError> {
    loop {
        forward_worker_log(worker);
        if let Some(message) = worker.try_response() {
            return Ok(message);
        }
        if worker.is_finished() {
            forward_worker_log(worker);
            return Err(ServerError::WorkerDied);
        }
        tokio::time::sleep(Duration::from_millis(settings.poll_interval_ms)).await;
    }
}

fn forward_worker_log(worker: &WorkerHandle) {
    for record in worker.drain_log() {
        log::log!(record.level, "[worker] {}", record.message);
    }
}
