//! Per-connection simulation worker.
//!
//! Each connection owns exactly one worker running on its own OS thread
//! with three single-producer/single-consumer channels: requests in,
//! formatted response messages out, and log records out (forwarded to the
//! process logger by the connection task). The worker holds one model
//! provider and one detector geometry for its whole lifetime, rebuilds the
//! sample per event for the event's azimuthal angle, and processes events
//! strictly one at a time. It stops on the `Quit` sentinel, on channel
//! disconnect, or fatally on a pipeline error.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, SendError, Sender};
use gisans_core::{format_event_line, ScatterEvent};
use gisans_models::{resolve_model, ModelProvider};
use log::Level;

use crate::born::BornEngine;
use crate::pipeline::{respond_to_event, PipelineConfig};
use crate::synth::det_dim_for;
use crate::SimError;

/// One request pulled from the worker's input channel.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerRequest {
    Event(ScatterEvent),
    /// Termination sentinel; the worker loop exits on receipt.
    Quit,
}

/// A log record emitted by a worker, forwarded by its owner.
#[derive(Debug, Clone)]
pub struct WorkerLog {
    pub level: Level,
    pub message: String,
}

/// Parameters negotiated during the handshake.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerConfig {
    /// Events returned per incident event.
    pub odim: usize,
    /// Detector angular half-width in degrees.
    pub ang_range: f64,
    /// Sample model name, resolved before the thread starts.
    pub model: String,
}

/// Owning handle to a worker thread and its channels.
pub struct WorkerHandle {
    input: Sender<WorkerRequest>,
    output: Receiver<String>,
    log: Receiver<WorkerLog>,
    join: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    pub fn send_event(&self, event: ScatterEvent) -> Result<(), SendError<WorkerRequest>> {
        self.input.send(WorkerRequest::Event(event))
    }

    /// Sends the termination sentinel. Returns false if the worker is
    /// already gone.
    pub fn send_quit(&self) -> bool {
        self.input.send(WorkerRequest::Quit).is_ok()
    }

    /// Non-blocking poll of the output channel.
    pub fn try_response(&self) -> Option<String> {
        self.output.try_recv().ok()
    }

    /// Drains all pending worker log records.
    pub fn drain_log(&self) -> Vec<WorkerLog> {
        self.log.try_iter().collect()
    }

    /// Whether the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.join.as_ref().map_or(true, |handle| handle.is_finished())
    }

    /// Blocking bounded join; returns true if the worker stopped within
    /// `timeout`. In-flight simulation cannot be cancelled, so callers on a
    /// cooperative scheduler should poll [`Self::is_finished`] instead.
    pub fn join_timeout(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while !self.is_finished() {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
        self.reap()
    }

    /// Joins a finished worker thread. Returns false while it is still
    /// running or if it panicked.
    pub fn reap(&mut self) -> bool {
        if !self.is_finished() {
            return false;
        }
        match self.join.take() {
            Some(handle) => handle.join().is_ok(),
            None => true,
        }
    }
}

/// Resolves the model and starts the worker thread. Unknown model names
/// fail here, before any thread exists, so the caller can reject the
/// connection explicitly instead of leaving it to hang.
pub fn spawn_worker(config: WorkerConfig) -> Result<WorkerHandle, SimError> {
    let provider = resolve_model(&config.model)?;
    let (input_tx, input_rx) = unbounded();
    let (output_tx, output_rx) = unbounded();
    let (log_tx, log_rx) = unbounded();

    let join = thread::Builder::new()
        .name(format!("worker-{}", config.model))
        .spawn(move || worker_loop(config, provider, input_rx, output_tx, log_tx))?;

    Ok(WorkerHandle {
        input: input_tx,
        output: output_rx,
        log: log_rx,
        join: Some(join),
    })
}

fn worker_loop(
    config: WorkerConfig,
    provider: ModelProvider,
    input: Receiver<WorkerRequest>,
    output: Sender<String>,
    log: Sender<WorkerLog>,
) {
    let record = |level: Level, message: String| {
        let _ = log.send(WorkerLog { level, message });
    };

    record(
        Level::Info,
        format!("starting worker for model '{}'", config.model),
    );
    let det_dim = det_dim_for(config.odim);
    record(
        Level::Info,
        format!("simulation detector size {det_dim}x{det_dim}"),
    );

    let engine = BornEngine::default();
    let pipeline = PipelineConfig {
        odim: config.odim,
        ang_range: config.ang_range,
        det_dim,
    };
    let mut rng = rand::thread_rng();
    let mut processed = 0u64;

    loop {
        // blocks until the handler forwards an event or disconnects
        let request = match input.recv() {
            Ok(request) => request,
            Err(_) => break,
        };
        let incident = match request {
            WorkerRequest::Quit => break,
            WorkerRequest::Event(event) => event,
        };

        match respond_to_event(&engine, provider, &pipeline, &incident, &mut rng) {
            Ok(events) => {
                record(
                    Level::Debug,
                    format!("sending back {} processed events", events.len()),
                );
                let message: String = events.iter().map(format_event_line).collect();
                if output.send(message).is_err() {
                    break;
                }
                processed += 1;
            }
            Err(err) => {
                // fatal: the owning connection notices the dead worker
                record(Level::Error, format!("simulation failed: {err}"));
                break;
            }
        }
    }

    record(
        Level::Info,
        format!("worker stopped after {processed} events"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use gisans_core::parse_event_line;
    use gisans_models::ModelError;

    fn wait_for_response(worker: &WorkerHandle) -> String {
        let deadline = Instant::now() + Duration::from_secs(30);
        loop {
            if let Some(message) = worker.try_response() {
                return message;
            }
            assert!(!worker.is_finished(), "worker died: {:?}", worker.drain_log());
            assert!(Instant::now() < deadline, "no response within 30s");
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn test_config() -> WorkerConfig {
        WorkerConfig {
            odim: 102,
            ang_range: 1.5,
            model: "silica_100nm_air".to_string(),
        }
    }

    #[test]
    fn one_event_yields_one_message_of_odim_lines() {
        let worker = spawn_worker(test_config()).unwrap();
        worker
            .send_event(ScatterEvent::new(1.0, 0.01, 1.0, 0.001))
            .unwrap();

        let message = wait_for_response(&worker);
        let lines: Vec<&str> = message.lines().collect();
        assert_eq!(lines.len(), 102);
        for line in &lines {
            assert_eq!(line.len(), 4 * 16 + 3);
            parse_event_line(line).unwrap();
        }
        // slot 0 is the specular reflection of the input
        let reflected = parse_event_line(lines[0]).unwrap();
        assert!((reflected.v.z - (-0.001)).abs() < 1e-12);

        assert!(worker.send_quit());
        let mut worker = worker;
        assert!(worker.join_timeout(Duration::from_secs(5)));
    }

    #[test]
    fn quit_sentinel_stops_an_idle_worker() {
        let mut worker = spawn_worker(test_config()).unwrap();
        assert!(worker.send_quit());
        assert!(worker.join_timeout(Duration::from_secs(5)));
        // start/detector/stop records were emitted
        assert!(!worker.drain_log().is_empty());
    }

    #[test]
    fn dropping_the_handle_disconnects_the_worker() {
        let worker = spawn_worker(test_config()).unwrap();
        let input = worker.input.clone();
        drop(worker);
        // with all receivers gone the loop exits on its next send/recv
        let deadline = Instant::now() + Duration::from_secs(5);
        while input.send(WorkerRequest::Quit).is_ok() {
            assert!(Instant::now() < deadline, "worker never noticed disconnect");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn unknown_model_fails_before_the_thread_starts() {
        let result = spawn_worker(WorkerConfig {
            odim: 10,
            ang_range: 1.5,
            model: "missing_model".to_string(),
        });
        assert!(matches!(
            result,
            Err(SimError::Model(ModelError::UnknownModel(_)))
        ));
    }

    #[test]
    fn responses_preserve_request_order() {
        let worker = spawn_worker(test_config()).unwrap();
        let first = ScatterEvent::new(1.0, 0.0, 1.0, 0.001);
        let second = ScatterEvent::new(0.5, 0.0, 1.0, 0.002);
        worker.send_event(first).unwrap();
        worker.send_event(second).unwrap();

        let m1 = wait_for_response(&worker);
        let m2 = wait_for_response(&worker);
        let r1 = parse_event_line(m1.lines().next().unwrap()).unwrap();
        let r2 = parse_event_line(m2.lines().next().unwrap()).unwrap();
        assert!((r1.v.z + 0.001).abs() < 1e-12);
        assert!((r2.v.z + 0.002).abs() < 1e-12);

        worker.send_quit();
        let mut worker = worker;
        assert!(worker.join_timeout(Duration::from_secs(5)));
    }
}
