// Keyhint Suggestions - Generation Worker
// Runs the generator off the input path, one request at a time

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TryRecvError, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::generator::{GeneratorError, SuggestionGenerator};

/// Finished generation, delivered back to the event loop
#[derive(Debug)]
pub struct GenerationResult {
    pub id: u64,
    pub output: Result<String, GeneratorError>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("a generation is already queued")]
    Busy,
    #[error("generation worker has stopped")]
    Stopped,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Owns the generator thread.
///
/// The request queue holds a single entry. Dropping the worker cancels any
/// running generation and joins the thread.
pub struct GenerationWorker {
    requests: Option<SyncSender<u64>>,
    results: Receiver<GenerationResult>,
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl GenerationWorker {
    pub fn spawn(generator: impl SuggestionGenerator) -> std::io::Result<Self> {
        let (request_tx, request_rx) = mpsc::sync_channel::<u64>(1);
        let (result_tx, result_rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let worker_cancel = Arc::clone(&cancel);

        let handle = thread::Builder::new()
            .name("keyhint-generator".to_string())
            .spawn(move || {
                while let Ok(id) = request_rx.recv() {
                    let started = Instant::now();
                    let output =
                        panic::catch_unwind(AssertUnwindSafe(|| generator.generate(&worker_cancel)))
                            .unwrap_or_else(|payload| {
                                Err(GeneratorError::Panicked(panic_message(payload.as_ref())))
                            });
                    let result = GenerationResult {
                        id,
                        output,
                        elapsed: started.elapsed(),
                    };
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
                log::debug!("Generation worker exiting");
            })?;

        Ok(Self {
            requests: Some(request_tx),
            results: result_rx,
            cancel,
            handle: Some(handle),
        })
    }

    /// Queue a request without blocking
    pub fn submit(&self, id: u64) -> Result<(), SubmitError> {
        let requests = self.requests.as_ref().ok_or(SubmitError::Stopped)?;
        self.cancel.store(false, Ordering::SeqCst);
        requests.try_send(id).map_err(|e| match e {
            TrySendError::Full(_) => SubmitError::Busy,
            TrySendError::Disconnected(_) => SubmitError::Stopped,
        })
    }

    /// Ask the running generation to stop; its result still arrives
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn try_recv(&self) -> Option<GenerationResult> {
        match self.results.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<GenerationResult> {
        match self.results.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for GenerationWorker {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::SeqCst);
        // Closing the queue ends the worker loop
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Generation worker panicked");
            }
        }
    }
}

impl std::fmt::Debug for GenerationWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationWorker")
            .field("cancelled", &self.cancel.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
