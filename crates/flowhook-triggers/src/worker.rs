//! Worker dispatch channel.
//!
//! Callers submit [`HookJob`]s through a [`WorkerChannel`] and wait for the
//! reply; a worker task drains the matching [`WorkerQueue`]. Replies travel as
//! raw JSON, the same shape a remote worker would send, and are decoded on the
//! caller side.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use flowhook_config::DispatchConfig;
use flowhook_types::{HookJob, HookResponse};
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, trace, warn};

use crate::error::DispatchError;
use crate::traits::HookDispatcher;

/// Raw reply from a worker: a JSON hook response, or an error message.
pub type HookReply = Result<serde_json::Value, String>;

/// Runs hook jobs on the worker side.
#[async_trait]
pub trait HookExecutor: Send + Sync {
    /// Execute the hook. `Err` means the job could not be run at all; hook
    /// failures are reported through the response status.
    async fn execute(&self, job: HookJob) -> Result<HookResponse, String>;
}

/// One-shot handle a worker uses to answer a request.
#[derive(Debug)]
pub struct ReplySender(oneshot::Sender<HookReply>);

impl ReplySender {
    /// Answer with a typed response.
    pub fn respond(self, response: &HookResponse) {
        let reply = serde_json::to_value(response).map_err(|e| e.to_string());
        self.send(reply);
    }

    /// Answer with raw JSON as received from an engine process.
    pub fn respond_raw(self, value: serde_json::Value) {
        self.send(Ok(value));
    }

    /// Report that the job could not be executed.
    pub fn fail(self, message: impl Into<String>) {
        self.send(Err(message.into()));
    }

    /// Whether the caller stopped waiting for this reply.
    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }

    /// Resolves once the caller stops waiting for this reply.
    pub async fn closed(&mut self) {
        self.0.closed().await
    }

    fn send(self, reply: HookReply) {
        // The caller may have timed out or been cancelled.
        if self.0.send(reply).is_err() {
            trace!("Hook reply dropped, caller is gone");
        }
    }
}

/// A hook job waiting for a worker.
#[derive(Debug)]
pub struct HookRequest {
    pub job: HookJob,
    pub reply: ReplySender,
}

/// Worker side of the channel.
#[derive(Debug)]
pub struct WorkerQueue {
    receiver: mpsc::Receiver<HookRequest>,
}

impl WorkerQueue {
    /// Wait for the next request. Returns `None` once every
    /// [`WorkerChannel`] clone has been dropped.
    pub async fn recv(&mut self) -> Option<HookRequest> {
        self.receiver.recv().await
    }

    /// Serve requests with `executor` until the channel closes.
    ///
    /// Each request runs in its own task, so a slow hook never holds up the
    /// others. Requests whose caller already gave up are skipped, and a hook
    /// still running when its caller gives up is dropped. Returns once the
    /// channel is closed and every in-flight hook has settled.
    pub async fn run<E>(mut self, executor: Arc<E>)
    where
        E: HookExecutor + ?Sized + 'static,
    {
        let mut in_flight = JoinSet::new();
        loop {
            tokio::select! {
                request = self.recv() => {
                    let Some(request) = request else { break };
                    if request.reply.is_closed() {
                        debug!(request_id = %request.job.request_id, "Caller gone before hook started, skipping");
                        continue;
                    }
                    in_flight.spawn(serve(executor.clone(), request));
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        warn!(error = %e, "Trigger hook task panicked");
                    }
                }
            }
        }
        while in_flight.join_next().await.is_some() {}
        debug!("Worker queue closed");
    }
}

/// Run one hook and answer its caller, unless the caller leaves first.
async fn serve<E>(executor: Arc<E>, request: HookRequest)
where
    E: HookExecutor + ?Sized,
{
    let HookRequest { job, mut reply } = request;
    let request_id = job.request_id;
    let hook_type = job.hook_type;
    debug!(%request_id, %hook_type, flow_version_id = %job.flow_version.id, "Executing trigger hook");

    let executed = tokio::select! {
        executed = executor.execute(job) => Some(executed),
        () = reply.closed() => None,
    };

    match executed {
        Some(Ok(response)) => reply.respond(&response),
        Some(Err(message)) => {
            warn!(%request_id, %hook_type, error = %message, "Trigger hook execution failed");
            reply.fail(message);
        }
        None => debug!(%request_id, %hook_type, "Caller gone, abandoning trigger hook"),
    }
}

/// Caller side of the channel: a [`HookDispatcher`] with a bounded wait.
#[derive(Debug, Clone)]
pub struct WorkerChannel {
    sender: mpsc::Sender<HookRequest>,
    timeout: Duration,
}

impl WorkerChannel {
    /// Create a channel and its worker queue.
    pub fn new(config: &DispatchConfig) -> (Self, WorkerQueue) {
        Self::with_capacity(config.queue_capacity, config.timeout())
    }

    /// Create a channel with explicit bounds. A zero capacity is raised to one.
    pub fn with_capacity(capacity: usize, timeout: Duration) -> (Self, WorkerQueue) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender, timeout }, WorkerQueue { receiver })
    }

    /// Create a channel and spawn a worker task that serves it with `executor`.
    pub fn spawn<E>(config: &DispatchConfig, executor: Arc<E>) -> (Self, JoinHandle<()>)
    where
        E: HookExecutor + ?Sized + 'static,
    {
        let (channel, queue) = Self::new(config);
        let handle = tokio::spawn(queue.run(executor));
        (channel, handle)
    }

    /// The bound applied to each request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn exchange(&self, job: HookJob) -> Result<HookReply, DispatchError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(HookRequest {
                job,
                reply: ReplySender(tx),
            })
            .await
            .map_err(|_| DispatchError::ChannelClosed)?;
        rx.await.map_err(|_| DispatchError::ChannelClosed)
    }
}

#[async_trait]
impl HookDispatcher for WorkerChannel {
    async fn request(&self, job: HookJob) -> Result<HookResponse, DispatchError> {
        let request_id = job.request_id;
        trace!(%request_id, hook_type = %job.hook_type, "Submitting hook job");

        // The timeout covers queueing as well as execution.
        let reply = tokio::time::timeout(self.timeout, self.exchange(job))
            .await
            .map_err(|_| DispatchError::Timeout(self.timeout))??;

        let value = reply.map_err(DispatchError::Worker)?;
        let response: HookResponse = serde_json::from_value(value)
            .map_err(|e| DispatchError::MalformedResponse(e.to_string()))?;

        if !response.is_ok() {
            return Err(DispatchError::HookFailed {
                status: response.status,
                message: response.standard_error,
            });
        }

        trace!(%request_id, "Hook job completed");
        Ok(response)
    }
}
