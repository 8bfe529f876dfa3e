//! Trigger lifecycle coordination for Flowhook.
//!
//! Disabling a piece trigger has two halves: the piece's own teardown (the
//! on-disable hook, run on a worker) and the platform's (removing the polling
//! or renewal job, or the app event listeners). This crate runs both and
//! guarantees the second half even when the first fails.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  TriggerDeactivator                                     │
//! │  - TriggerResolver     (PieceRegistry)                  │
//! │  - HookDispatcher      (WorkerChannel -> WorkerQueue)   │
//! │  - TriggerCleanup                                       │
//! │      - RecurringJobStore      (InMemoryJobStore)        │
//! │      - EventListenerRegistry  (InMemoryListenerRegistry)│
//! │  - WebhookUrls         (WebhookUrlBuilder)              │
//! │  - FailureSink         (TracingFailureSink)             │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use flowhook_triggers::*;
//!
//! let (channel, _worker) = WorkerChannel::spawn(&config.dispatch(), executor);
//! let deactivator = TriggerDeactivator::new(
//!     Arc::new(registry),
//!     Arc::new(channel),
//!     Arc::new(InMemoryJobStore::new()),
//!     Arc::new(InMemoryListenerRegistry::new()),
//! )
//! .with_webhook_urls(Arc::new(WebhookUrlBuilder::from_config(&config.webhook())));
//!
//! let response = deactivator
//!     .disable(DisableRequest::new(flow_version, project_id))
//!     .await?;
//! ```

pub mod cleanup;
pub mod coordinator;
pub mod error;
pub mod logging;
pub mod registry;
pub mod sink;
pub mod stores;
pub mod traits;
pub mod webhook;
pub mod worker;

pub use cleanup::{CleanupAction, TriggerCleanup};
pub use coordinator::{DisableRequest, TriggerDeactivator};
pub use error::{DisableError, DispatchError, Result, StoreError};
pub use logging::{init_logging, log_directory};
pub use registry::{PieceMetadata, PieceRegistry};
pub use sink::TracingFailureSink;
pub use stores::{AppEventListener, InMemoryJobStore, InMemoryListenerRegistry, RepeatingJob};
pub use traits::{
    EventListenerRegistry, FailureSink, HookDispatcher, RecurringJobStore, SharedDispatcher,
    SharedFailureSink, SharedJobStore, SharedListenerRegistry, SharedResolver, SharedWebhookUrls,
    TriggerResolver, WebhookUrls,
};
pub use webhook::WebhookUrlBuilder;
pub use worker::{HookExecutor, HookReply, HookRequest, ReplySender, WorkerChannel, WorkerQueue};
