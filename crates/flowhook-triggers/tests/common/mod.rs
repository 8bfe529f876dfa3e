//! Recording collaborators shared by the integration tests.
//!
//! Every mock appends to one [`EventLog`] so tests can assert both which
//! collaborators were called and in what order.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use flowhook_triggers::{
    DispatchError, EventListenerRegistry, FailureSink, HookDispatcher, RecurringJobStore,
    StoreError, TriggerDeactivator, TriggerResolver,
};
use flowhook_types::{
    FlowId, FlowTrigger, FlowVersion, FlowVersionId, HookJob, HookResponse, PieceTrigger,
    PieceTriggerDefinition, ProjectId, RenewConfiguration, TriggerStrategy,
};
use parking_lot::Mutex;

pub const PIECE: &str = "@flowhook/piece-test";
pub const PIECE_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Resolve(String, ProjectId),
    Dispatch(FlowVersionId),
    RemoveRepeating(FlowVersionId),
    DeleteListeners(ProjectId, FlowId),
    Record(DispatchError),
}

#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<Event>>>);

impl EventLog {
    pub fn push(&self, event: Event) {
        self.0.lock().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().clone()
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.0.lock().iter().filter(|e| pred(e)).count()
    }

    pub fn position(&self, pred: impl Fn(&Event) -> bool) -> Option<usize> {
        self.0.lock().iter().position(|e| pred(e))
    }
}

pub struct StaticResolver {
    log: EventLog,
    definition: Option<PieceTriggerDefinition>,
}

#[async_trait]
impl TriggerResolver for StaticResolver {
    async fn resolve(
        &self,
        trigger: &PieceTrigger,
        project_id: &ProjectId,
    ) -> Option<PieceTriggerDefinition> {
        self.log.push(Event::Resolve(
            trigger.trigger_name.clone(),
            project_id.clone(),
        ));
        self.definition.clone()
    }
}

pub struct ScriptedDispatcher {
    log: EventLog,
    outcome: Result<HookResponse, DispatchError>,
    pub jobs: Mutex<Vec<HookJob>>,
}

#[async_trait]
impl HookDispatcher for ScriptedDispatcher {
    async fn request(&self, job: HookJob) -> Result<HookResponse, DispatchError> {
        self.log.push(Event::Dispatch(job.flow_version.id.clone()));
        self.jobs.lock().push(job);
        self.outcome.clone()
    }
}

/// Job store that tracks live jobs and can be told to fail.
pub struct RecordingJobStore {
    log: EventLog,
    pub live: Mutex<Vec<FlowVersionId>>,
    pub fail_with: Mutex<Option<String>>,
}

#[async_trait]
impl RecurringJobStore for RecordingJobStore {
    async fn remove_repeating(&self, flow_version_id: &FlowVersionId) -> Result<(), StoreError> {
        self.log.push(Event::RemoveRepeating(flow_version_id.clone()));
        if let Some(message) = self.fail_with.lock().clone() {
            return Err(StoreError::JobStore(message));
        }
        self.live.lock().retain(|id| id != flow_version_id);
        Ok(())
    }
}

pub struct RecordingListeners {
    log: EventLog,
    pub live: Mutex<Vec<(ProjectId, FlowId)>>,
    pub fail_with: Mutex<Option<String>>,
}

#[async_trait]
impl EventListenerRegistry for RecordingListeners {
    async fn delete_listeners(
        &self,
        project_id: &ProjectId,
        flow_id: &FlowId,
    ) -> Result<(), StoreError> {
        self.log
            .push(Event::DeleteListeners(project_id.clone(), flow_id.clone()));
        if let Some(message) = self.fail_with.lock().clone() {
            return Err(StoreError::ListenerRegistry(message));
        }
        self.live
            .lock()
            .retain(|(p, f)| !(p == project_id && f == flow_id));
        Ok(())
    }
}

pub struct RecordingSink {
    log: EventLog,
}

impl FailureSink for RecordingSink {
    fn record(&self, error: &DispatchError) {
        self.log.push(Event::Record(error.clone()));
    }
}

/// A deactivator wired to recording mocks.
pub struct Harness {
    pub log: EventLog,
    pub dispatcher: Arc<ScriptedDispatcher>,
    pub jobs: Arc<RecordingJobStore>,
    pub listeners: Arc<RecordingListeners>,
    pub deactivator: TriggerDeactivator,
}

impl Harness {
    pub fn new(
        definition: Option<PieceTriggerDefinition>,
        outcome: Result<HookResponse, DispatchError>,
    ) -> Self {
        let log = EventLog::default();
        let resolver = Arc::new(StaticResolver {
            log: log.clone(),
            definition,
        });
        let dispatcher = Arc::new(ScriptedDispatcher {
            log: log.clone(),
            outcome,
            jobs: Mutex::new(Vec::new()),
        });
        let jobs = Arc::new(RecordingJobStore {
            log: log.clone(),
            live: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
        });
        let listeners = Arc::new(RecordingListeners {
            log: log.clone(),
            live: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
        });
        let sink = Arc::new(RecordingSink { log: log.clone() });

        let deactivator =
            TriggerDeactivator::new(resolver, dispatcher.clone(), jobs.clone(), listeners.clone())
                .with_failure_sink(sink);

        Self {
            log,
            dispatcher,
            jobs,
            listeners,
            deactivator,
        }
    }

    pub fn is_dispatch(e: &Event) -> bool {
        matches!(e, Event::Dispatch(_))
    }

    pub fn is_remove(e: &Event) -> bool {
        matches!(e, Event::RemoveRepeating(_))
    }

    pub fn is_delete(e: &Event) -> bool {
        matches!(e, Event::DeleteListeners(..))
    }

    pub fn is_record(e: &Event) -> bool {
        matches!(e, Event::Record(_))
    }
}

pub fn piece_version(id: &str) -> FlowVersion {
    FlowVersion::new(
        id,
        format!("flow-of-{id}"),
        FlowTrigger::Piece(PieceTrigger::new(PIECE, PIECE_VERSION, "on_event")),
    )
}

pub fn polling() -> PieceTriggerDefinition {
    PieceTriggerDefinition::new("on_event", TriggerStrategy::Polling)
}

pub fn app_webhook() -> PieceTriggerDefinition {
    PieceTriggerDefinition::new("on_event", TriggerStrategy::AppWebhook)
}

pub fn webhook(renew: Option<RenewConfiguration>) -> PieceTriggerDefinition {
    let def = PieceTriggerDefinition::new("on_event", TriggerStrategy::Webhook);
    match renew {
        Some(renew) => def.with_renew_configuration(renew),
        None => def,
    }
}

pub fn cron() -> RenewConfiguration {
    RenewConfiguration::Cron {
        cron_expression: "0 */6 * * *".to_string(),
    }
}

pub fn ok_response() -> HookResponse {
    HookResponse::ok(serde_json::json!({ "status": "ok" }))
}
