//! Submission lifecycle: one controller per view, one job in flight at most.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use shared::domain::{validate, AttemptId, Topic, ValidationError};
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    error::JobError,
    state::SubmissionState,
    transport::{JobOutput, JobTransport},
};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    StateChanged(SubmissionState),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A job was already pending; nothing changed.
    Ignored,
    /// The topic failed validation; no request was made.
    Rejected(ValidationError),
    Succeeded,
    Failed(String),
}

pub enum DetachedSubmit {
    Settled(SubmitOutcome),
    Spawned(JoinHandle<()>),
}

struct ControllerState {
    submission: SubmissionState,
    last_attempt: AttemptId,
    in_flight: Option<AttemptId>,
}

enum Begin {
    Settled(SubmitOutcome),
    Started { attempt: AttemptId, topic: Topic },
}

pub struct JobRequestController {
    transport: Arc<dyn JobTransport>,
    inner: Arc<Mutex<ControllerState>>,
    events: broadcast::Sender<ControllerEvent>,
}

impl JobRequestController {
    pub fn new(transport: Arc<dyn JobTransport>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            transport,
            inner: Arc::new(Mutex::new(ControllerState {
                submission: SubmissionState::new(),
                last_attempt: AttemptId(0),
                in_flight: None,
            })),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> SubmissionState {
        lock(&self.inner).submission.clone()
    }

    pub fn set_topic(&self, topic: impl Into<String>) {
        let mut guard = lock(&self.inner);
        guard.submission.topic = topic.into();
        publish(&self.events, &guard.submission);
    }

    /// Runs one attempt to completion.
    pub async fn submit(&self, raw_topic: &str) -> SubmitOutcome {
        let (attempt, topic) = match self.begin(raw_topic) {
            Begin::Settled(outcome) => return outcome,
            Begin::Started { attempt, topic } => (attempt, topic),
        };
        let in_flight = InFlight::new(&self.inner, &self.events, attempt);
        let result = self.transport.run_job(&topic).await;
        in_flight.settle(result).unwrap_or(SubmitOutcome::Ignored)
    }

    /// Enters `Pending` before returning and settles on a spawned task.
    ///
    /// The task only holds a weak reference to the state, so a completion that
    /// arrives after the controller is dropped is discarded.
    pub fn submit_detached(&self, raw_topic: &str) -> DetachedSubmit {
        let (attempt, topic) = match self.begin(raw_topic) {
            Begin::Settled(outcome) => return DetachedSubmit::Settled(outcome),
            Begin::Started { attempt, topic } => (attempt, topic),
        };
        let in_flight = InFlight::new(&self.inner, &self.events, attempt);
        let transport = Arc::clone(&self.transport);
        DetachedSubmit::Spawned(tokio::spawn(async move {
            let result = transport.run_job(&topic).await;
            in_flight.settle(result);
        }))
    }

    fn begin(&self, raw_topic: &str) -> Begin {
        let mut guard = lock(&self.inner);
        if guard.submission.is_pending() {
            debug!(attempt = ?guard.in_flight, "submit ignored while a job is pending");
            return Begin::Settled(SubmitOutcome::Ignored);
        }
        guard.submission.clear_outputs();

        let topic = match validate(raw_topic) {
            Ok(topic) => topic,
            Err(err) => {
                guard.submission.reject(err);
                publish(&self.events, &guard.submission);
                return Begin::Settled(SubmitOutcome::Rejected(err));
            }
        };

        let attempt = guard.last_attempt.next();
        guard.last_attempt = attempt;
        guard.in_flight = Some(attempt);
        guard.submission.begin();
        publish(&self.events, &guard.submission);
        info!(%attempt, topic = %topic, "submitting generation job");
        Begin::Started { attempt, topic }
    }
}

/// Settles an accepted attempt exactly once, including when the request future
/// is dropped or panics before it completes.
struct InFlight {
    state: Weak<Mutex<ControllerState>>,
    events: broadcast::Sender<ControllerEvent>,
    attempt: AttemptId,
    settled: bool,
}

impl InFlight {
    fn new(
        state: &Arc<Mutex<ControllerState>>,
        events: &broadcast::Sender<ControllerEvent>,
        attempt: AttemptId,
    ) -> Self {
        Self {
            state: Arc::downgrade(state),
            events: events.clone(),
            attempt,
            settled: false,
        }
    }

    fn settle(mut self, result: Result<JobOutput, JobError>) -> Option<SubmitOutcome> {
        self.settled = true;
        let Some(state) = self.state.upgrade() else {
            debug!(attempt = %self.attempt, "controller dropped; discarding job completion");
            return None;
        };
        settle_attempt(&state, &self.events, self.attempt, result)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        if let Some(state) = self.state.upgrade() {
            warn!(attempt = %self.attempt, "generation job abandoned before it settled");
            settle_attempt(&state, &self.events, self.attempt, Err(JobError::Unknown));
        }
    }
}

fn settle_attempt(
    state: &Mutex<ControllerState>,
    events: &broadcast::Sender<ControllerEvent>,
    attempt: AttemptId,
    result: Result<JobOutput, JobError>,
) -> Option<SubmitOutcome> {
    let mut guard = lock(state);
    if guard.in_flight != Some(attempt) {
        debug!(%attempt, "stale job completion ignored");
        return None;
    }
    guard.in_flight = None;

    let outcome = match result {
        Ok(output) => {
            info!(
                %attempt,
                result_len = output.result_text.len(),
                output_label = ?output.output_label,
                "generation job succeeded"
            );
            guard.submission.succeed(output);
            SubmitOutcome::Succeeded
        }
        Err(err) => {
            let message = err.user_message();
            warn!(%attempt, error = %err, message = %message, "generation job failed");
            guard.submission.fail(message.clone());
            SubmitOutcome::Failed(message)
        }
    };
    publish(events, &guard.submission);
    Some(outcome)
}

fn publish(events: &broadcast::Sender<ControllerEvent>, submission: &SubmissionState) {
    let _ = events.send(ControllerEvent::StateChanged(submission.clone()));
}

fn lock(state: &Mutex<ControllerState>) -> MutexGuard<'_, ControllerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
