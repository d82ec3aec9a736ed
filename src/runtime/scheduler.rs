//! The reconciling scheduler: a single reduction loop plus its effect tasks.
//!
//! # Architecture
//!
//! ```text
//!                          ┌──────────────────────────────────┐
//!                          │            Scheduler             │
//! SchedulerHandle ──send──►│  inbox ◄── mpsc (bounded)        │
//!                          │    │                             │
//! effect task #0 ─────────►│    ▼                             │
//! effect task #1 ─────────►│  reduce ─► apply ─► commit       │
//!        ▲                 │                       │          │
//!        │                 │                       ▼          │
//!        └──── spawn/abort ┤◄── diff(previous, next running)  │
//!                          │                       │          │
//!                          │                       ▼          │
//!                          │  publish: states, events,        │
//!                          │  running effects, triggered      │
//!                          └──────────────────────────────────┘
//! ```
//!
//! The loop is the only writer of the state, the running set and the handle
//! registry. The reduction step never awaits.

use super::config::SchedulerConfig;
use super::error::SchedulerError;
use super::outputs::{Outputs, Subscriber, Subscribers, Subscription};
use super::tasks::TaskArena;
use crate::core::{Effect, EffectHandle, Event, HandleRegistry, RunningSet, RunningSetDiff, State};
use crate::feature::Feature;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, info_span, trace, warn, Instrument};

/// Everything that can arrive in the inbox.
pub(crate) enum Inbound<S, Ev, Ef> {
    /// Event from outside, through a [`SchedulerHandle`].
    External(Ev),

    /// Event produced by the task bound to `handle`.
    Effect { handle: EffectHandle<Ef>, event: Ev },

    Subscribe(Subscriber<S, Ev, Ef>),

    Shutdown,
}

/// The reduction loop. Created and driven by [`Scheduler::spawn`].
pub struct Scheduler<S: State, Ev: Event, Ef: Effect> {
    // Dropped first, so handles observe the stop before subscriptions end.
    inbox: mpsc::Receiver<Inbound<S, Ev, Ef>>,
    effect_sender: mpsc::WeakSender<Inbound<S, Ev, Ef>>,
    released: oneshot::Receiver<()>,
    feature: Feature<S, Ev, Ef>,
    state: S,
    running: RunningSet<Ef>,
    registry: HandleRegistry,
    tasks: TaskArena,
    subscribers: Subscribers<S, Ev, Ef>,
    latest: watch::Sender<S>,
    closing: bool,
    reductions: u64,
}

impl<S: State, Ev: Event, Ef: Effect> Scheduler<S, Ev, Ef> {
    /// Start the loop on the current tokio runtime.
    ///
    /// The loop runs until [`SchedulerHandle::shutdown`] is called or every
    /// handle is dropped. In the latter case the loop aborts all effect tasks,
    /// processes what is already queued, then stops.
    pub fn spawn(
        feature: Feature<S, Ev, Ef>,
        initial_state: S,
        config: SchedulerConfig,
    ) -> SchedulerHandle<S, Ev, Ef> {
        let (inbox_tx, inbox_rx) = mpsc::channel(config.effective_capacity());
        let (latest_tx, latest_rx) = watch::channel(initial_state.clone());
        let (release_tx, release_rx) = oneshot::channel();

        let scheduler = Self {
            feature,
            state: initial_state,
            running: RunningSet::new(),
            registry: HandleRegistry::new(),
            tasks: TaskArena::new(),
            subscribers: Subscribers::new(),
            latest: latest_tx,
            inbox: inbox_rx,
            effect_sender: inbox_tx.downgrade(),
            released: release_rx,
            closing: false,
            reductions: 0,
        };

        let span = info_span!("sensor", name = %config.name);
        tokio::spawn(scheduler.run().instrument(span));

        SchedulerHandle {
            inbox: inbox_tx,
            latest: latest_rx,
            shared: Arc::new(Shared {
                name: config.name,
                _release: release_tx,
            }),
        }
    }

    async fn run(mut self) {
        info!("scheduler started");

        loop {
            let message = if self.closing {
                self.inbox.recv().await
            } else {
                tokio::select! {
                    message = self.inbox.recv() => message,
                    _ = &mut self.released => {
                        debug!("all handles dropped, draining inbox");
                        self.closing = true;
                        self.tasks.abort_all();
                        continue;
                    }
                }
            };

            let Some(message) = message else {
                break;
            };
            if !self.dispatch(message) {
                break;
            }
        }

        self.tasks.abort_all();
        info!(reductions = self.reductions, "scheduler stopped");
    }

    /// Handle one inbox message. Returns `false` when the loop should stop.
    fn dispatch(&mut self, message: Inbound<S, Ev, Ef>) -> bool {
        match message {
            Inbound::External(event) => {
                trace!(?event, "external event");
                self.process(event);
            }
            Inbound::Effect { handle, event } => {
                trace!(handle = %handle, ?event, "effect event");
                self.process(event);
            }
            Inbound::Subscribe(subscriber) => {
                self.subscribers.add(subscriber, &self.state, &self.running);
                debug!(subscriptions = self.subscribers.len(), "subscribed");
            }
            Inbound::Shutdown => {
                debug!("shutdown requested");
                return false;
            }
        }
        true
    }

    /// Reduce one event, commit, reconcile tasks and publish.
    fn process(&mut self, event: Ev) {
        self.subscribers.publish_event(&event);

        let previous = self.running.clone();
        let (state, running) = self
            .feature
            .reduce(&self.state, event)
            .into_commands()
            .apply(previous.clone(), &mut self.registry)
            .state_or(self.state.clone());

        self.state = state;
        self.running = running;
        self.reductions += 1;

        let diff = RunningSetDiff::between(&previous, &self.running);
        debug!(
            reduction = self.reductions,
            started = diff.started.len(),
            stopped = diff.stopped.len(),
            running = self.running.len(),
            tasks = self.tasks.len(),
            "reduced"
        );
        if !diff.is_empty() {
            self.reconcile(&diff);
        }

        let _ = self.latest.send_replace(self.state.clone());
        self.subscribers
            .publish_reduction(&self.state, &self.running, &diff.started_set());
    }

    /// Stop removed handles, then start added ones. Start order is unspecified.
    fn reconcile(&mut self, diff: &RunningSetDiff<Ef>) {
        for handle in &diff.stopped {
            if self.tasks.abort(handle.id()) {
                debug!(handle = %handle, "effect cancelled");
            }
        }
        for handle in &diff.started {
            self.start(handle.clone());
        }
    }

    fn start(&mut self, handle: EffectHandle<Ef>) {
        if self.closing {
            debug!(handle = %handle, "not starting effect, scheduler is closing");
            return;
        }
        let Some(inbox) = self.effect_sender.upgrade() else {
            warn!(handle = %handle, "inbox closed, effect not started");
            return;
        };

        debug!(handle = %handle, "effect started");
        let id = handle.id();
        let tagged = handle.clone();
        let events = self
            .feature
            .effects()
            .trigger(handle.into_effect())
            .map(move |event| Inbound::Effect {
                handle: tagged.clone(),
                event,
            })
            .boxed();
        self.tasks.spawn(id, events, inbox);
    }
}

struct Shared {
    name: String,
    // Dropped with the last handle, which tells the loop to wind down.
    _release: oneshot::Sender<()>,
}

/// Client side of a running scheduler.
///
/// Cloning is cheap. The scheduler keeps running while at least one handle
/// exists or until [`shutdown`](Self::shutdown) is called.
pub struct SchedulerHandle<S, Ev, Ef> {
    inbox: mpsc::Sender<Inbound<S, Ev, Ef>>,
    latest: watch::Receiver<S>,
    shared: Arc<Shared>,
}

impl<S: State, Ev: Event, Ef: Effect> SchedulerHandle<S, Ev, Ef> {
    /// The configured scheduler name, as used in its tracing span and errors.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Queue an external event, waiting for inbox capacity.
    pub async fn send(&self, event: Ev) -> Result<(), SchedulerError> {
        self.deliver(Inbound::External(event)).await
    }

    /// Queue an external event without waiting.
    pub fn try_send(&self, event: Ev) -> Result<(), SchedulerError> {
        self.inbox
            .try_send(Inbound::External(event))
            .map_err(|err| match err {
                mpsc::error::TrySendError::Full(_) => SchedulerError::Full {
                    name: self.shared.name.clone(),
                },
                mpsc::error::TrySendError::Closed(_) => self.stopped(),
            })
    }

    /// The most recently committed state.
    pub fn latest_state(&self) -> S {
        self.latest.borrow().clone()
    }

    /// States: the current one right away, then one per processed event.
    pub async fn states(&self) -> Result<Subscription<S>, SchedulerError> {
        let (subscriber, subscription) = Subscriber::states();
        self.deliver(Inbound::Subscribe(subscriber)).await?;
        Ok(subscription)
    }

    /// Every processed event, external or effect-produced.
    pub async fn events(&self) -> Result<Subscription<Ev>, SchedulerError> {
        let (subscriber, subscription) = Subscriber::events();
        self.deliver(Inbound::Subscribe(subscriber)).await?;
        Ok(subscription)
    }

    /// Running sets: the current one right away, then one per processed event.
    pub async fn running_effects(&self) -> Result<Subscription<RunningSet<Ef>>, SchedulerError> {
        let (subscriber, subscription) = Subscriber::running_effects();
        self.deliver(Inbound::Subscribe(subscriber)).await?;
        Ok(subscription)
    }

    /// Handles started by each processed event (possibly none).
    pub async fn triggered_effects(&self) -> Result<Subscription<RunningSet<Ef>>, SchedulerError> {
        let (subscriber, subscription) = Subscriber::triggered_effects();
        self.deliver(Inbound::Subscribe(subscriber)).await?;
        Ok(subscription)
    }

    /// Subscribe to all four observables at once.
    pub async fn outputs(&self) -> Result<Outputs<S, Ev, Ef>, SchedulerError> {
        let (subscriber, outputs) = Subscriber::all();
        self.deliver(Inbound::Subscribe(subscriber)).await?;
        Ok(outputs)
    }

    /// Stop the scheduler after the messages already queued.
    ///
    /// All effect tasks are aborted and every subscription ends.
    pub async fn shutdown(&self) -> Result<(), SchedulerError> {
        self.deliver(Inbound::Shutdown).await
    }

    /// Whether the loop has stopped accepting messages.
    pub fn is_closed(&self) -> bool {
        self.inbox.is_closed()
    }

    async fn deliver(&self, message: Inbound<S, Ev, Ef>) -> Result<(), SchedulerError> {
        self.inbox.send(message).await.map_err(|_| self.stopped())
    }

    fn stopped(&self) -> SchedulerError {
        SchedulerError::Stopped {
            name: self.shared.name.clone(),
        }
    }
}

impl<S, Ev, Ef> Clone for SchedulerHandle<S, Ev, Ef> {
    fn clone(&self) -> Self {
        Self {
            inbox: self.inbox.clone(),
            latest: self.latest.clone(),
            shared: Arc::clone(&self.shared),
        }
    }
}
