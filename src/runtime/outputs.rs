//! Observable outputs of a scheduler.
//!
//! Every subscription is its own unbounded channel, so a slow reader never
//! stalls the reduction loop and never misses a value. Subscriptions are
//! registered through the scheduler inbox, which orders them with respect
//! to reductions: a new subscriber sees exactly the values committed after
//! its registration, preceded by a replay where the stream has one.

use crate::core::RunningSet;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// One subscriber's end of an output stream.
///
/// Ends (yields `None`) once the scheduler has stopped and every buffered
/// value has been read.
#[derive(Debug)]
pub struct Subscription<T> {
    inner: mpsc::UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    fn channel() -> (mpsc::UnboundedSender<T>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { inner: rx })
    }

    /// Wait for the next value.
    pub async fn recv(&mut self) -> Option<T> {
        self.inner.recv().await
    }

    /// Take the next value if one is already buffered.
    pub fn try_recv(&mut self) -> Option<T> {
        self.inner.try_recv().ok()
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.inner.poll_recv(cx)
    }
}

/// All four observables of one scheduler, subscribed at the same instant.
#[derive(Debug)]
pub struct Outputs<S, Ev, Ef> {
    /// Current state on subscription, then one state per processed event.
    pub states: Subscription<S>,

    /// Every processed event, external or effect-produced, in order.
    pub events: Subscription<Ev>,

    /// Current running set on subscription, then one set per processed event.
    pub running_effects: Subscription<RunningSet<Ef>>,

    /// Per processed event, the handles that reduction started.
    pub triggered_effects: Subscription<RunningSet<Ef>>,
}

/// Sending halves of one subscription request.
pub(crate) struct Subscriber<S, Ev, Ef> {
    states: Option<mpsc::UnboundedSender<S>>,
    events: Option<mpsc::UnboundedSender<Ev>>,
    running: Option<mpsc::UnboundedSender<RunningSet<Ef>>>,
    triggered: Option<mpsc::UnboundedSender<RunningSet<Ef>>>,
}

impl<S, Ev, Ef> Subscriber<S, Ev, Ef> {
    fn empty() -> Self {
        Self {
            states: None,
            events: None,
            running: None,
            triggered: None,
        }
    }

    pub(crate) fn states() -> (Self, Subscription<S>) {
        let (tx, rx) = Subscription::channel();
        (
            Self {
                states: Some(tx),
                ..Self::empty()
            },
            rx,
        )
    }

    pub(crate) fn events() -> (Self, Subscription<Ev>) {
        let (tx, rx) = Subscription::channel();
        (
            Self {
                events: Some(tx),
                ..Self::empty()
            },
            rx,
        )
    }

    pub(crate) fn running_effects() -> (Self, Subscription<RunningSet<Ef>>) {
        let (tx, rx) = Subscription::channel();
        (
            Self {
                running: Some(tx),
                ..Self::empty()
            },
            rx,
        )
    }

    pub(crate) fn triggered_effects() -> (Self, Subscription<RunningSet<Ef>>) {
        let (tx, rx) = Subscription::channel();
        (
            Self {
                triggered: Some(tx),
                ..Self::empty()
            },
            rx,
        )
    }

    pub(crate) fn all() -> (Self, Outputs<S, Ev, Ef>) {
        let (states_tx, states) = Subscription::channel();
        let (events_tx, events) = Subscription::channel();
        let (running_tx, running_effects) = Subscription::channel();
        let (triggered_tx, triggered_effects) = Subscription::channel();
        (
            Self {
                states: Some(states_tx),
                events: Some(events_tx),
                running: Some(running_tx),
                triggered: Some(triggered_tx),
            },
            Outputs {
                states,
                events,
                running_effects,
                triggered_effects,
            },
        )
    }
}

/// Registered subscribers, owned by the reduction loop.
pub(crate) struct Subscribers<S, Ev, Ef> {
    states: Vec<mpsc::UnboundedSender<S>>,
    events: Vec<mpsc::UnboundedSender<Ev>>,
    running: Vec<mpsc::UnboundedSender<RunningSet<Ef>>>,
    triggered: Vec<mpsc::UnboundedSender<RunningSet<Ef>>>,
}

impl<S: Clone, Ev: Clone, Ef: Clone> Subscribers<S, Ev, Ef> {
    pub(crate) fn new() -> Self {
        Self {
            states: Vec::new(),
            events: Vec::new(),
            running: Vec::new(),
            triggered: Vec::new(),
        }
    }

    /// Register `subscriber`, replaying the current state and running set.
    pub(crate) fn add(&mut self, subscriber: Subscriber<S, Ev, Ef>, state: &S, running: &RunningSet<Ef>) {
        if let Some(tx) = subscriber.states {
            if tx.send(state.clone()).is_ok() {
                self.states.push(tx);
            }
        }
        if let Some(tx) = subscriber.running {
            if tx.send(running.clone()).is_ok() {
                self.running.push(tx);
            }
        }
        self.events.extend(subscriber.events);
        self.triggered.extend(subscriber.triggered);
    }

    pub(crate) fn publish_event(&mut self, event: &Ev) {
        publish(&mut self.events, event);
    }

    pub(crate) fn publish_reduction(&mut self, state: &S, running: &RunningSet<Ef>, triggered: &RunningSet<Ef>) {
        publish(&mut self.states, state);
        publish(&mut self.running, running);
        publish(&mut self.triggered, triggered);
    }

    pub(crate) fn len(&self) -> usize {
        self.states.len() + self.events.len() + self.running.len() + self.triggered.len()
    }
}

/// Send `value` to every sender, dropping the ones whose receiver is gone.
fn publish<T: Clone>(senders: &mut Vec<mpsc::UnboundedSender<T>>, value: &T) {
    senders.retain(|tx| tx.send(value.clone()).is_ok());
}
