//! Sensor: an effect-reconciling state machine engine
//!
//! Sensor follows the "pure core, imperative shell" philosophy. A feature is
//! described by a pure reducer `(state, event) -> reduction` and an effects
//! implementation `effect -> stream of events`. The engine runs one
//! serialized reduction loop, keeps a set of running effect handles, and
//! reconciles that set after every event: new handles start tasks, removed
//! handles cancel theirs, and every event a task produces goes back through
//! the same loop.
//!
//! # Core Concepts
//!
//! - **Effect handles**: every triggered effect gets a unique, never reused id
//! - **DSL**: `then().cancel(..).trigger(..).go_to(..)`, checked at compile time
//! - **Running set**: the handles whose tasks should be alive right now
//! - **Scheduler**: the single writer that diffs running sets and drives tasks
//!
//! # Example
//!
//! ```rust
//! use sensor::dsl::{stay_on_current_state, then};
//! use sensor::feature::FeatureBuilder;
//! use futures::stream;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum State {
//!     Idle,
//!     Counting(u32),
//! }
//!
//! #[derive(Clone, Debug)]
//! enum Event {
//!     Start,
//!     Tick,
//! }
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! enum Effect {
//!     Ticks(u32),
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let feature = FeatureBuilder::new()
//!     .reducer(|state: &State, event: Event| match (state, event) {
//!         (State::Idle, Event::Start) => then()
//!             .trigger([Effect::Ticks(2)])
//!             .go_to(State::Counting(0)),
//!         (State::Counting(n), Event::Tick) => then().go_to(State::Counting(n + 1)),
//!         _ => stay_on_current_state(),
//!     })
//!     .effects(|effect: Effect| match effect {
//!         Effect::Ticks(n) => stream::iter((0..n).map(|_| Event::Tick)),
//!     })
//!     .build()
//!     .unwrap();
//!
//! let handle = feature.spawn(State::Idle);
//! let mut states = handle.states().await.unwrap();
//! handle.send(Event::Start).await.unwrap();
//!
//! assert_eq!(states.recv().await, Some(State::Idle));
//! assert_eq!(states.recv().await, Some(State::Counting(0)));
//! assert_eq!(states.recv().await, Some(State::Counting(1)));
//! assert_eq!(states.recv().await, Some(State::Counting(2)));
//! # }
//! ```

pub mod core;
pub mod dsl;
pub mod feature;
pub mod runtime;

// Re-export commonly used types
pub use crate::core::{EffectHandle, RunningSet};
pub use dsl::{stay_on_current_state, then, Reduction};
pub use feature::{EffectsImplementation, Feature, FeatureBuilder, Reducer};
pub use runtime::{SchedulerConfig, SchedulerError, SchedulerHandle};
