//! Login With Timeout
//!
//! This example demonstrates two effects racing each other.
//!
//! Key concepts:
//! - Saving effect handles in the state via `trigger_with`
//! - Cancelling the loser of a race with `cancel`
//! - Observing states from outside the scheduler
//!
//! Run with: RUST_LOG=sensor=debug cargo run --example login

use futures::stream::{self, StreamExt};
use sensor::dsl::{stay_on_current_state, then};
use sensor::feature::BuildError;
use sensor::{EffectHandle, Feature, Reduction, SchedulerConfig};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, PartialEq)]
enum LoginState {
    Idle,
    LoggingIn {
        request: EffectHandle<LoginEffect>,
        timer: EffectHandle<LoginEffect>,
    },
    LoggedIn {
        user: String,
    },
    Failed {
        reason: String,
    },
}

#[derive(Clone, Debug)]
enum LoginEvent {
    Submit { user: String, password: String },
    Accepted { user: String },
    Rejected,
    TimedOut,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
enum LoginEffect {
    Authenticate { user: String, password: String },
    Timeout { after: Duration },
}

fn reduce(state: &LoginState, event: LoginEvent) -> Reduction<LoginState, LoginEffect> {
    match (state, event) {
        (LoginState::Idle | LoginState::Failed { .. }, LoginEvent::Submit { user, password }) => then()
            .trigger_with(LoginEffect::Authenticate { user, password }, |request| {
                then().trigger_with(
                    LoginEffect::Timeout {
                        after: Duration::from_millis(500),
                    },
                    move |timer| then().go_to(LoginState::LoggingIn { request, timer }),
                )
            }),
        (LoginState::LoggingIn { timer, .. }, LoginEvent::Accepted { user }) => {
            then().cancel([timer.clone()]).go_to(LoginState::LoggedIn { user })
        }
        (LoginState::LoggingIn { timer, .. }, LoginEvent::Rejected) => then()
            .cancel([timer.clone()])
            .go_to(LoginState::Failed {
                reason: "wrong password".to_string(),
            }),
        (LoginState::LoggingIn { request, .. }, LoginEvent::TimedOut) => then()
            .cancel([request.clone()])
            .go_to(LoginState::Failed {
                reason: "server did not answer".to_string(),
            }),
        _ => stay_on_current_state(),
    }
}

async fn authenticate(user: String, password: String, latency: Duration) -> LoginEvent {
    tokio::time::sleep(latency).await;
    if password == "hunter2" {
        LoginEvent::Accepted { user }
    } else {
        LoginEvent::Rejected
    }
}

fn login_feature(latency: Duration) -> Result<Feature<LoginState, LoginEvent, LoginEffect>, BuildError> {
    Feature::builder()
        .reducer(reduce)
        .effects(move |effect| match effect {
            LoginEffect::Authenticate { user, password } => {
                stream::once(authenticate(user, password, latency)).boxed()
            }
            LoginEffect::Timeout { after } => stream::once(async move {
                tokio::time::sleep(after).await;
                LoginEvent::TimedOut
            })
            .boxed(),
        })
        .build()
}

async fn attempt(
    name: &str,
    latency: Duration,
    user: &str,
    password: &str,
) -> Result<LoginState, Box<dyn std::error::Error>> {
    let feature = login_feature(latency)?;
    let scheduler = feature.spawn_with(LoginState::Idle, SchedulerConfig::default().with_name(name));
    let mut states = scheduler.states().await?;

    scheduler
        .send(LoginEvent::Submit {
            user: user.to_string(),
            password: password.to_string(),
        })
        .await?;

    while let Some(state) = states.recv().await {
        println!("  [{name}] {state:?}");
        if matches!(state, LoginState::LoggedIn { .. } | LoginState::Failed { .. }) {
            break;
        }
    }

    scheduler.shutdown().await?;
    Ok(scheduler.latest_state())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sensor=info")))
        .init();

    println!("=== Login With Timeout ===\n");

    println!("Fast server, correct password:");
    let state = attempt("fast", Duration::from_millis(50), "ada", "hunter2").await?;
    println!("  final: {state:?}\n");

    println!("Fast server, wrong password:");
    let state = attempt("rejected", Duration::from_millis(50), "ada", "letmein").await?;
    println!("  final: {state:?}\n");

    println!("Slow server, timer wins:");
    let state = attempt("slow", Duration::from_secs(2), "ada", "hunter2").await?;
    println!("  final: {state:?}");

    Ok(())
}
