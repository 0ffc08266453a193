//! Relay demo: a simulated game client feeding one tenant, one live viewer
//!
//! Run with: cargo run --example relay_demo
//!
//! Honors GSI_TTL / GSI_SWEEP_FACTOR / GSI_CHANNEL_CAPACITY. With the
//! defaults the viewer sees a few updates, then the client goes quiet and
//! the tenant expires after the next sweep (up to 150s). Try `GSI_TTL=1` to
//! watch the absence event arrive after about ten seconds.

use std::sync::Arc;
use std::time::Duration;

use gsi_relay::model::{AuthState, GameState, ProviderState};
use gsi_relay::{
    authorize, AuthScheme, GameStateStore, OperationCounters, StateEvent, StoreConfig,
    ToggleTokenFilter,
};

fn client_push(token: &str, timestamp: i64) -> GameState {
    GameState {
        auth: Some(AuthState {
            token: token.to_string(),
        }),
        provider: Some(ProviderState {
            name: "Counter-Strike: Global Offensive".to_string(),
            app_id: 730,
            timestamp,
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gsi_relay=debug".parse()?)
                .add_directive("relay_demo=debug".parse()?),
        )
        .init();

    let config = StoreConfig::from_env()?;
    let wait = config.sweep_interval() + config.ttl;
    let counters = Arc::new(OperationCounters::new());
    let store = GameStateStore::with_metrics(config, counters.clone());
    let filter = ToggleTokenFilter::default();

    // Viewer side: authorize like the WebSocket layer would, then follow
    let token = authorize("GSI demo-token", AuthScheme::Gsi, &filter)?.to_string();
    let mut sub = store.subscribe(&token);

    let viewer = tokio::spawn(async move {
        while let Some(event) = sub.recv().await {
            match event {
                StateEvent::Present(state) => {
                    let ts = state.provider.as_ref().map_or(0, |p| p.timestamp);
                    println!("viewer: state at {}", ts);
                }
                StateEvent::Absent => println!("viewer: tenant gone"),
            }
        }
        println!("viewer: stream ended");
    });

    // Client side: three pushes, one duplicate
    for timestamp in [1, 2, 2, 3] {
        let mut state = client_push("demo-token", timestamp);
        if let Some(token) = state.take_auth_token() {
            store.apply(&token, state);
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    tokio::select! {
        _ = tokio::time::sleep(wait) => {}
        _ = tokio::signal::ctrl_c() => println!("\nShutting down..."),
    }

    store.unsubscribe(&token);
    store.close();
    viewer.await?;

    for (tenant, operation, count) in counters.snapshot() {
        println!("{} {} {}", tenant, operation, count);
    }

    Ok(())
}

