mod assets;

use std::{
    collections::HashMap,
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::broadcast};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

use crate::{
    catalog::CropId,
    engine::Engine,
    grid::{Tool, ToolOutcome},
    scenario::Scenario,
    snapshot::FarmSnapshot,
};

#[derive(Clone, Serialize)]
pub struct ShopItem {
    pub crop: CropId,
    pub display_name: String,
    pub seed_cost: u32,
}

#[derive(Serialize)]
pub struct StateEnvelope {
    pub snapshot: FarmSnapshot,
    pub shop: Vec<ShopItem>,
}

/// Outcome of a player action, paired with the state the UI should now
/// show. Rejections travel here as ordinary data; only malformed requests
/// become HTTP errors.
#[derive(Serialize)]
struct ActionResponse {
    applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payout: Option<u32>,
    snapshot: FarmSnapshot,
}

impl ActionResponse {
    fn new(outcome: &ToolOutcome, snapshot: FarmSnapshot) -> Self {
        match outcome {
            ToolOutcome::Applied { payout } => Self {
                applied: true,
                reason: None,
                payout: *payout,
                snapshot,
            },
            ToolOutcome::Rejected(rejection) => Self {
                applied: false,
                reason: Some(rejection.to_string()),
                payout: None,
                snapshot,
            },
        }
    }
}

struct AppState {
    engine: Mutex<Engine>,
    scenario_name: String,
    shop: Vec<ShopItem>,
    seed_costs: HashMap<CropId, u32>,
    broadcaster: broadcast::Sender<String>,
}

impl AppState {
    fn lock_engine(&self) -> std::sync::MutexGuard<'_, Engine> {
        self.engine.lock().expect("engine lock poisoned")
    }

    /// Push the latest snapshot to every SSE subscriber. Lagging or absent
    /// subscribers are not an error.
    fn publish(&self, snapshot: &FarmSnapshot) {
        if let Ok(payload) = serde_json::to_string(snapshot) {
            let _ = self.broadcaster.send(payload);
        }
    }
}

pub struct WebServerConfig {
    pub scenario: Scenario,
    pub host: String,
    pub port: u16,
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig {
        scenario,
        host,
        port,
    } = config;

    let engine = scenario.build_engine();
    let shop: Vec<ShopItem> = scenario
        .crops
        .iter()
        .map(|crop| ShopItem {
            crop: crop.id.clone(),
            display_name: crop.name.clone(),
            seed_cost: crop.seed_cost,
        })
        .collect();
    let seed_costs = scenario
        .crops
        .iter()
        .map(|crop| (crop.id.clone(), crop.seed_cost))
        .collect();

    let (tx, _) = broadcast::channel::<String>(512);
    let state = Arc::new(AppState {
        engine: Mutex::new(engine),
        scenario_name: scenario.name.clone(),
        shop,
        seed_costs,
        broadcaster: tx,
    });

    let router = Router::new()
        .route("/", get(index))
        .route("/styles.css", get(styles))
        .route("/app.js", get(script))
        .route("/api/state", get(current_state))
        .route("/api/tool", post(select_tool))
        .route("/api/tile", post(use_tool))
        .route("/api/shop/buy", post(buy_seeds))
        .route("/api/day", post(next_day))
        .route("/api/events", get(stream_events))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("invalid address");

    println!(
        "Furrow farm '{}' live at http://{}:{} (Ctrl+C to stop)",
        scenario.name, host, port
    );

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    println!("Closing up the farm...");
}

async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn styles() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        assets::STYLES_CSS,
    )
}

async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        assets::APP_JS,
    )
}

async fn current_state(State(state): State<Arc<AppState>>) -> Json<StateEnvelope> {
    let engine = state.lock_engine();
    Json(StateEnvelope {
        snapshot: engine.snapshot(&state.scenario_name),
        shop: state.shop.clone(),
    })
}

#[derive(Deserialize)]
struct ToolRequest {
    tool: Tool,
}

async fn select_tool(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ToolRequest>,
) -> Response {
    let mut engine = state.lock_engine();
    match engine.select_tool(request.tool) {
        Ok(()) => {
            let snapshot = engine.snapshot(&state.scenario_name);
            drop(engine);
            state.publish(&snapshot);
            Json(snapshot).into_response()
        }
        Err(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    }
}

#[derive(Deserialize)]
struct TileRequest {
    x: u32,
    y: u32,
}

async fn use_tool(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TileRequest>,
) -> Response {
    let mut engine = state.lock_engine();
    match engine.use_tool_at(request.x, request.y) {
        Ok(outcome) => {
            let snapshot = engine.snapshot(&state.scenario_name);
            drop(engine);
            if outcome.is_applied() {
                state.publish(&snapshot);
            }
            Json(ActionResponse::new(&outcome, snapshot)).into_response()
        }
        Err(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    }
}

#[derive(Deserialize)]
struct BuyRequest {
    crop: CropId,
}

async fn buy_seeds(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BuyRequest>,
) -> Response {
    let Some(cost) = state.seed_costs.get(&request.crop).copied() else {
        return (
            StatusCode::BAD_REQUEST,
            format!("the shop does not sell '{}'", request.crop),
        )
            .into_response();
    };

    let mut engine = state.lock_engine();
    match engine.buy_seeds(&request.crop, cost) {
        Ok(outcome) => {
            let snapshot = engine.snapshot(&state.scenario_name);
            drop(engine);
            if outcome.is_applied() {
                state.publish(&snapshot);
            }
            Json(ActionResponse::new(&outcome, snapshot)).into_response()
        }
        Err(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    }
}

async fn next_day(State(state): State<Arc<AppState>>) -> Response {
    let mut engine = state.lock_engine();
    match engine.advance_day() {
        Ok(()) => {
            let snapshot = engine.snapshot(&state.scenario_name);
            drop(engine);
            state.publish(&snapshot);
            Json(snapshot).into_response()
        }
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.broadcaster.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(payload) => Some(Ok(Event::default().data(payload))),
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    )
}
