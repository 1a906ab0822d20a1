//! Local provider stubs shared by the integration tests

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};
use travel_planner::PlannerConfig;

pub const ITINERARY_TEXT: &str = "\
## Day 1: Arrival
Morning:
- Check in at Le Meurice
Afternoon:
- Louvre Museum
- Lunch: Café Marly

## Day 2: Montmartre
- Sacré-Cœur
Evening:
- Dinner: Le Consulat
";

#[derive(Debug, Clone)]
pub struct Call {
    pub name: &'static str,
    pub authorization: Option<String>,
    pub params: HashMap<String, String>,
    pub body: Option<Value>,
}

pub struct Stub {
    flights_status: AtomicU16,
    hotels_status: AtomicU16,
    weather_status: AtomicU16,
    llm_status: AtomicU16,
    calls: Mutex<Vec<Call>>,
}

impl Stub {
    pub fn set_flights_status(&self, status: u16) {
        self.flights_status.store(status, Ordering::SeqCst);
    }

    pub fn set_hotels_status(&self, status: u16) {
        self.hotels_status.store(status, Ordering::SeqCst);
    }

    pub fn set_llm_status(&self, status: u16) {
        self.llm_status.store(status, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call(&self, name: &str) -> Call {
        self.calls()
            .into_iter()
            .find(|call| call.name == name)
            .unwrap_or_else(|| panic!("no {name} call recorded"))
    }

    fn record(
        &self,
        name: &'static str,
        headers: &HeaderMap,
        params: HashMap<String, String>,
        body: Option<Value>,
    ) {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.calls.lock().unwrap().push(Call {
            name,
            authorization,
            params,
            body,
        });
    }
}

fn status(code: &AtomicU16) -> StatusCode {
    StatusCode::from_u16(code.load(Ordering::SeqCst)).unwrap_or(StatusCode::OK)
}

async fn flights(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    stub.record("flights", &headers, params, None);
    (
        status(&stub.flights_status),
        Json(json!([{"flight": "AF1234", "price": 420}])),
    )
}

async fn hotels(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    stub.record("hotels", &headers, params, None);
    (
        status(&stub.hotels_status),
        Json(json!({"hotels": [{"name": "Le Meurice", "rating": 5}]})),
    )
}

async fn weather(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    stub.record("weather", &headers, params, None);
    (
        status(&stub.weather_status),
        Json(json!({"list": [{"dt_txt": "2024-07-15", "temp": 24.5}]})),
    )
}

async fn completions(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    stub.record("llm", &headers, HashMap::new(), Some(body));
    (
        status(&stub.llm_status),
        Json(json!({
            "choices": [{"message": {"role": "assistant", "content": ITINERARY_TEXT}}]
        })),
    )
}

/// Start the stub on an ephemeral port, returning it with its base URL
pub async fn spawn_providers() -> (Arc<Stub>, String) {
    let stub = Arc::new(Stub {
        flights_status: AtomicU16::new(200),
        hotels_status: AtomicU16::new(200),
        weather_status: AtomicU16::new(200),
        llm_status: AtomicU16::new(200),
        calls: Mutex::new(Vec::new()),
    });

    let router = Router::new()
        .route("/flights/search", get(flights))
        .route("/hotels/search", get(hotels))
        .route("/weather/forecast", get(weather))
        .route("/llm/chat/completions", post(completions))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (stub, format!("http://{addr}"))
}

/// Configuration pointing every provider at the stub
pub fn config_for(base_url: &str, llm_key: Option<&str>) -> PlannerConfig {
    let mut config = PlannerConfig::default();
    config.flights.api_key = Some("flight-key".to_string());
    config.flights.base_url = format!("{base_url}/flights");
    config.hotels.api_key = Some("hotel-key".to_string());
    config.hotels.base_url = format!("{base_url}/hotels");
    config.weather.api_key = Some("weather-key".to_string());
    config.weather.base_url = format!("{base_url}/weather");
    config.generation.api_key = llm_key.map(str::to_string);
    config.generation.endpoint = format!("{base_url}/llm/chat/completions");
    config.apply_defaults();
    config
}

pub fn paris_request() -> Value {
    json!({
        "destination": "Paris",
        "start_date": "15/07/2024",
        "end_date": "25/07/2024",
        "num_travellers": "2",
        "travel_style": "Moderate",
        "accomodation_preference": "Best view & Experience",
        "interests": {"choice1": "history and culture"}
    })
}
