//! Orchestration tests against local provider stubs

mod common;

use common::{ITINERARY_TEXT, config_for, paris_request, spawn_providers};
use serde_json::{Value, json};
use travel_planner::{TravelPlan, TravelPlanner, write_plan};

#[tokio::test]
async fn test_without_generation_returns_exactly_three_lookups() {
    let (stub, base_url) = spawn_providers().await;
    let planner = TravelPlanner::new(&config_for(&base_url, None)).unwrap();
    assert!(!planner.generates_itineraries());

    let plan = planner.plan_from_json(&paris_request()).await.unwrap();
    assert!(plan.itinerary().is_none());

    let value = serde_json::to_value(&plan).unwrap();
    let mut keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["flights", "hotels", "weather"]);
    assert_eq!(value["flights"], json!([{"flight": "AF1234", "price": 420}]));
    assert_eq!(value["hotels"]["hotels"][0]["name"], "Le Meurice");
    assert!(value.get("raw_itinerary").is_none());

    assert!(stub.calls().iter().all(|call| call.name != "llm"));
}

#[tokio::test]
async fn test_lookups_carry_credentials_and_parameters() {
    let (stub, base_url) = spawn_providers().await;
    let planner = TravelPlanner::new(&config_for(&base_url, None)).unwrap();
    planner.plan_from_json(&paris_request()).await.unwrap();

    let flights = stub.call("flights");
    assert_eq!(flights.authorization.as_deref(), Some("Bearer flight-key"));
    assert_eq!(flights.params["destination"], "Paris");
    assert_eq!(flights.params["start_date"], "15/07/2024");
    assert_eq!(flights.params["end_date"], "25/07/2024");
    assert_eq!(flights.params["num_travelers"], "2");

    let hotels = stub.call("hotels");
    assert_eq!(hotels.authorization.as_deref(), Some("Bearer hotel-key"));
    assert_eq!(hotels.params["preference"], "Best view & Experience");

    let weather = stub.call("weather");
    assert_eq!(weather.authorization.as_deref(), Some("Bearer weather-key"));
    assert_eq!(weather.params["q"], "Paris");
    assert_eq!(weather.params["units"], "metric");
}

#[tokio::test]
async fn test_providers_are_called_in_order() {
    let (stub, base_url) = spawn_providers().await;
    let planner = TravelPlanner::new(&config_for(&base_url, Some("llm-key"))).unwrap();
    planner.plan_from_json(&paris_request()).await.unwrap();

    let order: Vec<&str> = stub.calls().iter().map(|call| call.name).collect();
    assert_eq!(order, vec!["flights", "hotels", "weather", "llm"]);
}

#[tokio::test]
async fn test_generation_returns_itinerary() {
    let (stub, base_url) = spawn_providers().await;
    let planner = TravelPlanner::new(&config_for(&base_url, Some("llm-key"))).unwrap();
    assert!(planner.generates_itineraries());

    let plan = planner.plan_from_json(&paris_request()).await.unwrap();
    let itinerary = plan.itinerary().expect("itinerary expected");
    assert_eq!(itinerary.raw_itinerary, ITINERARY_TEXT);

    let day_plans = &itinerary.structured_itinerary.day_plans;
    assert_eq!(day_plans.len(), 2);
    assert_eq!(day_plans[0].morning_activities, vec!["Check in at Le Meurice"]);
    assert_eq!(day_plans[0].afternoon_activities, vec!["Louvre Museum"]);
    assert_eq!(day_plans[0].meals["lunch"], "Café Marly");
    assert_eq!(day_plans[1].meals["dinner"], "Le Consulat");

    let llm = stub.call("llm");
    assert_eq!(llm.authorization.as_deref(), Some("Bearer llm-key"));
    let body = llm.body.unwrap();
    assert_eq!(body["model"], "gpt-4");
    assert_eq!(body["max_tokens"], 1500);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(
        body["messages"][0]["content"],
        "You are a professional travel itinerary planner."
    );
    assert_eq!(body["messages"][1]["role"], "user");
    let prompt = body["messages"][1]["content"].as_str().unwrap();
    assert!(prompt.contains("Destination: Paris"));
    assert!(prompt.contains("Interests: history and culture"));
    assert!(prompt.contains(r#"Available Flights: [{"flight":"AF1234","price":420}]"#));
}

#[tokio::test]
async fn test_flight_failure_still_generates_with_empty_flights() {
    let (stub, base_url) = spawn_providers().await;
    stub.set_flights_status(500);
    let planner = TravelPlanner::new(&config_for(&base_url, Some("llm-key"))).unwrap();

    let plan = planner.plan_from_json(&paris_request()).await.unwrap();
    assert!(plan.itinerary().is_some());

    let body = stub.call("llm").body.unwrap();
    let prompt = body["messages"][1]["content"].as_str().unwrap();
    assert!(prompt.contains("Available Flights: []\n"));
    assert!(prompt.contains("Le Meurice"));
}

#[tokio::test]
async fn test_failed_lookups_use_documented_empty_values() {
    let (stub, base_url) = spawn_providers().await;
    stub.set_flights_status(500);
    stub.set_hotels_status(404);
    let planner = TravelPlanner::new(&config_for(&base_url, None)).unwrap();

    let plan = planner.plan_from_json(&paris_request()).await.unwrap();
    let value = serde_json::to_value(&plan).unwrap();
    assert_eq!(value["flights"], json!([]));
    assert_eq!(value["hotels"], json!({}));
    assert_eq!(value["weather"]["list"][0]["temp"], 24.5);
}

#[tokio::test]
async fn test_failed_lookup_is_distinguishable_from_no_matches() {
    let (stub, base_url) = spawn_providers().await;
    stub.set_flights_status(503);
    let planner = TravelPlanner::new(&config_for(&base_url, None)).unwrap();
    let request = travel_planner::TravelRequest::from_json(&paris_request()).unwrap();

    let context = planner.gather(request).await;
    assert!(context.flights.is_failed());
    assert!(!context.hotels.is_failed());
    assert!(context.hotels.has_matches());
    assert_eq!(context.failed_lookups(), 1);
}

#[tokio::test]
async fn test_generation_failure_returns_empty_document() {
    let (stub, base_url) = spawn_providers().await;
    stub.set_llm_status(500);
    let planner = TravelPlanner::new(&config_for(&base_url, Some("llm-key"))).unwrap();

    let plan = planner.plan_from_json(&paris_request()).await.unwrap();
    assert!(matches!(plan, TravelPlan::Empty {}));
    assert_eq!(serde_json::to_value(&plan).unwrap(), json!({}));
    assert!(stub.call("llm").body.is_some());

    let path = std::env::temp_dir().join(format!(
        "travel-planner-empty-{}.json",
        std::process::id()
    ));
    write_plan(&plan, &path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(written.trim(), "{}");
}

#[tokio::test]
async fn test_interests_reach_prompt_in_given_order() {
    let (stub, base_url) = spawn_providers().await;
    let planner = TravelPlanner::new(&config_for(&base_url, Some("llm-key"))).unwrap();

    let mut request = paris_request();
    request["interests"] = json!({"main": "food", "also": "art", "then": "jazz"});
    planner.plan_from_json(&request).await.unwrap();

    let body = stub.call("llm").body.unwrap();
    let prompt = body["messages"][1]["content"].as_str().unwrap();
    assert!(prompt.contains("Interests: food, art, jazz\n"));
}

#[tokio::test]
async fn test_missing_field_stops_before_any_lookup() {
    let (stub, base_url) = spawn_providers().await;
    let planner = TravelPlanner::new(&config_for(&base_url, Some("llm-key"))).unwrap();

    let mut request = paris_request();
    request.as_object_mut().unwrap().remove("travel_style");

    let err = planner.plan_from_json(&request).await.unwrap_err();
    assert_eq!(err.missing_field(), Some("travel_style"));
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn test_end_to_end_plan_file() {
    let (_stub, base_url) = spawn_providers().await;
    let planner = TravelPlanner::new(&config_for(&base_url, Some("llm-key"))).unwrap();
    let plan = planner.plan_from_json(&paris_request()).await.unwrap();

    let path = std::env::temp_dir().join(format!(
        "travel-planner-e2e-{}.json",
        std::process::id()
    ));
    write_plan(&plan, &path).unwrap();
    let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    std::fs::remove_file(&path).ok();

    assert!(!written["raw_itinerary"].as_str().unwrap().is_empty());
    let day_plans = written["structured_itinerary"]["day_plans"].as_array().unwrap();
    assert!(!day_plans.is_empty());
    assert_eq!(day_plans[0]["day"], 1);
}
