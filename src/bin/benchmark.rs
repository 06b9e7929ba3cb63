use chrono::{Duration as ChronoDuration, Utc};
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::Client;
use serde_json::{json, Value};
use std::env;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use uuid::Uuid;

const DURATION_SECS: u64 = 20;

struct Target {
    name: &'static str,
    method: &'static str,
    url: String,
    body: Option<Value>,
    token: Option<String>,
}

struct Fixture {
    token: String,
    branch_id: String,
    room_id: String,
}

#[tokio::main]
async fn main() {
    let base_url = env::var("BENCH_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let email = env::var("BOOTSTRAP_ADMIN_EMAIL").unwrap_or_else(|_| "admin@hotel.local".to_string());
    let password = env::var("BOOTSTRAP_ADMIN_PASSWORD").unwrap_or_else(|_| "change-me-please".to_string());

    println!("{}", "🚀 Starting Benchmark Suite".bold().green());
    println!("Target URL: {}", base_url);

    let client = Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to build HTTP client");

    if client.get(format!("{}/health", base_url)).send().await.is_err() {
        eprintln!("{}", format!("❌ Server is NOT reachable at {}. Please start it first.", base_url).red().bold());
        return;
    }

    println!("\n{}", "⚙️  Setting up benchmark data...".yellow());
    let fixture = setup_inventory(&client, &base_url, &email, &password).await;

    println!("{}", "✅ Data created successfully.".green());
    println!("   Branch ID: {}", fixture.branch_id);
    println!("   Room ID:   {}", fixture.room_id);

    let check_in = (Utc::now() + ChronoDuration::days(30)).date_naive();
    let check_out = check_in + ChronoDuration::days(3);

    let targets = vec![
        Target {
            name: "Health Check (Public)",
            method: "GET",
            url: format!("{}/health", base_url),
            body: None,
            token: None,
        },
        Target {
            name: "Login Flow (Crypto Intensive)",
            method: "POST",
            url: format!("{}/v1/auth/user-login", base_url),
            body: Some(json!({ "email": email, "password": password })),
            token: None,
        },
        Target {
            name: "Room Availability (Read)",
            method: "GET",
            url: format!("{}/v1/rooms/{}/availability?check_in={}&check_out={}", base_url, fixture.room_id, check_in, check_out),
            body: None,
            token: Some(fixture.token.clone()),
        },
        Target {
            name: "Bookings Summary (Join Read)",
            method: "GET",
            url: format!("{}/v1/bookings/summary?branch_id={}", base_url, fixture.branch_id),
            body: None,
            token: Some(fixture.token.clone()),
        },
    ];

    let rps_stages = vec![10, 50, 200, 1000];

    for target in targets {
        println!("\n{}", "=".repeat(60));
        println!("Benchmarking Endpoint: {}", target.name.cyan().bold());
        println!("URL: {}", target.url);
        println!("{}", "=".repeat(60));

        println!("{:<10} | {:<15} | {:<15} | {:<15}", "RPS", "Mean (ms)", "P99 (ms)", "Success Rate");
        println!("{:-<10}-+-{:-<15}-+-{:-<15}-+-{:-<15}", "", "", "", "");

        for &rps in &rps_stages {
            run_stage(&client, &target, rps).await;
        }
    }
}

async fn post_json(client: &Client, url: String, token: &str, body: Value) -> Value {
    let res = client.post(&url)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .unwrap_or_else(|e| panic!("Request to {} failed: {}", url, e));

    if !res.status().is_success() {
        let status = res.status();
        let txt = res.text().await.unwrap_or_default();
        panic!("Setup call {} failed. Status: {}. Body: {}", url, status, txt);
    }
    res.json().await.expect("Failed to parse setup response")
}

async fn setup_inventory(client: &Client, base_url: &str, email: &str, password: &str) -> Fixture {
    let login_res = client.post(format!("{}/v1/auth/user-login", base_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Login failed during setup");

    if !login_res.status().is_success() {
        panic!("Login failed. Status: {}. Is BOOTSTRAP_ADMIN_EMAIL set on the server?", login_res.status());
    }

    let auth_body: Value = login_res.json().await.expect("Failed to parse login response");
    let token = auth_body["data"]["token"].as_str().expect("No token in login response").to_string();

    let suffix = &Uuid::new_v4().to_string()[..8];
    let hotel = post_json(client, format!("{}/v1/hotels", base_url), &token, json!({
        "name": format!("Benchmark Hotel {}", suffix),
    })).await;
    let hotel_id = hotel["hotel"]["id"].as_str().expect("No hotel id").to_string();

    let branch = post_json(client, format!("{}/v1/hotels/{}/branches", base_url, hotel_id), &token, json!({
        "name": "Load Test Branch",
    })).await;
    let branch_id = branch["branch"]["id"].as_str().expect("No branch id").to_string();

    let room_type = post_json(client, format!("{}/v1/room-types", base_url), &token, json!({
        "branch_id": branch_id,
        "name": "Standard",
        "price_per_night": 100.0,
        "max_occupancy": 2,
        "amenities": { "wifi": true }
    })).await;
    let room_type_id = room_type["data"]["id"].as_str().expect("No room type id").to_string();

    let room = post_json(client, format!("{}/v1/rooms", base_url), &token, json!({
        "branch_id": branch_id,
        "room_type_id": room_type_id,
        "room_number": "101",
        "floor": 1
    })).await;
    let room_id = room["room"]["id"].as_str().expect("No room id").to_string();

    Fixture { token, branch_id, room_id }
}

async fn run_stage(client: &Client, target: &Target, rps: u32) {
    let Some(rate) = NonZeroU32::new(rps) else { return };
    let limiter = Arc::new(RateLimiter::direct(Quota::per_second(rate)));

    let (tx, mut rx) = mpsc::channel(50000);
    let start_time = Instant::now();
    let duration = Duration::from_secs(DURATION_SECS);

    loop {
        if start_time.elapsed() > duration {
            break;
        }

        if limiter.check().is_ok() {
            let client = client.clone();
            let url = target.url.clone();
            let body = target.body.clone();
            let token = target.token.clone();
            let method = target.method;
            let tx = tx.clone();

            tokio::spawn(async move {
                let req_start = Instant::now();
                let mut req = match method {
                    "POST" => client.post(&url),
                    _ => client.get(&url),
                };
                if let Some(b) = body {
                    req = req.json(&b);
                }
                if let Some(t) = token {
                    req = req.bearer_auth(t);
                }
                let res = req.send().await;
                let latency = req_start.elapsed();

                let success = match res {
                    Ok(r) => r.status().is_success(),
                    Err(_) => false,
                };

                let _ = tx.send((latency, success)).await;
            });
        } else {
            tokio::task::yield_now().await;
        }
    }

    drop(tx);

    let mut histogram = Histogram::<u64>::new(3).expect("Invalid histogram precision");
    let mut successes = 0;
    let mut total = 0;

    while let Some((latency, success)) = rx.recv().await {
        total += 1;
        if success { successes += 1; }
        let _ = histogram.record(latency.as_micros() as u64);
    }

    let mean_ms = histogram.mean() / 1000.0;
    let p99_ms = histogram.value_at_quantile(0.99) as f64 / 1000.0;
    let success_rate = if total > 0 { (successes as f64 / total as f64) * 100.0 } else { 0.0 };

    println!(
        "{:<10} | {:<15.2} | {:<15.2} | {:<14.1}%",
        rps,
        mean_ms,
        p99_ms,
        success_rate
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
}
