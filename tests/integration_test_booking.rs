mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_create_booking_prices_the_stay() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;
    let customer_id = app.create_customer(&token, "Ana Lima").await;

    let (status, body) = app.book(&token, &customer_id, &inv.room_id, "2024-01-10", "2024-01-13", 2).await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["status"], "success");
    assert_eq!(body["booking"]["status"], "Pending");
    assert_eq!(body["booking"]["total"].as_f64().unwrap(), 300.0);
    assert_eq!(body["booking"]["guests"], 2);
}

#[tokio::test]
async fn test_confirmed_booking_blocks_overlapping_stay() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;
    let customer_id = app.create_customer(&token, "Ana Lima").await;

    let (_, first) = app.book(&token, &customer_id, &inv.room_id, "2024-01-10", "2024-01-13", 2).await;
    let first_id = first["booking"]["id"].as_str().unwrap();
    let (status, _) = app.set_status(&token, first_id, "Confirmed").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.book(&token, &customer_id, &inv.room_id, "2024-01-12", "2024-01-15", 1).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "room not available for requested dates");

    // availability endpoint agrees
    let (status, body) = app.send(
        "GET",
        &format!("/v1/rooms/{}/availability?check_in=2024-01-12&check_out=2024-01-15", inv.room_id),
        Some(&token),
        None,
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"]["available"], false);
}

#[tokio::test]
async fn test_back_to_back_stays_do_not_conflict() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;
    let customer_id = app.create_customer(&token, "Ana Lima").await;

    let (_, first) = app.book(&token, &customer_id, &inv.room_id, "2024-01-10", "2024-01-13", 2).await;
    app.set_status(&token, first["booking"]["id"].as_str().unwrap(), "Confirmed").await;

    let (status, second) = app.book(&token, &customer_id, &inv.room_id, "2024-01-13", "2024-01-15", 2).await;
    assert_eq!(status, StatusCode::CREATED, "{}", second);

    let (status, _) = app.set_status(&token, second["booking"]["id"].as_str().unwrap(), "Confirmed").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_illegal_transition_is_rejected() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;
    let customer_id = app.create_customer(&token, "Ana Lima").await;

    let (_, created) = app.book(&token, &customer_id, &inv.room_id, "2024-01-10", "2024-01-13", 2).await;
    let id = created["booking"]["id"].as_str().unwrap();

    assert_eq!(app.set_status(&token, id, "CONFIRMED").await.0, StatusCode::OK);
    let (status, body) = app.set_status(&token, id, "Checked In").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["status"], "CheckedIn");

    // room follows the stay
    let (_, room) = app.send("GET", &format!("/v1/rooms/{}", inv.room_id), Some(&token), None).await;
    assert_eq!(room["room"]["status"], "occupied");

    let (status, body) = app.set_status(&token, id, "Confirmed").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "error");

    let (_, fetched) = app.send("GET", &format!("/v1/bookings/{}", id), Some(&token), None).await;
    assert_eq!(fetched["booking"]["status"], "CheckedIn");

    assert_eq!(app.set_status(&token, id, "CheckedOut").await.0, StatusCode::OK);
    let (_, room) = app.send("GET", &format!("/v1/rooms/{}", inv.room_id), Some(&token), None).await;
    assert_eq!(room["room"]["status"], "available");
}

#[tokio::test]
async fn test_guest_count_and_date_validation() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;
    let customer_id = app.create_customer(&token, "Ana Lima").await;

    let (status, _) = app.book(&token, &customer_id, &inv.room_id, "2024-01-10", "2024-01-13", 3).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.book(&token, &customer_id, &inv.room_id, "2024-01-10", "2024-01-13", 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.book(&token, &customer_id, &inv.room_id, "2024-01-10", "2024-01-10", 1).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.book(&token, &customer_id, &inv.room_id, "2024-01-13", "2024-01-10", 1).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = app.send("GET", "/v1/bookings/summary", Some(&token), None).await;
    assert_eq!(listed["bookings"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_booking_with_inline_customer() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;

    let (status, body) = app.send("POST", "/v1/bookings", Some(&token), Some(json!({
        "customer": { "full_name": "Walk In", "phone": "+44 20 0000" },
        "room_id": inv.room_id,
        "check_in": "2024-03-01",
        "check_out": "2024-03-02",
        "guests": 1
    }))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let (_, summary) = app.send("GET", "/v1/customers/summary", Some(&token), None).await;
    let customers = summary["customers"].as_array().unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0]["name"], "Walk In");
    assert_eq!(customers[0]["total_bookings"], 1);

    // both sources at once is ambiguous
    let (status, _) = app.send("POST", "/v1/bookings", Some(&token), Some(json!({
        "customer_id": customers[0]["id"],
        "customer": { "full_name": "Someone Else" },
        "room_id": inv.room_id,
        "check_in": "2024-03-05",
        "check_out": "2024-03-06",
        "guests": 1
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_inline_customer_not_created_when_room_taken() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;
    let customer_id = app.create_customer(&token, "Ana Lima").await;

    let (_, first) = app.book(&token, &customer_id, &inv.room_id, "2024-01-10", "2024-01-13", 2).await;
    app.set_status(&token, first["booking"]["id"].as_str().unwrap(), "Confirmed").await;

    let (status, _) = app.send("POST", "/v1/bookings", Some(&token), Some(json!({
        "customer": { "full_name": "Late Guest" },
        "room_id": inv.room_id,
        "check_in": "2024-01-11",
        "check_out": "2024-01-12",
        "guests": 1
    }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, summary) = app.send("GET", "/v1/customers/summary", Some(&token), None).await;
    assert_eq!(summary["customers"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_second_confirm_of_overlapping_pending_loses() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;
    let customer_id = app.create_customer(&token, "Ana Lima").await;

    let (s1, first) = app.book(&token, &customer_id, &inv.room_id, "2024-01-10", "2024-01-13", 2).await;
    let (s2, second) = app.book(&token, &customer_id, &inv.room_id, "2024-01-11", "2024-01-14", 2).await;
    assert_eq!(s1, StatusCode::CREATED);
    assert_eq!(s2, StatusCode::CREATED, "pending bookings do not hold inventory");

    let (status, _) = app.set_status(&token, first["booking"]["id"].as_str().unwrap(), "Confirmed").await;
    assert_eq!(status, StatusCode::OK);

    let second_id = second["booking"]["id"].as_str().unwrap();
    let (status, _) = app.set_status(&token, second_id, "Confirmed").await;
    assert_eq!(status, StatusCode::CONFLICT);

    // the losing booking can still be cancelled
    let (status, body) = app.set_status(&token, second_id, "Cancelled").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["status"], "Cancelled");
}

#[tokio::test]
async fn test_concurrent_confirms_admit_exactly_one() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;
    let customer_id = app.create_customer(&token, "Ana Lima").await;

    let mut ids = Vec::new();
    for _ in 0..4 {
        let (_, body) = app.book(&token, &customer_id, &inv.room_id, "2024-05-01", "2024-05-04", 1).await;
        ids.push(body["booking"]["id"].as_str().unwrap().to_string());
    }

    let (a, b, c, d) = tokio::join!(
        app.set_status(&token, &ids[0], "Confirmed"),
        app.set_status(&token, &ids[1], "Confirmed"),
        app.set_status(&token, &ids[2], "Confirmed"),
        app.set_status(&token, &ids[3], "Confirmed"),
    );

    let statuses = [a.0, b.0, c.0, d.0];
    let ok = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    let conflicts = statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count();
    assert_eq!(ok, 1, "statuses: {:?}", statuses);
    assert_eq!(conflicts, 3, "statuses: {:?}", statuses);

    let (_, counts) = app.send("GET", "/v1/bookings/stats/status", Some(&token), None).await;
    let counts = counts["counts"].as_array().unwrap();
    let confirmed = counts.iter().find(|c| c["status"] == "Confirmed").unwrap();
    assert_eq!(confirmed["count"], 1);
}

#[tokio::test]
async fn test_update_booking_reprices_and_rechecks() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;
    let other_room = app.add_room(&token, &inv.branch_id, Some(&inv.room_type_id), "102", 1).await;
    let customer_id = app.create_customer(&token, "Ana Lima").await;

    let (_, blocker) = app.book(&token, &customer_id, &other_room, "2024-02-01", "2024-02-05", 1).await;
    app.set_status(&token, blocker["booking"]["id"].as_str().unwrap(), "Confirmed").await;

    let (_, created) = app.book(&token, &customer_id, &inv.room_id, "2024-02-01", "2024-02-03", 1).await;
    let id = created["booking"]["id"].as_str().unwrap().to_string();

    // extend by two nights
    let (status, body) = app.send("PUT", &format!("/v1/bookings/{}", id), Some(&token), Some(json!({
        "check_out": "2024-02-05"
    }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["booking"]["total"].as_f64().unwrap(), 400.0);

    // moving onto the blocked room fails and leaves the booking alone
    let (status, _) = app.send("PUT", "/v1/bookings/update", Some(&token), Some(json!({
        "id": id,
        "room_id": other_room
    }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, fetched) = app.send("GET", &format!("/v1/bookings/{}", id), Some(&token), None).await;
    assert_eq!(fetched["booking"]["room_id"], inv.room_id.as_str());

    // guests beyond capacity
    let (status, _) = app.send("PUT", "/v1/bookings/update", Some(&token), Some(json!({
        "id": id,
        "guests": 5
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_checked_in_booking_cannot_be_edited() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;
    let customer_id = app.create_customer(&token, "Ana Lima").await;

    let (_, created) = app.book(&token, &customer_id, &inv.room_id, "2024-02-01", "2024-02-03", 1).await;
    let id = created["booking"]["id"].as_str().unwrap();
    app.set_status(&token, id, "Confirmed").await;
    app.set_status(&token, id, "CheckedIn").await;

    let (status, _) = app.send("PUT", &format!("/v1/bookings/{}", id), Some(&token), Some(json!({
        "check_out": "2024-02-10"
    }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_delete_booking_rules() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;
    let customer_id = app.create_customer(&token, "Ana Lima").await;

    let (_, pending) = app.book(&token, &customer_id, &inv.room_id, "2024-02-01", "2024-02-03", 1).await;
    let pending_id = pending["booking"]["id"].as_str().unwrap();
    let (status, _) = app.send("DELETE", &format!("/v1/bookings/{}", pending_id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send("GET", &format!("/v1/bookings/{}", pending_id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, confirmed) = app.book(&token, &customer_id, &inv.room_id, "2024-02-01", "2024-02-03", 1).await;
    let confirmed_id = confirmed["booking"]["id"].as_str().unwrap();
    app.set_status(&token, confirmed_id, "Confirmed").await;

    let (status, _) = app.send("DELETE", &format!("/v1/bookings/{}", confirmed_id), Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_summary_filters_by_status_and_window() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;
    let customer_id = app.create_customer(&token, "Ana Lima").await;

    let (_, jan) = app.book(&token, &customer_id, &inv.room_id, "2024-01-10", "2024-01-13", 2).await;
    app.set_status(&token, jan["booking"]["id"].as_str().unwrap(), "Confirmed").await;
    app.book(&token, &customer_id, &inv.room_id, "2024-03-10", "2024-03-12", 1).await;

    let (_, all) = app.send("GET", "/v1/bookings/summary", Some(&token), None).await;
    let rows = all["bookings"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    // newest stay first
    assert_eq!(rows[0]["checkIn"], "2024-03-10");
    assert_eq!(rows[1]["customer"], "Ana Lima");
    assert_eq!(rows[1]["room"], "101");
    assert_eq!(rows[1]["roomType"], "Deluxe");

    let (_, confirmed) = app.send("GET", "/v1/bookings/summary?status=CONFIRMED", Some(&token), None).await;
    assert_eq!(confirmed["bookings"].as_array().unwrap().len(), 1);

    let (_, feb) = app.send("GET", "/v1/bookings/summary?from=2024-02-01&to=2024-04-01", Some(&token), None).await;
    let feb = feb["bookings"].as_array().unwrap();
    assert_eq!(feb.len(), 1);
    assert_eq!(feb[0]["checkIn"], "2024-03-10");
}

#[tokio::test]
async fn test_unparseable_input_uses_error_envelope() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;
    let customer_id = app.create_customer(&token, "Ana Lima").await;

    let (_, created) = app.book(&token, &customer_id, &inv.room_id, "2024-01-10", "2024-01-13", 2).await;
    let id = created["booking"]["id"].as_str().unwrap();

    let (status, body) = app.set_status(&token, id, "Teleported").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error_kind"], "validation");

    let (status, body) = app.book(&token, &customer_id, &inv.room_id, "2024-13-45", "2024-01-13", 2).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error_kind"], "validation");

    let (status, body) = app.send(
        "GET",
        &format!("/v1/rooms/{}/availability?check_in=tomorrow&check_out=2024-01-13", inv.room_id),
        Some(&token),
        None,
    ).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_kind"], "validation");

    // a well-formed but illegal move keeps its own kind
    let (status, body) = app.set_status(&token, id, "CheckedOut").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_kind"], "invalid_transition");
}

#[tokio::test]
async fn test_status_change_follows_moved_booking() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;
    let room_b = app.add_room(&token, &inv.branch_id, Some(&inv.room_type_id), "102", 1).await;
    let customer_id = app.create_customer(&token, "Ana Lima").await;

    let (_, x) = app.book(&token, &customer_id, &inv.room_id, "2024-04-10", "2024-04-13", 1).await;
    let x_id = x["booking"]["id"].as_str().unwrap().to_string();
    let (_, y) = app.book(&token, &customer_id, &room_b, "2024-04-11", "2024-04-14", 1).await;
    let y_id = y["booking"]["id"].as_str().unwrap().to_string();

    // both pending, so the move is allowed
    let (status, _) = app.send("PUT", &format!("/v1/bookings/{}", x_id), Some(&token), Some(json!({
        "room_id": room_b
    }))).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(app.set_status(&token, &y_id, "Confirmed").await.0, StatusCode::OK);
    assert_eq!(app.set_status(&token, &x_id, "Confirmed").await.0, StatusCode::CONFLICT);

    assert_eq!(app.set_status(&token, &y_id, "Cancelled").await.0, StatusCode::OK);
    assert_eq!(app.set_status(&token, &x_id, "Confirmed").await.0, StatusCode::OK);
    assert_eq!(app.set_status(&token, &x_id, "CheckedIn").await.0, StatusCode::OK);

    let (_, b) = app.send("GET", &format!("/v1/rooms/{}", room_b), Some(&token), None).await;
    assert_eq!(b["room"]["status"], "occupied");
    let (_, a) = app.send("GET", &format!("/v1/rooms/{}", inv.room_id), Some(&token), None).await;
    assert_eq!(a["room"]["status"], "available");
}
