mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_branch_rooms_grouped_by_type() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;

    let suite = app.create_ok("/v1/room-types", &token, json!({
        "branch_id": inv.branch_id,
        "name": "Suite",
        "price_per_night": 250.0,
        "max_occupancy": 4
    }), "data").await;
    let suite_id = suite["id"].as_str().unwrap();

    app.add_room(&token, &inv.branch_id, Some(suite_id), "301", 3).await;
    app.add_room(&token, &inv.branch_id, Some(&inv.room_type_id), "102", 1).await;
    app.add_room(&token, &inv.branch_id, None, "B1", 0).await;

    let (status, body) = app.send("GET", &format!("/v1/branches/{}/rooms", inv.branch_id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let groups = body["branchRooms"].as_array().unwrap();
    assert_eq!(groups.len(), 3);

    assert_eq!(groups[0]["room_type"]["name"], "Deluxe");
    assert_eq!(groups[0]["room_type"]["amenities"]["wifi"], true);
    let deluxe_rooms: Vec<&str> = groups[0]["rooms"].as_array().unwrap()
        .iter().map(|r| r["room_number"].as_str().unwrap()).collect();
    assert_eq!(deluxe_rooms, vec!["101", "102"]);

    assert_eq!(groups[1]["room_type"]["name"], "Suite");
    assert_eq!(groups[1]["rooms"].as_array().unwrap().len(), 1);

    assert!(groups[2]["room_type"].is_null());
    assert_eq!(groups[2]["rooms"][0]["room_number"], "B1");
}

#[tokio::test]
async fn test_room_type_amenities_encoding_per_endpoint() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;

    let (_, listed) = app.send("GET", &format!("/v1/room-types/branch/{}", inv.branch_id), Some(&token), None).await;
    let raw = listed["data"][0]["amenities"].as_str().expect("branch listing keeps the encoded string");
    let decoded: serde_json::Value = serde_json::from_str(raw).unwrap();
    assert_eq!(decoded["minibar"], false);

    let (_, single) = app.send("GET", &format!("/v1/room-types/{}", inv.room_type_id), Some(&token), None).await;
    assert_eq!(single["data"]["amenities"]["wifi"], true);
}

#[tokio::test]
async fn test_update_room_type_does_not_reprice_existing_bookings() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;
    let customer_id = app.create_customer(&token, "Ana Lima").await;

    let (_, created) = app.book(&token, &customer_id, &inv.room_id, "2024-01-10", "2024-01-12", 1).await;
    let booking_id = created["booking"]["id"].as_str().unwrap();

    let (status, body) = app.send("PUT", &format!("/v1/room-types/{}", inv.room_type_id), Some(&token), Some(json!({
        "price_per_night": 150.0,
        "amenities": { "wifi": true, "balcony": true }
    }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["price_per_night"].as_f64().unwrap(), 150.0);
    assert_eq!(body["data"]["amenities"]["balcony"], true);

    let (_, fetched) = app.send("GET", &format!("/v1/bookings/{}", booking_id), Some(&token), None).await;
    assert_eq!(fetched["booking"]["total"].as_f64().unwrap(), 200.0);

    let (_, second) = app.book(&token, &customer_id, &inv.room_id, "2024-02-10", "2024-02-12", 1).await;
    assert_eq!(second["booking"]["total"].as_f64().unwrap(), 300.0);
}

#[tokio::test]
async fn test_room_type_rate_validation() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;

    let (status, _) = app.send("POST", "/v1/room-types", Some(&token), Some(json!({
        "branch_id": inv.branch_id,
        "name": "Free",
        "price_per_night": 0.0,
        "max_occupancy": 2
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send("POST", "/v1/room-types", Some(&token), Some(json!({
        "branch_id": inv.branch_id,
        "name": "Nobody",
        "price_per_night": 80.0,
        "max_occupancy": 0
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_room_number_in_branch_conflicts() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;

    let (status, body) = app.send("POST", "/v1/rooms", Some(&token), Some(json!({
        "branch_id": inv.branch_id,
        "room_type_id": inv.room_type_id,
        "room_number": "101",
        "floor": 1
    }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");

    // same number in another branch is fine
    let other = app.create_ok(
        &format!("/v1/hotels/{}/branches", inv.hotel_id), &token,
        json!({ "name": "Airport" }), "branch",
    ).await;
    let other_id = other["id"].as_str().unwrap();
    app.add_room(&token, other_id, None, "101", 1).await;
}

#[tokio::test]
async fn test_room_type_from_other_branch_rejected() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;

    let other = app.create_ok(
        &format!("/v1/hotels/{}/branches", inv.hotel_id), &token,
        json!({ "name": "Airport" }), "branch",
    ).await;

    let (status, _) = app.send("POST", "/v1/rooms", Some(&token), Some(json!({
        "branch_id": other["id"],
        "room_type_id": inv.room_type_id,
        "room_number": "7"
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_room_type_with_rooms_conflicts() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;

    let uri = format!("/v1/room-types/{}", inv.room_type_id);
    let (status, _) = app.send("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // unassign the only room, then the type can go
    let (status, body) = app.send("PUT", &format!("/v1/rooms/{}", inv.room_id), Some(&token), Some(json!({
        "room_type_id": ""
    }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body["room"]["room_type_id"].is_null());

    let (status, _) = app.send("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send("GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_room_with_active_booking_conflicts() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;
    let customer_id = app.create_customer(&token, "Ana Lima").await;

    app.book(&token, &customer_id, &inv.room_id, "2024-01-10", "2024-01-12", 1).await;

    let (status, _) = app.send("DELETE", &format!("/v1/rooms/{}", inv.room_id), Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let spare = app.add_room(&token, &inv.branch_id, Some(&inv.room_type_id), "102", 1).await;
    let (status, _) = app.send("DELETE", &format!("/v1/rooms/{}", spare), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_available_rooms_and_counts_follow_housekeeping_status() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;
    app.add_room(&token, &inv.branch_id, Some(&inv.room_type_id), "204", 2).await;
    app.add_room(&token, &inv.branch_id, Some(&inv.room_type_id), "205", 2).await;

    let (status, _) = app.send("PUT", &format!("/v1/rooms/{}", inv.room_id), Some(&token), Some(json!({
        "status": "maintenance"
    }))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, available) = app.send(
        "GET", &format!("/v1/room-types/{}/available-rooms", inv.room_type_id), Some(&token), None,
    ).await;
    let numbers: Vec<&str> = available["availableRooms"].as_array().unwrap()
        .iter().map(|r| r["room_number"].as_str().unwrap()).collect();
    assert_eq!(numbers, vec!["204", "205"]);

    let (_, counts) = app.send(
        "GET", &format!("/v1/branches/{}/room-availability", inv.branch_id), Some(&token), None,
    ).await;
    let deluxe = &counts["roomAvailability"][0];
    assert_eq!(deluxe["room_type"], "Deluxe");
    assert_eq!(deluxe["total"], 3);
    assert_eq!(deluxe["available"], 2);

    let (_, floors) = app.send("GET", &format!("/v1/room-types/{}/floors", inv.room_type_id), Some(&token), None).await;
    assert_eq!(floors["floors"], json!([1, 2]));
}

#[tokio::test]
async fn test_deactivated_hotel_takes_no_new_branches() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;

    let (status, body) = app.send("DELETE", &format!("/v1/hotels/{}", inv.hotel_id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hotel"]["is_active"], false);

    let (status, _) = app.send(
        "POST", &format!("/v1/hotels/{}/branches", inv.hotel_id), Some(&token),
        Some(json!({ "name": "Too Late" })),
    ).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, branches) = app.send("GET", &format!("/v1/hotels/{}/branches", inv.hotel_id), Some(&token), None).await;
    assert_eq!(branches["branches"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_customer_lifecycle() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;

    let (status, _) = app.send("POST", "/v1/customers", Some(&token), Some(json!({
        "full_name": "No Mail",
        "email": "not-an-email"
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send("POST", "/v1/customers", Some(&token), Some(json!({ "full_name": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let id = app.create_customer(&token, "Rui Costa").await;
    let (status, body) = app.send("PUT", &format!("/v1/customers/{}", id), Some(&token), Some(json!({
        "nationality": "PT"
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer"]["nationality"], "PT");
    assert_eq!(body["customer"]["full_name"], "Rui Costa");

    app.book(&token, &id, &inv.room_id, "2024-01-10", "2024-01-12", 1).await;
    let (status, _) = app.send("DELETE", &format!("/v1/customers/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let lonely = app.create_customer(&token, "Nobody Booked").await;
    let (status, _) = app.send("DELETE", &format!("/v1/customers/{}", lonely), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.send("GET", &format!("/v1/customers/{}", lonely), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_room_type_locked_while_bookings_open() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let inv = app.seed_inventory(&token).await;
    let customer_id = app.create_customer(&token, "Ana Lima").await;

    let single = app.create_ok("/v1/room-types", &token, json!({
        "branch_id": inv.branch_id,
        "name": "Single",
        "price_per_night": 60.0,
        "max_occupancy": 1
    }), "data").await;
    let single_id = single["id"].as_str().unwrap();

    let (_, created) = app.book(&token, &customer_id, &inv.room_id, "2024-01-10", "2024-01-12", 2).await;
    let booking_id = created["booking"]["id"].as_str().unwrap();

    let room_uri = format!("/v1/rooms/{}", inv.room_id);
    let (status, _) = app.send("PUT", &room_uri, Some(&token), Some(json!({ "room_type_id": "" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = app.send("PUT", &room_uri, Some(&token), Some(json!({ "room_type_id": single_id }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // re-sending the current type is not a change
    let (status, _) = app.send("PUT", &room_uri, Some(&token), Some(json!({ "room_type_id": inv.room_type_id }))).await;
    assert_eq!(status, StatusCode::OK);

    // the booking stays editable against its original type
    let (status, _) = app.send("PUT", &format!("/v1/bookings/{}", booking_id), Some(&token), Some(json!({
        "check_out": "2024-01-13"
    }))).await;
    assert_eq!(status, StatusCode::OK);

    app.set_status(&token, booking_id, "Cancelled").await;
    let (status, body) = app.send("PUT", &room_uri, Some(&token), Some(json!({ "room_type_id": single_id }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["room"]["room_type_id"], single_id);
}
