mod support;

use serde_json::{json, Value};
use support::{carrier_body, location_body, order_body, shipment_body, spawn_server};

async fn get_json(client: &reqwest::Client, url: &str) -> (u16, Value) {
    let response = client.get(url).send().await.expect("request");
    let status = response.status().as_u16();
    (status, response.json().await.expect("json body"))
}

async fn create_order(client: &reqwest::Client, base: &str) -> String {
    let response = client
        .post(format!("{base}/api/orders"))
        .json(&order_body())
        .send()
        .await
        .expect("create order");
    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.expect("json body");
    body["order"]["id"].as_str().expect("order id").to_string()
}

#[tokio::test]
async fn health_reports_connected_database_and_counts() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let (status, body) = get_json(&client, &format!("{base}/api/health")).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["documents"]["orders"], 0);
    assert!(body["uptime"].as_str().expect("uptime").ends_with('s'));
}

#[tokio::test]
async fn root_banner_identifies_the_service() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let (status, body) = get_json(&client, &base).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "running");
    assert!(body["version"].as_str().is_some());
}

#[tokio::test]
async fn order_create_returns_draft_with_generated_number() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/orders"))
        .json(&order_body())
        .send()
        .await
        .expect("create order");
    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["order"]["status"], "draft");
    let number = body["order"]["orderNumber"].as_str().expect("order number");
    assert!(number.starts_with("ORD-"));

    let id = body["order"]["id"].as_str().expect("order id");
    let (status, fetched) = get_json(&client, &format!("{base}/api/orders/{id}")).await;
    assert_eq!(status, 200);
    assert_eq!(fetched["order"]["currency"], "EUR");
    assert_eq!(fetched["order"]["priority"], "medium");
}

#[tokio::test]
async fn shipment_lifecycle_end_to_end() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let order_id = create_order(&client, &base).await;

    // Creation flips the draft order to processing.
    let response = client
        .post(format!("{base}/api/shipments"))
        .json(&shipment_body(&order_id))
        .send()
        .await
        .expect("create shipment");
    assert_eq!(response.status().as_u16(), 201);
    let created: Value = response.json().await.expect("json body");
    assert_eq!(created["shipment"]["status"], "pending");
    let shipment_id = created["shipment"]["id"].as_str().expect("shipment id");
    assert!(created["shipment"]["shipmentNumber"]
        .as_str()
        .expect("shipment number")
        .starts_with("SHP-"));

    let (_, order) = get_json(&client, &format!("{base}/api/orders/{order_id}")).await;
    assert_eq!(order["order"]["status"], "processing");

    // Scan event from the driver.
    let response = client
        .post(format!("{base}/api/shipments/{shipment_id}/tracking"))
        .json(&json!({
            "status": "picked_up",
            "location": location_body("Antwerp", "BE"),
            "updatedBy": "driver",
        }))
        .send()
        .await
        .expect("tracking event");
    assert_eq!(response.status().as_u16(), 201);
    let tracked: Value = response.json().await.expect("json body");
    assert_eq!(tracked["newStatus"], "picked_up");

    // Status patch without a scan synthesizes an event.
    let response = client
        .patch(format!("{base}/api/shipments/{shipment_id}/status"))
        .json(&json!({"status": "delivered"}))
        .send()
        .await
        .expect("status patch");
    assert_eq!(response.status().as_u16(), 200);

    let (status, log) = get_json(
        &client,
        &format!("{base}/api/shipments/{shipment_id}/tracking"),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(log["status"], "delivered");
    let events = log["trackingEvents"].as_array().expect("events");
    assert_eq!(events.len(), 2);
    assert_eq!(events[1]["updatedBy"], "status-endpoint");
    assert!(log["actualDelivery"].as_str().is_some());

    // Reads join the parent order summary.
    let (_, fetched) = get_json(&client, &format!("{base}/api/shipments/{shipment_id}")).await;
    assert_eq!(fetched["shipment"]["order"]["id"], order_id.as_str());
    assert!(fetched["shipment"]["order"]["orderNumber"].as_str().is_some());
}

#[tokio::test]
async fn order_listing_paginates_newest_first() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    for _ in 0..3 {
        create_order(&client, &base).await;
    }

    let (status, body) = get_json(&client, &format!("{base}/api/orders?limit=2")).await;
    assert_eq!(status, 200);
    assert_eq!(body["orders"].as_array().expect("orders").len(), 2);
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 2);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["pages"], 2);

    let (_, body) = get_json(&client, &format!("{base}/api/orders?limit=2&page=2")).await;
    assert_eq!(body["orders"].as_array().expect("orders").len(), 1);
}

#[tokio::test]
async fn order_status_filter_matches_patched_orders() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let confirmed_id = create_order(&client, &base).await;
    create_order(&client, &base).await;

    let response = client
        .patch(format!("{base}/api/orders/{confirmed_id}/status"))
        .json(&json!({"status": "confirmed"}))
        .send()
        .await
        .expect("status patch");
    assert_eq!(response.status().as_u16(), 200);

    let (_, body) = get_json(&client, &format!("{base}/api/orders?status=confirmed")).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["orders"][0]["id"], confirmed_id.as_str());
}

#[tokio::test]
async fn order_update_merges_but_protects_generated_fields() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let id = create_order(&client, &base).await;
    let (_, before) = get_json(&client, &format!("{base}/api/orders/{id}")).await;
    let original_number = before["order"]["orderNumber"].as_str().expect("number");

    let response = client
        .put(format!("{base}/api/orders/{id}"))
        .json(&json!({
            "totalValue": 9100.0,
            "orderNumber": "ORD-0-HACKED",
            "status": "delivered",
        }))
        .send()
        .await
        .expect("update");
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["order"]["totalValue"], 9100.0);
    assert_eq!(body["order"]["orderNumber"], original_number);
    assert_eq!(body["order"]["status"], "draft");
}

#[tokio::test]
async fn order_delete_conflicts_until_shipments_are_gone() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let order_id = create_order(&client, &base).await;

    let response = client
        .post(format!("{base}/api/shipments"))
        .json(&shipment_body(&order_id))
        .send()
        .await
        .expect("create shipment");
    let created: Value = response.json().await.expect("json body");
    let shipment_id = created["shipment"]["id"].as_str().expect("shipment id");

    let response = client
        .delete(format!("{base}/api/orders/{order_id}"))
        .send()
        .await
        .expect("delete order");
    assert_eq!(response.status().as_u16(), 409);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["error"]["code"], "Conflict");

    let response = client
        .delete(format!("{base}/api/shipments/{shipment_id}"))
        .send()
        .await
        .expect("delete shipment");
    assert_eq!(response.status().as_u16(), 200);

    let response = client
        .delete(format!("{base}/api/orders/{order_id}"))
        .send()
        .await
        .expect("delete order");
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["orderId"], order_id.as_str());

    let response = client
        .delete(format!("{base}/api/orders/{order_id}"))
        .send()
        .await
        .expect("second delete");
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn carrier_crud_status_and_performance() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/carriers"))
        .json(&carrier_body("TransEuro Freight"))
        .send()
        .await
        .expect("create carrier");
    assert_eq!(response.status().as_u16(), 201);
    let created: Value = response.json().await.expect("json body");
    let id = created["carrier"]["id"].as_str().expect("carrier id");
    assert!(created["carrier"]["carrierId"]
        .as_str()
        .expect("carrier ref")
        .starts_with("CAR-"));
    assert_eq!(created["carrier"]["isActive"], true);

    // Service and performance defaults applied at creation.
    let (_, fetched) = get_json(&client, &format!("{base}/api/carriers/{id}")).await;
    assert_eq!(fetched["carrier"]["services"]["domestic"], true);
    assert_eq!(fetched["carrier"]["services"]["express"], false);
    assert_eq!(fetched["carrier"]["performance"]["rating"], 5.0);

    let response = client
        .patch(format!("{base}/api/carriers/{id}/status"))
        .json(&json!({"isActive": false}))
        .send()
        .await
        .expect("status patch");
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["carrier"]["isActive"], false);

    let (_, listed) = get_json(&client, &format!("{base}/api/carriers?isActive=false")).await;
    assert_eq!(listed["pagination"]["total"], 1);

    let response = client
        .post(format!("{base}/api/carriers/{id}/performance"))
        .json(&json!({"rating": 4.2, "damageRate": 1.5}))
        .send()
        .await
        .expect("performance update");
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["performance"]["rating"], 4.2);
    assert_eq!(body["performance"]["onTimeDelivery"], 100.0);

    let (status, perf) = get_json(&client, &format!("{base}/api/carriers/{id}/performance")).await;
    assert_eq!(status, 200);
    assert_eq!(perf["name"], "TransEuro Freight");
    assert_eq!(perf["performance"]["damageRate"], 1.5);
}
