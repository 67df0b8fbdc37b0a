use lodix_server::{build_router, ApiConfig, AppState};
use lodix_store::Store;
use serde_json::{json, Value};
use std::sync::Arc;

/// Boots the full router on an ephemeral port against a fresh in-memory
/// store and returns the base URL.
pub async fn spawn_server() -> String {
    let store = Store::open_in_memory().expect("open store");
    let state = AppState::new(Arc::new(store), ApiConfig::default());
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

pub fn order_body() -> Value {
    json!({
        "shipper": {
            "name": "Acme Logistics", "address": "Dockstraat 1", "city": "Antwerp",
            "country": "BE", "postalCode": "2000", "contactPerson": "J. Peeters",
            "email": "ops@acme.example", "phone": "+32 3 555 0100"
        },
        "consignee": {
            "name": "Nordwerk GmbH", "address": "Hafenweg 2", "city": "Hamburg",
            "country": "DE", "postalCode": "20457", "contactPerson": "K. Braun",
            "email": "inbound@nordwerk.example", "phone": "+49 40 555 0200"
        },
        "cargo": {
            "description": "Machine parts", "weight": 120.0, "volume": 1.5, "pieces": 4
        },
        "incoterms": "DAP",
        "totalValue": 8600.0
    })
}

pub fn shipment_body(order_id: &str) -> Value {
    json!({
        "orderId": order_id,
        "carrier": {
            "id": "carrier-1", "name": "TransEuro", "contactPerson": "M. Dubois",
            "email": "dispatch@transeuro.example", "phone": "+32 2 555 0199"
        },
        "origin": {
            "latitude": 51.26, "longitude": 4.40, "address": "Kaai 12", "city": "Antwerp",
            "country": "BE", "postalCode": "2030"
        },
        "destination": {
            "latitude": 53.54, "longitude": 9.99, "address": "Hafenweg 2", "city": "Hamburg",
            "country": "DE", "postalCode": "20457"
        },
        "estimatedPickup": chrono::Utc::now(),
        "estimatedDelivery": chrono::Utc::now(),
    })
}

pub fn carrier_body(name: &str) -> Value {
    json!({
        "name": name,
        "companyType": "small_company",
        "contactInfo": {
            "primaryContact": "M. Dubois", "email": "dispatch@transeuro.example",
            "phone": "+32 2 555 0199", "address": "Rue du Port 8", "city": "Brussels",
            "country": "BE", "postalCode": "1000"
        },
        "pricing": {
            "baseRate": 50.0, "perKmRate": 1.2, "minimumCharge": 75.0, "fuelSurcharge": 8.5
        },
        "compliance": {
            "insurance": {
                "type": "cargo", "amount": 1000000.0,
                "validUntil": chrono::Utc::now()
            },
            "taxId": "BE0123456789"
        }
    })
}

pub fn location_body(city: &str, country: &str) -> Value {
    json!({
        "latitude": 51.5, "longitude": 4.2, "address": "A12", "city": city,
        "country": country, "postalCode": "4811"
    })
}
