//! Live API tests against a running server seeded with an administrator
//!
//! Run with: CASFOS_AUTH__ADMIN_PASSWORD=admin123 cargo run, then
//! cargo test -- --ignored

use casfos_server::{
    client::{CasfosClient, ClientError},
    domain::{export::ExportRequest, FilterTab},
};
use reqwest::Client;
use serde_json::{json, Value};

const SERVER: &str = "http://localhost:3001";
const BASE_URL: &str = "http://localhost:3001/api";

async fn admin_client() -> CasfosClient {
    let mut client = CasfosClient::new(SERVER);
    client
        .login("admin", "admin123")
        .await
        .expect("Failed to log in as admin");
    client
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_and_ready() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let mut client = CasfosClient::new(SERVER);
    let err = client.login("admin", "wrong").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 401, .. }));
}

#[tokio::test]
#[ignore]
async fn test_registration_waits_for_approval() {
    let client = Client::new();
    let username = format!("entry{}", chrono::Utc::now().timestamp_millis());

    let response = client
        .post(format!("{}/users/register", BASE_URL))
        .json(&json!({ "username": username, "password": "secret123", "role": "assetentry" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let user: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(user["status"], "pending");

    let mut pending = CasfosClient::new(SERVER);
    let err = pending.login(&username, "secret123").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 401, .. }));

    // An asset role cannot be approved without an asset type grant
    let admin = admin_client().await;
    let id = user["id"].as_i64().expect("user id");
    let err = admin
        .post::<_, Value>(&format!("users/{}/approve", id), &json!({ "access": [] }))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 400, .. }));

    let approved: Value = admin
        .post(&format!("users/{}/approve", id), &json!({ "access": ["Permanent"] }))
        .await
        .expect("Failed to approve");
    assert_eq!(approved["status"], "approved");
    pending.login(&username, "secret123").await.expect("Approved user can log in");
}

#[tokio::test]
#[ignore]
async fn test_store_approve_then_issue() {
    let admin = admin_client().await;
    let suffix = chrono::Utc::now().timestamp_millis();
    let ids = vec![format!("CH-{}-1", suffix), format!("CH-{}-2", suffix)];

    let created = admin
        .submit(
            "storeTempAsset",
            &json!({
                "assetType": "Permanent",
                "assetCategory": "Furniture",
                "entryDate": "2024-01-10",
                "purchaseDate": "2024-01-05",
                "supplierName": "Acme Furnishers",
                "items": [{
                    "itemName": format!("Chair {}", suffix),
                    "quantityReceived": 2,
                    "unitPrice": "1500",
                    "showIdInputs": true,
                    "itemIds": &ids
                }]
            }),
        )
        .await
        .expect("Failed to submit");
    let record_id = created["id"].as_i64().expect("record id");

    let approved = admin.approve(record_id).await.expect("Failed to approve");
    assert_eq!(approved["status"], "approved");

    // Issuing more than is in store fails at approval and leaves the record pending
    let issue = admin
        .submit(
            "storeTempIssue",
            &json!({
                "assetType": "Permanent",
                "assetCategory": "Furniture",
                "itemName": format!("Chair {}", suffix),
                "issuedTo": "Library",
                "location": "Main Block",
                "issuedDate": "2024-02-01",
                "quantity": 3,
                "itemIds": [ids[0], ids[1], format!("CH-{}-3", suffix)]
            }),
        )
        .await
        .expect("Failed to submit issue");
    let issue_id = issue["id"].as_i64().expect("record id");
    let err = admin.approve(issue_id).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 422, .. }));

    let rejected = admin.reject(issue_id, "Only two chairs in store").await.expect("Failed to reject");
    assert_eq!(rejected["status"], "rejected");

    let view = admin.rejected(issue_id).await.expect("Failed to fetch rejected");
    assert_eq!(view["remark"], "Only two chairs in store");
}

#[tokio::test]
#[ignore]
async fn test_purchase_export_is_csv() {
    let admin = admin_client().await;
    let csv = admin
        .export(FilterTab::Purchase, &ExportRequest::default())
        .await
        .expect("Failed to export");
    let text = String::from_utf8(csv).expect("utf-8 csv");
    assert!(text.starts_with("Asset Type,Asset Category"));
}

/// Register an asset entry account and approve it for the given asset types
async fn entry_client(access: &[&str]) -> CasfosClient {
    let username = format!("entry{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default());
    let user: Value = Client::new()
        .post(format!("{}/users/register", BASE_URL))
        .json(&json!({ "username": username, "password": "secret123", "role": "assetentry" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let id = user["id"].as_i64().expect("user id");

    let admin = admin_client().await;
    let _: Value = admin
        .post(&format!("users/{}/approve", id), &json!({ "access": access }))
        .await
        .expect("Failed to approve");

    let mut client = CasfosClient::new(SERVER);
    client.login(&username, "secret123").await.expect("Failed to log in");
    client
}

fn chairs(name: &str, quantity: usize, ids: &[String]) -> Value {
    json!({
        "assetType": "Permanent",
        "assetCategory": "Furniture",
        "entryDate": "2024-01-10",
        "purchaseDate": "2024-01-05",
        "supplierName": "Acme Furnishers",
        "items": [{
            "itemName": name,
            "quantityReceived": quantity,
            "unitPrice": "1500",
            "showIdInputs": !ids.is_empty(),
            "itemIds": ids
        }]
    })
}

#[tokio::test]
#[ignore]
async fn test_stored_record_type_governs_access() {
    let admin = admin_client().await;
    let name = format!("Desk {}", chrono::Utc::now().timestamp_millis());
    let created = admin
        .submit("storeTempAsset", &chairs(&name, 1, &[]))
        .await
        .expect("Failed to submit");
    let record_id = created["id"].as_i64().expect("record id");
    admin.reject(record_id, "Wrong supplier").await.expect("Failed to reject");

    let consumable_only = entry_client(&["Consumable"]).await;

    let err = consumable_only.rejected(record_id).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 403, .. }));

    // a Consumable document cannot replace a rejected Permanent record
    let mut document = chairs(&name, 1, &[]);
    document["assetType"] = json!("Consumable");
    document["assetCategory"] = json!("Stationery");
    let err = consumable_only
        .post::<_, Value>(&format!("assets/rejected/{}/resubmit", record_id), &document)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 403, .. }));

    let err = consumable_only
        .post::<_, Value>(
            "assets/storeReturnedReceipt",
            &json!({ "recordId": record_id, "signedReceiptUrl": "/uploads/receipt.pdf" }),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 403, .. }));

    let view = admin.rejected(record_id).await.expect("Record is untouched");
    assert_eq!(view["remark"], "Wrong supplier");
}

#[tokio::test]
#[ignore]
async fn test_permanent_items_without_ids_issue_and_return() {
    let admin = admin_client().await;
    let name = format!("Bench {}", chrono::Utc::now().timestamp_millis());

    let stored = admin
        .submit("storeTempAsset", &chairs(&name, 2, &[]))
        .await
        .expect("Failed to submit");
    admin.approve(stored["id"].as_i64().expect("record id")).await.expect("Failed to approve store");

    let issue = admin
        .submit(
            "storeTempIssue",
            &json!({
                "assetType": "Permanent",
                "assetCategory": "Furniture",
                "itemName": &name,
                "issuedTo": "Hostel Warden",
                "location": "Hostel",
                "issuedDate": "2024-02-01",
                "quantity": 2,
                "itemIds": []
            }),
        )
        .await
        .expect("Failed to submit issue");
    admin.approve(issue["id"].as_i64().expect("record id")).await.expect("Failed to approve issue");

    let returned = admin
        .submit(
            "saveReturnedStatus",
            &json!({
                "assetType": "Permanent",
                "assetCategory": "Furniture",
                "itemName": &name,
                "location": "Hostel",
                "quantity": 1,
                "condition": "Good",
                "returnedDate": "2024-03-01"
            }),
        )
        .await
        .expect("Failed to submit return");
    let approved = admin
        .approve(returned["id"].as_i64().expect("record id"))
        .await
        .expect("Failed to approve return");
    assert_eq!(approved["status"], "approved");
}

#[tokio::test]
#[ignore]
async fn test_concurrent_intake_claims_each_id_once() {
    let first = admin_client().await;
    let second = admin_client().await;
    let suffix = chrono::Utc::now().timestamp_millis();
    let ids = vec![format!("TB-{}", suffix)];
    let a = chairs(&format!("Table {}", suffix), 1, &ids);
    let b = chairs(&format!("Table {} B", suffix), 1, &ids);

    let (a, b) = tokio::join!(first.submit("storeTempAsset", &a), second.submit("storeTempAsset", &b));

    let conflicts = [&a, &b]
        .iter()
        .filter(|r| matches!(r, Err(ClientError::Api { status: 409, .. })))
        .count();
    assert_eq!(a.is_ok() as usize + b.is_ok() as usize, 1);
    assert_eq!(conflicts, 1);
}
