//! End-to-end integration test
//!
//! Drives the full HTTP surface against an in-memory Odoo:
//! auth -> read -> search -> create Patient -> create ServiceRequest

use odoo_fhir_server::{AppState, build_router, config::ServerConfig};
use odoo_fhir_store::{AuditLog, MemoryConnector, MemoryRowStore};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;

const BASE: &str = "/odoo/fhir/R4";

fn seed(store: &MemoryRowStore, model: &str, value: Value) -> i64 {
    store.insert(model, value.as_object().cloned().unwrap()).unwrap()
}

/// Products, a drugs category and a partner the tests can rely on.
fn seed_odoo(store: &MemoryRowStore) {
    let usd = seed(store, "res.currency", json!({"name": "USD", "symbol": "$"}));
    let drugs = seed(store, "product.category", json!({"name": "Drugs"}));
    seed(
        store,
        "ir.model.data",
        json!({"name": "drugs", "module": "__export__", "model": "product.category", "res_id": drugs}),
    );

    let paracetamol = seed(
        store,
        "product.product",
        json!({
            "name": "Paracetamol 500mg",
            "display_name": "[PCM] Paracetamol 500mg",
            "code": "PCM",
            "active": true,
            "categ_id": [drugs, "Drugs"],
            "standard_price": 2.5,
            "currency_id": [usd, "USD"],
        }),
    );
    seed(
        store,
        "ir.model.data",
        json!({"name": "pcm-uuid", "module": "__export__", "model": "product.product", "res_id": paracetamol}),
    );

    seed(
        store,
        "product.product",
        json!({"name": "Amoxicillin", "active": true, "categ_id": [drugs, "Drugs"]}),
    );
    seed(
        store,
        "product.product",
        json!({"name": "Complete blood count", "active": true}),
    );
    seed(
        store,
        "res.partner",
        json!({"name": "John Kamau", "ref": "patient-1", "active": true}),
    );
}

struct TestServer {
    base_url: String,
    store: Arc<MemoryRowStore>,
    _dir: TempDir,
}

/// Start a test server on a random port
async fn start_test_server() -> TestServer {
    let temp_dir = TempDir::new().unwrap();
    let audit = AuditLog::open(temp_dir.path().join("audit.sqlite")).unwrap();

    let store = Arc::new(MemoryRowStore::default());
    seed_odoo(&store);
    let connector = Arc::new(MemoryConnector::new(store.clone(), "admin", "admin"));

    let mut config = ServerConfig::default();
    config.odoo.drugs_category_ext_id = Some("__export__.drugs".to_string());

    let app = build_router(Arc::new(AppState::new(config, connector, audit)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    TestServer {
        base_url: format!("http://{}{}", addr, BASE),
        store,
        _dir: temp_dir,
    }
}

fn get(server: &TestServer, path: &str) -> reqwest::RequestBuilder {
    reqwest::Client::new()
        .get(format!("{}{}", server.base_url, path))
        .basic_auth("admin", Some("admin"))
}

fn post(server: &TestServer, path: &str, body: &Value) -> reqwest::RequestBuilder {
    reqwest::Client::new()
        .post(format!("{}{}", server.base_url, path))
        .basic_auth("admin", Some("admin"))
        .header("Content-Type", "application/fhir+json")
        .json(body)
}

#[tokio::test]
async fn test_health_and_metadata_are_public() {
    let server = start_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .get(format!("{}/metadata", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(
        resp.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("application/fhir+json")
    );

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["resourceType"], "CapabilityStatement");
    assert_eq!(body["fhirVersion"], "4.0.1");
    assert_eq!(body["rest"][0]["resource"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_authentication_is_required() {
    let server = start_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/InventoryItem/pcm-uuid", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["resourceType"], "OperationOutcome");
    assert_eq!(body["issue"][0]["code"], "login");

    let resp = client
        .get(format!("{}/InventoryItem/pcm-uuid", server.base_url))
        .basic_auth("admin", Some("wrong"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = client
        .get(format!("{}/InventoryItem/pcm-uuid", server.base_url))
        .bearer_auth("token")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_inventory_item_read_and_search() {
    let server = start_test_server().await;

    let resp = get(&server, "/InventoryItem/pcm-uuid").send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let item: Value = resp.json().await.unwrap();
    assert_eq!(item["resourceType"], "InventoryItem");
    assert_eq!(item["id"], "pcm-uuid");
    assert_eq!(item["status"], "active");

    let resp = get(&server, "/InventoryItem/missing").send().await.unwrap();
    assert_eq!(resp.status(), 404);
    let outcome: Value = resp.json().await.unwrap();
    assert_eq!(outcome["issue"][0]["code"], "not-found");

    let resp = get(&server, "/InventoryItem?code=pcm-uuid,unknown")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let bundle: Value = resp.json().await.unwrap();
    assert_eq!(bundle["resourceType"], "Bundle");
    assert_eq!(bundle["type"], "searchset");
    assert_eq!(bundle["total"], 1);
    assert_eq!(bundle["entry"][0]["resource"]["id"], "pcm-uuid");

    let resp = get(&server, "/InventoryItem?code:text=pcm").send().await.unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_charge_item_definition_search() {
    let server = start_test_server().await;

    let resp = get(&server, "/ChargeItemDefinition?code=pcm-uuid")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let bundle: Value = resp.json().await.unwrap();
    let definition = &bundle["entry"][0]["resource"];
    assert_eq!(definition["resourceType"], "ChargeItemDefinition");
    let amount = &definition["propertyGroup"][0]["priceComponent"][0]["amount"];
    assert_eq!(amount["value"], 2.5);
    assert_eq!(amount["currency"], "$");
}

#[tokio::test]
async fn test_medication_search_registers_external_ids() {
    let server = start_test_server().await;

    let resp = get(&server, "/Medication").send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let bundle: Value = resp.json().await.unwrap();
    assert_eq!(bundle["total"], 2);

    let ext_ids = server.store.rows("ir.model.data").unwrap();
    let product_ext_ids = ext_ids
        .iter()
        .filter(|row| row["model"] == "product.product")
        .count();
    assert_eq!(product_ext_ids, 2);

    // the generated id can be read back
    let generated = bundle["entry"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|entry| entry["resource"]["id"].as_str())
        .find(|id| *id != "pcm-uuid")
        .unwrap()
        .to_string();
    let resp = get(&server, &format!("/Medication/{}", generated))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_unknown_and_unsupported_interactions() {
    let server = start_test_server().await;

    let resp = get(&server, "/Observation/1").send().await.unwrap();
    assert_eq!(resp.status(), 404);
    let outcome: Value = resp.json().await.unwrap();
    assert_eq!(outcome["issue"][0]["code"], "not-supported");

    let resp = get(&server, "/ServiceRequest/1").send().await.unwrap();
    assert_eq!(resp.status(), 405);

    let resp = post(&server, "/Medication", &json!({"resourceType": "Medication"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 405);
}

#[tokio::test]
async fn test_patient_create_and_read() {
    let server = start_test_server().await;
    let patient = json!({
        "resourceType": "Patient",
        "id": "patient-2",
        "identifier": [{"use": "official", "value": "10002V"}],
        "name": [{"family": "Wanjiru", "given": ["Grace"]}],
        "birthDate": "1985-11-23",
        "address": [{"city": "Kisumu", "country": "Kenya"}]
    });

    let resp = post(&server, "/Patient", &patient).send().await.unwrap();
    assert_eq!(resp.status(), 201);
    assert_eq!(
        resp.headers()["location"].to_str().unwrap(),
        format!("{}/Patient/patient-2", BASE)
    );
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["id"], "patient-2");

    // creating the same patient again does not duplicate the partner
    let resp = post(&server, "/Patient", &patient).send().await.unwrap();
    assert_eq!(resp.status(), 201);
    let partners = server.store.rows("res.partner").unwrap();
    assert_eq!(partners.iter().filter(|row| row["ref"] == "patient-2").count(), 1);

    let resp = get(&server, "/Patient/patient-2").send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let read: Value = resp.json().await.unwrap();
    assert_eq!(read["resourceType"], "Patient");
    assert_eq!(read["identifier"][0]["value"], "10002V");

    let resp = post(&server, "/Patient", &json!({"resourceType": "ServiceRequest"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_service_request_creates_quotation() {
    let server = start_test_server().await;
    let service_request = json!({
        "resourceType": "ServiceRequest",
        "status": "active",
        "intent": "order",
        "requisition": {"value": "ORD-100"},
        "code": {"coding": [{"display": "Complete blood count"}]},
        "subject": {"reference": "Patient/patient-1"},
        "requester": {"reference": "Practitioner/7", "display": "Dr. Achieng"}
    });

    let resp = post(&server, "/ServiceRequest", &service_request)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let orders = server.store.rows("sale.order").unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["client_order_ref"], "ORD-100");
    let lines = server.store.rows("sale.order.line").unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["name"], "Complete blood count | Orderer: Dr. Achieng");

    let resp = post(&server, "/ServiceRequest", &service_request)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);
    let outcome: Value = resp.json().await.unwrap();
    assert!(
        outcome["issue"][0]["diagnostics"]
            .as_str()
            .unwrap()
            .contains("already exists")
    );

    let mut unknown_patient = service_request.clone();
    unknown_patient["requisition"]["value"] = json!("ORD-101");
    unknown_patient["subject"]["reference"] = json!("Patient/nobody");
    let resp = post(&server, "/ServiceRequest", &unknown_patient)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);
}
