use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use loteamento::models::config::ServerConfig;
use loteamento::routes;
use serde_json::{Value, json};

mod common;

fn server_config() -> ServerConfig {
    ServerConfig {
        address: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        reajuste_horizon_days: 30,
        max_upload_size: None,
    }
}

macro_rules! init_app {
    ($test_db:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($test_db.repo()))
                .app_data(web::Data::new(server_config()))
                .configure(routes::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn creating_a_client_returns_it_with_an_id() {
    let test_db = common::TestDb::new("creating_a_client_returns_it_with_an_id.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::post()
        .uri("/api/v1/clients")
        .set_json(json!({"nome": "Maria Souza", "email": "MARIA@example.com"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["email"], "maria@example.com");

    let req = test::TestRequest::get()
        .uri("/api/v1/clients?search=souza")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["nome"], "Maria Souza");
}

#[actix_web::test]
async fn invalid_payload_lists_every_field() {
    let test_db = common::TestDb::new("invalid_payload_lists_every_field.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::post()
        .uri("/api/v1/clients")
        .set_json(json!({"email": "not-an-email"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["nome", "email"]);
}

#[actix_web::test]
async fn unknown_and_malformed_ids() {
    let test_db = common::TestDb::new("unknown_and_malformed_ids.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::get().uri("/api/v1/lots/99").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/api/v1/lots/0").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete()
        .uri("/api/v1/contracts/42")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn dashboard_counts_records() {
    let test_db = common::TestDb::new("dashboard_counts_records.db");
    let app = init_app!(test_db);

    for (numero, status) in [
        ("1", "disponivel"),
        ("2", "vendido"),
        ("3", "reservado"),
        ("4", "em_obra"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/lots")
            .set_json(json!({
                "numero": numero,
                "quadra": "A",
                "area": 300,
                "valor": 50000,
                "status": status,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/api/v1/dashboard").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["totalLotes"], 4);
    assert_eq!(body["lotesDisponiveis"], 1);
    assert_eq!(body["lotesReservados"], 1);
    assert_eq!(body["lotesVendidos"], 1);
}

#[actix_web::test]
async fn trigger_configuration_round_trips_over_http() {
    let test_db = common::TestDb::new("trigger_configuration_round_trips_over_http.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::put()
        .uri("/api/v1/gatilhos")
        .set_json(json!({
            "gatilhos": [{"diasAposVencimento": 3, "tipo": "sms", "mensagem": "Aviso"}],
            "agendamento": {"execucaoAutomatica": false, "horario": "08:00"},
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/v1/gatilhos").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["gatilhos"][0]["diasAposVencimento"], 3);
    assert_eq!(body["gatilhos"][0]["ativo"], true);
    assert_eq!(body["agendamento"]["horario"], "08:00");
}
