use std::sync::Arc;

use axum::extract::{Query, State};
use axum_extra::TypedHeader;
use headers::Authorization;
use serde_json::json;
use uuid::Uuid;
use wiremock::{Mock, MockServer, ResponseTemplate};
use wiremock::matchers::{method, path, query_param};

use patient_cell::handlers::{self, PatientListQuery};
use shared_config::AppConfig;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

fn state_for(server: &MockServer) -> Arc<AppConfig> {
    Arc::new(TestConfig::with_url(&server.uri()).to_app_config())
}

fn bearer() -> TypedHeader<Authorization<headers::authorization::Bearer>> {
    TypedHeader(Authorization::bearer("test-token").unwrap())
}

#[tokio::test]
async fn lists_active_patients_by_default() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("is_active", "eq.true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::patient_row(&Uuid::new_v4().to_string(), "Ana Silva Santos"),
            MockSupabaseResponses::patient_row(&Uuid::new_v4().to_string(), "Carlos Lima"),
        ])))
        .mount(&server)
        .await;

    let response = handlers::list_patients(
        State(state_for(&server)),
        bearer(),
        Query(PatientListQuery { search: None, active_only: None }),
    ).await.unwrap();

    assert_eq!(response.0["total"], json!(2));
}

#[tokio::test]
async fn search_narrows_the_directory() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::patient_row(&Uuid::new_v4().to_string(), "Ana Silva Santos"),
            MockSupabaseResponses::patient_row(&Uuid::new_v4().to_string(), "Carlos Lima"),
        ])))
        .mount(&server)
        .await;

    let response = handlers::list_patients(
        State(state_for(&server)),
        bearer(),
        Query(PatientListQuery { search: Some("CARLOS".to_string()), active_only: None }),
    ).await.unwrap();

    assert_eq!(response.0["total"], json!(1));
    assert_eq!(response.0["patients"][0]["full_name"], json!("Carlos Lima"));
}
