use push_dispatcher::config::{Config, DEFAULT_FCM_SCOPE};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

pub const PRIVATE_KEY: &str = include_str!("../fixtures/service_account_key.pem");
pub const PUBLIC_KEY: &str = include_str!("../fixtures/service_account_pub.pem");

pub const PROJECT_ID: &str = "demo-project";
pub const CLIENT_EMAIL: &str = "sender@demo-project.iam.gserviceaccount.com";
pub const SERVICE_KEY: &str = "service-role-secret";
pub const SEND_PATH: &str = "/v1/projects/demo-project/messages:send";

/// Config pointing every outbound collaborator at the given mock server.
pub fn test_config(server: &MockServer) -> Config {
    Config {
        fcm_project_id: PROJECT_ID.to_string(),
        fcm_sa_client_email: CLIENT_EMAIL.to_string(),
        fcm_sa_private_key: PRIVATE_KEY.to_string(),
        supabase_url: server.uri(),
        supabase_service_role_key: SERVICE_KEY.to_string(),
        server_port: 0,
        oauth_token_url: format!("{}/token", server.uri()),
        fcm_api_base_url: server.uri(),
        fcm_scope: DEFAULT_FCM_SCOPE.to_string(),
        recipient_table: "user_tokens".to_string(),
        recipient_column: "fcm_token".to_string(),
        dispatch_concurrency: 4,
        http_timeout_seconds: 5,
    }
}

pub async fn mount_store(server: &MockServer, tokens: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/user_tokens"))
        .and(query_param("select", "fcm_token"))
        .and(query_param("fcm_token", "not.is.null"))
        .and(header("apikey", SERVICE_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(tokens))
        .mount(server)
        .await;
}

pub async fn mount_token_endpoint(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.test-access-token",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub fn token_rows(tokens: &[Option<&str>]) -> serde_json::Value {
    serde_json::Value::Array(
        tokens
            .iter()
            .map(|token| json!({ "fcm_token": token }))
            .collect(),
    )
}
