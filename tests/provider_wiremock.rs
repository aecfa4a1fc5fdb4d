//! Wire-level backend tests using wiremock

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jshunter_analysis::infrastructure::providers::{ChatBackend, GeminiBackend};
use jshunter_analysis::{
    AnalysisScenario, AnalysisSettings, AnalysisStatus, Analyzer, ModelBackend, ModelChoice,
    SourceDocument, backend_for,
};

fn gemini_backend(server: &MockServer) -> GeminiBackend {
    GeminiBackend::new(Some("test-key".to_string()))
        .with_base_url(server.uri())
        .with_timeout(10)
}

#[tokio::test]
async fn test_gemini_send_success() {
    let server = MockServer::start().await;

    let body = json!({
        "candidates": [{
            "content": {"parts": [{"text": "{\"findings\":[]}"}]},
            "finishReason": "STOP"
        }]
    });

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash-exp:generateContent"))
        .and(query_param("key", "test-key"))
        .and(body_string_contains("analyzed prompt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let raw = gemini_backend(&server).send("analyzed prompt").await.unwrap();
    assert_eq!(raw, "{\"findings\":[]}");
}

#[tokio::test]
async fn test_gemini_rate_limit_maps_to_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash-exp:generateContent"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(&json!({"error": {"message": "rate limit exceeded"}})),
        )
        .mount(&server)
        .await;

    let err = gemini_backend(&server).send("prompt").await.unwrap_err();
    assert_eq!(err.provider, "gemini");
    assert_eq!(err.status, Some(429));
    assert!(err.message.contains("rate limit"));
}

#[tokio::test]
async fn test_gemini_empty_candidates_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash-exp:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({"candidates": []})))
        .mount(&server)
        .await;

    let err = gemini_backend(&server).send("prompt").await.unwrap_err();
    assert!(err.message.contains("malformed response"));
    assert_eq!(err.status, None);
}

#[tokio::test]
async fn test_deepseek_send_success_with_bearer_auth() {
    let server = MockServer::start().await;

    let body = json!({
        "choices": [{"message": {"role": "assistant", "content": "deepseek says hi"}}]
    });

    Mock::given(method("POST"))
        .and(header("Authorization", "Bearer ds-key"))
        .and(body_string_contains("deepseek-chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let backend = ChatBackend::deepseek(Some("ds-key".to_string()))
        .with_url(server.uri())
        .with_timeout(10);

    let raw = backend.send("prompt").await.unwrap();
    assert_eq!(raw, "deepseek says hi");
}

#[tokio::test]
async fn test_chat_unauthorized_maps_to_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let backend = ChatBackend::openai(Some("bad-key".to_string()))
        .with_url(server.uri())
        .with_timeout(10);

    let err = backend.send("prompt").await.unwrap_err();
    assert_eq!(err.provider, "openai");
    assert_eq!(err.status, Some(401));
}

#[tokio::test]
async fn test_chat_missing_choices_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({"choices": []})))
        .mount(&server)
        .await;

    let backend = ChatBackend::custom(Some(server.uri()), None).with_timeout(10);
    let err = backend.send("prompt").await.unwrap_err();
    assert_eq!(err.provider, "custom");
    assert!(err.message.contains("malformed response"));
}

#[tokio::test]
async fn test_custom_endpoint_runs_without_credentials() {
    let server = MockServer::start().await;

    let body = json!({
        "choices": [{"message": {"role": "assistant", "content": "ok"}}]
    });

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let backend = ChatBackend::custom(Some(server.uri()), None).with_timeout(10);
    assert_eq!(backend.send("prompt").await.unwrap(), "ok");
}

#[tokio::test]
async fn test_missing_credential_short_circuits_without_a_request() {
    let server = MockServer::start().await;
    // no mocks mounted: any request would 404 and show up as an http error

    let backend = ChatBackend::deepseek(None).with_url(server.uri());
    let err = backend.send("prompt").await.unwrap_err();
    assert_eq!(err.status, None);
    assert!(err.message.contains("API key not configured"));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_analyze_end_to_end_over_custom_endpoint() {
    let server = MockServer::start().await;

    let completion = "```json\n{\"findings\":[{\"type\":\"api-key\",\"value\":\"sk-live\",\"riskLevel\":\"high\"}]}\n```";
    let body = json!({
        "choices": [{"message": {"role": "assistant", "content": completion}}]
    });

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let analyzer = Analyzer::with_builtin_templates(AnalysisSettings::default());
    let source = SourceDocument::new("f1", "app.js", "const key = 'sk-live';");
    let choice = ModelChoice::custom(server.uri(), None);

    let result = analyzer
        .analyze(&source, AnalysisScenario::SecretScan, &choice)
        .await;

    assert_eq!(result.status, AnalysisStatus::Success);
    assert_eq!(result.model, "custom");
    assert_eq!(result.secrets.len(), 1);
    assert_eq!(result.secrets[0].value, "sk-live");
}

#[tokio::test]
async fn test_analyze_all_isolates_scenarios() {
    let server = MockServer::start().await;

    let body = json!({
        "choices": [{"message": {"role": "assistant", "content": "{\"endpoints\":[{\"method\":\"GET\",\"path\":\"/users\"}]}"}}]
    });

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    // registry only knows api-discovery; the second scenario must fail alone
    let mut registry = jshunter_analysis::TemplateRegistry::new();
    let builtin = jshunter_analysis::TemplateRegistry::builtin();
    registry.register(
        builtin
            .resolve(AnalysisScenario::ApiDiscovery)
            .expect("builtin template")
            .clone(),
    );

    let analyzer = Analyzer::new(std::sync::Arc::new(registry), AnalysisSettings::default());
    let source = SourceDocument::new("f1", "app.js", "fetch('/users');");
    let choice = ModelChoice::custom(server.uri(), None);

    let results = analyzer
        .analyze_all(
            &source,
            &[AnalysisScenario::ApiDiscovery, AnalysisScenario::SecretScan],
            &choice,
        )
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].status, AnalysisStatus::Success);
    assert_eq!(results[0].api_endpoints.len(), 1);
    assert_eq!(results[0].api_endpoints[0].path, "/users");
    assert_eq!(results[1].status, AnalysisStatus::Error);
    assert!(
        results[1]
            .error
            .as_deref()
            .expect("error message")
            .contains("no template registered")
    );
}

#[tokio::test]
async fn test_backend_for_resolves_custom_choice() {
    let choice = ModelChoice::custom("https://llm.internal/v1/chat/completions", None);
    let backend = backend_for(&choice).unwrap();
    assert_eq!(backend.provider_id(), "custom");
}
