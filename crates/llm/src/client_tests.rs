#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::client::{Completion, LlmClient, truncate};
    use crate::error::LlmError;
    use chatrelay_core::ChatMessage;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> LlmClient {
        LlmClient::new("test-key".to_owned(), server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn conversation() -> Vec<ChatMessage> {
        vec![ChatMessage::system("be brief"), ChatMessage::user("hello")]
    }

    fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{
                "message": {
                    "content": content,
                    "role": "assistant"
                }
            }]
        })
    }

    #[tokio::test]
    async fn test_success_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-test",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("hi there")))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server).complete("gpt-test", &conversation(), None).await.unwrap();
        assert_eq!(reply, "hi there");
    }

    #[tokio::test]
    async fn test_max_tokens_is_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({"max_tokens": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("yes")))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server).complete("mini", &conversation(), Some(5)).await.unwrap();
        assert_eq!(reply, "yes");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).complete("gpt-test", &conversation(), None).await.unwrap_err();
        assert!(matches!(err, LlmError::HttpStatus { code: 401, .. }));
        assert!(err.to_string().contains("Unauthorized"));
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).complete("gpt-test", &conversation(), None).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_null_content_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).complete("gpt-test", &conversation(), None).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).complete("gpt-test", &conversation(), None).await.unwrap_err();
        assert!(matches!(err, LlmError::JsonParse { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_transport_error() {
        let client = LlmClient::new(
            "k".to_owned(),
            "http://127.0.0.1:9".to_owned(),
            Duration::from_secs(2),
        )
        .unwrap();
        let err = client.complete("gpt-test", &conversation(), None).await.unwrap_err();
        assert!(matches!(err, LlmError::HttpRequest(_)));
    }

    #[test]
    fn test_debug_masks_api_key() {
        let client = LlmClient::new(
            "sk-secret".to_owned(),
            "http://localhost/".to_owned(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(!format!("{client:?}").contains("sk-secret"));
        assert_eq!(client.base_url(), "http://localhost");
    }

    #[test]
    fn test_truncate_unicode_boundary() {
        let s = "привет";
        let result = truncate(s, 3);
        assert!(result.len() <= 3);
        assert_eq!(truncate("hello", 10), "hello");
    }
}
