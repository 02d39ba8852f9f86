//! Tests for the admin request handler.

#[cfg(test)]
mod handler_tests {
    use std::collections::HashMap;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use crate::admin::{
        build_response, ConfigError, ConfigProvider, ConnectionState, CoordinatorAdminHandler,
        ErrorFormat, ErrorResponder, FileConfigProvider, Outbound, OutboundQueue, ResponseChannel,
        RestErrorResponder, StaticConfigProvider, TransportError,
    };
    use crate::parser::{HttpChunk, HttpRequest, HttpVersion, InboundMessage, Method};
    use crate::server::{HttpResponse, StatusCode};

    const CONFIGS: &str = "<config><stores>test</stores></config>";

    // Records every error response request before delegating to the real responder
    #[derive(Default)]
    struct RecordingErrorResponder {
        calls: Mutex<Vec<(StatusCode, String)>>,
    }

    impl RecordingErrorResponder {
        fn calls(&self) -> Vec<(StatusCode, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ErrorResponder for RecordingErrorResponder {
        fn write_error_response(&self, channel: &mut dyn ResponseChannel, status: StatusCode, message: &str) {
            self.calls.lock().unwrap().push((status, message.to_string()));
            RestErrorResponder::default().write_error_response(channel, status, message);
        }
    }

    struct FailingConfigProvider {
        calls: AtomicUsize,
    }

    impl ConfigProvider for FailingConfigProvider {
        fn get_all_configs(&self) -> Result<String, ConfigError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ConfigError::Unavailable("store metadata not loaded".to_string()))
        }
    }

    type TestHandler = CoordinatorAdminHandler<Arc<StaticConfigProvider>, Arc<RecordingErrorResponder>>;

    fn handler() -> (TestHandler, Arc<StaticConfigProvider>, Arc<RecordingErrorResponder>) {
        let provider = Arc::new(StaticConfigProvider::new(CONFIGS));
        let responder = Arc::new(RecordingErrorResponder::default());
        let handler = CoordinatorAdminHandler::new(provider.clone(), responder.clone());
        (handler, provider, responder)
    }

    fn request(method: Method, path: &str, chunked: bool) -> InboundMessage {
        let mut headers = HashMap::new();
        headers.insert("Host".to_string(), "localhost".to_string());
        if chunked {
            headers.insert("Transfer-Encoding".to_string(), "chunked".to_string());
        }
        InboundMessage::Request(HttpRequest::new(method, path.to_string(), HttpVersion::Http11, headers))
    }

    fn single_response(queue: &OutboundQueue) -> &HttpResponse {
        let responses: Vec<&HttpResponse> = queue.responses().collect();
        assert_eq!(responses.len(), 1, "expected exactly one response, got {:?}", queue.actions());
        responses[0]
    }

    fn assert_content_length(response: &HttpResponse) {
        let declared = response.get_header("Content-Length").expect("Content-Length header");
        assert_eq!(declared, &response.body.len().to_string());
    }

    #[test]
    fn test_get_returns_current_configs() {
        let (mut handler, _, _) = handler();
        let mut queue = OutboundQueue::new();

        handler.on_message(request(Method::GET, "/admin", false), &mut queue);

        let response = single_response(&queue);
        assert_eq!(response.status, StatusCode::Ok);
        assert_eq!(response.version, HttpVersion::Http11);
        assert_eq!(response.body_text(), CONFIGS);
        assert_content_length(response);
        assert_eq!(queue.close_count(), 0);
        assert_eq!(handler.state(), &ConnectionState::Idle);
    }

    #[test]
    fn test_get_reflects_config_at_call_time() {
        let (mut handler, provider, _) = handler();
        let mut queue = OutboundQueue::new();

        handler.on_message(request(Method::GET, "/admin", false), &mut queue);
        provider.set("<config>updated</config>").unwrap();
        handler.on_message(request(Method::GET, "/admin", false), &mut queue);

        let bodies: Vec<String> = queue.responses().map(HttpResponse::body_text).collect();
        assert_eq!(bodies, vec![CONFIGS.to_string(), "<config>updated</config>".to_string()]);
    }

    #[test]
    fn test_post_returns_not_found() {
        let (mut handler, _, responder) = handler();
        let mut queue = OutboundQueue::new();

        let mut headers = HashMap::new();
        headers.insert("Host".to_string(), "localhost".to_string());
        let post = HttpRequest::with_body(
            Method::POST,
            "/admin".to_string(),
            HttpVersion::Http11,
            headers,
            b"{\"store\":\"x\"}".to_vec(),
        );
        handler.on_message(InboundMessage::Request(post), &mut queue);

        let response = single_response(&queue);
        assert_eq!(response.status, StatusCode::NotFound);
        assert_eq!(response.body_text(), "GOT A PUT");
        assert_content_length(response);
        assert!(responder.calls().is_empty());
    }

    #[test]
    fn test_delete_returns_bad_request() {
        let (mut handler, _, responder) = handler();
        let mut queue = OutboundQueue::new();

        handler.on_message(request(Method::DELETE, "/admin/store", false), &mut queue);

        let response = single_response(&queue);
        assert_eq!(response.status, StatusCode::BadRequest);
        assert_eq!(response.body_text(), "GOT A DELETE");
        assert_content_length(response);
        assert!(responder.calls().is_empty());
    }

    #[test]
    fn test_unsupported_method_goes_through_error_responder() {
        for method in [Method::PATCH, Method::PUT, Method::HEAD, Method::Other("PURGE".to_string())] {
            let (mut handler, _, responder) = handler();
            let mut queue = OutboundQueue::new();

            handler.on_message(request(method.clone(), "/x", false), &mut queue);

            let calls = responder.calls();
            assert_eq!(calls.len(), 1, "method {method}");
            assert_eq!(calls[0].0, StatusCode::BadRequest);
            assert!(calls[0].1.contains(&method.to_string()));
            assert!(calls[0].1.contains("/x"));

            // Only the error response was written and the connection stays open
            let response = single_response(&queue);
            assert_eq!(response.status, StatusCode::BadRequest);
            assert_eq!(queue.close_count(), 0);
            assert_eq!(handler.state(), &ConnectionState::Idle);
        }
    }

    #[test]
    fn test_chunked_request_waits_for_last_chunk() {
        let (mut handler, _, _) = handler();
        let mut queue = OutboundQueue::new();

        handler.on_message(request(Method::POST, "/x", true), &mut queue);
        assert!(queue.is_empty());
        assert!(handler.state().is_receiving_chunks());
        assert_eq!(handler.state().current_request().map(|r| r.path.as_str()), Some("/x"));

        handler.on_message(InboundMessage::Chunk(HttpChunk::new(b"abc".to_vec())), &mut queue);
        assert!(queue.is_empty());
        assert!(handler.state().is_receiving_chunks());

        handler.on_message(InboundMessage::Chunk(HttpChunk::last()), &mut queue);
        let response = single_response(&queue);
        assert_eq!(response.status, StatusCode::NotFound);
        assert!(!handler.state().is_receiving_chunks());
        assert!(handler.state().current_request().is_none());
    }

    #[test]
    fn test_chunk_payloads_are_not_retained() {
        let (mut handler, _, _) = handler();
        let mut queue = OutboundQueue::new();

        handler.on_message(request(Method::DELETE, "/x", true), &mut queue);
        handler.on_message(InboundMessage::Chunk(HttpChunk::new(b"Wiki".to_vec())), &mut queue);
        handler.on_message(InboundMessage::Chunk(HttpChunk::new(b"pedia".to_vec())), &mut queue);

        let pending = handler.state().current_request().unwrap();
        assert!(pending.body.is_empty());
        assert!(queue.is_empty());

        handler.on_message(InboundMessage::Chunk(HttpChunk::last()), &mut queue);
        assert_eq!(single_response(&queue).status, StatusCode::BadRequest);
    }

    #[test]
    fn test_handler_is_idle_again_after_chunked_request() {
        let (mut handler, _, _) = handler();
        let mut queue = OutboundQueue::new();

        handler.on_message(request(Method::GET, "/admin", true), &mut queue);
        handler.on_message(InboundMessage::Chunk(HttpChunk::last()), &mut queue);
        handler.on_message(request(Method::GET, "/admin", false), &mut queue);

        let statuses: Vec<StatusCode> = queue.responses().map(|r| r.status).collect();
        assert_eq!(statuses, vec![StatusCode::Ok, StatusCode::Ok]);
        assert_eq!(handler.state(), &ConnectionState::Idle);
    }

    #[test]
    fn test_chunked_unsupported_method_answers_after_last_chunk() {
        let (mut handler, _, responder) = handler();
        let mut queue = OutboundQueue::new();

        handler.on_message(request(Method::PATCH, "/x", true), &mut queue);
        assert!(responder.calls().is_empty());

        handler.on_message(InboundMessage::Chunk(HttpChunk::last()), &mut queue);
        assert_eq!(responder.calls().len(), 1);
        assert_eq!(single_response(&queue).status, StatusCode::BadRequest);
    }

    #[test]
    fn test_transport_error_closes_without_response() {
        let (mut handler, _, responder) = handler();
        let mut queue = OutboundQueue::new();

        handler.on_message(request(Method::POST, "/x", true), &mut queue);
        let error = TransportError::Io(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"));
        handler.on_transport_error(&error, &mut queue);

        assert_eq!(queue.actions(), &[Outbound::Close]);
        assert!(responder.calls().is_empty());
        assert_eq!(handler.state(), &ConnectionState::Idle);
    }

    #[test]
    fn test_chunk_without_request_closes_connection() {
        let (mut handler, _, _) = handler();
        let mut queue = OutboundQueue::new();

        handler.on_message(InboundMessage::Chunk(HttpChunk::new(b"stray".to_vec())), &mut queue);

        assert_eq!(queue.actions(), &[Outbound::Close]);
    }

    #[test]
    fn test_request_during_chunked_body_closes_connection() {
        let (mut handler, _, _) = handler();
        let mut queue = OutboundQueue::new();

        handler.on_message(request(Method::POST, "/x", true), &mut queue);
        handler.on_message(request(Method::GET, "/admin", false), &mut queue);

        assert_eq!(queue.actions(), &[Outbound::Close]);
        assert_eq!(handler.state(), &ConnectionState::Idle);
    }

    #[test]
    fn test_config_failure_answers_internal_server_error() {
        let provider = FailingConfigProvider { calls: AtomicUsize::new(0) };
        let responder = Arc::new(RecordingErrorResponder::default());
        let mut handler = CoordinatorAdminHandler::new(provider, responder.clone());
        let mut queue = OutboundQueue::new();

        handler.on_message(request(Method::GET, "/admin", false), &mut queue);

        let calls = responder.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, StatusCode::InternalServerError);
        assert!(calls[0].1.contains("store metadata not loaded"));
        assert_eq!(single_response(&queue).status, StatusCode::InternalServerError);
        assert_eq!(queue.close_count(), 0);
    }

    #[test]
    fn test_file_config_provider_reads_file() {
        let path = std::env::temp_dir().join(format!("coordinator-admin-{}.xml", std::process::id()));
        std::fs::write(&path, CONFIGS).unwrap();

        let provider = FileConfigProvider::new(&path);
        assert_eq!(provider.get_all_configs().unwrap(), CONFIGS);

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(provider.get_all_configs(), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_build_response_sets_content_length_in_bytes() {
        let response = build_response(StatusCode::Ok, "héllo ✓");
        assert_eq!(response.body, "héllo ✓".as_bytes());
        assert_eq!(response.get_header("Content-Length").unwrap(), "10");

        let empty = build_response(StatusCode::NotFound, "");
        assert!(empty.body.is_empty());
        assert_eq!(empty.get_header("Content-Length").unwrap(), "0");
    }

    #[test]
    fn test_json_error_format() {
        let mut queue = OutboundQueue::new();
        RestErrorResponder::new(ErrorFormat::Json).write_error_response(&mut queue, StatusCode::BadRequest, "nope");

        let response = single_response(&queue);
        assert_eq!(response.get_header("Content-Type").unwrap(), "application/json");
        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["status"], 400);
        assert_eq!(body["error"], "Bad Request");
        assert_eq!(body["message"], "nope");
        assert_content_length(response);
    }
}
