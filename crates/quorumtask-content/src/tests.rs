// Gateway fallback and payload verification tests

#[cfg(test)]
mod tests {
    use crate::*;
    use quorumtask_types::{NodeId, QuorumTaskError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[derive(Clone, Copy)]
    enum Reply {
        Body(&'static str),
        Hang,
    }

    struct Stub {
        template: GatewayTemplate,
        hits: Arc<AtomicUsize>,
    }

    async fn stub(reply: Reply) -> Stub {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                    }
                    match reply {
                        Reply::Body(body) => {
                            let response = format!(
                                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                                body.len(),
                                body
                            );
                            let _ = socket.write_all(response.as_bytes()).await;
                            let _ = socket.shutdown().await;
                        }
                        Reply::Hang => {
                            tokio::time::sleep(Duration::from_secs(30)).await;
                        }
                    }
                });
            }
        });
        Stub {
            template: GatewayTemplate::new(format!("http://{}/ipfs/{{cid}}/{{file}}", addr)),
            hits,
        }
    }

    async fn closed_gateway() -> GatewayTemplate {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        GatewayTemplate::new(format!("http://{}/ipfs/{{cid}}/{{file}}", addr))
    }

    #[tokio::test]
    async fn test_first_gateway_wins_without_touching_second() {
        let first = stub(Reply::Body(r#"{"data":"ok"}"#)).await;
        let second = stub(Reply::Body(r#"{"data":"other"}"#)).await;
        let fetcher = ContentFetcher::new(
            vec![first.template.clone(), second.template.clone()],
            Duration::from_secs(5),
        );

        let body = fetcher.fetch("cid1", "submission.json").await.unwrap();
        assert_eq!(body, r#"{"data":"ok"}"#);
        assert_eq!(first.hits.load(Ordering::SeqCst), 1);
        assert_eq!(second.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_html_error_page_falls_through() {
        let first = stub(Reply::Body("<html><body>Gateway Timeout</body></html>")).await;
        let second = stub(Reply::Body("payload")).await;
        let fetcher = ContentFetcher::new(
            vec![first.template.clone(), second.template.clone()],
            Duration::from_secs(5),
        );

        assert_eq!(fetcher.fetch("cid1", "f").await.unwrap(), "payload");
        assert_eq!(first.hits.load(Ordering::SeqCst), 1);
        assert_eq!(second.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_body_with_leading_whitespace_is_kept() {
        let first = stub(Reply::Body("\n<not an error page>")).await;
        let second = stub(Reply::Body("second")).await;
        let fetcher = ContentFetcher::new(
            vec![first.template.clone(), second.template.clone()],
            Duration::from_secs(5),
        );

        assert_eq!(fetcher.fetch("cid1", "f").await.unwrap(), "\n<not an error page>");
        assert_eq!(first.hits.load(Ordering::SeqCst), 1);
        assert_eq!(second.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_timeout_moves_to_next_gateway() {
        let slow = stub(Reply::Hang).await;
        let fast = stub(Reply::Body("late but fine")).await;
        let fetcher = ContentFetcher::new(
            vec![slow.template.clone(), fast.template.clone()],
            Duration::from_millis(200),
        );

        assert_eq!(fetcher.fetch("cid1", "f").await.unwrap(), "late but fine");
        assert_eq!(slow.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_gateways_failing_is_exhausted() {
        let html = stub(Reply::Body("<!DOCTYPE html>")).await;
        let fetcher = ContentFetcher::new(
            vec![closed_gateway().await, html.template.clone()],
            Duration::from_secs(5),
        );

        let err = fetcher.fetch("cid9", "f").await.unwrap_err();
        assert!(matches!(err, QuorumTaskError::GatewayExhausted(ref cid) if cid == "cid9"));
    }

    fn key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    #[test]
    fn test_signed_submission_verifies() {
        let signer = key(1);
        let payload = SignedSubmission::sign(serde_json::json!("result-42"), &signer).unwrap();
        let body = serde_json::to_string(&payload).unwrap();

        let raw = verify_signed_submission(&body, &node_id_for(&signer), &Ed25519Verifier).unwrap();
        assert_eq!(raw, "result-42");
    }

    #[test]
    fn test_structured_data_hashes_json_text() {
        let signer = key(2);
        let data = serde_json::json!({"score": 7, "items": [1, 2]});
        let payload = SignedSubmission::sign(data.clone(), &signer).unwrap();
        let body = serde_json::to_string(&payload).unwrap();

        let raw = verify_signed_submission(&body, &node_id_for(&signer), &Ed25519Verifier).unwrap();
        assert_eq!(raw, data.to_string());
    }

    #[test]
    fn test_tampered_data_is_content_mismatch() {
        let signer = key(1);
        let mut payload = SignedSubmission::sign(serde_json::json!("honest"), &signer).unwrap();
        payload.data = serde_json::json!("forged");
        let body = serde_json::to_string(&payload).unwrap();

        let err = verify_signed_submission(&body, &node_id_for(&signer), &Ed25519Verifier).unwrap_err();
        assert!(matches!(err, QuorumTaskError::ContentMismatch { .. }));
    }

    #[test]
    fn test_other_identity_is_invalid_signature() {
        let payload = SignedSubmission::sign(serde_json::json!("x"), &key(1)).unwrap();
        let body = serde_json::to_string(&payload).unwrap();

        let err = verify_signed_submission(&body, &node_id_for(&key(3)), &Ed25519Verifier).unwrap_err();
        assert!(matches!(err, QuorumTaskError::InvalidSignature(_)));
    }

    #[test]
    fn test_uppercase_unquoted_hash_accepted() {
        let signer = key(4);
        let hash = compute_hash(b"abc").to_uppercase();
        let payload = SignedSubmission {
            data: serde_json::json!("abc"),
            signature: sign_message(&signer, hash.as_bytes()),
        };
        let body = serde_json::to_string(&payload).unwrap();

        assert!(verify_signed_submission(&body, &node_id_for(&signer), &Ed25519Verifier).is_ok());
    }

    #[test]
    fn test_malformed_payload() {
        let err = verify_signed_submission("not json", &NodeId::new("aa"), &Ed25519Verifier).unwrap_err();
        assert!(matches!(err, QuorumTaskError::MalformedPayload(_)));
    }
}
