//! Integration tests for the WebSocket transport.
//!
//! These tests spin up a real WebSocket server and client to verify
//! that frames actually flow over the network correctly. Every server
//! binds to port 0 so parallel tests never fight over an address.

#[cfg(feature = "websocket")]
mod websocket {
    use std::sync::Arc;
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use quinto_transport::{
        Connection, Transport, TransportError, WebSocketTransport,
    };
    use tokio_tungstenite::tungstenite::Message;

    /// Binds a transport on an ephemeral port and returns it with the
    /// address the OS picked.
    async fn bind_transport() -> (WebSocketTransport, String) {
        let transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport
            .local_addr()
            .expect("bound transport has a local addr")
            .to_string();
        (transport, addr)
    }

    /// Helper: connects a tokio-tungstenite client to the given address.
    /// Returns the raw WebSocket stream for sending/receiving from the
    /// client side.
    async fn connect_client(
        addr: &str,
    ) -> tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    > {
        let url = format!("ws://{addr}");
        let (ws, _) = tokio_tungstenite::connect_async(&url)
            .await
            .expect("client should connect");
        ws
    }

    #[tokio::test]
    async fn test_bind_invalid_addr_fails() {
        let result = WebSocketTransport::bind("not an address").await;
        assert!(matches!(result, Err(TransportError::BindFailed(_))));
    }

    #[tokio::test]
    async fn test_accept_assigns_distinct_ids() {
        let (mut transport, addr) = bind_transport().await;

        let clients = tokio::spawn(async move {
            let a = connect_client(&addr).await;
            let b = connect_client(&addr).await;
            (a, b)
        });

        let first = transport.accept().await.expect("first accept");
        let second = transport.accept().await.expect("second accept");
        assert!(first.id().into_inner() > 0);
        assert_ne!(first.id(), second.id());

        // Keep the client sockets alive until both accepts finished.
        let _held = clients.await.expect("clients should connect");
    }

    #[tokio::test]
    async fn test_send_and_receive_both_directions() {
        let (mut transport, addr) = bind_transport().await;

        let client = tokio::spawn(async move {
            let mut ws = connect_client(&addr).await;
            ws.send(Message::text(r#"{"hello":"server"}"#.to_string()))
                .await
                .expect("client send");
            let reply = ws
                .next()
                .await
                .expect("reply frame")
                .expect("websocket ok");
            // UTF-8 payloads must arrive as text frames so browsers
            // can JSON.parse them.
            assert!(reply.is_text());
            reply.into_data().to_vec()
        });

        let conn = transport.accept().await.expect("should accept");

        let inbound = conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(inbound, br#"{"hello":"server"}"#);

        conn.send(br#"{"hello":"client"}"#)
            .await
            .expect("send should succeed");

        let echoed = client.await.expect("client task");
        assert_eq!(echoed, br#"{"hello":"client"}"#);

        conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_recv_returns_none_on_client_close() {
        let (mut transport, addr) = bind_transport().await;

        let client = tokio::spawn(async move {
            let mut ws = connect_client(&addr).await;
            ws.close(None).await.expect("client close");
        });

        let conn = transport.accept().await.expect("should accept");

        let result = conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");

        client.await.expect("client task");
    }

    #[tokio::test]
    async fn test_control_frames_are_skipped() {
        let (mut transport, addr) = bind_transport().await;

        let client = tokio::spawn(async move {
            let mut ws = connect_client(&addr).await;
            ws.send(Message::Ping(vec![1, 2, 3].into()))
                .await
                .expect("ping");
            ws.send(Message::text("after-ping".to_string()))
                .await
                .expect("text");
        });

        let conn = transport.accept().await.expect("should accept");

        let received = conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, b"after-ping");

        client.await.expect("client task");
    }

    #[tokio::test]
    async fn test_send_does_not_wait_for_blocked_recv() {
        let (mut transport, addr) = bind_transport().await;

        let client = tokio::spawn(async move {
            let mut ws = connect_client(&addr).await;
            // Never sends anything; just waits for the server's push.
            let pushed = tokio::time::timeout(Duration::from_secs(5), ws.next())
                .await
                .expect("push should arrive while server recv is parked")
                .expect("frame")
                .expect("websocket ok");
            assert_eq!(pushed.into_data().to_vec(), b"pushed");
            ws.close(None).await.expect("client close");
        });

        let conn = Arc::new(transport.accept().await.expect("should accept"));

        // Park a reader on the stream half, then send. The send must
        // complete even though the recv has not returned.
        let reader = {
            let conn = Arc::clone(&conn);
            tokio::spawn(async move { conn.recv().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        conn.send(b"pushed").await.expect("send while recv blocked");

        client.await.expect("client task");
        let parked = reader.await.expect("reader task").expect("recv ok");
        assert!(parked.is_none(), "client closed without sending");
    }
}
