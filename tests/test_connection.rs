use std::fs;
use std::sync::Arc;

use hearth::config::Config;
use hearth::http::connection::Connection;
use hearth::logger::{AccessRecord, MemoryLogger};
use hearth::router::Router;
use hearth::server::listener;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn web_root() -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.html"), "Hi").unwrap();
    let cfg = Config::for_web_root(dir.path()).unwrap();
    (dir, cfg)
}

#[tokio::test]
async fn test_connection_answers_and_logs() {
    let (_dir, cfg) = web_root();
    let router = Arc::new(Router::new(&cfg));
    let logger = Arc::new(MemoryLogger::new());

    let (mut client, server) = tokio::io::duplex(8192);
    let mut conn = Connection::new(server, "10.0.0.7", cfg.read_buffer_size, router, logger.clone());

    client
        .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();
    conn.run().await.unwrap();

    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();
    let response = String::from_utf8(response).unwrap();

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.ends_with("\r\n\r\nHi"));
    assert_eq!(
        logger.records(),
        vec![AccessRecord {
            client: "10.0.0.7".to_string(),
            method: "GET".to_string(),
            path: "/".to_string(),
            status: 200,
        }]
    );
}

#[tokio::test]
async fn test_connection_malformed_request_logs_placeholders() {
    let (_dir, cfg) = web_root();
    let router = Arc::new(Router::new(&cfg));
    let logger = Arc::new(MemoryLogger::new());

    let (mut client, server) = tokio::io::duplex(8192);
    let mut conn = Connection::new(server, "10.0.0.7", 4096, router, logger.clone());

    client.write_all(b"NONSENSE\r\n\r\n").await.unwrap();
    conn.run().await.unwrap();

    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();

    assert!(response.starts_with(b"HTTP/1.1 400 Bad Request\r\n"));
    let records = logger.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].method, "-");
    assert_eq!(records[0].status, 400);
}

#[tokio::test]
async fn test_connection_logs_even_when_client_hangs_up() {
    let (_dir, cfg) = web_root();
    let router = Arc::new(Router::new(&cfg));
    let logger = Arc::new(MemoryLogger::new());

    let (mut client, server) = tokio::io::duplex(8192);
    let mut conn = Connection::new(server, "10.0.0.7", 4096, router, logger.clone());

    client.write_all(b"GET / HTTP/1.1\r\n\r\n").await.unwrap();
    drop(client);
    // Writing to a closed peer may fail; the access line must exist either way
    let _ = conn.run().await;

    let records = logger.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].path, "/");
    assert_eq!(records[0].status, 200);
}

#[tokio::test]
async fn test_connection_closed_without_data_logs_nothing() {
    let (_dir, cfg) = web_root();
    let router = Arc::new(Router::new(&cfg));
    let logger = Arc::new(MemoryLogger::new());

    let (client, server) = tokio::io::duplex(8192);
    let mut conn = Connection::new(server, "10.0.0.7", 4096, router, logger.clone());

    drop(client);
    conn.run().await.unwrap();

    assert!(logger.records().is_empty());
}

#[tokio::test]
async fn test_connection_reads_only_once() {
    let (_dir, cfg) = web_root();
    let router = Arc::new(Router::new(&cfg));
    let logger = Arc::new(MemoryLogger::new());

    let (mut client, server) = tokio::io::duplex(8192);
    // A read buffer too small for the request line truncates it
    let mut conn = Connection::new(server, "10.0.0.7", 5, router, logger.clone());

    client.write_all(b"GET / HTTP/1.1\r\n\r\n").await.unwrap();
    conn.run().await.unwrap();

    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();

    assert!(response.starts_with(b"HTTP/1.1 400 Bad Request\r\n"));
}

#[tokio::test]
async fn test_listener_serves_over_tcp() {
    let (_dir, cfg) = web_root();
    let logger = Arc::new(MemoryLogger::new());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(listener::serve(listener, Arc::new(cfg), logger.clone()));

    for _ in 0..2 {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"PUT /index.html HTTP/1.1\r\n\r\n")
            .await
            .unwrap();

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        assert!(response.starts_with(b"HTTP/1.1 405 Method Not Allowed\r\n"));
    }

    // A client that connects and leaves without sending must not stop the
    // accept loop.
    drop(TcpStream::connect(addr).await.unwrap());

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"GET / HTTP/1.1\r\n\r\n").await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    assert!(response.starts_with(b"HTTP/1.1 200 OK\r\n"));

    server.abort();

    let records = logger.records();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.client == "127.0.0.1"));
    assert_eq!(records.iter().filter(|r| r.status == 405).count(), 2);
}
