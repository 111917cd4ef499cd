use feed_api::{AppState, app, config::Config};
use std::{num::NonZeroUsize, time::Duration};
use tokio::{io::AsyncWriteExt, net::TcpStream, time::timeout};

/// Serves the API on an ephemeral port and returns its address.
async fn spawn_server(config: Config) -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = app(AppState::new(config));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn concurrency_limit_is_shared_across_routes() {
    let addr = spawn_server(Config {
        max_concurrent_requests: NonZeroUsize::MIN,
        ..Config::for_tests()
    })
    .await;
    let health = format!("http://{}/health", addr);
    let http = reqwest::Client::new();

    // A signup whose body never finishes keeps its handler, and the only permit, busy.
    let mut stalled = TcpStream::connect(addr).await.unwrap();
    stalled
        .write_all(
            b"POST /auth/signup HTTP/1.1\r\n\
              Host: localhost\r\n\
              Content-Type: application/json\r\n\
              Content-Length: 100\r\n\r\n\
              {\"email\":",
        )
        .await
        .unwrap();
    stalled.flush().await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let blocked = timeout(Duration::from_millis(300), http.get(&health).send()).await;
    assert!(blocked.is_err(), "a different route got past the limit");

    drop(stalled);
    let response = timeout(Duration::from_secs(5), http.get(&health).send())
        .await
        .expect("permit was not released")
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}
