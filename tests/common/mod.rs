//! Shared utilities for integration testing.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a mock upstream that answers every request with a fixed response.
pub async fn start_mock_upstream(
    addr: SocketAddr,
    status_line: &'static str,
    headers: &'static [(&'static str, &'static str)],
    body: &'static str,
) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 8192];
                        let _ = socket.read(&mut buf).await;

                        let mut response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
                            status_line,
                            body.len()
                        );
                        for (name, value) in headers {
                            response.push_str(&format!("{}: {}\r\n", name, value));
                        }
                        response.push_str("\r\n");
                        response.push_str(body);

                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start a mock upstream that echoes the received `X-Hhp-Trace-Id` request
/// header back as the `X-Echo-Trace` response header.
#[allow(dead_code)]
pub async fn start_trace_echo_upstream(addr: SocketAddr) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 8192];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]).into_owned();

                        let trace = head
                            .lines()
                            .find_map(|line| {
                                let (name, value) = line.split_once(':')?;
                                name.eq_ignore_ascii_case("x-hhp-trace-id")
                                    .then(|| value.trim().to_string())
                            })
                            .unwrap_or_default();

                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: 0\r\nX-Echo-Trace: {}\r\nConnection: close\r\n\r\n",
                            trace
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}
