/*
 * http_client.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * Integration tests for the HTTP client. Each test starts a scripted HTTP/1.1 server on
 * 127.0.0.1 that answers with canned bytes, then checks what the client made of them.
 * Tests that need the public Internet are ignored; run them with:
 *   cargo test -p wirefetch_core --test http_client -- --ignored --nocapture
 */

use std::io::Write as _;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use flate2::write::GzEncoder;
use flate2::Compression;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::task::JoinHandle;

use wirefetch_core::{
    blocking, request, ClientConfig, DeadlinePolicy, Error, ErrorKind, Headers, HttpClient,
};

/// Read one request (head plus Content-Length body) from the socket.
async fn read_request(sock: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut tmp = [0u8; 4096];
    loop {
        if let Some(end) = find(&data, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&data[..end]).to_ascii_lowercase();
            let body_len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= end + 4 + body_len {
                break;
            }
        }
        let n = sock.read(&mut tmp).await.unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&tmp[..n]);
    }
    String::from_utf8_lossy(&data).into_owned()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Serve one canned response per connection, in order. Returns the raw requests seen.
async fn serve(responses: Vec<Vec<u8>>) -> (SocketAddr, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let mut seen = Vec::new();
        for response in responses {
            let (mut sock, _) = listener.accept().await.unwrap();
            seen.push(read_request(&mut sock).await);
            sock.write_all(&response).await.unwrap();
            let _ = sock.shutdown().await;
        }
        seen
    });
    (addr, handle)
}

fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{}{}", addr, path)
}

fn client(timeout_secs: u64) -> HttpClient {
    HttpClient::new(ClientConfig::new().timeout_secs(timeout_secs))
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

#[tokio::test]
async fn content_length_response() {
    let (addr, server) =
        serve(vec![b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\nHello".to_vec()]).await;
    let mut extra = Headers::new();
    extra.set("User-Agent", "wirefetch-test");
    let response = client(5)
        .request(&url(addr, "/hello"), "GET", Some(&extra), &b""[..])
        .await
        .unwrap();
    assert_eq!(response.protocol(), "HTTP/1.1");
    assert_eq!(response.status(), Some(200));
    assert_eq!(response.status_description(), "OK");
    assert_eq!(response.header("CONTENT-TYPE"), Some("text/plain"));
    assert_eq!(response.body(), b"Hello");

    let seen = server.await.unwrap();
    let expected = format!(
        "GET http://{}/hello HTTP/1.1\r\nHost:{}\r\nUser-Agent:wirefetch-test\r\n\r\n",
        addr, addr
    );
    assert_eq!(seen, vec![expected]);
}

#[tokio::test]
async fn chunked_response() {
    let (addr, _server) = serve(vec![
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n".to_vec(),
    ])
    .await;
    let response = client(5)
        .request(&url(addr, "/"), "GET", None, &b""[..])
        .await
        .unwrap();
    assert_eq!(response.body(), b"Wikipedia");
    assert_eq!(response.body().len(), 9);
}

#[tokio::test]
async fn unframed_response_does_not_wait_for_close() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        read_request(&mut sock).await;
        sock.write_all(b"HTTP/1.1 200 OK\r\nServer: idle\r\n\r\n").await.unwrap();
        // Keep the connection open well past the client's timeout.
        tokio::time::sleep(Duration::from_secs(30)).await;
        drop(sock);
    });
    let started = Instant::now();
    let response = client(3)
        .request(&url(addr, "/"), "GET", None, &b""[..])
        .await
        .unwrap();
    assert!(response.body().is_empty());
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn gzip_response_is_inflated() {
    let packed = gzip(b"<html>compressed</html>");
    let mut raw = format!(
        "HTTP/1.1 200 OK\r\nContent-Encoding: gzip\r\nContent-Length: {}\r\n\r\n",
        packed.len()
    )
    .into_bytes();
    raw.extend_from_slice(&packed);
    let (addr, _server) = serve(vec![raw]).await;
    let response = client(5)
        .request(&url(addr, "/"), "GET", None, &b""[..])
        .await
        .unwrap();
    assert_eq!(response.text(), "<html>compressed</html>");
}

#[tokio::test]
async fn broken_gzip_is_decompression_error() {
    let (addr, _server) = serve(vec![
        b"HTTP/1.1 200 OK\r\nContent-Encoding: gzip\r\nContent-Length: 4\r\n\r\nnope".to_vec(),
    ])
    .await;
    let e = client(5)
        .request(&url(addr, "/"), "GET", None, &b""[..])
        .await
        .unwrap_err();
    assert_eq!(e.kind(), ErrorKind::DecompressionError);
}

#[tokio::test]
async fn not_found_is_status_error() {
    let (addr, _server) = serve(vec![
        b"HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\n\r\nnot here!".to_vec(),
    ])
    .await;
    match client(5).request(&url(addr, "/missing"), "GET", None, &b""[..]).await {
        Err(Error::HttpStatus { code, description }) => {
            assert_eq!(code, "404");
            assert_eq!(description, "Not Found");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn relative_redirect_is_followed() {
    let (addr, server) = serve(vec![
        b"HTTP/1.1 301 Moved Permanently\r\nLocation: /new\r\nContent-Length: 5\r\n\r\nmoved".to_vec(),
        b"HTTP/1.1 200 OK\r\nX-Final: yes\r\nContent-Length: 7\r\n\r\narrived".to_vec(),
    ])
    .await;
    let response = client(5)
        .request(&url(addr, "/old"), "GET", None, &b""[..])
        .await
        .unwrap();
    assert_eq!(response.status_code(), "200");
    assert_eq!(response.body(), b"arrived");
    assert_eq!(response.header("x-final"), Some("yes"));
    assert_eq!(response.header("location"), None);

    let seen = server.await.unwrap();
    assert!(seen[0].starts_with(&format!("GET http://{}/old HTTP/1.1\r\n", addr)));
    assert!(seen[1].starts_with(&format!("GET http://{}/new HTTP/1.1\r\n", addr)));
}

#[tokio::test]
async fn redirect_chain_stops_after_ceiling() {
    let hop = b"HTTP/1.1 302 Found\r\nLocation: /again\r\nContent-Length: 0\r\n\r\n".to_vec();
    // Hops 0..=5 are followed; the redirect received at hop 6 is returned as is.
    let (addr, server) = serve(vec![hop; 7]).await;
    let response = client(5)
        .request(&url(addr, "/start"), "GET", None, &b""[..])
        .await
        .unwrap();
    assert_eq!(response.status_code(), "302");
    assert_eq!(response.header("location"), Some("/again"));
    assert_eq!(server.await.unwrap().len(), 7);
}

#[tokio::test]
async fn zero_max_redirects_still_follows_once() {
    let (addr, server) = serve(vec![
        b"HTTP/1.1 301 Moved\r\nLocation: /b\r\n\r\n".to_vec(),
        b"HTTP/1.1 301 Moved\r\nLocation: /c\r\n\r\n".to_vec(),
    ])
    .await;
    let response = HttpClient::new(ClientConfig::new().timeout_secs(5).max_redirects(0))
        .request(&url(addr, "/a"), "GET", None, &b""[..])
        .await
        .unwrap();
    assert_eq!(response.header("location"), Some("/c"));
    assert_eq!(server.await.unwrap().len(), 2);
}

#[tokio::test]
async fn post_redirect_is_not_followed() {
    let (addr, server) = serve(vec![
        b"HTTP/1.1 302 Found\r\nLocation: /elsewhere\r\nContent-Length: 0\r\n\r\n".to_vec(),
    ])
    .await;
    let response = client(5)
        .request(&url(addr, "/form"), "POST", None, &b"a=1&b=2"[..])
        .await
        .unwrap();
    assert_eq!(response.status_code(), "302");
    let seen = server.await.unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].contains("\r\nContent-Length:7\r\n"));
    assert!(seen[0].ends_with("\r\n\r\na=1&b=2"));
}

#[tokio::test]
async fn silent_server_times_out_and_socket_is_closed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        read_request(&mut sock).await;
        // Say nothing; wait for the client to give up and close its end.
        let mut buf = [0u8; 16];
        tokio::time::timeout(Duration::from_secs(10), sock.read(&mut buf)).await
    });
    let e = client(1)
        .request(&url(addr, "/slow"), "GET", None, &b""[..])
        .await
        .unwrap_err();
    assert_eq!(e.kind(), ErrorKind::ReadTimeout);
    assert!(e.is_timeout());
    // EOF on the server side: the client dropped its socket.
    let read = server.await.unwrap().expect("client socket left open");
    assert_eq!(read.unwrap(), 0);
}

#[tokio::test]
async fn refused_connection_is_connect_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let e = client(5)
        .request(&url(addr, "/"), "GET", None, &b""[..])
        .await
        .unwrap_err();
    assert_eq!(e.kind(), ErrorKind::ConnectError);
}

#[tokio::test]
async fn tls_to_plain_server_fails_to_connect() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        // Plain HTTP where a TLS ServerHello is expected.
        let _ = sock.write_all(b"HTTP/1.1 400 Bad Request\r\n\r\n").await;
        let _ = sock.shutdown().await;
    });
    let e = HttpClient::new(ClientConfig::new().timeout_secs(5).danger_accept_invalid_certs())
        .request(&format!("https://{}/", addr), "GET", None, &b""[..])
        .await
        .unwrap_err();
    assert_eq!(e.kind(), ErrorKind::ConnectError);
}

#[tokio::test]
async fn url_errors_do_not_touch_the_network() {
    let e = request("gopher://example.com/", "GET", None, None, 1, 5)
        .await
        .unwrap_err();
    assert_eq!(e.kind(), ErrorKind::UnsupportedScheme);
    let e = request("example.com/path", "GET", None, None, 1, 5)
        .await
        .unwrap_err();
    assert_eq!(e.kind(), ErrorKind::InvalidUrl);
}

/// Server that sends the response in three pieces, 600 ms apart.
async fn dribbling_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut sock, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request(&mut sock).await;
                for part in [&b"HTTP/1.1 200 OK\r\n"[..], b"Content-Length: 2\r\n\r\n", b"ok"] {
                    tokio::time::sleep(Duration::from_millis(600)).await;
                    if sock.write_all(part).await.is_err() {
                        return;
                    }
                }
            });
        }
    });
    addr
}

#[tokio::test]
async fn per_operation_deadline_resets_for_each_read() {
    let addr = dribbling_server().await;
    let response = HttpClient::new(ClientConfig::new().timeout_secs(1))
        .request(&url(addr, "/"), "GET", None, &b""[..])
        .await
        .unwrap();
    assert_eq!(response.body(), b"ok");
}

#[tokio::test]
async fn shared_deadline_covers_the_whole_attempt() {
    let addr = dribbling_server().await;
    let e = HttpClient::new(
        ClientConfig::new()
            .timeout_secs(1)
            .deadline_policy(DeadlinePolicy::Shared),
    )
    .request(&url(addr, "/"), "GET", None, &b""[..])
    .await
    .unwrap_err();
    assert_eq!(e.kind(), ErrorKind::ReadTimeout);
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    let a = serve(vec![b"HTTP/1.1 200 OK\r\nContent-Length: 1\r\n\r\na".to_vec()]).await;
    let b = serve(vec![b"HTTP/1.1 200 OK\r\nContent-Length: 1\r\n\r\nb".to_vec()]).await;
    let c = client(5);
    let ua = url(a.0, "/");
    let ub = url(b.0, "/");
    let (ra, rb) = tokio::join!(
        c.request(&ua, "GET", None, &b""[..]),
        c.request(&ub, "GET", None, &b""[..]),
    );
    assert_eq!(ra.unwrap().body(), b"a");
    assert_eq!(rb.unwrap().body(), b"b");
}

#[test]
fn blocking_request_runs_its_own_runtime() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = std::thread::spawn(move || {
        use std::io::{Read, Write};
        let (mut sock, _) = listener.accept().unwrap();
        let mut buf = [0u8; 1024];
        let mut seen = Vec::new();
        while find(&seen, b"\r\n\r\n").is_none() {
            let n = sock.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            seen.extend_from_slice(&buf[..n]);
        }
        sock.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 4\r\n\r\nsync").unwrap();
    });
    let response = blocking::request(&url(addr, "/"), "GET", None, None, 5, 5).unwrap();
    assert_eq!(response.body(), b"sync");
    server.join().unwrap();
}

#[test]
fn blocking_request_follows_redirects_hop_by_hop() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = std::thread::spawn(move || {
        use std::io::{Read, Write};
        let replies: [&[u8]; 2] = [
            b"HTTP/1.1 302 Found\r\nLocation: /next\r\nContent-Length: 0\r\n\r\n",
            b"HTTP/1.1 200 OK\r\nContent-Length: 4\r\n\r\ndone",
        ];
        let mut heads = Vec::new();
        for reply in replies {
            let (mut sock, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let mut seen = Vec::new();
            while find(&seen, b"\r\n\r\n").is_none() {
                let n = sock.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                seen.extend_from_slice(&buf[..n]);
            }
            sock.write_all(reply).unwrap();
            heads.push(String::from_utf8_lossy(&seen).into_owned());
        }
        heads
    });
    let response = blocking::request(&url(addr, "/start"), "GET", None, None, 5, 5).unwrap();
    assert_eq!(response.body(), b"done");
    let heads = server.join().unwrap();
    assert!(heads[0].starts_with(&format!("GET {} ", url(addr, "/start"))));
    assert!(heads[1].starts_with(&format!("GET {} ", url(addr, "/next"))));
}

#[cfg(unix)]
#[tokio::test]
async fn full_accept_queue_is_connect_timeout() {
    // Backlog of 1 and nothing ever accepts, so once the queue is full new SYNs are dropped.
    let socket = TcpSocket::new_v4().unwrap();
    socket.bind("127.0.0.1:0".parse().unwrap()).unwrap();
    let listener = socket.listen(1).unwrap();
    let addr = listener.local_addr().unwrap();
    let mut queued = Vec::new();
    for _ in 0..64 {
        match tokio::time::timeout(Duration::from_millis(300), TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => queued.push(stream),
            _ => break,
        }
    }
    let started = Instant::now();
    let e = client(1)
        .request(&url(addr, "/"), "GET", None, &b""[..])
        .await
        .unwrap_err();
    assert_eq!(e.kind(), ErrorKind::ConnectTimeout);
    assert!(started.elapsed() < Duration::from_secs(3));
    drop(queued);
    drop(listener);
}

#[tokio::test]
#[ignore] // requires network
async fn blackhole_address_is_connect_timeout() {
    // 10.255.255.1 is normally unrouted, so SYNs go unanswered.
    let started = Instant::now();
    let e = client(2)
        .request("http://10.255.255.1/", "GET", None, &b""[..])
        .await
        .unwrap_err();
    assert_eq!(e.kind(), ErrorKind::ConnectTimeout);
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
#[ignore] // requires network
async fn https_get_example_com() {
    let mut extra = Headers::new();
    extra.set("Accept-Encoding", "gzip");
    let response = client(15)
        .request("https://example.com/", "GET", Some(&extra), &b""[..])
        .await
        .expect("request failed");
    println!("{} {}", response.status_code(), response.status_description());
    for (name, value) in response.headers().iter() {
        println!("{}: {}", name, value);
    }
    assert_eq!(response.status(), Some(200));
    assert!(response.text().contains("Example Domain"));
}
