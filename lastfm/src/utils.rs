use std::sync::{Arc, Mutex};

use async_once_cell::OnceCell;
use reqwest::Url;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::ws::Session;

pub static SESSION: OnceCell<Session> = OnceCell::new();

/// Credentials for tests against the live service, read from `.env`
pub async fn setup() -> Session {
    use dotenv::dotenv;

    let _ = dotenv();
    let api_key = std::env::var("LASTFM_API_KEY").unwrap();
    let username = std::env::var("LASTFM_USERNAME").unwrap_or_else(|_| "RJ".to_owned());
    Session {
        shared_secret: std::env::var("LASTFM_SHARED_SECRET").ok(),
        ..Session::new(api_key, username)
    }
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub body: String,
}

/// Local HTTP server answering every request with `status`, `extra_headers` and a body
/// counting the requests seen so far
pub struct TestServer {
    pub url: Url,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestServer {
    pub async fn start(status: u16, extra_headers: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let request = read_request(&mut stream).await;
                let count = {
                    let mut recorded = recorded.lock().unwrap();
                    recorded.push(request);
                    recorded.len()
                };
                let body = format!(
                    r#"<lfm status="ok"><friends user="RJ" total="{}"/></lfm>"#,
                    count
                );
                let resp = format!(
                    "HTTP/1.1 {} Test\r\nContent-Type: text/xml\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n{}",
                    status,
                    body.len(),
                    extra_headers,
                    body
                );
                let _ = stream.write_all(resp.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self {
            url: Url::parse(&format!("http://{}/2.0/", addr)).unwrap(),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

async fn read_request(stream: &mut TcpStream) -> RecordedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        if n == 0 {
            break buf.len();
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().unwrap_or(0))
        })
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    RecordedRequest {
        method: head.split_whitespace().next().unwrap_or_default().to_owned(),
        body: String::from_utf8_lossy(&buf[header_end..]).into_owned(),
    }
}

/// Client that ignores proxy settings, for talking to a [`TestServer`]
pub fn local_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
