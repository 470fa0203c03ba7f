mod error;
pub use error::{Error, ErrorKind};

mod parser;
use parser::{parse_json, parse_temperature};

use std::time::Duration;

use chipp_http::curl::easy::{Easy, List};
use chipp_http::{HttpClient, HttpMethod, Interceptor, Request};
use log::{debug, trace, warn};
use serde::Serialize;

use crate::{FanConfiguration, HeaterLevel, Result, SensorConfiguration, SystemState};

const API_KEY_HEADER: &str = "X-Api-Key";

/// Client of the remote climate API. Every request carries the static API key.
pub struct Client {
    base_url: String,
    http_client: HttpClient<TransferTimeout>,
}

impl Client {
    /// `timeout` bounds each whole transfer, connection included.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let mut http_client = HttpClient::new(base_url.as_str())
            .map_err(|_| Error::InvalidBaseUrl(base_url.clone()))?
            .with_interceptor(TransferTimeout(timeout));

        http_client.set_default_headers(&[(API_KEY_HEADER, api_key)]);

        Ok(Self {
            base_url,
            http_client,
        })
    }

    pub async fn temperature(&self, sensor_id: u32) -> Result<f64> {
        let body = self.get(&format!("api/sensor/{sensor_id}")).await?;
        parse_temperature(&body)
    }

    pub async fn system_state(&self) -> Result<SystemState> {
        let body = self.get("api/SystemState").await?;
        parse_json(&body)
    }

    pub async fn sensor_configurations(&self) -> Result<Vec<SensorConfiguration>> {
        let body = self.get("api/sensors/configurations").await?;
        parse_json(&body)
    }

    pub async fn fan_configurations(&self) -> Result<Vec<FanConfiguration>> {
        let body = self.get("api/fans/configurations").await?;
        parse_json(&body)
    }

    pub async fn set_heater_level(&self, heater_id: u32, level: HeaterLevel) -> Result<()> {
        self.post(&format!("api/heat/{heater_id}"), &level).await
    }

    pub async fn set_fan_state(&self, fan_id: u32, is_on: bool) -> Result<()> {
        self.post(&format!("api/fans/{fan_id}"), &is_on).await
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>> {
        let url = endpoint(&self.base_url, path);

        let request = self.http_client.new_request_with_url(url.clone())?;

        debug!("GET {url}");

        let (status_code, body) = self
            .http_client
            .perform_request(request, |_, response| {
                Ok((response.status_code, response.body))
            })
            .await?;

        trace!("response {status_code}: {}", String::from_utf8_lossy(&body));

        check_status(url, status_code)?;
        Ok(body)
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = endpoint(&self.base_url, path);

        let mut request = self.http_client.new_request_with_url(url.clone())?;
        request.set_method(HttpMethod::Post);
        request.set_json_body(body);

        debug!(
            "POST {url} {}",
            String::from_utf8_lossy(&request.body.clone().unwrap_or_default())
        );

        let status_code = self
            .http_client
            .perform_request(request, |_, response| {
                trace!("response: {}", String::from_utf8_lossy(&response.body));
                Ok(response.status_code)
            })
            .await?;

        check_status(url, status_code)
    }
}

/// curl's transfer thread gives up on its own once the timeout elapses.
struct TransferTimeout(Duration);

impl Interceptor for TransferTimeout {
    fn modify(&self, easy: &mut Easy, request: &Request) {
        if let Err(err) = easy.timeout(self.0) {
            warn!("unable to set timeout for {}: {err}", request.url);
        }
    }

    fn add_headers(&self, _: &mut List, _: &Request) {}
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

fn check_status(url: String, status_code: u32) -> Result<()> {
    if (200..300).contains(&status_code) {
        Ok(())
    } else {
        Err(Error::Status { url, status_code })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    use crate::{Fan, Heater};

    const API_KEY: &str = "k123";
    const TIMEOUT: Duration = Duration::from_secs(5);

    /// Answers a single request and hands back its raw text.
    async fn serve_once(status: &'static str, body: &'static str) -> (Client, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();

            request
        });

        let client = Client::new(&base_url, API_KEY, TIMEOUT).unwrap();
        (client, server)
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buffer = Vec::new();
        let mut chunk = [0; 1024];

        loop {
            let read = stream.read(&mut chunk).await.unwrap();
            buffer.extend_from_slice(&chunk[..read]);

            let text = String::from_utf8_lossy(&buffer);
            if read == 0 {
                return text.into_owned();
            }

            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);

                if buffer.len() >= end + 4 + content_length {
                    return text.into_owned();
                }
            }
        }
    }

    fn has_header(request: &str, header: &str) -> bool {
        request.lines().any(|line| line == header)
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            endpoint("https://localhost:7021", "api/sensor/1"),
            "https://localhost:7021/api/sensor/1"
        );
        assert_eq!(
            endpoint("https://localhost:7021/", "api/SystemState"),
            "https://localhost:7021/api/SystemState"
        );
        assert_eq!(
            endpoint("http://10.0.0.5/climate", "api/heat/3"),
            "http://10.0.0.5/climate/api/heat/3"
        );
    }

    #[test]
    fn test_check_status() {
        assert!(check_status("u".to_string(), 200).is_ok());
        assert!(check_status("u".to_string(), 204).is_ok());

        for status_code in [301, 400, 401, 404, 500, 503] {
            let err = check_status("u".to_string(), status_code).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Protocol);
        }
    }

    #[test]
    fn test_command_bodies() {
        assert_eq!(serde_json::to_vec(&HeaterLevel::MAX).unwrap(), b"5");
        assert_eq!(serde_json::to_vec(&HeaterLevel::OFF).unwrap(), b"0");
        assert_eq!(serde_json::to_vec(&true).unwrap(), b"true");
        assert_eq!(serde_json::to_vec(&false).unwrap(), b"false");
    }

    #[tokio::test]
    async fn test_get_temperature() {
        let (client, server) = serve_once("200 OK", "21.5").await;

        assert_eq!(client.temperature(1).await.unwrap(), 21.5);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/sensor/1 HTTP/1.1\r\n"), "{request}");
        assert!(has_header(&request, "X-Api-Key: k123"), "{request}");
    }

    #[tokio::test]
    async fn test_get_system_state() {
        let body = r#"{"Heaters":[{"HeaterId":2,"Level":5}],"Fans":[{"FanId":1,"IsOn":true}]}"#;
        let (client, server) = serve_once("200 OK", body).await;

        let state = client.system_state().await.unwrap();
        assert_eq!(
            state,
            SystemState {
                heaters: vec![Heater {
                    id: 2,
                    level: HeaterLevel::MAX
                }],
                fans: vec![Fan { id: 1, is_on: true }],
            }
        );

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/SystemState HTTP/1.1\r\n"), "{request}");
        assert!(has_header(&request, "X-Api-Key: k123"), "{request}");
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let (client, server) = serve_once("500 Internal Server Error", "boom").await;

        let err = client.temperature(1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
        match err {
            Error::Status { url, status_code } => {
                assert_eq!(status_code, 500);
                assert!(url.ends_with("/api/sensor/1"), "{url}");
            }
            err => panic!("unexpected error {err}"),
        }

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_set_heater_level() {
        let (client, server) = serve_once("200 OK", "").await;

        client.set_heater_level(2, HeaterLevel::MAX).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/heat/2 HTTP/1.1\r\n"), "{request}");
        assert!(has_header(&request, "X-Api-Key: k123"), "{request}");
        assert!(has_header(&request, "Content-Type: application/json"), "{request}");
        assert!(request.ends_with("\r\n\r\n5"), "{request}");
    }

    #[tokio::test]
    async fn test_set_fan_state() {
        let (client, server) = serve_once("204 No Content", "").await;

        client.set_fan_state(3, true).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/fans/3 HTTP/1.1\r\n"), "{request}");
        assert!(has_header(&request, "X-Api-Key: k123"), "{request}");
        assert!(has_header(&request, "Content-Type: application/json"), "{request}");
        assert!(request.ends_with("\r\n\r\ntrue"), "{request}");
    }

    #[tokio::test]
    async fn test_transfer_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        // accepts connections and never answers
        let server = tokio::spawn(async move {
            let mut connections = Vec::new();
            loop {
                let (stream, _) = listener.accept().await.unwrap();
                connections.push(stream);
            }
        });

        let client = Client::new(&base_url, API_KEY, Duration::from_millis(200)).unwrap();

        for _ in 0..3 {
            let result = tokio::time::timeout(TIMEOUT, client.temperature(1))
                .await
                .expect("transfer outlived its timeout");

            assert_eq!(result.unwrap_err().kind(), ErrorKind::Transport);
        }

        server.abort();
    }
}
