// src/client/mod.rs
use reqwest::blocking::{multipart, Client, Response};
use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::analysis::{AnalysisResult, Row, Section};
use crate::config::Settings;
use crate::error::{ClientError, ClientResult};
use crate::state::intake_state::PendingFile;

const ANALYZE_PATH: &str = "/api/analyze";
const DOWNLOAD_PATH: &str = "/api/download";
const HEALTH_PATH: &str = "/api/health";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub engine: String,
}

#[derive(Debug, Serialize)]
struct DownloadRequest<'a> {
    #[serde(rename = "type")]
    section: &'a str,
    results: &'a [Row],
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// The remote analysis service. Calls block; the controllers run them on worker threads.
pub trait AnalysisService: Send + Sync {
    fn analyze(&self, file: &PendingFile) -> ClientResult<AnalysisResult>;
    fn download(&self, section: Section, rows: &[Row]) -> ClientResult<Vec<u8>>;
    fn health(&self) -> ClientResult<HealthStatus>;
}

#[derive(Debug, Clone)]
pub struct HttpAnalysisService {
    client: Client,
    settings: Settings,
}

impl HttpAnalysisService {
    pub fn new(settings: Settings) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self { client, settings })
    }
}

impl AnalysisService for HttpAnalysisService {
    fn analyze(&self, file: &PendingFile) -> ClientResult<AnalysisResult> {
        let url = self.settings.endpoint(ANALYZE_PATH);
        let part = multipart::Part::bytes(file.read_bytes()?)
            .file_name(file.name.clone())
            .mime_str("text/csv")?;
        let form = multipart::Form::new().part("file", part);

        info!(%url, file = %file.name, size = file.size_bytes, "submitting file for analysis");
        let response = check_status(self.client.post(&url).multipart(form).send()?)?;
        let body = response.bytes()?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn download(&self, section: Section, rows: &[Row]) -> ClientResult<Vec<u8>> {
        let url = self.settings.endpoint(DOWNLOAD_PATH);
        let request = DownloadRequest {
            section: section.wire_name(),
            results: rows,
        };

        info!(%url, section = section.wire_name(), rows = rows.len(), "requesting export");
        let response = check_status(self.client.post(&url).json(&request).send()?)?;
        Ok(response.bytes()?.to_vec())
    }

    fn health(&self) -> ClientResult<HealthStatus> {
        let url = self.settings.endpoint(HEALTH_PATH);
        let response = check_status(self.client.get(&url).send()?)?;
        Ok(serde_json::from_slice(&response.bytes()?)?)
    }
}

fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().unwrap_or_default();
    let message = error_message(&body);
    debug!(status = status.as_u16(), ?message, "service returned an error");
    Err(ClientError::Service {
        status: status.as_u16(),
        message,
    })
}

/// The `error` field of a JSON error body, if there is one.
pub fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use serde_json::json;
    use crate::error::ANALYZE_FALLBACK_MESSAGE;

    struct Captured {
        request_line: String,
        headers: Vec<String>,
        body: Vec<u8>,
    }

    /// Answers a single request with a canned response and hands back what it received.
    fn serve_once(status: &str, content_type: &str, body: Vec<u8>) -> (String, mpsc::Receiver<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let status = status.to_string();
        let content_type = content_type.to_string();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut headers = Vec::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                headers.push(line.trim_end().to_string());
            }

            let length = headers.iter()
                .find_map(|h| {
                    let (name, value) = h.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse::<usize>().ok())?
                });
            let mut request_body = Vec::new();
            match length {
                Some(len) => {
                    request_body.resize(len, 0);
                    reader.read_exact(&mut request_body).unwrap();
                }
                None => {
                    // chunked
                    loop {
                        let mut size = String::new();
                        reader.read_line(&mut size).unwrap();
                        let size = usize::from_str_radix(size.trim(), 16).unwrap_or(0);
                        let mut chunk = vec![0; size + 2];
                        reader.read_exact(&mut chunk).unwrap();
                        if size == 0 {
                            break;
                        }
                        request_body.extend_from_slice(&chunk[..size]);
                    }
                }
            }

            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                content_type,
                body.len()
            ).unwrap();
            stream.write_all(&body).unwrap();
            stream.flush().unwrap();

            let _ = tx.send(Captured { request_line, headers, body: request_body });
        });

        (base, rx)
    }

    fn service(base: &str) -> HttpAnalysisService {
        let settings = Settings {
            api_base_url: base.to_string(),
            request_timeout_secs: 5,
            ..Settings::default()
        };
        HttpAnalysisService::new(settings).unwrap()
    }

    fn csv_file() -> PendingFile {
        PendingFile::from_bytes("trips.csv", Arc::from(&b"pickup_datetime,fare_amount\n2024-01-01 05:00:00,12.5\n"[..]))
    }

    #[test]
    fn analyze_posts_multipart_and_parses_result() {
        let body = json!({
            "best_hours": [{"pickup_hour": 5, "avg_fare": 12.5, "trip_count": 1, "total_fare": 12.5}],
            "best_zones": [{"PULocationID": 132, "avg_fare": 12.5, "trip_count": 1, "total_fare": 12.5}]
        });
        let (base, rx) = serve_once("200 OK", "application/json", body.to_string().into_bytes());

        let result = service(&base).analyze(&csv_file()).unwrap();
        assert_eq!(result.best_hours[0].hour_of_day(), Some(5));
        assert_eq!(result.best_zones.len(), 1);

        let captured = rx.recv().unwrap();
        assert!(captured.request_line.starts_with("POST /api/analyze "));
        assert!(captured.headers.iter().any(|h| h.to_ascii_lowercase().starts_with("content-type: multipart/form-data")));
        let text = String::from_utf8_lossy(&captured.body);
        assert!(text.contains("name=\"file\""));
        assert!(text.contains("filename=\"trips.csv\""));
        assert!(text.contains("fare_amount"));
    }

    #[test]
    fn analyze_error_uses_body_message() {
        let body = json!({"error": "Only CSV files are allowed"}).to_string().into_bytes();
        let (base, _rx) = serve_once("400 Bad Request", "application/json", body);

        let err = service(&base).analyze(&csv_file()).unwrap_err();
        assert_eq!(err.user_message(), "Only CSV files are allowed");
    }

    #[test]
    fn analyze_error_without_message_falls_back() {
        let (base, _rx) = serve_once("500 Internal Server Error", "text/html", b"<h1>oops</h1>".to_vec());

        let err = service(&base).analyze(&csv_file()).unwrap_err();
        assert!(matches!(err, ClientError::Service { status: 500, message: None }));
        assert_eq!(err.user_message(), ANALYZE_FALLBACK_MESSAGE);
    }

    #[test]
    fn unreachable_server_falls_back() {
        // bind then drop to get a port nobody listens on
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let err = service(&format!("http://127.0.0.1:{port}")).analyze(&csv_file()).unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(err.user_message(), ANALYZE_FALLBACK_MESSAGE);
    }

    #[test]
    fn download_sends_type_and_rows() {
        let csv = b"zone_id,avg_fare\n7,12.345\n".to_vec();
        let (base, rx) = serve_once("200 OK", "text/csv", csv.clone());

        let rows: Vec<Row> = vec![json!({"zone_id": 7, "avg_fare": 12.345}).as_object().unwrap().clone()];
        let bytes = service(&base).download(Section::BestZones, &rows).unwrap();
        assert_eq!(bytes, csv);

        let captured = rx.recv().unwrap();
        assert!(captured.request_line.starts_with("POST /api/download "));
        let sent: serde_json::Value = serde_json::from_slice(&captured.body).unwrap();
        assert_eq!(sent, json!({"type": "best_zones", "results": [{"zone_id": 7, "avg_fare": 12.345}]}));
    }

    #[test]
    fn health_parses_status() {
        let body = json!({"status": "healthy", "engine": "pandas"}).to_string().into_bytes();
        let (base, _rx) = serve_once("200 OK", "application/json", body);

        let health = service(&base).health().unwrap();
        assert_eq!(health, HealthStatus { status: "healthy".into(), engine: "pandas".into() });
    }

    #[test]
    fn error_message_needs_error_field() {
        assert_eq!(error_message(br#"{"error":"bad"}"#), Some("bad".to_string()));
        assert_eq!(error_message(br#"{"detail":"bad"}"#), None);
        assert_eq!(error_message(br#"{"error":""}"#), None);
        assert_eq!(error_message(b"not json"), None);
    }
}
