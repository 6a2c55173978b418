use crate::model::{Hospital, InventoryItem, InventoryResponse, ReminderPayload};

use http::{Method, Request, StatusCode, Uri, header};
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::Deserialize;
use std::fmt;
use tower::ServiceExt;
use tower_http::auth::AddAuthorization;
use tracing::warn;

type Connector = hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
type HttpsClient = AddAuthorization<Client<Connector, String>>;

const USER_AGENT: &str = concat!("remedix/", env!("CARGO_PKG_VERSION"));

// Roughly a 5 km radius around the device coordinates.
const BOUNDING_BOX_DEGREES: f64 = 0.02;
const MAX_HOSPITAL_RESULTS: usize = 6;

/// Classified inventory/reminder fetch failure. `Display` is the exact
/// user-facing message; the fallback copy (typos included) matches what the
/// backend's other clients show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// No response at all (DNS, refused connection, dropped socket).
    NetworkUnreachable,
    Client { status: u16, message: Option<String> },
    Server { status: u16, message: Option<String> },
    Unexpected,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::NetworkUnreachable => f.write_str(
                "Unable to connect. Please check your internet connection and try again.",
            ),
            FetchError::Client { status, message } => write!(
                f,
                "Error {}: {}",
                status,
                message
                    .as_deref()
                    .unwrap_or("An unexpected error occur. Please try again later")
            ),
            FetchError::Server { status, message } => write!(
                f,
                "Error {}: {}",
                status,
                message
                    .as_deref()
                    .unwrap_or("An unexpected error occured on the server")
            ),
            FetchError::Unexpected => {
                f.write_str("An unexpected error occurred. Please try again later.")
            }
        }
    }
}

impl std::error::Error for FetchError {}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn classify(status: StatusCode, body: &[u8]) -> FetchError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty());
    if status.is_client_error() {
        FetchError::Client {
            status: status.as_u16(),
            message,
        }
    } else if status.is_server_error() {
        FetchError::Server {
            status: status.as_u16(),
            message,
        }
    } else {
        FetchError::Unexpected
    }
}

fn https_connector() -> Result<Connector, String> {
    let mut root_store = rustls::RootCertStore::empty();
    let result = rustls_native_certs::load_native_certs();
    root_store.add_parsable_certificates(result.certs);
    if root_store.is_empty() {
        return Err("No valid system certificates found.".to_string());
    }

    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Ok(HttpsConnectorBuilder::new()
        .with_tls_config(tls_config)
        .https_or_http()
        .enable_http1()
        .build())
}

/// Authenticated client for the reminder backend. Cheap to clone; every
/// request carries the session's bearer token.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: HttpsClient,
    base: String,
}

impl ApiClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self, String> {
        let base = base_url.trim_end_matches('/').to_string();
        base.parse::<Uri>()
            .map_err(|e: http::uri::InvalidUri| e.to_string())?;

        let http_client = Client::builder(TokioExecutor::new()).build(https_connector()?);
        let client = AddAuthorization::bearer(http_client, token);
        Ok(Self { client, base })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<(StatusCode, Vec<u8>), FetchError> {
        let uri: Uri = format!("{}{}", self.base, path)
            .parse()
            .map_err(|_| FetchError::Unexpected)?;

        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::USER_AGENT, USER_AGENT);
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        let request = builder
            .body(body.unwrap_or_default())
            .map_err(|_| FetchError::Unexpected)?;

        let response = self
            .client
            .clone()
            .oneshot(request)
            .await
            .map_err(|_| FetchError::NetworkUnreachable)?;

        let (parts, body) = response.into_parts();
        let bytes = body
            .collect()
            .await
            .map_err(|_| FetchError::NetworkUnreachable)?
            .to_bytes();
        Ok((parts.status, bytes.to_vec()))
    }

    /// `GET /inventory` for the active user. The caller owns sorting.
    pub async fn get_inventory(&self) -> Result<Vec<InventoryItem>, FetchError> {
        let (status, body) = self.send(Method::GET, "/inventory", None).await?;
        if !status.is_success() {
            return Err(classify(status, &body));
        }
        let parsed: InventoryResponse =
            serde_json::from_slice(&body).map_err(|_| FetchError::Unexpected)?;
        Ok(parsed.inventory)
    }

    /// Submit a finalized reminder draft.
    pub async fn create_reminder(&self, payload: &ReminderPayload) -> Result<(), FetchError> {
        let body = serde_json::to_string(payload).map_err(|_| FetchError::Unexpected)?;
        let (status, body) = self.send(Method::POST, "/reminder", Some(body)).await?;
        if !status.is_success() {
            return Err(classify(status, &body));
        }
        Ok(())
    }

    /// `POST /user/token`. Fire-and-forget: failures are logged, never
    /// surfaced to the user.
    pub async fn register_push_token(&self, push_token: &str) {
        let body = serde_json::json!({ "expoPushToken": push_token }).to_string();
        match self.send(Method::POST, "/user/token", Some(body)).await {
            Ok((status, _)) if status.is_success() => {}
            Ok((status, _)) => {
                warn!(%status, "push token registration rejected by backend");
            }
            Err(e) => {
                warn!(error = %e, "push token registration failed");
            }
        }
    }
}

/// Raw geocoder search result; coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct GeoPlace {
    display_name: String,
    lat: String,
    lon: String,
}

/// Unauthenticated client for the public geocoding search service.
#[derive(Clone, Debug)]
pub struct GeoClient {
    client: Client<Connector, String>,
    base: String,
}

impl GeoClient {
    pub fn new(base_url: &str) -> Result<Self, String> {
        let base = base_url.trim_end_matches('/').to_string();
        base.parse::<Uri>()
            .map_err(|e: http::uri::InvalidUri| e.to_string())?;
        let client = Client::builder(TokioExecutor::new()).build(https_connector()?);
        Ok(Self { client, base })
    }

    /// Named hospitals inside a bounding box around the given coordinates,
    /// at most six results.
    pub async fn search_nearby(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<Hospital>, String> {
        let min_lat = latitude - BOUNDING_BOX_DEGREES;
        let max_lat = latitude + BOUNDING_BOX_DEGREES;
        let min_lon = longitude - BOUNDING_BOX_DEGREES;
        let max_lon = longitude + BOUNDING_BOX_DEGREES;

        let uri: Uri = format!(
            "{}/search?q={}&format=json&limit={}&viewbox={},{},{},{}&bounded=1",
            self.base,
            urlencoding::encode("hospitals"),
            MAX_HOSPITAL_RESULTS,
            min_lon,
            min_lat,
            max_lon,
            max_lat
        )
        .parse()
        .map_err(|e: http::uri::InvalidUri| e.to_string())?;

        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::USER_AGENT, USER_AGENT)
            .body(String::new())
            .map_err(|e| e.to_string())?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| e.to_string())?;
        let (parts, body) = response.into_parts();
        if !parts.status.is_success() {
            return Err(format!("geocoder returned {}", parts.status));
        }
        let bytes = body.collect().await.map_err(|e| e.to_string())?.to_bytes();

        let places: Vec<GeoPlace> = serde_json::from_slice(&bytes).map_err(|e| e.to_string())?;
        let hospitals = places
            .into_iter()
            .filter_map(|p| {
                Some(Hospital {
                    name: p.display_name,
                    latitude: p.lat.parse().ok()?,
                    longitude: p.lon.parse().ok()?,
                })
            })
            .take(MAX_HOSPITAL_RESULTS)
            .collect();
        Ok(hospitals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const INVENTORY_BODY: &str = r#"{
        "inventory": [
            {
                "_id": "64fa3",
                "medicine_name": "Paracetamol",
                "stock": 12,
                "compartment": 2,
                "expiration_date": "2025-09-01T00:00:00Z"
            },
            {
                "_id": "64fa4",
                "medicine_name": "Ibuprofen",
                "stock": 3,
                "compartment": 4,
                "expiration_date": "2025-03-15T00:00:00Z"
            }
        ]
    }"#;

    #[tokio::test]
    async fn test_inventory_fetch_sends_bearer_and_parses() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/inventory")
            .match_header("authorization", "Bearer token-123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(INVENTORY_BODY)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), "token-123").unwrap();
        let items = client.get_inventory().await.unwrap();

        mock.assert_async().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].medicine_name, "Paracetamol");
        assert_eq!(items[1].stock, 3);
    }

    #[tokio::test]
    async fn test_inventory_503_without_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/inventory")
            .with_status(503)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), "t").unwrap();
        let err = client.get_inventory().await.unwrap_err();

        assert_eq!(
            err,
            FetchError::Server {
                status: 503,
                message: None
            }
        );
        assert_eq!(
            err.to_string(),
            "Error 503: An unexpected error occured on the server"
        );
    }

    #[tokio::test]
    async fn test_inventory_4xx_surfaces_server_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/inventory")
            .with_status(404)
            .with_body(r#"{"message":"No inventory found"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), "t").unwrap();
        let err = client.get_inventory().await.unwrap_err();
        assert_eq!(err.to_string(), "Error 404: No inventory found");
    }

    #[tokio::test]
    async fn test_inventory_4xx_fallback_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/inventory")
            .with_status(400)
            .with_body("not json")
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), "t").unwrap();
        let err = client.get_inventory().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error 400: An unexpected error occur. Please try again later"
        );
    }

    #[tokio::test]
    async fn test_network_unreachable() {
        // Nothing listens on the discard port.
        let client = ApiClient::new("http://127.0.0.1:9", "t").unwrap();
        let err = client.get_inventory().await.unwrap_err();
        assert_eq!(err, FetchError::NetworkUnreachable);
        assert_eq!(
            err.to_string(),
            "Unable to connect. Please check your internet connection and try again."
        );
    }

    #[tokio::test]
    async fn test_create_reminder_posts_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/reminder")
            .match_header("authorization", "Bearer token-123")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJsonString(
                r#"{"medication_name":"Paracetamol","compartment":3}"#.to_string(),
            ))
            .with_status(201)
            .create_async()
            .await;

        let payload = ReminderPayload {
            medication_name: "Paracetamol".to_string(),
            frequency: "Twice a day".to_string(),
            dosages: vec![],
            compartment: 3,
        };
        let client = ApiClient::new(&server.url(), "token-123").unwrap();
        client.create_reminder(&payload).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_register_push_token_swallows_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/user/token")
            .match_body(Matcher::PartialJsonString(
                r#"{"expoPushToken":"ExponentPushToken[x]"}"#.to_string(),
            ))
            .with_status(500)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), "t").unwrap();
        // Must not error or panic; the failure only goes to the log.
        client.register_push_token("ExponentPushToken[x]").await;
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_hospital_search_caps_at_six_results() {
        let entries: Vec<String> = (0..8)
            .map(|i| {
                format!(
                    r#"{{"display_name":"Hospital {}","lat":"14.59{}","lon":"120.98{}"}}"#,
                    i, i, i
                )
            })
            .collect();
        let body = format!("[{}]", entries.join(","));

        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "hospitals".into()),
                Matcher::UrlEncoded("format".into(), "json".into()),
                Matcher::UrlEncoded("bounded".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let client = GeoClient::new(&server.url()).unwrap();
        let hospitals = client.search_nearby(14.5995, 120.9842).await.unwrap();
        assert_eq!(hospitals.len(), 6);
        assert_eq!(hospitals[0].name, "Hospital 0");
        assert!((hospitals[0].latitude - 14.590).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_hospital_search_failure_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = GeoClient::new(&server.url()).unwrap();
        assert!(client.search_nearby(0.0, 0.0).await.is_err());
    }
}
