// ABOUTME: HTTP transport seam for the management endpoint.
// ABOUTME: Owns TLS client-certificate handling and protocol headers.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use snafu::Snafu;

/// Protocol version header sent with every management request.
const PROTOCOL_VERSION: &str = "2010-10-28";

/// Header carrying the request id of an accepted asynchronous operation.
const REQUEST_ID_HEADER: &str = "x-ms-request-id";

/// A management-endpoint response, HTTP error statuses included.
///
/// Only connection-level failures surface as [`TransportError`]; a 4xx/5xx
/// response is data for the protocol layer to interpret.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    pub request_id: Option<String>,
}

/// Connection-layer failures. Detail strings rather than source chains so
/// callers above the seam stay independent of the HTTP client in use.
#[derive(Debug, Snafu)]
pub enum TransportError {
    #[snafu(display("request to {uri} failed: {message}"))]
    RequestFailed { uri: String, message: String },

    #[snafu(display("could not read client certificate {path}: {source}"))]
    CertificateIo {
        path: String,
        source: std::io::Error,
    },

    #[snafu(display("invalid client certificate {path}: {message}"))]
    BadCertificate { path: String, message: String },

    #[snafu(display("failed to build HTTP client: {message}"))]
    ClientBuild { message: String },
}

/// Verb-level access to the management endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, uri: &str) -> Result<HttpResponse, TransportError>;
    async fn post(&self, uri: &str, body: &str) -> Result<HttpResponse, TransportError>;
    async fn delete(&self, uri: &str) -> Result<HttpResponse, TransportError>;
}

/// Production transport: TLS with a PEM client-certificate identity.
pub struct ManagementTransport {
    client: reqwest::Client,
}

impl ManagementTransport {
    /// Builds a transport authenticating with the PEM bundle at `cert_path`
    /// (certificate plus private key).
    pub fn new(cert_path: &Path) -> Result<Self, TransportError> {
        let display_path = cert_path.display().to_string();
        let pem = std::fs::read(cert_path).map_err(|source| TransportError::CertificateIo {
            path: display_path.clone(),
            source,
        })?;
        let identity =
            reqwest::Identity::from_pem(&pem).map_err(|e| TransportError::BadCertificate {
                path: display_path,
                message: e.to_string(),
            })?;

        let client = reqwest::Client::builder()
            .identity(identity)
            .use_rustls_tls()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| TransportError::ClientBuild {
                message: e.to_string(),
            })?;

        Ok(ManagementTransport { client })
    }

    async fn send(
        &self,
        method: reqwest::Method,
        uri: &str,
        body: Option<&str>,
    ) -> Result<HttpResponse, TransportError> {
        tracing::debug!(%method, uri, has_body = body.is_some(), "management request");

        let mut request = self
            .client
            .request(method, uri)
            .header("x-ms-version", PROTOCOL_VERSION)
            .header(reqwest::header::CONTENT_TYPE, "application/xml");
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::RequestFailed {
                uri: uri.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::RequestFailed {
                uri: uri.to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!(status, ?request_id, "management response");
        Ok(HttpResponse {
            status,
            body,
            request_id,
        })
    }
}

#[async_trait]
impl Transport for ManagementTransport {
    async fn get(&self, uri: &str) -> Result<HttpResponse, TransportError> {
        self.send(reqwest::Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: &str) -> Result<HttpResponse, TransportError> {
        self.send(reqwest::Method::POST, uri, Some(body)).await
    }

    async fn delete(&self, uri: &str) -> Result<HttpResponse, TransportError> {
        self.send(reqwest::Method::DELETE, uri, None).await
    }
}
