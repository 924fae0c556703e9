//! HTTP forwarding of magnet links to a download server.

use async_trait::async_trait;
use reqwest::Client;
use reshelf_config::AcquireSettings;
use reshelf_telemetry::Metrics;
use tracing::{Instrument, debug, info, info_span, warn};
use url::Url;

use crate::error::{AcquireError, AcquireResult};
use crate::request::AcquireRequest;

const LINK_FIELD: &str = "urls";

/// Anything that can forward a batch of links and report per-link log lines.
#[async_trait]
pub trait Acquirer: Send + Sync {
    /// Forward every non-blank link of `request`, in order.
    ///
    /// # Errors
    ///
    /// Returns an error only when the request as a whole cannot be attempted.
    async fn submit(&self, request: &AcquireRequest) -> AcquireResult<Vec<String>>;
}

/// [`Acquirer`] that posts each link as a form field to the download server.
#[derive(Clone)]
pub struct HttpAcquirer {
    client: Client,
    submit_path: String,
    metrics: Metrics,
}

impl HttpAcquirer {
    /// Build the HTTP client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns `Client` when the underlying client cannot be constructed.
    pub fn new(settings: &AcquireSettings, metrics: Metrics) -> AcquireResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|source| AcquireError::Client { source })?;
        Ok(Self {
            client,
            submit_path: settings.submit_path.clone(),
            metrics,
        })
    }

    /// Submission endpoint for a caller-supplied server address.
    ///
    /// # Errors
    ///
    /// Returns `InvalidServer` unless the result is an absolute `http`/`https` URL.
    pub fn endpoint(&self, server_addr: &str) -> AcquireResult<Url> {
        let base = server_addr.trim().trim_end_matches('/');
        let invalid = |reason| AcquireError::InvalidServer {
            value: server_addr.to_string(),
            reason,
        };
        let endpoint = Url::parse(&format!("{base}{}", self.submit_path))
            .map_err(|_| invalid("not_absolute_url"))?;
        match endpoint.scheme() {
            "http" | "https" if endpoint.has_host() => Ok(endpoint),
            "http" | "https" => Err(invalid("missing_host")),
            _ => Err(invalid("unsupported_scheme")),
        }
    }

    async fn submit_link(&self, endpoint: &Url, link: &str) -> Result<(), String> {
        let response = self
            .client
            .post(endpoint.clone())
            .form(&[(LINK_FIELD, link)])
            .send()
            .await
            .map_err(|err| err.to_string())?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(format!("server responded with {status}"))
        }
    }
}

#[async_trait]
impl Acquirer for HttpAcquirer {
    async fn submit(&self, request: &AcquireRequest) -> AcquireResult<Vec<String>> {
        let endpoint = self.endpoint(&request.server_addr)?;
        let span = info_span!("acquire", endpoint = %endpoint);
        async {
            let total = request.magnet_links.len();
            let mut logs = Vec::with_capacity(total * 2 + 1);
            for (index, link) in request.magnet_links.iter().enumerate() {
                let position = index + 1;
                let link = link.trim();
                if link.is_empty() {
                    debug!(position, "skipping blank link");
                    continue;
                }
                logs.push(format!("[{position}/{total}] submitting: {link}"));
                match self.submit_link(&endpoint, link).await {
                    Ok(()) => {
                        self.metrics.inc_acquire_link("accepted");
                        logs.push(format!("[{position}] accepted"));
                    }
                    Err(reason) => {
                        self.metrics.inc_acquire_link("failed");
                        warn!(position, error = %reason, "link submission failed");
                        logs.push(format!("[{position}] failed: {reason}"));
                    }
                }
            }
            info!(total, "acquisition batch processed");
            logs.push(format!("processed {total} magnet links"));
            Ok(logs)
        }
        .instrument(span)
        .await
    }
}
