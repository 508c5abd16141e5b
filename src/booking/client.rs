//! HTTP booking client
//!
//! Builds and sends exactly one create-booking POST per invocation and
//! classifies the raw result into a message string. All retrying lives in the
//! coordinator; all transport failures collapse into the fixed classified
//! messages of [`super::outcome`].
//!
//! TLS policy mirrors what the portal tolerates in practice: on a direct
//! connection the first attempt validates certificates and only a TLS-layer
//! failure triggers a single second attempt without validation. With a proxy
//! configured (typically an intercepting debugging proxy), validation is
//! skipped outright and the request is routed through it.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, COOKIE, USER_AGENT};
use reqwest::{Client, Response};
use uuid::Uuid;

use super::outcome::{MSG_BAD_PLACE, MSG_COOKIE_EXPIRED, MSG_REQUEST_FAILED};
use super::{places, BookingChunk};
use crate::config::RunConfig;
use crate::error::{Error, Result};

/// Portal origin
const PORTAL_BASE: &str = "https://booking.cuhk.edu.cn";

/// Create-booking endpoint path
const BOOK_PATH: &str = "/a/field/book/bizFieldBookMain/saveData";

/// Static booking rule id, fixed query parameter
const RULE_ID: &str = "4b4d6e5c826c425b9a5ed7a02a46656a";

/// Static portal extension field
const EXTEND1: &str = "af15efadc379429885681cbad7b1ec12";

/// Browser User-Agent the portal expects
const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/140.0.0.0 Safari/537.36 Edg/140.0.0.0";

/// Per-attempt timeout; a slower response counts as a transport failure
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Stateless request builder/sender for one portal session.
///
/// Cheap to share across concurrent retry loops: the underlying connection
/// pools and the session cookie are read-only for the duration of a run.
pub struct BookingClient {
    run: RunConfig,
    /// Direct-connection client with certificate validation; `None` in proxy mode
    verified: Option<Client>,
    /// Validation-free client: TLS fallback in direct mode, the only client in proxy mode
    insecure: Client,
    base_url: String,
}

impl BookingClient {
    /// Create a client for the real portal
    pub fn new(run: RunConfig) -> Result<Self> {
        Self::with_base_url(run, PORTAL_BASE)
    }

    /// Create a client against a custom origin (mock servers in tests)
    pub fn with_base_url(run: RunConfig, base_url: &str) -> Result<Self> {
        let headers = session_headers(&run.cookie)?;

        let (verified, insecure) = match &run.proxy {
            None => {
                // Direct connection: ignore any environment proxy settings.
                let verified = Client::builder()
                    .timeout(ATTEMPT_TIMEOUT)
                    .gzip(true)
                    .default_headers(headers.clone())
                    .no_proxy()
                    .build()?;
                let insecure = Client::builder()
                    .timeout(ATTEMPT_TIMEOUT)
                    .gzip(true)
                    .default_headers(headers)
                    .no_proxy()
                    .danger_accept_invalid_certs(true)
                    .build()?;
                (Some(verified), insecure)
            }
            Some(proxy) => {
                let mut builder = Client::builder()
                    .timeout(ATTEMPT_TIMEOUT)
                    .gzip(true)
                    .default_headers(headers)
                    .danger_accept_invalid_certs(true);
                if let Some(http) = &proxy.http {
                    builder = builder.proxy(reqwest::Proxy::http(format!("http://{http}"))?);
                }
                if let Some(https) = &proxy.https {
                    builder = builder.proxy(reqwest::Proxy::https(format!("http://{https}"))?);
                }
                (None, builder.build()?)
            }
        };

        Ok(Self {
            run,
            verified,
            insecure,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Submit one booking attempt and classify the result.
    ///
    /// Returns the classified message string. An `Err` here means the
    /// response defeated classification entirely (valid JSON without a
    /// string `message` field); the retry loop logs it and keeps going.
    ///
    /// An unknown `place` short-circuits to [`MSG_BAD_PLACE`] with no
    /// network call.
    pub async fn submit(&self, chunk: &BookingChunk) -> Result<String> {
        let Some(fid) = places::facility_id(&chunk.place) else {
            return Ok(MSG_BAD_PLACE.to_string());
        };

        let form = self.build_form(fid, chunk);
        let url = format!("{}{}", self.base_url, BOOK_PATH);

        let response = match self.send(&url, &form).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("booking request failed: {e}");
                return Ok(MSG_REQUEST_FAILED.to_string());
            }
        };

        // Anything that is not the expected JSON payload means the session
        // cookie no longer reaches the booking backend.
        let value: serde_json::Value = match response.json().await {
            Ok(value) => value,
            Err(_) => return Ok(MSG_COOKIE_EXPIRED.to_string()),
        };

        value
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .ok_or_else(|| Error::other(format!("response JSON has no message field: {value}")))
    }

    async fn send(&self, url: &str, form: &[(&str, String)]) -> reqwest::Result<Response> {
        let query = [("reBookMainId", ""), ("ruleId", RULE_ID)];

        if let Some(verified) = &self.verified {
            match verified.post(url).query(&query).form(form).send().await {
                Ok(response) => return Ok(response),
                Err(e) if is_tls_error(&e) => {
                    tracing::warn!("TLS verification failed, retrying without: {e}");
                }
                Err(e) => return Err(e),
            }
        }

        self.insecure.post(url).query(&query).form(form).send().await
    }

    /// Assemble the portal form body with a fresh per-attempt id
    fn build_form(&self, fid: &str, chunk: &BookingChunk) -> Vec<(&'static str, String)> {
        let profile = &self.run.profile;
        let book_id = Uuid::new_v4().simple().to_string();
        let field_id = Uuid::new_v4().simple().to_string();

        vec![
            ("id", book_id.clone()),
            ("user.id", profile.id.clone()),
            ("userOrgId", String::new()),
            ("approvalFlag", "0".to_string()),
            ("bizFieldBookField.id", field_id),
            ("bizFieldBookField.FId", fid.to_string()),
            ("bizFieldBookField.BId", book_id),
            ("bizFieldBookField.theme", self.run.theme.clone()),
            ("isNewRecord", "true".to_string()),
            ("extend1", EXTEND1.to_string()),
            (
                "userGrp",
                "Strings, Wind, Brass and Percussion（student）".to_string(),
            ),
            ("userTag", "Student".to_string()),
            ("bookType", "0".to_string()),
            ("fitBook", "false".to_string()),
            ("user.name", profile.name.clone()),
            ("userOrgName", "MUS".to_string()),
            ("userEmail", profile.email.clone()),
            ("userPhone", profile.phone.clone()),
            ("theme", self.run.theme.clone()),
            ("bizFieldBookField.startTime", chunk.start_ts()),
            ("bizFieldBookField.endTime", chunk.end_ts()),
            ("bizFieldBookField.joinNums", "1".to_string()),
            ("extend18", "0".to_string()),
            ("bizFieldBookField.needRep", "0".to_string()),
            ("bizFieldBookField.extend1", "0".to_string()),
            ("extend16", "0".to_string()),
            ("bizFieldBookField.useDesc", "1".to_string()),
        ]
    }
}

fn session_headers(cookie: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        COOKIE,
        HeaderValue::from_str(cookie)
            .map_err(|e| Error::config(format!("cookie is not a valid header value: {e}")))?,
    );
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
    Ok(headers)
}

/// Heuristic TLS-layer detection on the reqwest error chain.
///
/// reqwest does not expose the TLS failure class directly, so walk the
/// source chain and look for certificate/TLS wording.
fn is_tls_error(err: &reqwest::Error) -> bool {
    chain_mentions_tls(err)
}

fn chain_mentions_tls(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        let text = e.to_string().to_ascii_lowercase();
        if text.contains("certificate") || text.contains("tls") || text.contains("ssl") {
            return true;
        }
        source = e.source();
    }
    false
}
