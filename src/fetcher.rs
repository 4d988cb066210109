// 🌐 HTTP Fetcher
// Paginated list + per-item detail GETs with bounded retry/backoff

use crate::config::{EtlConfig, RetryPolicy};
use crate::error::{EtlError, Result};
use crate::record;
use serde_json::Value;
use std::collections::HashSet;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

// ============================================================================
// TRANSPORT
// ============================================================================

/// Status + body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport - the single seam between the pipeline and the network
///
/// `Err` means no response at all (timeout, connection refused...). Those
/// go through the same retry path as a failing status.
pub trait Transport {
    fn get(&self, url: &str) -> std::result::Result<HttpResponse, String>;
}

/// Blocking reqwest client with a per-request timeout.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pokeapi-etl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EtlError::Transport {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(ReqwestTransport { client })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str) -> std::result::Result<HttpResponse, String> {
        let response = self.client.get(url).send().map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| e.to_string())?;
        Ok(HttpResponse { status, body })
    }
}

// ============================================================================
// FETCHER
// ============================================================================

/// `{name, url}` entry of a list endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRef {
    pub name: Option<String>,
    pub url: String,
}

pub struct Fetcher<T: Transport> {
    transport: T,
    policy: RetryPolicy,
    progress_every: usize,
}

impl Fetcher<ReqwestTransport> {
    /// Fetcher over the real network, configured from `EtlConfig`
    pub fn from_config(config: &EtlConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.request_timeout)?;
        Ok(Fetcher::new(transport, config.retry.clone()).with_progress_every(config.progress_every))
    }
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Fetcher {
            transport,
            policy,
            progress_every: 0,
        }
    }

    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `url` and parse the body as JSON.
    ///
    /// Up to `max_attempts` tries, sleeping `base_delay * (1 + attempt)` after
    /// each retryable failure, then one final request whose failure is
    /// returned as-is. Non-retryable statuses fail immediately.
    pub fn fetch_json(&self, url: &str) -> Result<Value> {
        for attempt in 0..self.policy.max_attempts {
            debug!(url, attempt, "GET");
            match self.transport.get(url) {
                Ok(resp) if resp.is_success() => return parse_body(url, &resp.body),
                Ok(resp) if !self.policy.is_retryable_status(resp.status) => {
                    return Err(EtlError::HttpStatus {
                        url: url.to_string(),
                        status: resp.status,
                    });
                }
                Ok(resp) => warn!(url, attempt, status = resp.status, "request failed, retrying"),
                Err(message) => warn!(url, attempt, %message, "request failed, retrying"),
            }
            thread::sleep(self.policy.delay_for(attempt));
        }

        debug!(url, "final attempt");
        match self.transport.get(url) {
            Ok(resp) if resp.is_success() => parse_body(url, &resp.body),
            Ok(resp) => Err(EtlError::HttpStatus {
                url: url.to_string(),
                status: resp.status,
            }),
            Err(message) => Err(EtlError::Transport {
                url: url.to_string(),
                message,
            }),
        }
    }

    /// Walk a list endpoint, following `next` links until the last page.
    ///
    /// Every page must carry a `results` array. A `next` link back to a page
    /// already fetched is a `PaginationLoop` error.
    pub fn list_resources(&self, base_url: &str, endpoint: &str, page_size: usize) -> Result<Vec<ResourceRef>> {
        let mut next = Some(format!("{}/{}?limit={}&offset=0", base_url, endpoint, page_size));
        let mut visited = HashSet::new();
        let mut refs = Vec::new();

        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                return Err(EtlError::PaginationLoop { url });
            }
            let page = self.fetch_json(&url)?;

            for item in record::req_list(&page, "results", "list page")? {
                refs.push(ResourceRef {
                    name: record::opt_str(item, "name")?,
                    url: record::req_str(item, "url", "list entry")?,
                });
            }

            next = record::opt_str(&page, "next")?;
        }

        Ok(refs)
    }

    /// List `endpoint` and fetch every detail record, sequentially, in list order.
    pub fn fetch_all_details(&self, base_url: &str, endpoint: &str, page_size: usize) -> Result<Vec<Value>> {
        let refs = self.list_resources(base_url, endpoint, page_size)?;
        println!("   Found {} {} entries. Fetching details...", refs.len(), endpoint);

        let mut details = Vec::with_capacity(refs.len());
        for (i, r) in refs.iter().enumerate() {
            details.push(self.fetch_json(&r.url)?);

            let done = i + 1;
            if self.progress_every > 0 && done % self.progress_every == 0 {
                println!("   {} fetched: {}", endpoint, done);
            }
        }

        Ok(details)
    }
}

fn parse_body(url: &str, body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|source| EtlError::InvalidJson {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays a fixed script of outcomes and records every URL requested
    struct ScriptedTransport {
        script: RefCell<VecDeque<std::result::Result<HttpResponse, String>>>,
        calls: RefCell<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<std::result::Result<HttpResponse, String>>) -> Self {
            ScriptedTransport {
                script: RefCell::new(script.into()),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl Transport for ScriptedTransport {
        fn get(&self, url: &str) -> std::result::Result<HttpResponse, String> {
            self.calls.borrow_mut().push(url.to_string());
            self.script
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err("script exhausted".to_string()))
        }
    }

    fn ok(body: &str) -> std::result::Result<HttpResponse, String> {
        Ok(HttpResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    fn status(code: u16) -> std::result::Result<HttpResponse, String> {
        Ok(HttpResponse {
            status: code,
            body: String::new(),
        })
    }

    #[test]
    fn test_fetch_json_first_try() {
        let fetcher = Fetcher::new(ScriptedTransport::new(vec![ok(r#"{"id": 1}"#)]), RetryPolicy::immediate(3));
        let value = fetcher.fetch_json("https://x/type/1/").unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(fetcher.transport().call_count(), 1);
    }

    #[test]
    fn test_fetch_json_recovers_after_server_errors() {
        let transport = ScriptedTransport::new(vec![
            status(503),
            Err("operation timed out".to_string()),
            ok(r#"{"name": "fire"}"#),
        ]);
        let fetcher = Fetcher::new(transport, RetryPolicy::immediate(3));
        let value = fetcher.fetch_json("https://x/type/10/").unwrap();
        assert_eq!(value["name"], "fire");
        assert_eq!(fetcher.transport().call_count(), 3);
    }

    #[test]
    fn test_final_request_after_exhausted_retries() {
        // 3 retried attempts fail, the final request succeeds
        let transport = ScriptedTransport::new(vec![status(500), status(500), status(500), ok("{}")]);
        let fetcher = Fetcher::new(transport, RetryPolicy::immediate(3));
        assert!(fetcher.fetch_json("https://x/move/1/").is_ok());
        assert_eq!(fetcher.transport().call_count(), 4);
    }

    #[test]
    fn test_fatal_status_reflects_final_response() {
        let transport = ScriptedTransport::new(vec![status(500), status(502), status(503), status(504)]);
        let fetcher = Fetcher::new(transport, RetryPolicy::immediate(3));
        let err = fetcher.fetch_json("https://x/move/1/").unwrap_err();
        match err {
            EtlError::HttpStatus { status, .. } => assert_eq!(status, 504),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_timeouts_become_transport_failure() {
        let timeouts = (0..4).map(|_| Err("timed out".to_string())).collect();
        let fetcher = Fetcher::new(ScriptedTransport::new(timeouts), RetryPolicy::immediate(3));
        let err = fetcher.fetch_json("https://x/move/1/").unwrap_err();
        assert!(matches!(err, EtlError::Transport { .. }));
        assert!(err.is_network_failure());
    }

    #[test]
    fn test_not_found_fails_without_retry() {
        let fetcher = Fetcher::new(ScriptedTransport::new(vec![status(404)]), RetryPolicy::immediate(3));
        let err = fetcher.fetch_json("https://x/pokemon/99999/").unwrap_err();
        assert!(matches!(err, EtlError::HttpStatus { status: 404, .. }));
        assert_eq!(fetcher.transport().call_count(), 1);
    }

    #[test]
    fn test_client_errors_retried_when_enabled() {
        let policy = RetryPolicy {
            retry_client_errors: true,
            ..RetryPolicy::immediate(3)
        };
        let transport = ScriptedTransport::new(vec![status(404), ok("{}")]);
        let fetcher = Fetcher::new(transport, policy);
        assert!(fetcher.fetch_json("https://x/pokemon/1/").is_ok());
        assert_eq!(fetcher.transport().call_count(), 2);
    }

    #[test]
    fn test_invalid_json_body() {
        let fetcher = Fetcher::new(ScriptedTransport::new(vec![ok("<html>")]), RetryPolicy::immediate(3));
        let err = fetcher.fetch_json("https://x/type/1/").unwrap_err();
        assert!(matches!(err, EtlError::InvalidJson { .. }));
    }

    #[test]
    fn test_list_resources_follows_next() {
        let page1 = r#"{"next": "https://x/type?offset=2&limit=2", "results": [
            {"name": "normal", "url": "https://x/type/1/"},
            {"name": "fighting", "url": "https://x/type/2/"}]}"#;
        let page2 = r#"{"next": null, "results": [{"name": "flying", "url": "https://x/type/3/"}]}"#;
        let fetcher = Fetcher::new(ScriptedTransport::new(vec![ok(page1), ok(page2)]), RetryPolicy::immediate(3));

        let refs = fetcher.list_resources("https://x", "type", 2).unwrap();
        let names: Vec<&str> = refs.iter().filter_map(|r| r.name.as_deref()).collect();
        assert_eq!(names, vec!["normal", "fighting", "flying"]);

        let calls = fetcher.transport().calls.borrow();
        assert_eq!(calls[0], "https://x/type?limit=2&offset=0");
        assert_eq!(calls[1], "https://x/type?offset=2&limit=2");
    }

    #[test]
    fn test_page_without_results_fails() {
        let fetcher = Fetcher::new(
            ScriptedTransport::new(vec![ok(r#"{"detail": "Not found."}"#)]),
            RetryPolicy::immediate(3),
        );
        let err = fetcher.list_resources("https://x", "type", 200).unwrap_err();
        assert!(matches!(err, EtlError::MissingField { entity: "list page", field: "results" }));
    }

    #[test]
    fn test_results_not_an_array_fails() {
        let fetcher = Fetcher::new(ScriptedTransport::new(vec![ok(r#"{"results": {}}"#)]), RetryPolicy::immediate(3));
        let err = fetcher.list_resources("https://x", "type", 200).unwrap_err();
        assert!(matches!(err, EtlError::InvalidField { .. }));
    }

    #[test]
    fn test_self_referencing_next_stops() {
        let page = r#"{"next": "https://x/type?limit=200&offset=0", "results": [{"name": "normal", "url": "https://x/type/1/"}]}"#;
        let fetcher = Fetcher::new(ScriptedTransport::new(vec![ok(page), ok(page), ok(page)]), RetryPolicy::immediate(3));

        let err = fetcher.list_resources("https://x", "type", 200).unwrap_err();
        assert!(matches!(err, EtlError::PaginationLoop { .. }));
        assert_eq!(fetcher.transport().call_count(), 1);
    }

    #[test]
    fn test_entry_without_name() {
        let page = r#"{"results": [{"url": "https://x/type/1/"}]}"#;
        let fetcher = Fetcher::new(ScriptedTransport::new(vec![ok(page)]), RetryPolicy::immediate(3));
        let refs = fetcher.list_resources("https://x", "type", 200).unwrap();
        assert_eq!(refs[0].name, None);
        assert_eq!(refs[0].url, "https://x/type/1/");
    }

    #[test]
    fn test_fetch_all_details_in_list_order() {
        let list = r#"{"results": [
            {"name": "b", "url": "https://x/move/2/"},
            {"name": "a", "url": "https://x/move/1/"}]}"#;
        let transport = ScriptedTransport::new(vec![ok(list), ok(r#"{"id": 2}"#), ok(r#"{"id": 1}"#)]);
        let fetcher = Fetcher::new(transport, RetryPolicy::immediate(3));

        let details = fetcher.fetch_all_details("https://x", "move", 2000).unwrap();
        let ids: Vec<i64> = details.iter().map(|d| d["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
