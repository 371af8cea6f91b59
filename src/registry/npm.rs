//! npm registry checker for probing package name availability.

use crate::config::ScanConfig;
use crate::types::{PackageName, ProbeStatus, Result, VerificationResult};
use futures::future;
use reqwest::Client;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, trace};
use url::Url;

/// Checker probing candidate names for existence on a registry.
///
/// Probes never fail the scan; every outcome, including transport failures
/// and timeouts, folds into the per-name [`ProbeStatus`].
pub struct RegistryChecker {
    client: Client,
    registry_url: String,
    batch_size: usize,
    batch_delay: Duration,
    probe_timeout: Duration,
}

impl RegistryChecker {
    /// Create a checker from scan configuration.
    pub fn new(config: &ScanConfig) -> Result<Self> {
        let registry_url = config.registry.trim_end_matches('/').to_string();
        Url::parse(&registry_url)?;

        // No client-level timeout: the per-probe deadline in probe() is the
        // only clock, otherwise a stall would surface as a transport error
        let client = Client::builder()
            .user_agent("confuscan/0.1")
            .http1_only() // Force HTTP/1.1 to avoid HTTP/2 stream limit issues
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            registry_url,
            batch_size: config.batch_size.max(1),
            batch_delay: config.batch_delay(),
            probe_timeout: config.probe_timeout(),
        })
    }

    /// Probe every name, batch by batch, returning results in input order.
    ///
    /// Each batch goes out concurrently and completes as a unit before the
    /// next one starts; consecutive batches are separated by the configured
    /// delay. `progress` fires once per finished probe.
    pub async fn verify_all<F>(
        &self,
        names: &[PackageName],
        mut progress: F,
    ) -> Vec<VerificationResult>
    where
        F: FnMut(&VerificationResult),
    {
        let mut results = Vec::with_capacity(names.len());

        for (batch_index, batch) in names.chunks(self.batch_size).enumerate() {
            if batch_index > 0 {
                sleep(self.batch_delay).await;
            }

            let probes = batch.iter().map(|name| self.probe(name));
            for result in future::join_all(probes).await {
                progress(&result);
                results.push(result);
            }
        }

        results
    }

    /// One GET probe against `<registry>/<name>`. 404 means unclaimed.
    async fn probe(&self, name: &PackageName) -> VerificationResult {
        let url = format!(
            "{}/{}",
            self.registry_url,
            urlencoding::encode(name.as_str())
        );
        trace!("Probing {}", url);

        let outcome = timeout(self.probe_timeout, self.client.get(&url).send()).await;

        match outcome {
            Ok(Ok(response)) => {
                let status = response.status();
                if status.is_success() {
                    debug!("Taken: {}", name);
                    VerificationResult {
                        name: name.clone(),
                        status: ProbeStatus::Taken,
                        error: None,
                    }
                } else if status.as_u16() == 404 {
                    // Name is unclaimed - the finding this tool exists for
                    debug!("Available: {}", name);
                    VerificationResult {
                        name: name.clone(),
                        status: ProbeStatus::Available,
                        error: None,
                    }
                } else {
                    VerificationResult {
                        name: name.clone(),
                        status: ProbeStatus::Error,
                        error: Some(format!("registry answered HTTP {}", status.as_u16())),
                    }
                }
            }
            Ok(Err(e)) => VerificationResult {
                name: name.clone(),
                status: ProbeStatus::Error,
                error: Some(e.to_string()),
            },
            // Deadline passed; dropping the in-flight send tears the
            // connection down
            Err(_) => VerificationResult {
                name: name.clone(),
                status: ProbeStatus::Timeout,
                error: Some(format!("no response within {:?}", self.probe_timeout)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::normalize_specifier;
    use crate::testutil::{StubRegistry, StubResponse};
    use std::time::Instant;

    fn name(raw: &str) -> PackageName {
        normalize_specifier(raw).unwrap()
    }

    fn test_config(registry: String) -> ScanConfig {
        ScanConfig {
            registry,
            batch_size: 2,
            batch_delay_ms: 10,
            timeout: 1,
            ..ScanConfig::default()
        }
    }

    #[test]
    fn test_rejects_invalid_registry_url() {
        let config = test_config("not a url".to_string());
        assert!(RegistryChecker::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_available_on_404() {
        let stub = StubRegistry::start(vec![("ghost-package", StubResponse::NotFound)]).await;
        let checker = RegistryChecker::new(&test_config(stub.url())).unwrap();

        let results = checker.verify_all(&[name("ghost-package")], |_| {}).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, ProbeStatus::Available);
        assert!(results[0].error.is_none());
    }

    #[tokio::test]
    async fn test_taken_on_success() {
        let stub = StubRegistry::start(vec![("lodash", StubResponse::Ok)]).await;
        let checker = RegistryChecker::new(&test_config(stub.url())).unwrap();

        let results = checker.verify_all(&[name("lodash")], |_| {}).await;

        assert_eq!(results[0].status, ProbeStatus::Taken);
    }

    #[tokio::test]
    async fn test_error_on_unexpected_status() {
        let stub = StubRegistry::start(vec![("flaky-pkg", StubResponse::ServerError)]).await;
        let checker = RegistryChecker::new(&test_config(stub.url())).unwrap();

        let results = checker.verify_all(&[name("flaky-pkg")], |_| {}).await;

        assert_eq!(results[0].status, ProbeStatus::Error);
        assert_eq!(
            results[0].error.as_deref(),
            Some("registry answered HTTP 500")
        );
    }

    #[tokio::test]
    async fn test_transport_error_is_error_status() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let checker = RegistryChecker::new(&test_config(format!("http://{}", addr))).unwrap();
        let results = checker.verify_all(&[name("lonely-pkg")], |_| {}).await;

        assert_eq!(results[0].status, ProbeStatus::Error);
        assert!(results[0].error.is_some());
    }

    #[tokio::test]
    async fn test_timeout_does_not_poison_other_probes() {
        let stub = StubRegistry::start(vec![
            ("slow-pkg", StubResponse::Hang),
            ("fast-pkg", StubResponse::NotFound),
            ("late-pkg", StubResponse::NotFound),
        ])
        .await;
        let checker = RegistryChecker::new(&test_config(stub.url())).unwrap();

        // slow-pkg and fast-pkg share a batch, late-pkg lands in the next
        // one; the hang must not leak into either
        let names = vec![name("slow-pkg"), name("fast-pkg"), name("late-pkg")];
        let results = checker.verify_all(&names, |_| {}).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].status, ProbeStatus::Timeout);
        assert!(results[0].error.is_some());
        assert_eq!(results[1].status, ProbeStatus::Available);
        assert_eq!(results[2].status, ProbeStatus::Available);
    }

    #[tokio::test]
    async fn test_results_keep_input_order_across_batches() {
        let stub = StubRegistry::start(vec![
            ("pkg-a", StubResponse::NotFound),
            ("pkg-b", StubResponse::Ok),
            ("pkg-c", StubResponse::NotFound),
            ("pkg-d", StubResponse::Ok),
            ("pkg-e", StubResponse::NotFound),
        ])
        .await;
        let checker = RegistryChecker::new(&test_config(stub.url())).unwrap();

        let names: Vec<PackageName> = ["pkg-a", "pkg-b", "pkg-c", "pkg-d", "pkg-e"]
            .iter()
            .map(|n| name(n))
            .collect();

        let mut seen = 0usize;
        let results = checker.verify_all(&names, |_| seen += 1).await;

        assert_eq!(seen, names.len());
        let result_names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            result_names,
            vec!["pkg-a", "pkg-b", "pkg-c", "pkg-d", "pkg-e"]
        );
    }

    #[tokio::test]
    async fn test_batches_are_delayed() {
        let stub = StubRegistry::start(vec![
            ("pkg-a", StubResponse::NotFound),
            ("pkg-b", StubResponse::NotFound),
            ("pkg-c", StubResponse::NotFound),
        ])
        .await;
        let config = ScanConfig {
            batch_size: 2,
            batch_delay_ms: 150,
            ..test_config(stub.url())
        };
        let checker = RegistryChecker::new(&config).unwrap();

        let names = vec![name("pkg-a"), name("pkg-b"), name("pkg-c")];
        let started = Instant::now();
        let results = checker.verify_all(&names, |_| {}).await;

        // Two batches means at least one inter-batch delay
        assert_eq!(results.len(), 3);
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[tokio::test]
    async fn test_zero_batch_size_is_clamped() {
        let stub = StubRegistry::start(vec![
            ("pkg-a", StubResponse::NotFound),
            ("pkg-b", StubResponse::NotFound),
        ])
        .await;
        let config = ScanConfig {
            batch_size: 0,
            ..test_config(stub.url())
        };
        let checker = RegistryChecker::new(&config).unwrap();

        let names = vec![name("pkg-a"), name("pkg-b")];
        let results = checker.verify_all(&names, |_| {}).await;
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_scoped_names_are_url_encoded() {
        // Unmatched paths answer 500, so this only passes if the probe
        // URL-encodes the scoped name the same way the stub does
        let stub = StubRegistry::start(vec![("@scope/ghost", StubResponse::NotFound)]).await;
        let checker = RegistryChecker::new(&test_config(stub.url())).unwrap();

        let results = checker.verify_all(&[name("@scope/ghost")], |_| {}).await;

        assert_eq!(results[0].status, ProbeStatus::Available);
    }
}
