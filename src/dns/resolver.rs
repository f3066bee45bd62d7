//! Bounded hostname resolution.

use std::collections::BTreeMap;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use futures_util::stream::{self, StreamExt};

use crate::config::DnsConfig;
use crate::resilience::with_deadline;

/// Why a domain list, or a single domain in it, could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum DnsError {
    #[error("lookup {domain}: {source}")]
    Lookup {
        domain: String,
        #[source]
        source: io::Error,
    },

    #[error("lookup {domain}: timed out after {}ms", .after.as_millis())]
    Timeout { domain: String, after: Duration },

    #[error("{count} domains requested, at most {max} allowed")]
    TooManyDomains { count: usize, max: usize },
}

/// Per-request bounds on DNS work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsLimits {
    /// Deadline for each lookup.
    pub timeout: Duration,
    /// Lookups in flight at once.
    pub max_concurrent: usize,
    /// Distinct domains one request may list.
    pub max_domains: usize,
}

impl From<&DnsConfig> for DnsLimits {
    fn from(config: &DnsConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.timeout_ms),
            max_concurrent: config.max_concurrent,
            max_domains: config.max_domains,
        }
    }
}

impl Default for DnsLimits {
    fn default() -> Self {
        Self::from(&DnsConfig::default())
    }
}

/// Resolve `domain` and return its first IPv4 address.
///
/// Resolves to an empty string when the name only has IPv6 addresses.
pub async fn resolve_first_ipv4(domain: &str, timeout: Duration) -> Result<String, DnsError> {
    first_ipv4_with(domain, timeout, tokio::net::lookup_host((domain, 0u16))).await
}

async fn first_ipv4_with<F, I>(domain: &str, timeout: Duration, lookup: F) -> Result<String, DnsError>
where
    F: Future<Output = io::Result<I>>,
    I: Iterator<Item = SocketAddr>,
{
    let addrs = with_deadline(timeout, lookup)
        .await
        .map_err(|_| DnsError::Timeout {
            domain: domain.to_string(),
            after: timeout,
        })?
        .map_err(|source| DnsError::Lookup {
            domain: domain.to_string(),
            source,
        })?;

    Ok(addrs
        .map(|addr| addr.ip())
        .find(|ip| ip.is_ipv4())
        .map(|ip| ip.to_string())
        .unwrap_or_default())
}

/// Resolve a comma-separated domain list with the system resolver.
///
/// Every domain gets a key; failures are rendered as `ERR: <message>` and
/// never affect the other entries. An empty list yields an empty map.
pub async fn resolve_all(
    domains: &str,
    limits: &DnsLimits,
) -> Result<BTreeMap<String, String>, DnsError> {
    let timeout = limits.timeout;
    resolve_each(domains, limits, move |domain: String| async move {
        resolve_first_ipv4(&domain, timeout).await
    })
    .await
}

/// Resolve a comma-separated domain list with `resolve`.
///
/// At most `limits.max_concurrent` lookups run at once. A list naming more
/// than `limits.max_domains` distinct domains is rejected before any lookup
/// starts.
pub async fn resolve_each<F, Fut>(
    domains: &str,
    limits: &DnsLimits,
    resolve: F,
) -> Result<BTreeMap<String, String>, DnsError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<String, DnsError>>,
{
    if domains.is_empty() {
        return Ok(BTreeMap::new());
    }

    let mut unique: Vec<&str> = domains.split(',').collect();
    unique.sort_unstable();
    unique.dedup();

    if unique.len() > limits.max_domains {
        return Err(DnsError::TooManyDomains {
            count: unique.len(),
            max: limits.max_domains,
        });
    }

    let unique: Vec<String> = unique.into_iter().map(String::from).collect();
    let resolved: BTreeMap<String, String> = stream::iter(unique)
        .map(|domain| {
            let lookup = resolve(domain.clone());
            async move {
                let value = match lookup.await {
                    Ok(ip) => ip,
                    Err(e) => {
                        tracing::debug!(domain = %domain, error = %e, "DNS lookup failed");
                        format!("ERR: {e}")
                    }
                };
                (domain, value)
            }
        })
        .buffer_unordered(limits.max_concurrent.max(1))
        .collect()
        .await;

    Ok(resolved)
}
