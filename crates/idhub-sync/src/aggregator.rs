//! Globally-ordered, globally-paginated change-request listing sourced live
//! from every registered brand node.
//!
//! Each node paginates independently, so a correct global page N requires
//! re-deriving the whole merged order: every query fully drains each node's
//! result set, merges, sorts, and re-paginates at the caller's offset. A
//! short-TTL cache keyed by the filter set amortizes repeated page requests
//! and is invalidated on every write.

use crate::gateway::NodeGateway;
use crate::Result as SyncResult;

use idhub_client::RemoteChangeRequest;
use idhub_config::AggregatorConfig;
use idhub_core::SiteRegistration;
use idhub_db::SiteRegistrationRepository;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use futures::future::join_all;
use log::{debug, warn};
use serde::Serialize;

#[derive(Debug, Clone, Default)]
pub struct AggregatorQuery {
    /// Restrict the main query to one site (name or URL); the pending badge
    /// always spans all nodes.
    pub site: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    /// Global offset into the merged order.
    pub cursor: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeError {
    pub site_url: String,
    pub message: String,
}

/// One merged page plus the metadata the listing UI needs.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedPage {
    pub profile_requests: Vec<RemoteChangeRequest>,
    pub total_count: i64,
    pub has_more: bool,
    pub next_cursor: Option<i64>,
    pub total_pages: i64,
    pub current_page: i64,
    /// Pending requests across all nodes, independent of the filters.
    pub pending_count: i64,
    /// Per-site contribution to the current page.
    pub node_page_counts: BTreeMap<String, i64>,
    /// Per-site total matching the filters.
    pub node_totals: BTreeMap<String, i64>,
    /// Every registered site name, for filter UIs.
    pub sites: Vec<String>,
    pub errors: Vec<NodeError>,
}

type CacheKey = (Option<String>, Option<String>, Option<String>);

struct CacheEntry {
    merged: Vec<RemoteChangeRequest>,
    pending_count: i64,
    node_totals: BTreeMap<String, i64>,
    sites: Vec<String>,
    errors: Vec<NodeError>,
    stored_at: Instant,
}

#[derive(Default)]
struct Accumulator {
    items: Vec<RemoteChangeRequest>,
    node_totals: BTreeMap<String, i64>,
    errors: Vec<NodeError>,
}

pub struct RequestAggregator {
    gateway: Arc<dyn NodeGateway>,
    registry: SiteRegistrationRepository,
    config: AggregatorConfig,
    cache: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl RequestAggregator {
    pub fn new(
        gateway: Arc<dyn NodeGateway>,
        registry: SiteRegistrationRepository,
        config: AggregatorConfig,
    ) -> Self {
        Self {
            gateway,
            registry,
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Drop every cached merge. Called on any write that can change the
    /// global listing (new request, approve, reject).
    pub fn invalidate(&self) {
        self.cache.lock().unwrap().clear();
    }

    pub async fn query(&self, query: &AggregatorQuery) -> SyncResult<AggregatedPage> {
        let key: CacheKey = (
            query.site.clone(),
            query.status.clone(),
            query.search.clone(),
        );

        let ttl = Duration::from_secs(self.config.cache_ttl_secs);
        {
            let cache = self.cache.lock().unwrap();
            if let Some(entry) = cache.get(&key)
                && entry.stored_at.elapsed() < ttl
            {
                debug!("Aggregator cache hit for {:?}", key);
                return Ok(self.paginate(entry, query.cursor));
            }
        }

        let registrations = dedupe_by_url(self.registry.list().await?);
        let sites: Vec<String> = registrations.iter().map(|r| r.name.clone()).collect();

        let pending_count = self.global_pending_count(&registrations).await;

        let targets: Vec<&SiteRegistration> = registrations
            .iter()
            .filter(|r| match &query.site {
                Some(site) => r.name.eq_ignore_ascii_case(site) || r.url == site.trim_end_matches('/'),
                None => true,
            })
            .collect();

        let acc = Arc::new(Mutex::new(Accumulator::default()));
        let per_node = Duration::from_secs(self.config.per_node_timeout_secs);
        let overall = Duration::from_secs(self.config.overall_timeout_secs);

        let drains = targets.iter().map(|site| {
            let acc = Arc::clone(&acc);
            async move {
                let drained =
                    tokio::time::timeout(per_node, self.drain_node(site, query, &acc)).await;
                if drained.is_err() {
                    acc.lock().unwrap().errors.push(NodeError {
                        site_url: site.url.clone(),
                        message: format!("node timed out after {}s", per_node.as_secs()),
                    });
                }
            }
        });

        if tokio::time::timeout(overall, join_all(drains)).await.is_err() {
            acc.lock().unwrap().errors.push(NodeError {
                site_url: String::new(),
                message: format!(
                    "overall aggregation budget of {}s exceeded, results are partial",
                    overall.as_secs()
                ),
            });
        }

        let Accumulator {
            mut items,
            node_totals,
            errors,
        } = std::mem::take(&mut *acc.lock().unwrap());

        // A node that failed before tagging contributes nothing orderable.
        items.retain(|item| !item.site_name.is_empty());

        // Stable sort: ties keep per-node arrival order, deterministic
        // within one merge.
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let entry = CacheEntry {
            merged: items,
            pending_count,
            node_totals,
            sites,
            errors,
            stored_at: Instant::now(),
        };
        let page = self.paginate(&entry, query.cursor);
        self.cache.lock().unwrap().insert(key, entry);

        Ok(page)
    }

    /// One bounded pending-only probe per node, filters ignored. Nodes that
    /// fail simply contribute nothing; the main drain reports their errors.
    async fn global_pending_count(&self, registrations: &[SiteRegistration]) -> i64 {
        let per_node = Duration::from_secs(self.config.per_node_timeout_secs);
        let probes = registrations.iter().map(|site| async move {
            match tokio::time::timeout(
                per_node,
                self.gateway.fetch_requests(site, Some("pending"), None, None),
            )
            .await
            {
                Ok(Ok(page)) => page.pending_count.max(page.total_count),
                _ => 0,
            }
        });

        join_all(probes).await.into_iter().sum()
    }

    /// Follow one node's own cursor chain to exhaustion, tagging every item
    /// with the node's display name. A failed or malformed page stops this
    /// node only; items collected before the failure are kept.
    async fn drain_node(
        &self,
        site: &SiteRegistration,
        query: &AggregatorQuery,
        acc: &Mutex<Accumulator>,
    ) {
        let mut cursor: Option<i64> = None;
        let mut pages: u32 = 0;

        loop {
            let fetched = self
                .gateway
                .fetch_requests(
                    site,
                    query.status.as_deref(),
                    query.search.as_deref(),
                    cursor,
                )
                .await;

            let page = match fetched {
                Ok(page) => page,
                Err(e) => {
                    warn!("Node {} failed during drain: {}", site.url, e);
                    acc.lock().unwrap().errors.push(NodeError {
                        site_url: site.url.clone(),
                        message: e.to_string(),
                    });
                    return;
                }
            };

            {
                let mut acc = acc.lock().unwrap();
                for mut item in page.profile_requests {
                    item.site_name = site.name.clone();
                    item.site_url = site.url.clone();
                    acc.items.push(item);
                }
                acc.node_totals.insert(site.name.clone(), page.total_count);
            }

            pages += 1;
            if !page.has_more || page.next_cursor.is_none() {
                return;
            }
            if pages >= self.config.max_pages_per_node {
                acc.lock().unwrap().errors.push(NodeError {
                    site_url: site.url.clone(),
                    message: format!(
                        "node still reported has_more after {} pages, stopping",
                        pages
                    ),
                });
                return;
            }
            cursor = page.next_cursor;
        }
    }

    /// Slice the merged order at the caller's offset.
    fn paginate(&self, entry: &CacheEntry, cursor: i64) -> AggregatedPage {
        let page_size = self.config.page_size;
        let total_count = entry.merged.len() as i64;
        let offset = cursor.max(0);

        let slice: Vec<RemoteChangeRequest> = entry
            .merged
            .iter()
            .skip(offset as usize)
            .take(page_size as usize)
            .cloned()
            .collect();

        let mut node_page_counts: BTreeMap<String, i64> = BTreeMap::new();
        for item in &slice {
            *node_page_counts.entry(item.site_name.clone()).or_default() += 1;
        }

        let has_more = offset + (slice.len() as i64) < total_count;
        AggregatedPage {
            total_count,
            has_more,
            next_cursor: has_more.then_some(offset + page_size),
            total_pages: (total_count + page_size - 1) / page_size,
            current_page: offset / page_size + 1,
            pending_count: entry.pending_count,
            node_page_counts,
            node_totals: entry.node_totals.clone(),
            sites: entry.sites.clone(),
            errors: entry.errors.clone(),
            profile_requests: slice,
        }
    }
}

/// Registrations are unique by URL in storage, but a stale list handed in
/// from elsewhere may repeat; repeats are skipped and logged.
fn dedupe_by_url(registrations: Vec<SiteRegistration>) -> Vec<SiteRegistration> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(registrations.len());
    for registration in registrations {
        if seen.insert(registration.url.clone()) {
            out.push(registration);
        } else {
            warn!("Skipping duplicate registration for {}", registration.url);
        }
    }
    out
}
