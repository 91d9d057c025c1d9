//! The search engine

use std::sync::Arc;
use std::time::Instant;

use super::excerpt::ExcerptBuilder;
use super::filter::FilterList;
use super::matcher::QueryMatcher;
use super::order::OrderBy;
use super::predicate::{Clause, Predicate};
use crate::config::SearchConfig;
use crate::error::Result;
use crate::models::{
    ContentItem, ContentTier, Identity, PagedList, Permission, SearchHit, SearchRequest,
    SearchResult,
};
use crate::permissions::{resolve_domain_permission, DomainPermissionResolver};
use crate::render::{MarkdownRenderer, PlainTextRenderer};
use crate::store::{DocumentStore, StoreQuery};
use crate::util::compact_text;

const FILES_ONLY: &[ContentTier] = &[ContentTier::File];
const CATEGORIES_ONLY: &[ContentTier] = &[ContentTier::Category];
const ARTICLES_ONLY: &[ContentTier] = &[ContentTier::Article];
const ARTICLES_THEN_FALLBACK: &[ContentTier] =
    &[ContentTier::Article, ContentTier::Category, ContentTier::File];

/// Permission-aware search over a [`DocumentStore`].
///
/// Holds no per-call state, so one engine can serve concurrent searches.
pub struct SearchEngine {
    store: Arc<dyn DocumentStore>,
    renderer: Arc<dyn MarkdownRenderer>,
    domain_permissions: Option<Arc<dyn DomainPermissionResolver>>,
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            renderer: Arc::new(PlainTextRenderer::default()),
            domain_permissions: None,
            config: SearchConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn MarkdownRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    #[must_use]
    pub fn with_domain_permissions(mut self, resolver: Arc<dyn DomainPermissionResolver>) -> Self {
        self.domain_permissions = Some(resolver);
        self
    }

    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run a search as `user` (`None` for anonymous callers).
    ///
    /// Never fails: store and resolver errors are logged and produce an
    /// empty result that still echoes the request.
    pub async fn search(&self, request: &SearchRequest, user: Option<&Identity>) -> SearchResult {
        let request = request.normalized(self.config.default_page_size);
        if request.is_blank() {
            tracing::debug!("Blank search request, skipping store");
            return SearchResult::empty(&request);
        }

        let started = Instant::now();
        match self.try_search(&request, user).await {
            Ok(result) => {
                tracing::info!(
                    query = %compact_text(&request.query),
                    hits = result.hits.len(),
                    total = ?result.hits.total_count,
                    elapsed = ?started.elapsed(),
                    "Search completed"
                );
                result
            }
            Err(error) => {
                tracing::error!(
                    query = %compact_text(&request.query),
                    %error,
                    "Search failed, returning empty result"
                );
                SearchResult::empty(&request)
            }
        }
    }

    async fn try_search(
        &self,
        request: &SearchRequest,
        user: Option<&Identity>,
    ) -> Result<SearchResult> {
        if let Some(domain) = request.domain.as_deref() {
            let permission =
                resolve_domain_permission(self.domain_permissions.as_deref(), user, domain)
                    .await?;
            if !permission.contains(Permission::READ) {
                tracing::warn!(
                    domain,
                    user = user.map(|u| u.id.as_str()),
                    "Domain search denied"
                );
                return Ok(SearchResult::empty(request));
            }
        }

        let plan = SearchPlan::new(request, user, &self.config)?;

        let mut page = PagedList::empty(request.page_number, request.page_size);
        for &tier in plan.tiers {
            page = self.store.query(&plan.store_query(tier, request)).await?;
            tracing::debug!(
                "Queried {} tier: {} hits, total {:?}",
                tier,
                page.len(),
                page.total_count
            );
            if !has_no_matches(&page) {
                break;
            }
        }

        let excerpts = ExcerptBuilder::new(&self.config, self.renderer.as_ref());
        let hits = page.map(|item| self.to_hit(item, &excerpts, plan.matcher.as_ref()));
        Ok(SearchResult::with_hits(request, hits))
    }

    fn to_hit(
        &self,
        item: ContentItem,
        excerpts: &ExcerptBuilder<'_>,
        matcher: Option<&QueryMatcher>,
    ) -> SearchHit {
        let excerpt =
            (item.tier != ContentTier::File).then(|| excerpts.build(&item.markdown, matcher));
        SearchHit {
            full_title: item.full_title(&self.config.default_namespace),
            id: item.id,
            tier: item.tier,
            title: item.title,
            namespace: item.namespace,
            domain: item.domain,
            excerpt,
        }
    }
}

/// A tier produced nothing at all (not merely an empty later page)
fn has_no_matches(page: &PagedList<ContentItem>) -> bool {
    page.total_count.map_or(page.is_empty(), |total| total == 0)
}

/// Everything about a request that does not depend on the tier
struct SearchPlan {
    matcher: Option<QueryMatcher>,
    filter: Predicate,
    uploaders: FilterList,
    order: OrderBy,
    tiers: &'static [ContentTier],
}

impl SearchPlan {
    fn new(
        request: &SearchRequest,
        user: Option<&Identity>,
        config: &SearchConfig,
    ) -> Result<Self> {
        let namespaces = FilterList::namespaces(request.namespace.as_deref());
        let owners = FilterList::ids(request.owner.as_deref());
        let uploaders = FilterList::ids(request.uploader.as_deref());

        let matcher = if request.query.is_empty() {
            None
        } else {
            Some(QueryMatcher::new(&request.query)?)
        };

        let filter = Predicate::new()
            .and(Clause::NotDeleted)
            .and_maybe(matcher.clone().map(|matcher| Clause::Text {
                matcher,
                title_only: request.title_match_only,
            }))
            .and(Clause::Domain(request.domain.clone()))
            .and_filter(&namespaces, Clause::NamespaceIn, Clause::NamespaceNotIn)
            .and_filter(&owners, Clause::OwnerIn, Clause::OwnerNotIn)
            .and(Clause::VisibleTo(user.cloned()));

        let tiers = select_tiers(&namespaces, &uploaders, config);
        let order = OrderBy::new(request.sort, request.descending, matcher.clone());

        Ok(Self {
            matcher,
            filter,
            uploaders,
            order,
            tiers,
        })
    }

    fn store_query(&self, tier: ContentTier, request: &SearchRequest) -> StoreQuery {
        let mut filter = self.filter.clone();
        if tier == ContentTier::File {
            filter = filter.and_filter(&self.uploaders, Clause::UploaderIn, Clause::UploaderNotIn);
        }
        StoreQuery {
            tier,
            filter,
            order: self.order.clone(),
            page_number: request.page_number,
            page_size: request.page_size,
        }
    }
}

/// Tiers to query, in fallback order
fn select_tiers(
    namespaces: &FilterList,
    uploaders: &FilterList,
    config: &SearchConfig,
) -> &'static [ContentTier] {
    if !uploaders.is_empty() || namespaces.names_only(&config.file_namespace) {
        FILES_ONLY
    } else if namespaces.names_only(&config.category_namespace) {
        CATEGORIES_ONLY
    } else if namespaces.is_empty() {
        ARTICLES_THEN_FALLBACK
    } else {
        ARTICLES_ONLY
    }
}
