//! The search orchestrator: cache in front, portal session behind,
//! extractor at the end.

use tracing::{debug, info};

use hreg_config::PortalConfig;

use crate::cache::DocumentCache;
use crate::error::PortalError;
use crate::extract::extract_companies;
use crate::model::{Company, SearchQuery};
use crate::session::PortalSession;

pub struct Searcher {
    config: PortalConfig,
    cache: DocumentCache,
}

impl Searcher {
    pub fn new(config: PortalConfig) -> Result<Self, PortalError> {
        let cache = DocumentCache::open(&config.cache_dir)?;
        Ok(Self { config, cache })
    }

    /// Runs one search: cache hit short-circuits the network entirely;
    /// otherwise a fresh session drives the portal protocol and the fetched
    /// document is cached (overwriting on bypass) before extraction.
    ///
    /// Zero result rows is a successful empty vector. Session failures
    /// propagate unchanged.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Company>, PortalError> {
        if !query.bypass_cache {
            if let Some(document) = self.cache.get(&query.keywords) {
                debug!(keywords = %query.keywords, "serving cached result document");
                return Ok(extract_companies(&document));
            }
        }

        let session = PortalSession::new(&self.config, query.debug)?;
        let response = session.submit_search(query).await?;
        self.cache.put(&query.keywords, &response.html)?;

        let companies = extract_companies(&response.html);
        info!(
            keywords = %query.keywords,
            results = companies.len(),
            skipped_states = response.skipped_states.len(),
            "portal search completed"
        );
        Ok(companies)
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MatchMode;
    use tempfile::TempDir;

    /// A result document with one Berlin row.
    const CACHED_DOC: &str = r#"<html><body><table role="grid"><tbody>
        <tr data-ri="0">
            <td></td>
            <td>Amtsgericht Charlottenburg (Berlin) HRB 44343</td>
            <td>Gasag AG</td>
            <td>Berlin</td>
            <td>currently registered</td>
            <td>AD</td><td></td><td></td>
        </tr>
    </tbody></table></body></html>"#;

    /// Portal URL that immediately refuses connections, proving a test
    /// never left the cache.
    fn searcher(cache_dir: &std::path::Path) -> Searcher {
        Searcher::new(PortalConfig {
            base_url: "http://192.0.2.1".to_string(),
            cache_dir: cache_dir.to_path_buf(),
            http_timeout_secs: 1,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn cache_hit_answers_without_the_network() {
        let dir = TempDir::new().unwrap();
        let searcher = searcher(dir.path());
        searcher.cache().put("Gasag AG", CACHED_DOC).unwrap();

        let query = SearchQuery::new("Gasag AG");
        let companies = searcher.search(&query).await.unwrap();
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].name, "Gasag AG");
        assert_eq!(companies[0].register_num.as_deref(), Some("HRB 44343 B"));
    }

    #[tokio::test]
    async fn extraction_from_cache_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let searcher = searcher(dir.path());
        searcher.cache().put("Gasag AG", CACHED_DOC).unwrap();

        let query = SearchQuery::new("Gasag AG");
        let first = searcher.search(&query).await.unwrap();
        let second = searcher.search(&query).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn cache_keys_are_the_raw_keyword_string() {
        let dir = TempDir::new().unwrap();
        let searcher = searcher(dir.path());
        searcher.cache().put("Gasag AG", CACHED_DOC).unwrap();

        // Different case, different key: the miss falls through to the
        // (unreachable) portal and fails.
        let query = SearchQuery::new("gasag ag");
        assert!(searcher.search(&query).await.is_err());
    }

    #[tokio::test]
    async fn bypass_ignores_an_existing_entry() {
        let dir = TempDir::new().unwrap();
        let searcher = searcher(dir.path());
        searcher.cache().put("Gasag AG", CACHED_DOC).unwrap();

        let mut query = SearchQuery::new("Gasag AG");
        query.bypass_cache = true;
        // Bypass forces a fresh fetch, which cannot reach the portal here.
        let err = searcher.search(&query).await.unwrap_err();
        assert!(matches!(err, PortalError::Connect(_)));
        // The failed refresh must not clobber the existing entry.
        assert_eq!(searcher.cache().get("Gasag AG").as_deref(), Some(CACHED_DOC));
    }

    #[tokio::test]
    async fn cached_empty_result_document_yields_empty_vec() {
        let dir = TempDir::new().unwrap();
        let searcher = searcher(dir.path());
        searcher
            .cache()
            .put("Nonexistent GmbH", "<html><body>nothing</body></html>")
            .unwrap();

        let mut query = SearchQuery::new("Nonexistent GmbH");
        query.mode = MatchMode::Exact;
        let companies = searcher.search(&query).await.unwrap();
        assert!(companies.is_empty());
    }
}
