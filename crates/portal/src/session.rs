//! The scripted form conversation with the register portal.
//!
//! A search is three exchanges, and every one must go through the same
//! cookie-carrying client or the portal forgets who we are:
//!
//! 1. `GET` the start page (establishes the server-side session).
//! 2. Submit the navigation form with two injected hidden fields that
//!    simulate clicking the "advanced search" link. The response body is
//!    uninteresting except that it contains the advanced search form.
//! 3. Fill the search form (keywords, match mode, per-state checkboxes)
//!    and submit it. The response body is the raw result document.

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use hreg_config::PortalConfig;
use hreg_states::StateCode;

use crate::error::PortalError;
use crate::form::HtmlForm;
use crate::model::SearchQuery;

/// Browser-like identity; the portal serves reduced markup to obvious bots.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.5 Safari/605.1.15";

/// Names the portal's JSF pages use for the two forms we drive.
const NAVI_FORM: &str = "naviForm";
const SEARCH_FORM: &str = "form";

const KEYWORDS_CONTROL: &str = "form:schlagwoerter";
const MATCH_MODE_CONTROL: &str = "form:schlagwortOptionen";

/// A fetched page: final URL after redirects plus decoded body.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: Url,
    pub html: String,
}

/// Raw outcome of a submitted search.
#[derive(Debug, Clone)]
pub struct PortalResponse {
    /// Raw result document, ready for caching and extraction.
    pub html: String,
    /// States whose filter checkbox was absent from the live form. These
    /// filters were silently not applied; the search itself still ran.
    pub skipped_states: Vec<StateCode>,
}

#[derive(Debug)]
pub struct PortalSession {
    client: reqwest::Client,
    base_url: Url,
    debug: bool,
}

impl PortalSession {
    /// Builds a fresh session (new cookie jar) against the configured portal.
    pub fn new(config: &PortalConfig, debug: bool) -> Result<Self, PortalError> {
        let base_url = Url::parse(&config.base_url).map_err(|_| PortalError::InvalidUrl {
            url: config.base_url.clone(),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-GB,en;q=0.9"));

        let client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .cookie_store(true)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            base_url,
            debug,
        })
    }

    /// Fetches the portal start page. Any failure here — unreachable host,
    /// timeout, non-success status — is fatal for the whole search.
    pub async fn open(&self) -> Result<Page, PortalError> {
        let response = self
            .client
            .get(self.base_url.clone())
            .send()
            .await
            .map_err(PortalError::Connect)?;
        let status = response.status();
        if !status.is_success() {
            return Err(PortalError::Http { status });
        }
        let url = response.url().clone();
        let html = response.text().await.map_err(PortalError::Connect)?;
        debug!(url = %url, "portal start page loaded");
        Ok(Page { url, html })
    }

    /// Runs the full three-exchange protocol and returns the raw result
    /// document. The session does not cache; that is the caller's job.
    pub async fn submit_search(&self, query: &SearchQuery) -> Result<PortalResponse, PortalError> {
        let start = self.open().await?;

        // Reveal the advanced search form. The two hidden fields reproduce
        // what the portal's own JavaScript submits when the link is clicked.
        let mut navi =
            HtmlForm::parse(&start.html, NAVI_FORM, &start.url).ok_or(PortalError::FormMissing {
                form: NAVI_FORM.to_string(),
            })?;
        navi.add_hidden(
            "naviForm:erweiterteSucheLink",
            "naviForm:erweiterteSucheLink",
        );
        navi.add_hidden("target", "erweiterteSucheLink");
        let advanced = self.submit(navi).await?;
        if self.debug {
            debug!(title = %page_title(&advanced.html), "advanced search page");
        }

        let mut form = HtmlForm::parse(&advanced.html, SEARCH_FORM, &advanced.url).ok_or(
            PortalError::FormMissing {
                form: SEARCH_FORM.to_string(),
            },
        )?;

        // Keyword field and match-mode control are load-bearing: if either
        // is gone the form contract changed and the search must fail loudly.
        form.set(KEYWORDS_CONTROL, &query.keywords)?;
        form.set(MATCH_MODE_CONTROL, query.mode.portal_code())?;

        // Per-state checkboxes are optional: a renamed or missing one skips
        // that single filter, never the request.
        let mut skipped_states = Vec::new();
        for &state in &query.states {
            let control = format!("form:{}", state.form_field());
            match form.check(&control) {
                Ok(()) => {}
                Err(PortalError::ControlMissing { .. }) => {
                    if self.debug {
                        warn!(state = state.as_str(), control, "could not set state filter");
                    }
                    skipped_states.push(state);
                }
                Err(other) => return Err(other),
            }
        }

        let result = self.submit(form).await?;
        if self.debug {
            debug!(title = %page_title(&result.html), "result page");
        }

        Ok(PortalResponse {
            html: result.html,
            skipped_states,
        })
    }

    async fn submit(&self, form: HtmlForm) -> Result<Page, PortalError> {
        let (action, method, fields) = form.into_parts();
        let request = if method == "get" {
            self.client.get(action).query(&fields)
        } else {
            self.client.post(action).form(&fields)
        };
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PortalError::Http { status });
        }
        let url = response.url().clone();
        let html = response.text().await?;
        Ok(Page { url, html })
    }
}

/// `<title>` text of a page, for protocol debug logging.
fn page_title(html: &str) -> String {
    let document = Html::parse_document(html);
    let title_sel = Selector::parse("title").unwrap();
    document
        .select(&title_sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}
