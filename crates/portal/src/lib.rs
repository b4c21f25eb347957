//! Company search against the German company-register portal.
//!
//! The portal is a browser-oriented web application with no API, so a search
//! is a scripted form conversation: open the start page, reveal the advanced
//! search form, fill it in, submit, and scrape the result table. This crate
//! holds that whole pipeline — [`PortalSession`] speaks the form protocol,
//! [`DocumentCache`] keeps one raw result document per keyword string,
//! [`extract_companies`] turns result markup into [`Company`] records, and
//! [`Searcher`] ties the three together.

pub mod cache;
pub mod error;
pub mod extract;
pub mod form;
pub mod model;
pub mod search;
pub mod session;

pub use cache::DocumentCache;
pub use error::PortalError;
pub use extract::extract_companies;
pub use model::{Company, MatchMode, SearchQuery};
pub use search::Searcher;
pub use session::PortalSession;
