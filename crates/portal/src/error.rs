//! Portal pipeline errors.
//!
//! Transport problems and "the portal markup changed under us" problems are
//! separate variants on purpose: the first kind is transient and opaque, the
//! second means the scripted form protocol no longer matches the live portal
//! and must surface loudly rather than read as an empty result.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    /// The portal start page could not be fetched at all. Fatal for the
    /// whole search; there is no retry at this layer.
    #[error("could not reach the register portal: {0}")]
    Connect(#[source] reqwest::Error),

    /// The portal answered with a non-success status.
    #[error("register portal returned HTTP {status}")]
    Http { status: reqwest::StatusCode },

    /// A page is missing a form the protocol depends on.
    #[error("portal page has no form named {form:?} — the portal markup may have changed")]
    FormMissing { form: String },

    /// A required control (keyword field, match-mode selector) is gone from
    /// the search form. Optional per-state checkboxes never raise this.
    #[error("search form control {control:?} not found — the portal form contract may have changed")]
    ControlMissing { control: String },

    /// Any other failed exchange with the portal.
    #[error("portal exchange failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid portal URL {url:?}")]
    InvalidUrl { url: String },

    /// Result-cache I/O.
    #[error("result cache I/O failed: {0}")]
    Cache(#[from] std::io::Error),
}

impl PortalError {
    /// True when the error indicates the external form contract changed,
    /// as opposed to a transient network problem.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            PortalError::FormMissing { .. } | PortalError::ControlMissing { .. }
        )
    }
}
