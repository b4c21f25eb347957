//! Request handlers.
//!
//! GET  /api/search          — company search (auth + rate limit)
//! POST /api/token           — service token issuance
//! GET  /api/bundesland      — state name/code lookup
//! GET  /api/bundesland/list — all states in declared order
//! GET  /api/health          — liveness + effective config
//! GET  /api/docs            — static API documentation

pub mod meta;
pub mod search;
pub mod states;
pub mod token;
