//! HTTP API: server, routing, and the authorization pipeline.

pub mod app;
pub mod authz;
pub mod config;
pub mod denial_audit;
pub mod middleware;
