//! HTTP API: router, handlers and request/response mapping.

pub mod app;
