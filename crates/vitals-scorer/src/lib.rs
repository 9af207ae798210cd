//! Anomaly scoring: pure z-score/cold-start math in [`scoring`], plus the
//! `ScorerService` gRPC server and [`client::ScorerClient`] around it.

pub mod client;
pub mod proto;
pub mod scoring;
pub mod service;

pub use client::ScorerClient;
pub use service::ScorerServiceImpl;
