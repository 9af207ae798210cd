//! Generated gRPC types and service traits, built from `proto/scorer.proto`
//! by `build.rs` via `tonic-build`.

tonic::include_proto!("vitals.scorer.v1");
