//! Stage orchestration for the vitals pipeline: each stage is an
//! independent consume-transform-produce loop over [`vitals_bus`], wired
//! together by [`vitals_service`] (out of this crate) and stopped
//! cooperatively through [`ShutdownSignal`].

pub mod alert_builder;
pub mod normalizer_stage;
pub mod scoring_stage;

pub use normalizer_stage::NormalizerStage;
pub use scoring_stage::ScoringStage;
pub use vitals_bus::ShutdownSignal;
