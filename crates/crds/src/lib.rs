//! ModelDeployment CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for the ML model deployment operator.

pub mod model_deployment;

pub use model_deployment::*;
