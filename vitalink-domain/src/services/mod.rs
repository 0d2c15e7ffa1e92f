// Domain services
// This module contains business logic implementations.

pub mod accounts;
pub mod alerts;
pub mod connections;
pub mod estimator;
pub mod vitals;

// Re-export service traits for easier imports
pub use accounts::{AccountService, AccountServiceError, AccountServiceTrait};
pub use connections::{ConnectionService, ConnectionServiceError, ConnectionServiceTrait};
pub use estimator::{BpEstimate, BpEstimator, EstimatorInput, LinearModelEstimator, RandomEstimator};
pub use vitals::{VitalsService, VitalsServiceError, VitalsServiceTrait};
