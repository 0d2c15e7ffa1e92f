// Public entities for the VitaLink API
// This module contains data structures that are shared across the application boundary

// Account and profile entities
pub mod accounts;

// Monitoring connection entities
pub mod connections;

// Common entities for error handling and simple acknowledgements
pub mod common;

// Device record and vitals entities
pub mod vitals;
