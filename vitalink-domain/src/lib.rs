// VitaLink Domain
// This crate contains the business logic for the VitaLink backend

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Re-export the database module from vitalink-data for convenience
pub use vitalink_data::database;
