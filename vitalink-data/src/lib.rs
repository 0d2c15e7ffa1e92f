// VitaLink Data
// This crate handles database access for the VitaLink backend

// Database connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
