//! Client library for the Vireo video-sharing service.
//!
//! A typed HTTP client for the hosted backend (accounts, documents, file
//! storage, avatars), the data-access operations built on it, and the
//! create-screen logic of the app.

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod remote;
pub mod services;
