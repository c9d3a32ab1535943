//! HTTP request handlers, grouped by resource.

pub mod admin;
pub mod auth;
pub mod deliveries;
pub mod equipment;
pub mod notifications;
pub mod professionals;
pub mod projects;
pub mod public;
pub mod quotations;
pub mod team;
