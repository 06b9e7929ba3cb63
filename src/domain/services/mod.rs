pub mod auth_service;
pub mod availability;
pub mod booking_engine;
pub mod catalog;
pub mod reporting;
