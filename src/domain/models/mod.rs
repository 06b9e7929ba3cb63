pub mod auth;
pub mod booking;
pub mod customer;
pub mod hotel;
pub mod report;
pub mod room;
pub mod user;
