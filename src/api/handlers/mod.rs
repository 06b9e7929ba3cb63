pub mod auth;
pub mod booking;
pub mod branch;
pub mod customer;
pub mod health;
pub mod hotel;
pub mod refund;
pub mod report;
pub mod room;
pub mod room_type;
pub mod scope;
pub mod user;
