//! Diesel row types and their conversions to and from domain structs.

pub mod beat_plan;
pub mod collection;
pub mod customer;
pub mod location;
pub mod order;
pub mod price_list;
pub mod product;
pub mod route;
pub mod telecalling;
pub mod user;
