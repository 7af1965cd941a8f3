//! Field sales back office: customers, products and prices, orders and
//! collections, routes and beat plans, telecalling and location tracking.

pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;
