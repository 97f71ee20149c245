//! EV Fleet Management API
//!
//! Fachada HTTP sobre un proveedor de identidad externo y un store
//! relacional: flotas, vehículos y sesiones de carga con paginación.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod gateway;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
