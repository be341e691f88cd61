pub mod authentication;
pub mod configuration;
pub mod domain;
pub mod id_generator;
pub mod repository;
pub mod routes;
pub mod services;
pub mod startup;
pub mod telemetry;
pub mod utils;
