pub mod configuration;
pub mod domain;
pub mod github_client;
pub mod routes;
pub mod startup;
pub mod telemetry;
