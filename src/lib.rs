// Biblioteca raíz del crate `horarios`.
// Modelo de datos, editor de grilla, vistas y adaptador de la planilla remota;
// `server` los expone como API HTTP.
pub mod algorithm;
pub mod api_json;
pub mod auth;
pub mod config;
pub mod editor;
pub mod error;
pub mod excel;
pub mod gateway;
pub mod gestion;
pub mod models;
pub mod server;
pub mod server_handlers;
pub mod store;
pub mod vistas;

pub use error::HorarioError;
/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
