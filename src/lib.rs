pub mod botcheck;
pub mod config;
pub mod error;
pub mod observability;
pub mod pipeline;
pub mod routes;

pub use routes::AppState;

/// Create the app router from an assembled state.
///
/// The binary wires real adapters in from configuration; integration tests
/// hand in in-memory stores and mock mailers and drive the router directly.
pub fn create_app(state: AppState) -> axum::Router {
    routes::router(state)
}
