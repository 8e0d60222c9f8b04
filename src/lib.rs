//! # paramform - Schema-driven parameter forms
//!
//! Builds editable form widgets from a declarative parameter schema and a
//! previously stored value tree, with collision-free field names for
//! arbitrarily nested parameters.
//!
//! ## Features
//!
//! - **Widget kinds**: string, int, float, boolean, choice, collection, array, testcase
//! - **Dynamic arrays**: add/remove/reset elements without ever reusing an index
//! - **Submission decoding**: rebuild a value tree from submitted field names
//! - **HTTP surface**: render forms and apply widget events over axum
//!
//! ## Quick Start
//!
//! ```rust
//! use paramform::domain::ParamInfo;
//! use paramform::widgets::{FormContext, FormSession};
//! use serde_json::json;
//!
//! let schema = ParamInfo::array("Testcases", "tc", ParamInfo::string("Value", "v"));
//! let mut session =
//!     FormSession::new(FormContext::default(), &schema, "p_", Some(&json!(["a", "b"]))).unwrap();
//!
//! session.remove_element("p_tc", 0).unwrap();
//! session.add_element("p_tc").unwrap();
//! let html = session.render().to_html();
//! assert!(html.contains("name=\"p_tc_2_v\""));
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: parameter schema and stored-value helpers
//! - **Widgets**: registry, widget kinds, naming scheme and form sessions
//! - **Adapters**: HTTP handlers, page template, submission decoding
//! - **Config**: configuration management

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod widgets;

use crate::adapters::form_handler::{self, FormState};
use crate::adapters::health_handler::HealthHandler;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Creates the Axum application router with all endpoints configured.
///
/// # Arguments
///
/// * `state` - Shared form state (settings, registry, live sessions, page renderer)
pub fn create_app(state: FormState) -> Router {
    let health_handler = Arc::new(HealthHandler::new(
        state.settings.clone(),
        state.store.clone(),
    ));

    let public_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/ready", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.ready().await }
            }
        }));

    let form_router = Router::new()
        .route("/api/forms", get(form_handler::list_forms))
        .route(
            "/forms/:name",
            get(form_handler::show_form).post(form_handler::submit_form),
        )
        .route(
            "/forms/:name/sessions/:session/events",
            axum::routing::post(form_handler::form_event),
        )
        .with_state(state);

    public_router.merge(form_router).layer(
        tower_http::cors::CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    )
}
