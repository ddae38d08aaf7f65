//! Backend integration for the RAG widget.
//!
//! Provides [`WidgetApiClient`], the reqwest implementation of
//! [`ragwidget_core::backend::WidgetBackend`].

mod upload;
pub mod widget_api_client;

pub use widget_api_client::{DEFAULT_REQUEST_TIMEOUT, WidgetApiClient};
