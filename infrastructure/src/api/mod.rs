//! HTTP adapter for the widget configuration service
//!
//! Implements [`WidgetConfigGateway`](widgetdesk_application::WidgetConfigGateway)
//! over a JSON REST API:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | get | `GET {base}/widget-configs/{id}` |
//! | create | `POST {base}/widget-configs` |
//! | update | `PUT {base}/widget-configs/{id}` |
//! | duplicate | `POST {base}/widget-configs/{id}/duplicate` |
//! | validate | `POST {base}/widget-configs/validate` |
//! | test | `POST {base}/widget-configs/test` |
//!
//! Rejections carry `{"message": ..., "errors": {field: [messages]}}`.

pub mod error;
pub mod gateway;
pub mod protocol;
