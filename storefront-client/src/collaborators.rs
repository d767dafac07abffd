//! Side-effect sinks used by the page controllers
//!
//! Analytics delivery, toast rendering and error reporting live outside
//! this crate. The defaults here only write to the log.

use serde::Serialize;
use shared::error::AppError;

// ========== Analytics ==========

/// Events sent to the analytics collaborator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    AddToCart {
        product_name: String,
        product_price: f64,
    },
}

impl AnalyticsEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddToCart { .. } => "add_to_cart",
        }
    }
}

pub trait Analytics: Send + Sync {
    fn track(&self, event: AnalyticsEvent);
}

// ========== Notifications ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// A transient message for the shopper
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            description: Some(description.into()),
        }
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            title: title.into(),
            description: None,
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            description: None,
        }
    }

    /// "Added to Cart" toast for a product title
    pub fn added_to_cart(product_title: &str) -> Self {
        Self::success("Added to Cart", format!("{product_title} added to your cart."))
    }

    /// Warning for a rejected user action
    pub fn rejected(err: &AppError) -> Self {
        Self::warning(err.message.clone())
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

// ========== Error reporting ==========

pub trait ErrorReporter: Send + Sync {
    fn report(&self, context: &str, error: &AppError);
}

// ========== Log-only defaults ==========

/// Writes every side effect to the log and nothing else
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl Analytics for LogSink {
    fn track(&self, event: AnalyticsEvent) {
        let payload = serde_json::to_string(&event).unwrap_or_default();
        tracing::info!(event = event.name(), %payload, "Analytics event");
    }
}

impl Notifier for LogSink {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => tracing::info!(
                title = %notification.title,
                description = notification.description.as_deref().unwrap_or_default(),
                "Notification"
            ),
            NotificationLevel::Warning => tracing::warn!(title = %notification.title, "Notification"),
            NotificationLevel::Error => tracing::error!(title = %notification.title, "Notification"),
        }
    }
}

impl ErrorReporter for LogSink {
    fn report(&self, context: &str, error: &AppError) {
        tracing::error!(context, code = %error.code, "{}", error.message);
    }
}
