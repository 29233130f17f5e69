//! Outbound messages to the embedding shell
//!
//! The host may or may not expose a channel; that is checked on every send.
//! Delivery is fire-and-forget: no acknowledgement, no retry.

use crate::error::HostError;
use crate::report::ScoreReport;

/// Channel to the host shell
pub trait MessageSink {
    /// Whether the host channel exists right now
    fn is_available(&self) -> bool;
    fn post_message(&self, message: &str) -> Result<(), HostError>;
}

/// What happened to a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// No host channel; the report was dropped
    NoHost,
}

/// Encode and post a report if a host is listening
pub fn send_report(
    sink: Option<&dyn MessageSink>,
    report: &ScoreReport,
) -> Result<Delivery, HostError> {
    let Some(sink) = sink.filter(|s| s.is_available()) else {
        return Ok(Delivery::NoHost);
    };
    let json = report.to_json()?;
    sink.post_message(&json)?;
    Ok(Delivery::Sent)
}

/// Writes every message to the log (native demo runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl MessageSink for LogSink {
    fn is_available(&self) -> bool {
        true
    }

    fn post_message(&self, message: &str) -> Result<(), HostError> {
        log::info!("host <- {}", message);
        Ok(())
    }
}

/// React Native WebView bridge (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct WebViewSink;

#[cfg(target_arch = "wasm32")]
impl WebViewSink {
    const CHANNEL: &'static str = "ReactNativeWebView";

    /// Look up `window.ReactNativeWebView.postMessage`
    fn channel() -> Option<(wasm_bindgen::JsValue, js_sys::Function)> {
        use wasm_bindgen::{JsCast, JsValue};

        let window = web_sys::window()?;
        let channel = js_sys::Reflect::get(&window, &JsValue::from_str(Self::CHANNEL)).ok()?;
        if channel.is_undefined() || channel.is_null() {
            return None;
        }
        let post = js_sys::Reflect::get(&channel, &JsValue::from_str("postMessage")).ok()?;
        let post = post.dyn_into::<js_sys::Function>().ok()?;
        Some((channel, post))
    }
}

#[cfg(target_arch = "wasm32")]
impl MessageSink for WebViewSink {
    fn is_available(&self) -> bool {
        Self::channel().is_some()
    }

    fn post_message(&self, message: &str) -> Result<(), HostError> {
        let (channel, post) = Self::channel()
            .ok_or_else(|| HostError::PostFailed("host channel went away".to_string()))?;
        post.call1(&channel, &wasm_bindgen::JsValue::from_str(message))
            .map(|_| ())
            .map_err(|e| HostError::PostFailed(format!("{:?}", e)))
    }
}
