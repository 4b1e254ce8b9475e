//! Browser adapters for the engine's collaborators.
//!
//! Everything here calls into the DOM through web-sys, so it only does real
//! work inside a page. Pure helpers (cookie parsing) are unit tested natively.

pub mod clock;
pub mod cookie;
pub mod logger;
pub mod transport;

use crate::config::EngineConfig;

/// Id of the optional `<script type="application/json">` element holding
/// an [`EngineConfig`] override.
pub const CONFIG_ELEMENT_ID: &str = "clicker-config";

/// Read the page's embedded config, falling back to defaults.
pub fn load_config() -> EngineConfig {
    let text = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|e| e.text_content());
    let Some(text) = text else {
        return EngineConfig::default();
    };
    match EngineConfig::from_json(&text) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("ignoring #{}: {}", CONFIG_ELEMENT_ID, e);
            EngineConfig::default()
        }
    }
}
