//! Engine configuration.
//!
//! Every field has a default, so a page can embed a partial JSON object (or
//! nothing at all) and still get a working client.

use serde::Deserialize;

/// Tick period of the resource display.
pub const DEFAULT_TICK_PERIOD_MS: u32 = 100;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Endpoint answering the initial GET with a full state.
    pub bootstrap_url: String,
    /// Endpoint accepting purchase POSTs.
    pub purchase_url: String,
    pub tick_period_ms: u32,
    /// Cookie holding the anti-forgery token.
    pub csrf_cookie: String,
    /// Header the token is sent in.
    pub csrf_header: String,
    pub amount_decimals: usize,
    pub cost_decimals: usize,
    pub income_decimals: usize,
    /// Drop responses to requests older than the installed snapshot's origin.
    pub discard_stale_responses: bool,
    /// How long a sync failure notice stays on screen.
    pub notice_seconds: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bootstrap_url: "/".into(),
            purchase_url: "/".into(),
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            csrf_cookie: "csrftoken".into(),
            csrf_header: "X-CSRFToken".into(),
            amount_decimals: 2,
            cost_decimals: 2,
            income_decimals: 3,
            discard_stale_responses: true,
            notice_seconds: 4.0,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(json)?;
        // A zero period would tick on every frame; treat it as unset.
        if config.tick_period_ms == 0 {
            config.tick_period_ms = DEFAULT_TICK_PERIOD_MS;
        }
        Ok(config)
    }
}
