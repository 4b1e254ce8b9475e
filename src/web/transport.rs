//! `window.fetch` transport.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{RequestCredentials, RequestInit};

use crate::config::EngineConfig;
use crate::error::TransportError;
use crate::sync::{Completion, Request, Response, Transport};

use super::cookie::read_cookie;

/// What a browser form submit sends; the purchase endpoint reads form fields.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

pub struct FetchTransport {
    bootstrap_url: String,
    purchase_url: String,
    csrf_cookie: String,
    csrf_header: String,
}

/// A request reduced to what `fetch` needs.
#[derive(Debug, PartialEq)]
struct Prepared {
    method: &'static str,
    url: String,
    /// Body and its content type.
    body: Option<(String, &'static str)>,
    csrf: Option<(String, String)>,
}

impl FetchTransport {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            bootstrap_url: config.bootstrap_url.clone(),
            purchase_url: config.purchase_url.clone(),
            csrf_cookie: config.csrf_cookie.clone(),
            csrf_header: config.csrf_header.clone(),
        }
    }

    /// `csrf_token` is the current value of the anti-forgery cookie, if any.
    fn prepare(
        &self,
        request: &Request,
        csrf_token: Option<String>,
    ) -> Result<Prepared, TransportError> {
        match request {
            Request::Bootstrap => Ok(Prepared {
                method: "GET",
                url: self.bootstrap_url.clone(),
                body: None,
                csrf: None,
            }),
            Request::Purchase(purchase) => {
                let body = serde_urlencoded::to_string(purchase)
                    .map_err(|e| TransportError::new(format!("encode purchase: {}", e)))?;
                if csrf_token.is_none() {
                    log::warn!(
                        "no `{}` cookie, posting without anti-forgery token",
                        self.csrf_cookie
                    );
                }
                Ok(Prepared {
                    method: "POST",
                    url: self.purchase_url.clone(),
                    body: Some((body, FORM_CONTENT_TYPE)),
                    csrf: csrf_token.map(|v| (self.csrf_header.clone(), v)),
                })
            }
        }
    }
}

impl Transport for FetchTransport {
    fn send(&self, request: Request, done: Completion) {
        let token = match request {
            Request::Purchase(_) => read_cookie(&self.csrf_cookie),
            Request::Bootstrap => None,
        };
        let prepared = self.prepare(&request, token);
        // Completion always runs on a later turn of the event loop.
        wasm_bindgen_futures::spawn_local(async move {
            let result = match prepared {
                Ok(p) => fetch(p).await,
                Err(e) => Err(e),
            };
            done(result);
        });
    }
}

async fn fetch(p: Prepared) -> Result<Response, TransportError> {
    let window = web_sys::window().ok_or_else(|| TransportError::new("no window"))?;

    let init = RequestInit::new();
    init.set_method(p.method);
    init.set_credentials(RequestCredentials::SameOrigin);
    if let Some((body, _)) = &p.body {
        init.set_body(&JsValue::from_str(body));
    }

    let request = web_sys::Request::new_with_str_and_init(&p.url, &init).map_err(js_error)?;
    let headers = request.headers();
    headers.set("Accept", "application/json").map_err(js_error)?;
    if let Some((_, content_type)) = &p.body {
        headers.set("Content-Type", content_type).map_err(js_error)?;
    }
    if let Some((name, value)) = &p.csrf {
        headers.set(name, value).map_err(js_error)?;
    }

    let value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let response: web_sys::Response = value.dyn_into().map_err(js_error)?;
    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;

    Ok(Response {
        status: response.status(),
        body: text.as_string().unwrap_or_default(),
    })
}

fn js_error(value: JsValue) -> TransportError {
    TransportError::new(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}
