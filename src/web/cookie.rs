//! Anti-forgery token lookup in `document.cookie`.

use wasm_bindgen::JsCast;

/// Raw (still URI-encoded) value of cookie `name` in a `document.cookie`
/// string such as `"a=1; csrftoken=abc"`.
pub fn cookie_value<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

/// Decoded value of cookie `name` for the current document.
pub fn read_cookie(name: &str) -> Option<String> {
    let document = web_sys::window()?
        .document()?
        .dyn_into::<web_sys::HtmlDocument>()
        .ok()?;
    let cookies = document.cookie().ok()?;
    let raw = cookie_value(&cookies, name)?;
    js_sys::decode_uri_component(raw).ok().map(String::from)
}
