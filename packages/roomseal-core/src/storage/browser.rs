//! Browser `sessionStorage` backend (wasm32 only).

use send_wrapper::SendWrapper;
use wasm_bindgen::JsValue;

use super::SessionStore;
use crate::error::{Error, Result};

fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

/// Session store backed by `window.sessionStorage`
///
/// Cleared by the browser when the tab's session ends.
pub struct BrowserSessionStore {
    storage: SendWrapper<web_sys::Storage>,
}

impl BrowserSessionStore {
    /// Open the current window's session storage
    pub fn new() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| Error::StorageReadError("No window available".into()))?;
        let storage = window
            .session_storage()
            .map_err(|e| Error::StorageReadError(js_error(e)))?
            .ok_or_else(|| Error::StorageReadError("sessionStorage unavailable".into()))?;

        Ok(Self {
            storage: SendWrapper::new(storage),
        })
    }
}

impl SessionStore for BrowserSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| Error::StorageReadError(js_error(e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| Error::StorageWriteError(js_error(e)))
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let existed = self.get(key)?.is_some();
        self.storage
            .remove_item(key)
            .map_err(|e| Error::StorageWriteError(js_error(e)))?;
        Ok(existed)
    }

    fn clear(&self) -> Result<()> {
        self.storage
            .clear()
            .map_err(|e| Error::StorageWriteError(js_error(e)))
    }
}
