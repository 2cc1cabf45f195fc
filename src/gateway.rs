use crate::action::{dispatch, Action};
use crate::error::Result;
use crate::signature;
use crate::types::{Request, SIGNATURE_HEADER};
use std::sync::OnceLock;
use tracing::warn;

/// Entry point for one inbound request. Build one per request; the
/// dispatched action is cached for the lifetime of this value.
#[derive(Debug)]
pub struct Gateway {
    request: Request,
    version: Option<String>,
    action: OnceLock<Action>,
}

impl Gateway {
    pub fn from_request(request: Request) -> Self {
        // Reserved: lets future protocol versions pick different behaviour.
        let version = request.form_value("version").map(|v| v.to_string());
        Self {
            request,
            version,
            action: OnceLock::new(),
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Gives the request back, discarding any cached action.
    pub fn into_request(self) -> Request {
        self.request
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The phone number of the device making the request.
    pub fn phone_number(&self) -> Option<&str> {
        self.request.form_value("phone_number")
    }

    /// Dispatches on first call and returns the same action afterwards.
    pub fn action(&self) -> Result<&Action> {
        if let Some(action) = self.action.get() {
            return Ok(action);
        }
        let action = dispatch(&self.request)?;
        Ok(self.action.get_or_init(|| action))
    }

    pub fn is_authenticated(&self, secret: &str) -> bool {
        let presented = self.request.header(SIGNATURE_HEADER);
        let url = self.request.full_url();
        let ok = signature::verify(&url, &self.request.form, secret, presented);
        if !ok {
            warn!(
                url = %url,
                phone_number = ?self.phone_number(),
                signed = presented.is_some(),
                "request signature rejected"
            );
        }
        ok
    }
}
