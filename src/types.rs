use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const ACTION_INCOMING: &str = "incoming";
pub const ACTION_OUTGOING: &str = "outgoing";
pub const ACTION_SEND_STATUS: &str = "send_status";

pub const STATUS_QUEUED: &str = "queued";
pub const STATUS_FAILED: &str = "failed";
pub const STATUS_SENT: &str = "sent";

pub const MESSAGE_TYPE_SMS: &str = "sms";
pub const MESSAGE_TYPE_MMS: &str = "mms";

/// Header carrying the base64 request signature.
pub const SIGNATURE_HEADER: &str = "X-Kalsms-Signature";

/// Failure reported by the host when it staged an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadError {
    ExceedsLimit,
    Partial,
    NoFile,
    NoTempDir,
    WriteFailed,
    Rejected,
}

impl UploadError {
    /// Maps the numeric upload codes used by hosts that report them
    /// (PHP-style: `0` success, `4` no file, ...). The bundled axum host
    /// stages files itself and only ever reports `WriteFailed`.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => None,
            1 | 2 => Some(Self::ExceedsLimit),
            3 => Some(Self::Partial),
            4 => Some(Self::NoFile),
            6 => Some(Self::NoTempDir),
            7 => Some(Self::WriteFailed),
            _ => Some(Self::Rejected),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub temp_location: PathBuf,
    pub size: u64,
    pub error: Option<UploadError>,
}

/// One inbound POST as the host saw it. Only ever read by this crate.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub secure: bool,
    pub host: String,
    pub request_uri: String,
    pub form: HashMap<String, String>,
    pub files: HashMap<String, UploadedFile>,
    pub headers: HashMap<String, String>,
}

impl Request {
    pub fn new(host: impl Into<String>, request_uri: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            request_uri: request_uri.into(),
            ..Self::default()
        }
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_form(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.insert(name.into(), value.into());
        self
    }

    pub fn with_file(mut self, name: impl Into<String>, file: UploadedFile) -> Self {
        self.files.insert(name.into(), file);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// The URL as the phone composed it when signing.
    pub fn full_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}{}", scheme, self.host, self.request_uri)
    }

    pub fn form_value(&self, name: &str) -> Option<&str> {
        self.form.get(name).map(|v| v.as_str())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A message the backend wants the phone to send. `id` is assigned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub id: String,
    pub to: String,
    pub message: String,
}

impl OutgoingMessage {
    pub fn new(id: impl Into<String>, to: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            to: to.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Sms,
    Mms,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sms => MESSAGE_TYPE_SMS,
            Self::Mms => MESSAGE_TYPE_MMS,
        }
    }
}

impl FromStr for MessageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            MESSAGE_TYPE_SMS => Ok(Self::Sms),
            MESSAGE_TYPE_MMS => Ok(Self::Mms),
            other => Err(format!("unknown message type: {}", other)),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendStatusKind {
    Queued,
    Failed,
    Sent,
}

impl SendStatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => STATUS_QUEUED,
            Self::Failed => STATUS_FAILED,
            Self::Sent => STATUS_SENT,
        }
    }
}

impl FromStr for SendStatusKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_QUEUED => Ok(Self::Queued),
            STATUS_FAILED => Ok(Self::Failed),
            STATUS_SENT => Ok(Self::Sent),
            other => Err(format!("unknown send status: {}", other)),
        }
    }
}

impl fmt::Display for SendStatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
