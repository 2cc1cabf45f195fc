use crate::error::{GatewayError, Result};
use crate::types::{
    MessageType, OutgoingMessage, Request, SendStatusKind, UploadError, ACTION_INCOMING,
    ACTION_OUTGOING, ACTION_SEND_STATUS,
};
use crate::xml::render_messages;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, warn};

/// What the phone asked for in one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    Unknown,
    Incoming(Incoming),
    Outgoing(Outgoing),
    SendStatus(SendStatus),
}

impl Action {
    /// Wire identifier of the action; `None` for [`Action::Unknown`].
    pub fn kind(&self) -> Option<&'static str> {
        match self {
            Action::Unknown => None,
            Action::Incoming(_) => Some(ACTION_INCOMING),
            Action::Outgoing(_) => Some(ACTION_OUTGOING),
            Action::SendStatus(_) => Some(ACTION_SEND_STATUS),
        }
    }

    /// Reply body for actions that answer with messages.
    pub fn render_response(&self, messages: &[OutgoingMessage]) -> Option<String> {
        match self {
            Action::Incoming(incoming) => Some(incoming.render_response(messages)),
            Action::Outgoing(outgoing) => Some(outgoing.render_response(messages)),
            Action::SendStatus(_) | Action::Unknown => None,
        }
    }
}

/// An SMS or MMS the phone received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Incoming {
    pub from: String,
    /// SMS body, or the text/plain part of an MMS.
    pub message: String,
    pub message_type: MessageType,
    /// Empty unless `message_type` is MMS.
    pub mms_parts: Vec<MmsPart>,
}

impl Incoming {
    /// Replies to send back to the sender; no `to` attribute.
    pub fn render_response(&self, messages: &[OutgoingMessage]) -> String {
        render_messages(messages, false)
    }
}

/// The phone polling for messages to send.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outgoing;

impl Outgoing {
    pub fn render_response(&self, messages: &[OutgoingMessage]) -> String {
        render_messages(messages, true)
    }
}

/// Delivery report for a message previously handed out by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendStatus {
    pub status: Option<SendStatusKind>,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MmsPart {
    pub form_name: String,
    pub cid: String,
    pub content_type: String,
    pub filename: String,
    pub temp_location: Option<PathBuf>,
    pub size: u64,
    pub upload_error: Option<UploadError>,
}

impl MmsPart {
    fn from_descriptor(index: usize, descriptor: &Value, request: &Request) -> Result<Self> {
        let field = |name: &'static str| -> Result<String> {
            descriptor
                .get(name)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .ok_or(GatewayError::InvalidMmsDescriptor { index, field: name })
        };

        if !descriptor.is_object() {
            return Err(GatewayError::InvalidMmsDescriptor {
                index,
                field: "descriptor",
            });
        }

        let form_name = field("name")?;
        let cid = field("cid")?;
        let content_type = field("type")?;
        let filename = field("filename")?;

        let (temp_location, size, upload_error) = match request.files.get(&form_name) {
            Some(file) => (Some(file.temp_location.clone()), file.size, file.error),
            None => (None, 0, Some(UploadError::NoFile)),
        };

        Ok(Self {
            form_name,
            cid,
            content_type,
            filename,
            temp_location,
            size,
            upload_error,
        })
    }

    pub fn is_uploaded(&self) -> bool {
        self.upload_error.is_none() && self.temp_location.is_some()
    }
}

fn form_string(request: &Request, name: &str) -> String {
    request.form_value(name).unwrap_or_default().to_string()
}

fn parse_mms_parts(request: &Request) -> Result<Vec<MmsPart>> {
    let Some(raw) = request.form_value("mms_parts") else {
        return Ok(Vec::new());
    };
    let descriptors: Vec<Value> = serde_json::from_str(raw).map_err(|source| {
        warn!("malformed mms_parts descriptor: {source}");
        GatewayError::MalformedMmsDescriptor { source }
    })?;

    descriptors
        .iter()
        .enumerate()
        .map(|(index, descriptor)| MmsPart::from_descriptor(index, descriptor, request))
        .collect()
}

fn build_incoming(request: &Request) -> Result<Incoming> {
    let message_type = request
        .form_value("message_type")
        .and_then(|v| v.parse().ok())
        .unwrap_or(MessageType::Sms);

    let mms_parts = match message_type {
        MessageType::Mms => parse_mms_parts(request)?,
        MessageType::Sms => Vec::new(),
    };

    Ok(Incoming {
        from: form_string(request, "from"),
        message: form_string(request, "message"),
        message_type,
        mms_parts,
    })
}

fn build_send_status(request: &Request) -> SendStatus {
    SendStatus {
        status: request.form_value("status").and_then(|v| v.parse().ok()),
        id: form_string(request, "id"),
    }
}

/// Picks the action variant named by the `action` form field.
pub fn dispatch(request: &Request) -> Result<Action> {
    let action_id = request.form_value("action");
    let action = match action_id {
        Some(ACTION_INCOMING) => Action::Incoming(build_incoming(request)?),
        Some(ACTION_OUTGOING) => Action::Outgoing(Outgoing),
        Some(ACTION_SEND_STATUS) => Action::SendStatus(build_send_status(request)),
        _ => Action::Unknown,
    };
    debug!(action = ?action_id, kind = ?action.kind(), "dispatched request");
    Ok(action)
}
