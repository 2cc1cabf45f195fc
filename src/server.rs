use crate::action::{Action, Incoming, SendStatus};
use crate::config::{resolve_upload_dir, Config};
use crate::gateway::Gateway;
use crate::types::{OutgoingMessage, Request, UploadError, UploadedFile};
use crate::xml::render_messages;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Form, Router,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{error, info, warn};

/// Business logic behind the endpoint. `phone_number` identifies the
/// device talking to the server.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Returns replies to send back to the sender. Staged MMS part files
    /// are removed once the response is built, so copy them out here.
    async fn on_incoming(
        &self,
        phone_number: Option<&str>,
        incoming: &Incoming,
    ) -> anyhow::Result<Vec<OutgoingMessage>>;

    /// Returns messages the phone should send now.
    async fn poll_outgoing(
        &self,
        phone_number: Option<&str>,
    ) -> anyhow::Result<Vec<OutgoingMessage>>;

    async fn on_send_status(
        &self,
        phone_number: Option<&str>,
        status: &SendStatus,
    ) -> anyhow::Result<()>;
}

/// Logs every action and never queues anything.
#[derive(Debug, Clone, Default)]
pub struct LoggingHandler;

#[async_trait]
impl MessageHandler for LoggingHandler {
    async fn on_incoming(
        &self,
        phone_number: Option<&str>,
        incoming: &Incoming,
    ) -> anyhow::Result<Vec<OutgoingMessage>> {
        info!(
            phone_number = ?phone_number,
            from = %incoming.from,
            message_type = %incoming.message_type,
            parts = incoming.mms_parts.len(),
            "incoming message: {}",
            incoming.message
        );
        Ok(Vec::new())
    }

    async fn poll_outgoing(
        &self,
        phone_number: Option<&str>,
    ) -> anyhow::Result<Vec<OutgoingMessage>> {
        info!(phone_number = ?phone_number, "outgoing poll");
        Ok(Vec::new())
    }

    async fn on_send_status(
        &self,
        phone_number: Option<&str>,
        status: &SendStatus,
    ) -> anyhow::Result<()> {
        info!(
            phone_number = ?phone_number,
            id = %status.id,
            status = ?status.status,
            "send status"
        );
        Ok(())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub upload_dir: PathBuf,
    pub handler: Arc<dyn MessageHandler>,
}

pub fn create_app(config: Config, handler: Arc<dyn MessageHandler>) -> Router {
    let state = AppState {
        upload_dir: resolve_upload_dir(&config),
        config: config.clone(),
        handler,
    };

    Router::new()
        .route(&config.server.path, post(gateway_endpoint))
        .with_state(state)
}

fn xml_response(body: String) -> Response {
    ([(header::CONTENT_TYPE, "text/xml")], body).into_response()
}

async fn gateway_endpoint(
    State(state): State<AppState>,
    req: axum::extract::Request,
) -> Response {
    let (request, pending) = match read_request(&state, req).await {
        Ok(read) => read,
        Err(err) => {
            warn!("unreadable request: {err:?}");
            return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
        }
    };

    let Some(password) = state.config.auth.password.as_deref() else {
        error!("no password configured, rejecting request");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    let gateway = Gateway::from_request(request);
    if !gateway.is_authenticated(password) {
        return (StatusCode::FORBIDDEN, "Invalid request signature").into_response();
    }

    // Held until the response is built; dropping it removes the files.
    let mut staged = StagedUploads::default();
    let mut request = gateway.into_request();
    for upload in pending {
        let file = staged.stage(&state.upload_dir, &upload.data).await;
        request.files.insert(upload.name, file);
    }
    let gateway = Gateway::from_request(request);

    let action = match gateway.action() {
        Ok(action) => action,
        Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    };
    let phone_number = gateway.phone_number();

    let result = match action {
        Action::Incoming(incoming) => state
            .handler
            .on_incoming(phone_number, incoming)
            .await
            .map(|replies| incoming.render_response(&replies)),
        Action::Outgoing(outgoing) => state
            .handler
            .poll_outgoing(phone_number)
            .await
            .map(|messages| outgoing.render_response(&messages)),
        Action::SendStatus(status) => state
            .handler
            .on_send_status(phone_number, status)
            .await
            .map(|()| render_messages(&[], false)),
        Action::Unknown => {
            return (StatusCode::BAD_REQUEST, "Invalid action").into_response();
        }
    };

    match result {
        Ok(body) => xml_response(body),
        Err(err) => {
            error!("handler error for {:?}: {err:?}", action.kind());
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn is_secure(state: &AppState, headers: &HeaderMap, uri: &axum::http::Uri) -> bool {
    if state.config.server.trust_forwarded_proto {
        if let Some(proto) = headers
            .get("X-Forwarded-Proto")
            .and_then(|v| v.to_str().ok())
        {
            return proto.trim().eq_ignore_ascii_case("https");
        }
    }
    uri.scheme_str() == Some("https")
}

/// File part kept in memory until the request is authenticated.
struct PendingUpload {
    name: String,
    data: Bytes,
}

async fn read_request(
    state: &AppState,
    req: axum::extract::Request,
) -> anyhow::Result<(Request, Vec<PendingUpload>)> {
    let headers = req.headers().clone();
    let uri = req.uri().clone();

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .or_else(|| uri.authority().map(|a| a.to_string()))
        .unwrap_or_default();
    let request_uri = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let mut request = Request::new(host, request_uri).with_secure(is_secure(state, &headers, &uri));
    request.headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let is_multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false);

    let mut pending = Vec::new();
    if is_multipart {
        let mut multipart = Multipart::from_request(req, state).await?;
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(|s| s.to_string()) else {
                continue;
            };
            if field.file_name().is_some() {
                let data = field.bytes().await?;
                pending.push(PendingUpload { name, data });
            } else {
                request.form.insert(name, field.text().await?);
            }
        }
    } else {
        let Form(form) = Form::<HashMap<String, String>>::from_request(req, state).await?;
        request.form = form;
    }

    Ok((request, pending))
}

/// Files written for one request. The temp files are deleted on drop.
#[derive(Default)]
struct StagedUploads {
    files: Vec<NamedTempFile>,
}

impl StagedUploads {
    async fn stage(&mut self, dir: &Path, data: &[u8]) -> UploadedFile {
        let size = data.len() as u64;
        match self.write(dir, data).await {
            Ok(temp_location) => UploadedFile {
                temp_location,
                size,
                error: None,
            },
            Err(err) => {
                error!("failed to stage upload in {}: {err}", dir.display());
                UploadedFile {
                    temp_location: dir.to_path_buf(),
                    size,
                    error: Some(UploadError::WriteFailed),
                }
            }
        }
    }

    async fn write(&mut self, dir: &Path, data: &[u8]) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let file = tempfile::Builder::new()
            .prefix("kalsms-")
            .tempfile_in(dir)?;
        tokio::fs::write(file.path(), data).await?;
        let path = file.path().to_path_buf();
        self.files.push(file);
        Ok(path)
    }
}
