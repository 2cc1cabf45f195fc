use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("mms_parts is not valid JSON: {source}")]
    MalformedMmsDescriptor {
        #[source]
        source: serde_json::Error,
    },
    #[error("mms part {index}: missing or invalid `{field}`")]
    InvalidMmsDescriptor { index: usize, field: &'static str },
}

pub type Result<T> = std::result::Result<T, GatewayError>;
