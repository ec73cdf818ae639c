//! Wire message codec
//!
//! Messages exchanged with transport collaborators carry a function tag, a
//! data tag, and a raw payload. The layout is bit-exact:
//!
//! ```text
//! <function tag bytes> 0x00 <data tag bytes> 0x00 <payload bytes...>
//! ```
//!
//! No length prefix, no escaping. Decoding is fail-soft: unknown tag strings
//! map to [`FunctionTag::Unknown`]/[`DataTag::Unknown`], and input missing
//! either delimiter yields an all-unknown message with an empty payload.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Subsystem a message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FunctionTag {
    /// Driver monitoring system
    Dms,
    Unknown,
}

impl FunctionTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionTag::Dms => "DMS",
            FunctionTag::Unknown => "UNKNOWN",
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "DMS" => FunctionTag::Dms,
            _ => FunctionTag::Unknown,
        }
    }
}

/// Kind of payload a message carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataTag {
    Image,
    Text,
    Info,
    Unknown,
}

impl DataTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataTag::Image => "IMAGE",
            DataTag::Text => "TEXT",
            DataTag::Info => "INFO",
            DataTag::Unknown => "UNKNOWN",
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "IMAGE" => DataTag::Image,
            "TEXT" => DataTag::Text,
            "INFO" => DataTag::Info,
            _ => DataTag::Unknown,
        }
    }
}

/// One wire message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub function: FunctionTag,
    pub data_type: DataTag,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn new(function: FunctionTag, data_type: DataTag, payload: Vec<u8>) -> Self {
        Self {
            function,
            data_type,
            payload,
        }
    }

    fn unknown() -> Self {
        Self::new(FunctionTag::Unknown, DataTag::Unknown, Vec::new())
    }

    /// Serialize to the delimiter-based wire layout
    pub fn encode(&self) -> Vec<u8> {
        let function = self.function.as_str().as_bytes();
        let data_type = self.data_type.as_str().as_bytes();

        let mut out = Vec::with_capacity(function.len() + data_type.len() + self.payload.len() + 2);
        out.extend_from_slice(function);
        out.push(0);
        out.extend_from_slice(data_type);
        out.push(0);
        out.extend_from_slice(&self.payload);
        out
    }

    /// Deserialize from wire bytes. Never fails: malformed input decays to
    /// an all-unknown message with an empty payload.
    pub fn decode(data: &[u8]) -> Self {
        let Some(first) = data.iter().position(|&b| b == 0) else {
            warn!("wire message missing function delimiter");
            return Self::unknown();
        };
        let rest = &data[first + 1..];
        let Some(second) = rest.iter().position(|&b| b == 0) else {
            warn!("wire message missing data-type delimiter");
            return Self::unknown();
        };

        let function = std::str::from_utf8(&data[..first])
            .map(FunctionTag::from_tag)
            .unwrap_or(FunctionTag::Unknown);
        let data_type = std::str::from_utf8(&rest[..second])
            .map(DataTag::from_tag)
            .unwrap_or(DataTag::Unknown);

        Self {
            function,
            data_type,
            // everything after the second delimiter, verbatim
            payload: rest[second + 1..].to_vec(),
        }
    }
}
