//! Line-oriented wire protocol spoken with the transport simulator.
//!
//! The first line of a connection is the handshake
//! `INIT;<client-tag>;<odim>;<ang_range>;<model>`; every later line is one
//! four-field event record. Responses to an event are exactly `odim` event
//! lines with no extra framing.

use thiserror::Error;

/// Leading token of a valid handshake line.
pub const HANDSHAKE_TAG: &str = "INIT";

/// Acknowledgment sent after a successful handshake.
pub const ACK: &[u8] = b"ACK\n";

/// Fewer output events than this cannot hold the reflected/transmitted
/// pair plus at least one diffuse event.
pub const MIN_ODIM: usize = 3;

#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    #[error("handshake does not start with '{HANDSHAKE_TAG}'")]
    NotInit,
    #[error("handshake needs at least 5 ';'-delimited fields, got {0}")]
    FieldCount(usize),
    #[error("requested event count {0:?} is not a valid integer")]
    BadEventCount(String),
    #[error("requested event count {0} is below the minimum of {MIN_ODIM}")]
    EventCountTooSmall(usize),
    #[error("angular range {0:?} is not a valid positive number")]
    BadAngularRange(String),
    #[error("model name is empty")]
    EmptyModel,
}

/// Session parameters negotiated by the handshake line.
#[derive(Debug, Clone, PartialEq)]
pub struct Handshake {
    /// Caller identity, carried for logging but not validated: any
    /// transport simulation speaking the protocol may connect.
    pub client_tag: String,
    /// Output events owed per incident event.
    pub odim: usize,
    /// Detector angular half-width in degrees.
    pub ang_range: f64,
    /// Sample model name.
    pub model: String,
}

impl Handshake {
    /// Parses the handshake line. Field count and every field's type are
    /// checked before any value is used; trailing extra fields are
    /// tolerated for forward compatibility.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let trimmed = line.trim();
        let fields: Vec<&str> = trimmed.split(';').collect();
        if fields[0] != HANDSHAKE_TAG {
            return Err(ProtocolError::NotInit);
        }
        if fields.len() < 5 {
            return Err(ProtocolError::FieldCount(fields.len()));
        }

        let odim: usize = fields[2]
            .trim()
            .parse()
            .map_err(|_| ProtocolError::BadEventCount(fields[2].trim().to_string()))?;
        if odim < MIN_ODIM {
            return Err(ProtocolError::EventCountTooSmall(odim));
        }

        let ang_range: f64 = fields[3]
            .trim()
            .parse()
            .map_err(|_| ProtocolError::BadAngularRange(fields[3].trim().to_string()))?;
        if !(ang_range > 0.0) {
            return Err(ProtocolError::BadAngularRange(fields[3].trim().to_string()));
        }

        let model = fields[4].trim();
        if model.is_empty() {
            return Err(ProtocolError::EmptyModel);
        }

        Ok(Handshake {
            client_tag: fields[1].trim().to_string(),
            odim,
            ang_range,
            model: model.to_string(),
        })
    }
}
