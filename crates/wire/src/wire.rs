// SPDX-License-Identifier: MIT

//! Frame codec: 4-byte big-endian length prefix + JSON payload.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Default hard cap on a single frame's payload size.
pub const DEFAULT_MAX_FRAME_BYTES: u32 = 64 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("frame of {size} bytes exceeds the {limit}-byte limit")]
    FrameTooLarge { size: u32, limit: u32 },
    #[error("connection closed mid-frame")]
    Truncated,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json encode/decode error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode a value to its raw JSON payload. Does not add the length prefix —
/// callers that write to a stream should use [`write_message`] instead.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(value)?)
}

/// Decode a raw JSON payload (no length prefix) back into `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Write a single length-prefixed frame, retrying on short writes until the
/// whole frame is flushed.
pub async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, payload: &[u8]) -> Result<(), ProtocolError> {
    let len = u32::try_from(payload.len()).map_err(|_| ProtocolError::FrameTooLarge {
        size: u32::MAX,
        limit: DEFAULT_MAX_FRAME_BYTES,
    })?;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Read a single length-prefixed frame, enforcing `max_frame_bytes`.
pub async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, ProtocolError> {
    read_message_limited(reader, DEFAULT_MAX_FRAME_BYTES).await
}

/// Read a single length-prefixed frame with an explicit size limit. EOF
/// before the length prefix is a clean end-of-stream (surfaced as
/// [`ProtocolError::Truncated`] so callers can distinguish it from a
/// successfully parsed empty frame); EOF mid-payload is always a fatal
/// transport error.
pub async fn read_message_limited<R: AsyncRead + Unpin>(
    reader: &mut R,
    max_frame_bytes: u32,
) -> Result<Vec<u8>, ProtocolError> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            ProtocolError::Truncated
        } else {
            ProtocolError::Io(e)
        }
    })?;
    let len = u32::from_be_bytes(len_buf);
    if len > max_frame_bytes {
        return Err(ProtocolError::FrameTooLarge { size: len, limit: max_frame_bytes });
    }
    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            ProtocolError::Truncated
        } else {
            ProtocolError::Io(e)
        }
    })?;
    Ok(payload)
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
