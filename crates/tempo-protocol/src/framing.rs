//! Length-prefixed framing for recorded packet streams

use crate::{Packet, ProtocolError};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Upper bound on a single frame; anything larger is treated as corruption
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Frame encoder/decoder for packet dumps
pub struct FramedCodec;

impl FramedCodec {
    /// Encode a packet with a 4-byte big-endian length prefix
    pub fn encode(packet: &Packet, buf: &mut BytesMut) -> Result<(), ProtocolError> {
        let mut payload = BytesMut::new();
        packet.encode(&mut payload)?;

        if payload.len() > MAX_FRAME_LEN {
            return Err(ProtocolError::FrameTooLarge(payload.len()));
        }

        buf.put_u32(payload.len() as u32);
        buf.extend_from_slice(&payload);

        Ok(())
    }

    /// Split the next raw frame off the buffer
    /// Returns None if more data is needed
    pub fn next_frame(buf: &mut BytesMut) -> Result<Option<Bytes>, ProtocolError> {
        if buf.len() < 4 {
            return Ok(None);
        }

        // Peek at length without consuming
        let mut length_bytes = [0u8; 4];
        length_bytes.copy_from_slice(&buf[..4]);
        let length = u32::from_be_bytes(length_bytes) as usize;

        if length > MAX_FRAME_LEN {
            return Err(ProtocolError::FrameTooLarge(length));
        }

        if buf.len() < 4 + length {
            return Ok(None);
        }

        buf.advance(4);
        Ok(Some(buf.split_to(length).freeze()))
    }

    /// Decode the next complete packet from the buffer
    pub fn decode(buf: &mut BytesMut) -> Result<Option<Packet>, ProtocolError> {
        match Self::next_frame(buf)? {
            Some(frame) => Packet::decode(&frame).map(Some),
            None => Ok(None),
        }
    }
}
