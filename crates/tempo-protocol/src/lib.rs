//! Spectator packet protocol for Tempo
//!
//! Decodes the fixed big-endian packet layout that carries one player's
//! cursor samples, hit judgements and score snapshots, and encodes it back
//! for recorded packet dumps.

pub mod framing;
pub mod packet;
pub mod tickset;

pub use framing::{FramedCodec, MAX_FRAME_LEN};
pub use packet::{
    CursorSample, HitResult, JudgementRecord, MovementKind, Packet, PacketReader, SnapshotRecord,
    SyncedValues, MAX_CURSOR_STREAMS,
};
pub use tickset::Tickset;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Truncated packet: {field} needs {needed} bytes at offset {offset}, {remaining} left")]
    Truncated {
        field: &'static str,
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("Negative count for {field}: {count}")]
    NegativeCount { field: &'static str, count: i32 },

    #[error("Negative object index: {0}")]
    NegativeObjectIndex(i32),

    #[error("Too many cursor streams: {got} (max {max})")]
    TooManyStreams { got: usize, max: usize },

    #[error("Unknown movement kind: {0}")]
    UnknownMovementKind(i32),

    #[error("Unknown hit result: {0}")]
    UnknownHitResult(i8),

    #[error("Non-finite time in {field}")]
    NonFiniteTime { field: &'static str },

    #[error("Tickset too long: {0} bytes")]
    TicksetTooLong(usize),

    #[error("Trailing bytes after packet: {0}")]
    TrailingBytes(usize),

    #[error("Frame too large: {0} bytes")]
    FrameTooLarge(usize),
}
