//! Packet layout and codec
//!
//! Every field is a fixed-width big-endian primitive read in order:
//!
//! ```text
//! f32  elapsed seconds
//! i32  synced score
//! i32  synced combo
//! f32  synced accuracy
//! i32  cursor stream count
//!   i32  sample count
//!     i32  packed sample: (time_ms << 2) | movement kind
//!     f32  x, f32 y          (omitted when the kind is `up`)
//! i32  judged object count
//!   i32  object index
//!   f64  absolute time (ms)
//!   i16  accuracy offset
//!   u8   tickset byte length, then that many tickset bytes
//!   i8   hit result
//! i32  snapshot count
//!   f32  time (ms), i32 score, i32 combo, f32 accuracy
//! ```

use crate::{ProtocolError, Tickset};
use bytes::{Buf, BufMut, BytesMut};
use tracing::trace;

/// Maximum number of simultaneous touch points a packet may describe
pub const MAX_CURSOR_STREAMS: usize = 10;

/// Smallest encoded size of each repeated record, used to bound allocations
const MIN_SAMPLE_LEN: usize = 4;
const MIN_JUDGEMENT_LEN: usize = 4 + 8 + 2 + 1 + 1;
const SNAPSHOT_LEN: usize = 16;

/// Cursor movement kind, stored in the low two bits of a packed sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementKind {
    Up = 0,
    Down = 1,
    Move = 2,
}

impl MovementKind {
    pub fn from_bits(bits: i32) -> Result<Self, ProtocolError> {
        match bits {
            0 => Ok(Self::Up),
            1 => Ok(Self::Down),
            2 => Ok(Self::Move),
            other => Err(ProtocolError::UnknownMovementKind(other)),
        }
    }

    pub fn bits(self) -> i32 {
        self as i32
    }
}

/// Judgement awarded to a hit object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HitResult {
    Miss = 0,
    Meh = 1,
    Good = 2,
    Great = 3,
}

impl HitResult {
    pub fn from_byte(byte: i8) -> Result<Self, ProtocolError> {
        match byte {
            0 => Ok(Self::Miss),
            1 => Ok(Self::Meh),
            2 => Ok(Self::Good),
            3 => Ok(Self::Great),
            other => Err(ProtocolError::UnknownHitResult(other)),
        }
    }

    pub fn as_byte(self) -> i8 {
        self as i8
    }

    pub fn is_miss(self) -> bool {
        self == Self::Miss
    }
}

/// One cursor sample from a touch stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorSample {
    pub time_ms: i32,
    pub kind: MovementKind,
    /// Absent for `up` samples
    pub position: Option<[f32; 2]>,
}

/// Judgement for a single beatmap object
#[derive(Debug, Clone, PartialEq)]
pub struct JudgementRecord {
    pub object_index: i32,
    pub time_ms: f64,
    pub accuracy_offset: i16,
    pub tickset: Tickset,
    pub result: HitResult,
}

/// Periodic score/combo/accuracy snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotRecord {
    pub time_ms: f32,
    pub score: i32,
    pub combo: i32,
    pub accuracy: f32,
}

/// Values re-sent with every packet to correct drift from lost packets
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SyncedValues {
    pub score: i32,
    pub combo: i32,
    pub accuracy: f32,
}

/// A fully decoded packet for one player
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Packet {
    pub elapsed_seconds: f32,
    pub synced: SyncedValues,
    pub cursor_streams: Vec<Vec<CursorSample>>,
    pub judgements: Vec<JudgementRecord>,
    pub snapshots: Vec<SnapshotRecord>,
}

impl Packet {
    /// Decode a complete packet. Trailing bytes are rejected.
    pub fn decode(buf: &[u8]) -> Result<Self, ProtocolError> {
        PacketReader::new(buf).read_packet()
    }

    /// Elapsed server time in milliseconds
    pub fn elapsed_ms(&self) -> f64 {
        f64::from(self.elapsed_seconds) * 1000.0
    }

    /// Encode in wire layout
    pub fn encode(&self, out: &mut BytesMut) -> Result<(), ProtocolError> {
        if self.cursor_streams.len() > MAX_CURSOR_STREAMS {
            return Err(ProtocolError::TooManyStreams {
                got: self.cursor_streams.len(),
                max: MAX_CURSOR_STREAMS,
            });
        }

        out.put_f32(self.elapsed_seconds);
        out.put_i32(self.synced.score);
        out.put_i32(self.synced.combo);
        out.put_f32(self.synced.accuracy);

        out.put_i32(self.cursor_streams.len() as i32);
        for stream in &self.cursor_streams {
            out.put_i32(stream.len() as i32);
            for sample in stream {
                out.put_i32(sample.time_ms.wrapping_shl(2) | sample.kind.bits());
                if sample.kind != MovementKind::Up {
                    let [x, y] = sample.position.unwrap_or_default();
                    out.put_f32(x);
                    out.put_f32(y);
                }
            }
        }

        out.put_i32(self.judgements.len() as i32);
        for judgement in &self.judgements {
            let ticks = judgement.tickset.as_bytes();
            if ticks.len() > u8::MAX as usize {
                return Err(ProtocolError::TicksetTooLong(ticks.len()));
            }
            out.put_i32(judgement.object_index);
            out.put_f64(judgement.time_ms);
            out.put_i16(judgement.accuracy_offset);
            out.put_u8(ticks.len() as u8);
            out.extend_from_slice(ticks);
            out.put_i8(judgement.result.as_byte());
        }

        out.put_i32(self.snapshots.len() as i32);
        for snapshot in &self.snapshots {
            out.put_f32(snapshot.time_ms);
            out.put_i32(snapshot.score);
            out.put_i32(snapshot.combo);
            out.put_f32(snapshot.accuracy);
        }

        Ok(())
    }
}

/// Sequential reader over a packet buffer
pub struct PacketReader<'a> {
    buf: &'a [u8],
    total: usize,
}

impl<'a> PacketReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            total: buf.len(),
        }
    }

    /// Bytes consumed so far
    pub fn offset(&self) -> usize {
        self.total - self.buf.remaining()
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn ensure(&self, field: &'static str, needed: usize) -> Result<(), ProtocolError> {
        if self.buf.remaining() < needed {
            return Err(ProtocolError::Truncated {
                field,
                offset: self.offset(),
                needed,
                remaining: self.buf.remaining(),
            });
        }
        Ok(())
    }

    fn read_i32(&mut self, field: &'static str) -> Result<i32, ProtocolError> {
        self.ensure(field, 4)?;
        Ok(self.buf.get_i32())
    }

    fn read_f32(&mut self, field: &'static str) -> Result<f32, ProtocolError> {
        self.ensure(field, 4)?;
        Ok(self.buf.get_f32())
    }

    fn read_f64(&mut self, field: &'static str) -> Result<f64, ProtocolError> {
        self.ensure(field, 8)?;
        Ok(self.buf.get_f64())
    }

    fn read_i16(&mut self, field: &'static str) -> Result<i16, ProtocolError> {
        self.ensure(field, 2)?;
        Ok(self.buf.get_i16())
    }

    fn read_u8(&mut self, field: &'static str) -> Result<u8, ProtocolError> {
        self.ensure(field, 1)?;
        Ok(self.buf.get_u8())
    }

    fn read_i8(&mut self, field: &'static str) -> Result<i8, ProtocolError> {
        self.ensure(field, 1)?;
        Ok(self.buf.get_i8())
    }

    fn read_count(&mut self, field: &'static str) -> Result<usize, ProtocolError> {
        let count = self.read_i32(field)?;
        usize::try_from(count).map_err(|_| ProtocolError::NegativeCount { field, count })
    }

    /// Capacity hint that never trusts a count beyond what the buffer can hold
    fn capacity_for(&self, count: usize, min_len: usize) -> usize {
        count.min(self.buf.remaining() / min_len)
    }

    fn finite(value: f64, field: &'static str) -> Result<f64, ProtocolError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ProtocolError::NonFiniteTime { field })
        }
    }

    /// Read a whole packet and require the buffer to be fully consumed
    pub fn read_packet(mut self) -> Result<Packet, ProtocolError> {
        let elapsed_seconds = self.read_f32("elapsed")?;
        Self::finite(f64::from(elapsed_seconds), "elapsed")?;

        let synced = SyncedValues {
            score: self.read_i32("synced score")?,
            combo: self.read_i32("synced combo")?,
            accuracy: self.read_f32("synced accuracy")?,
        };

        let cursor_streams = self.read_cursor_streams()?;
        let judgements = self.read_judgements()?;
        let snapshots = self.read_snapshots()?;

        if self.buf.has_remaining() {
            return Err(ProtocolError::TrailingBytes(self.buf.remaining()));
        }

        trace!(
            "Decoded packet: {} streams, {} judgements, {} snapshots",
            cursor_streams.len(),
            judgements.len(),
            snapshots.len()
        );

        Ok(Packet {
            elapsed_seconds,
            synced,
            cursor_streams,
            judgements,
            snapshots,
        })
    }

    fn read_cursor_streams(&mut self) -> Result<Vec<Vec<CursorSample>>, ProtocolError> {
        let stream_count = self.read_count("cursor stream count")?;
        if stream_count > MAX_CURSOR_STREAMS {
            return Err(ProtocolError::TooManyStreams {
                got: stream_count,
                max: MAX_CURSOR_STREAMS,
            });
        }

        let mut streams = Vec::with_capacity(stream_count);
        for _ in 0..stream_count {
            let sample_count = self.read_count("cursor sample count")?;
            let mut samples = Vec::with_capacity(self.capacity_for(sample_count, MIN_SAMPLE_LEN));
            for _ in 0..sample_count {
                let packed = self.read_i32("cursor sample")?;
                let kind = MovementKind::from_bits(packed & 0b11)?;
                let position = match kind {
                    MovementKind::Up => None,
                    _ => Some([self.read_f32("cursor x")?, self.read_f32("cursor y")?]),
                };
                samples.push(CursorSample {
                    time_ms: packed >> 2,
                    kind,
                    position,
                });
            }
            streams.push(samples);
        }
        Ok(streams)
    }

    fn read_judgements(&mut self) -> Result<Vec<JudgementRecord>, ProtocolError> {
        let count = self.read_count("judgement count")?;
        let mut judgements = Vec::with_capacity(self.capacity_for(count, MIN_JUDGEMENT_LEN));
        for _ in 0..count {
            let object_index = self.read_i32("object index")?;
            if object_index < 0 {
                return Err(ProtocolError::NegativeObjectIndex(object_index));
            }
            let time_ms = Self::finite(self.read_f64("judgement time")?, "judgement time")?;
            let accuracy_offset = self.read_i16("accuracy offset")?;
            let tick_len = self.read_u8("tickset length")? as usize;
            self.ensure("tickset", tick_len)?;
            let tickset = Tickset::from_bytes(self.buf.copy_to_bytes(tick_len));
            let result = HitResult::from_byte(self.read_i8("hit result")?)?;

            judgements.push(JudgementRecord {
                object_index,
                time_ms,
                accuracy_offset,
                tickset,
                result,
            });
        }
        Ok(judgements)
    }

    fn read_snapshots(&mut self) -> Result<Vec<SnapshotRecord>, ProtocolError> {
        let count = self.read_count("snapshot count")?;
        let mut snapshots = Vec::with_capacity(self.capacity_for(count, SNAPSHOT_LEN));
        for _ in 0..count {
            let time_ms = self.read_f32("snapshot time")?;
            Self::finite(f64::from(time_ms), "snapshot time")?;
            snapshots.push(SnapshotRecord {
                time_ms,
                score: self.read_i32("snapshot score")?,
                combo: self.read_i32("snapshot combo")?,
                accuracy: self.read_f32("snapshot accuracy")?,
            });
        }
        Ok(snapshots)
    }
}
