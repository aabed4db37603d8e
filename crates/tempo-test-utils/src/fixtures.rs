use anyhow::Result;
use bytes::BytesMut;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tempo_protocol::{
    CursorSample, FramedCodec, HitResult, JudgementRecord, MovementKind, Packet, SnapshotRecord,
    SyncedValues, Tickset,
};

/// Fluent builder for packets in tests
#[derive(Debug, Clone, Default)]
pub struct PacketBuilder {
    packet: Packet,
}

impl PacketBuilder {
    /// Packet whose elapsed server time is `elapsed_ms`
    pub fn at(elapsed_ms: f64) -> Self {
        let mut builder = Self::default();
        builder.packet.elapsed_seconds = (elapsed_ms / 1000.0) as f32;
        builder
    }

    pub fn synced(mut self, score: i32, combo: i32, accuracy: f32) -> Self {
        self.packet.synced = SyncedValues {
            score,
            combo,
            accuracy,
        };
        self
    }

    /// Append a sample to a touch stream, creating empty streams up to it
    pub fn cursor(mut self, point: usize, time_ms: i32, kind: MovementKind, x: f32, y: f32) -> Self {
        while self.packet.cursor_streams.len() <= point {
            self.packet.cursor_streams.push(Vec::new());
        }
        let position = (kind != MovementKind::Up).then_some([x, y]);
        self.packet.cursor_streams[point].push(CursorSample {
            time_ms,
            kind,
            position,
        });
        self
    }

    pub fn judgement(mut self, object_index: i32, time_ms: f64, result: HitResult) -> Self {
        self.packet.judgements.push(JudgementRecord {
            object_index,
            time_ms,
            accuracy_offset: 0,
            tickset: Tickset::default(),
            result,
        });
        self
    }

    pub fn judgement_with_ticks(
        mut self,
        object_index: i32,
        time_ms: f64,
        result: HitResult,
        ticks: &[bool],
    ) -> Self {
        self.packet.judgements.push(JudgementRecord {
            object_index,
            time_ms,
            accuracy_offset: 0,
            tickset: Tickset::from_bits(ticks),
            result,
        });
        self
    }

    pub fn snapshot(mut self, time_ms: f32, score: i32, combo: i32, accuracy: f32) -> Self {
        self.packet.snapshots.push(SnapshotRecord {
            time_ms,
            score,
            combo,
            accuracy,
        });
        self
    }

    pub fn build(self) -> Packet {
        self.packet
    }

    /// Encoded wire bytes
    pub fn encode(self) -> Vec<u8> {
        let mut buf = BytesMut::new();
        self.packet
            .encode(&mut buf)
            .expect("test packet should encode");
        buf.to_vec()
    }
}

/// Temporary directory holding framed packet dumps
pub struct DumpFixture {
    temp_dir: TempDir,
}

impl DumpFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Write packets as a length-prefixed dump and return its path
    pub fn write_dump(&self, name: &str, packets: &[Packet]) -> Result<PathBuf> {
        let mut buf = BytesMut::new();
        for packet in packets {
            FramedCodec::encode(packet, &mut buf)?;
        }

        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, &buf)?;
        Ok(path)
    }

    pub fn write_raw(&self, name: &str, content: &[u8]) -> Result<PathBuf> {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}
