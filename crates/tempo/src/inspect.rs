//! Packet dump inspector
//!
//! Replays a length-prefixed packet dump for one player and prints the
//! player's state at each requested clock time, in the order given, so
//! rewinds can be checked from the command line.

use crate::counter::{RollingCounter, ScoreSource};
use anyhow::{bail, Context, Result};
use bytes::BytesMut;
use clap::{Parser, ValueEnum};
use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use tempo_protocol::FramedCodec;
use tempo_timeline::{
    BeatmapInfo, DifficultyOverrides, Mod, Mods, PlayerId, PlayerTimeline, TimelineAggregator,
};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect a recorded spectator packet dump")]
pub struct InspectArgs {
    /// Length-prefixed packet dump to replay
    pub dump: PathBuf,

    /// Player the packets belong to
    #[arg(long, default_value = "1")]
    pub player: u32,

    /// Number of hit objects in the beatmap
    #[arg(long)]
    pub objects: usize,

    /// Beatmap overall difficulty
    #[arg(long, default_value = "5.0")]
    pub od: f64,

    /// Overall difficulty forced by the player
    #[arg(long)]
    pub force_od: Option<f64>,

    /// Active mods
    #[arg(long, value_enum, value_delimiter = ',')]
    pub mods: Vec<Mod>,

    /// Clock times (ms) to report, in order; defaults to the latest event
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub at: Vec<f64>,

    /// Log level
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

/// Player state at one clock time
#[derive(Debug, Clone, PartialEq)]
pub struct StateReport {
    pub time: f64,
    pub available: bool,
    pub score: i32,
    pub rolling_score: String,
    pub combo: i32,
    pub accuracy: f64,
    pub last_judgement: Option<i32>,
    pub cursor: Option<[f32; 2]>,
    pub misses: usize,
}

impl StateReport {
    fn capture(
        player: &PlayerTimeline,
        available: bool,
        counter: &RollingCounter<ScoreSource>,
        time: f64,
    ) -> Self {
        let judgement = player.judgement_at(time);
        Self {
            time,
            available,
            score: player.score_at(time).value.0,
            rolling_score: counter.display_text(),
            combo: player.combo_at(time).value.0,
            accuracy: player.accuracy_at(time).value.0,
            last_judgement: (judgement.object_index >= 0).then_some(judgement.object_index),
            cursor: player.cursor_at(0, time).position.map(|p| p.to_array()),
            misses: player
                .objects()
                .iter()
                .filter(|j| j.result.is_miss() && j.time <= time)
                .count(),
        }
    }
}

impl fmt::Display for StateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:.1}ms available={} score={} ({}) combo={}x accuracy={:.2}%",
            self.time,
            self.available,
            self.score,
            self.rolling_score,
            self.combo,
            self.accuracy * 100.0
        )?;
        match self.last_judgement {
            Some(index) => write!(f, " judged=#{index}")?,
            None => write!(f, " judged=-")?,
        }
        match self.cursor {
            Some([x, y]) => write!(f, " cursor=({x:.1}, {y:.1})")?,
            None => write!(f, " cursor=-")?,
        }
        write!(f, " misses={}", self.misses)
    }
}

/// Replay the dump in `args` and collect a report per requested time
pub fn inspect(args: &InspectArgs) -> Result<Vec<StateReport>> {
    let raw = std::fs::read(&args.dump)
        .with_context(|| format!("Failed to read packet dump {}", args.dump.display()))?;
    let mut buf = BytesMut::from(&raw[..]);

    let player_id = PlayerId(args.player);
    let mods: Mods = args.mods.iter().copied().collect();
    let overrides = DifficultyOverrides {
        overall_difficulty: args.force_od,
    };
    let beatmap = BeatmapInfo {
        object_count: args.objects,
        overall_difficulty: args.od,
    };

    let mut aggregator = TimelineAggregator::default();
    aggregator.add_player(player_id, beatmap, mods, overrides);

    let mut applied = 0usize;
    let mut dropped = 0usize;
    while let Some(frame) =
        FramedCodec::next_frame(&mut buf).context("Packet dump is corrupt")?
    {
        if aggregator.process_packet(player_id, &frame) {
            applied += 1;
        } else {
            dropped += 1;
        }
    }
    if !buf.is_empty() {
        warn!("Ignoring {} bytes of incomplete trailing frame", buf.len());
    }
    info!("Replayed {} packets ({} dropped)", applied, dropped);

    let times = if args.at.is_empty() {
        match aggregator.latest_event_time() {
            Some(time) => vec![time],
            None => bail!("Packet dump contains no events for player {}", player_id),
        }
    } else {
        args.at.clone()
    };

    let mut counter = RollingCounter::new(ScoreSource);
    let mut reports = Vec::with_capacity(times.len());
    for time in times {
        let available = aggregator.is_available_at(time);
        let player = aggregator
            .player(player_id)
            .context("Player vanished during replay")?;
        counter.update(player, time);
        debug!("Reporting player {} at {:.1}ms", player_id, time);
        reports.push(StateReport::capture(player, available, &counter, time));
    }

    Ok(reports)
}

/// Run with parsed arguments, writing reports to `out`
pub fn run_with(args: &InspectArgs, out: &mut impl Write) -> Result<()> {
    for report in inspect(args)? {
        writeln!(out, "{report}")?;
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let args = InspectArgs::parse();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(args.log_level))
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    run_with(&args, &mut stdout.lock())
}
