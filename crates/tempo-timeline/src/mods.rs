//! Gameplay mods, difficulty overrides and the derived hit-window model

use bitflags::bitflags;
use tempo_protocol::HitResult;

bitflags! {
    /// Active gameplay mods, using the conventional osu! bit values
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Mods: u32 {
        const NO_FAIL = 1;
        const EASY = 1 << 1;
        const TOUCH_DEVICE = 1 << 2;
        const HIDDEN = 1 << 3;
        const HARD_ROCK = 1 << 4;
        const SUDDEN_DEATH = 1 << 5;
        const DOUBLE_TIME = 1 << 6;
        const RELAX = 1 << 7;
        const HALF_TIME = 1 << 8;
        const NIGHTCORE = 1 << 9;
        const FLASHLIGHT = 1 << 10;
    }
}

impl Mods {
    /// Playback rate the mods apply to the beatmap clock
    pub fn clock_rate(self) -> f64 {
        if self.intersects(Mods::DOUBLE_TIME | Mods::NIGHTCORE) {
            1.5
        } else if self.contains(Mods::HALF_TIME) {
            0.75
        } else {
            1.0
        }
    }
}

/// Single mod, for command-line selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Mod {
    #[cfg_attr(feature = "clap", value(name = "nf"))]
    NoFail,
    #[cfg_attr(feature = "clap", value(name = "ez"))]
    Easy,
    #[cfg_attr(feature = "clap", value(name = "td"))]
    TouchDevice,
    #[cfg_attr(feature = "clap", value(name = "hd"))]
    Hidden,
    #[cfg_attr(feature = "clap", value(name = "hr"))]
    HardRock,
    #[cfg_attr(feature = "clap", value(name = "sd"))]
    SuddenDeath,
    #[cfg_attr(feature = "clap", value(name = "dt"))]
    DoubleTime,
    #[cfg_attr(feature = "clap", value(name = "rx"))]
    Relax,
    #[cfg_attr(feature = "clap", value(name = "ht"))]
    HalfTime,
    #[cfg_attr(feature = "clap", value(name = "nc"))]
    Nightcore,
    #[cfg_attr(feature = "clap", value(name = "fl"))]
    Flashlight,
}

impl Mod {
    pub fn flag(self) -> Mods {
        match self {
            Mod::NoFail => Mods::NO_FAIL,
            Mod::Easy => Mods::EASY,
            Mod::TouchDevice => Mods::TOUCH_DEVICE,
            Mod::Hidden => Mods::HIDDEN,
            Mod::HardRock => Mods::HARD_ROCK,
            Mod::SuddenDeath => Mods::SUDDEN_DEATH,
            Mod::DoubleTime => Mods::DOUBLE_TIME,
            Mod::Relax => Mods::RELAX,
            Mod::HalfTime => Mods::HALF_TIME,
            Mod::Nightcore => Mods::NIGHTCORE,
            Mod::Flashlight => Mods::FLASHLIGHT,
        }
    }
}

impl FromIterator<Mod> for Mods {
    fn from_iter<I: IntoIterator<Item = Mod>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Mods::empty(), |mods, m| mods | m.flag())
    }
}

/// Difficulty values forced by the player regardless of the beatmap
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DifficultyOverrides {
    pub overall_difficulty: Option<f64>,
}

/// What the beatmap collaborator tells us about the map being played
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatmapInfo {
    pub object_count: usize,
    pub overall_difficulty: f64,
}

/// Half-widths of the timing windows in milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitWindows {
    pub great: f64,
    pub good: f64,
    pub meh: f64,
}

impl HitWindows {
    pub fn from_overall_difficulty(od: f64) -> Self {
        Self {
            great: 80.0 - 6.0 * od,
            good: 140.0 - 8.0 * od,
            meh: 200.0 - 10.0 * od,
        }
    }

    /// Windows for a player, after overrides and difficulty-changing mods
    pub fn for_player(beatmap: &BeatmapInfo, mods: Mods, overrides: &DifficultyOverrides) -> Self {
        let mut od = overrides
            .overall_difficulty
            .unwrap_or(beatmap.overall_difficulty);
        if mods.contains(Mods::HARD_ROCK) {
            od = (od * 1.4).min(10.0);
        } else if mods.contains(Mods::EASY) {
            od *= 0.5;
        }
        Self::from_overall_difficulty(od)
    }

    /// Result a hit at `offset` ms from the object's time would receive
    pub fn result_for(&self, offset: f64) -> HitResult {
        let offset = offset.abs();
        if offset <= self.great {
            HitResult::Great
        } else if offset <= self.good {
            HitResult::Good
        } else if offset <= self.meh {
            HitResult::Meh
        } else {
            HitResult::Miss
        }
    }

    /// Window for a result; a miss uses the outermost window
    pub fn window_for(&self, result: HitResult) -> f64 {
        match result {
            HitResult::Great => self.great,
            HitResult::Good => self.good,
            HitResult::Meh | HitResult::Miss => self.meh,
        }
    }
}
