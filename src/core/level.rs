//! Severity level definitions
//!
//! Levels are ordered most-severe-first: a record passes the threshold
//! test iff its level is less than or equal to the configured threshold.
//! `Off` as a threshold disables logging, `None` records pass any
//! threshold other than `Off`, and `Header` is reserved for rendering
//! the column header row.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Level {
    /// Disable logging.
    Off = 0,
    /// No level specified. Always log if logging is enabled.
    None = 1,
    /// Issues which break the application or a large portion of it.
    Fatal = 2,
    /// Issues which cause high impact or loss of functionality.
    Critical = 3,
    /// Issues which have a noticeable impact but do not affect functionality.
    Error = 4,
    /// Issues which should not be noticed or have been mitigated.
    Warning = 5,
    /// Strange or significant behaviour that is not an issue by itself.
    Notice = 6,
    /// Important updates for tracking activity.
    Info = 7,
    /// Helpful updates for more in depth tracking.
    Debug = 8,
    /// Specialised step-by-step tracking updates.
    Trace = 9,
    /// Very informative and noisy updates.
    #[default]
    Verbose = 10,
    /// Reserved for header info.
    Header = 11,
}

/// Rendering style for the level column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LevelFormat {
    /// Padded word, e.g. `Warning `
    #[default]
    Full = 0,
    /// 3-letter code, e.g. `WRN`
    Short = 1,
    /// 1 letter, e.g. `W`
    Char = 2,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Off => "Off",
            Level::None => "None",
            Level::Fatal => "Fatal",
            Level::Critical => "Critical",
            Level::Error => "Error",
            Level::Warning => "Warning",
            Level::Notice => "Notice",
            Level::Info => "Info",
            Level::Debug => "Debug",
            Level::Trace => "Trace",
            Level::Verbose => "Verbose",
            Level::Header => "Header",
        }
    }

    /// Render this level as a fixed-width column field.
    ///
    /// `Full` renderings are pre-padded to 8 characters so the level
    /// column lines up without further padding; `None` renders blank.
    pub fn render(&self, format: LevelFormat) -> &'static str {
        match format {
            LevelFormat::Full => match self {
                Level::None => "        ",
                Level::Fatal => "Fatal   ",
                Level::Critical => "Critical",
                Level::Error => "Error   ",
                Level::Warning => "Warning ",
                Level::Notice => "Notice  ",
                Level::Info => "Info    ",
                Level::Debug => "Debug   ",
                Level::Trace => "Trace   ",
                Level::Verbose => "Verbose ",
                Level::Header => "Level   ",
                _ => "Unknown ",
            },
            LevelFormat::Short => match self {
                Level::None => "   ",
                Level::Fatal => "FTL",
                Level::Critical => "CRT",
                Level::Error => "ERR",
                Level::Warning => "WRN",
                Level::Notice => "NTC",
                Level::Info => "INF",
                Level::Debug => "DBG",
                Level::Trace => "TRC",
                Level::Verbose => "VRB",
                Level::Header => "LVL",
                _ => "UNK",
            },
            LevelFormat::Char => match self {
                Level::None => " ",
                Level::Fatal => "F",
                Level::Critical => "C",
                Level::Error => "E",
                Level::Warning => "W",
                Level::Notice => "N",
                Level::Info => "I",
                Level::Debug => "D",
                Level::Trace => "T",
                Level::Verbose => "V",
                Level::Header => "L",
                _ => "?",
            },
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => Level::Off,
            1 => Level::None,
            2 => Level::Fatal,
            3 => Level::Critical,
            4 => Level::Error,
            5 => Level::Warning,
            6 => Level::Notice,
            7 => Level::Info,
            8 => Level::Debug,
            9 => Level::Trace,
            11 => Level::Header,
            _ => Level::Verbose,
        }
    }
}

impl LevelFormat {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => LevelFormat::Short,
            2 => LevelFormat::Char,
            _ => LevelFormat::Full,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OFF" => Ok(Level::Off),
            "NONE" => Ok(Level::None),
            "FATAL" | "FTL" => Ok(Level::Fatal),
            "CRITICAL" | "CRT" => Ok(Level::Critical),
            "ERROR" | "ERR" => Ok(Level::Error),
            "WARNING" | "WARN" | "WRN" => Ok(Level::Warning),
            "NOTICE" | "NTC" => Ok(Level::Notice),
            "INFO" | "INF" => Ok(Level::Info),
            "DEBUG" | "DBG" => Ok(Level::Debug),
            "TRACE" | "TRC" => Ok(Level::Trace),
            "VERBOSE" | "VRB" => Ok(Level::Verbose),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Level::Off < Level::None);
        assert!(Level::None < Level::Fatal);
        assert!(Level::Fatal < Level::Critical);
        assert!(Level::Error < Level::Warning);
        assert!(Level::Info < Level::Debug);
        assert!(Level::Trace < Level::Verbose);
        assert!(Level::Verbose < Level::Header);
    }

    #[test]
    fn test_full_renderings_are_eight_chars() {
        for level in [
            Level::None,
            Level::Fatal,
            Level::Critical,
            Level::Error,
            Level::Warning,
            Level::Notice,
            Level::Info,
            Level::Debug,
            Level::Trace,
            Level::Verbose,
            Level::Header,
        ] {
            assert_eq!(level.render(LevelFormat::Full).len(), 8, "{:?}", level);
            assert_eq!(level.render(LevelFormat::Short).len(), 3, "{:?}", level);
            assert_eq!(level.render(LevelFormat::Char).len(), 1, "{:?}", level);
        }
    }

    #[test]
    fn test_header_rendering() {
        assert_eq!(Level::Header.render(LevelFormat::Full), "Level   ");
        assert_eq!(Level::Header.render(LevelFormat::Short), "LVL");
        assert_eq!(Level::Header.render(LevelFormat::Char), "L");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("warning".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!("WRN".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!("Verbose".parse::<Level>().unwrap(), Level::Verbose);
        assert!("bogus".parse::<Level>().is_err());
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(format!("{}", Level::Critical), "Critical");
        assert_eq!(format!("{}", Level::Notice), Level::Notice.as_str());
    }

    #[test]
    fn test_u8_round_trip() {
        for level in [Level::Off, Level::None, Level::Warning, Level::Header] {
            assert_eq!(Level::from_u8(level as u8), level);
        }
        for format in [LevelFormat::Full, LevelFormat::Short, LevelFormat::Char] {
            assert_eq!(LevelFormat::from_u8(format as u8), format);
        }
    }
}
