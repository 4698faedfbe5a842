//! Observable client events

use std::fmt;

use super::logger::Severity;

/// Observable events of the client layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Client configuration loaded
    ConfigLoaded,

    // Cache session
    CacheSessionBegin,
    CacheSessionEnd,
    CacheHit,
    CacheMiss,
    /// Mutation refused because a cache session is active
    WriteRejected,

    // Scanners
    ScannerOpened,
    ScannerClosed,
    /// Closing a scanner failed on a path that cannot report it
    ScannerCloseFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::CacheSessionBegin => "CACHE_SESSION_BEGIN",
            Event::CacheSessionEnd => "CACHE_SESSION_END",
            Event::CacheHit => "CACHE_HIT",
            Event::CacheMiss => "CACHE_MISS",
            Event::WriteRejected => "WRITE_REJECTED",
            Event::ScannerOpened => "SCANNER_OPENED",
            Event::ScannerClosed => "SCANNER_CLOSED",
            Event::ScannerCloseFailed => "SCANNER_CLOSE_FAILED",
        }
    }

    /// Default severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::CacheHit | Event::CacheMiss | Event::ScannerOpened | Event::ScannerClosed => {
                Severity::Trace
            }
            Event::ConfigLoaded | Event::CacheSessionBegin | Event::CacheSessionEnd => {
                Severity::Info
            }
            Event::WriteRejected | Event::ScannerCloseFailed => Severity::Warn,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
