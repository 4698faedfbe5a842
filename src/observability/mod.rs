//! Observability for the client layer
//!
//! Structured JSON log lines and a typed event vocabulary.
//!
//! ```ignore
//! use hbasta::observability::{Event, Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! Logger::event(Event::ScannerOpened, &[("table", "users"), ("scanner", "7")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
