use crate::config::{InputFormat, LogFormat, LogSpanEvents};

/// The default value for `verbose`.
pub const DEFAULT_VERBOSE: u8 = icmplens_core::defaults::DEFAULT_VERBOSE;

/// The default value for `numeric`.
pub const DEFAULT_NUMERIC: bool = false;

/// The default value for `snaplen`.
pub const DEFAULT_SNAPLEN: usize = 262_144;

/// The default value for `input-format`.
pub const DEFAULT_INPUT_FORMAT: InputFormat = InputFormat::Ip;

/// The default value for `fragmented`.
pub const DEFAULT_FRAGMENTED: bool = false;

/// The default value for `extension-checksum-probe`.
pub const DEFAULT_EXTENSION_CHECKSUM_PROBE: bool =
    icmplens_core::defaults::DEFAULT_EXTENSION_CHECKSUM_PROBE;

/// The default value for `log-format`.
pub const DEFAULT_LOG_FORMAT: LogFormat = LogFormat::Pretty;

/// The default value for `log-span-events`.
pub const DEFAULT_LOG_SPAN_EVENTS: LogSpanEvents = LogSpanEvents::Off;

/// The default value for `log-filter`.
pub const DEFAULT_LOG_FILTER: &str = "icmplens=debug";
