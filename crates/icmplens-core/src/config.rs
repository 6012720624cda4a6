/// Default values for configuration.
pub mod defaults {
    /// The default value for `verbose`.
    pub const DEFAULT_VERBOSE: u8 = 0;

    /// The default value for `extension-checksum-probe`.
    pub const DEFAULT_EXTENSION_CHECKSUM_PROBE: bool = true;
}

/// Dissector configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DissectConfig {
    /// The verbosity level, 0 prints the summary line only.
    pub verbose: u8,
    /// Detect an extension structure by its checksum when the `ICMP` length field is zero.
    ///
    /// Some senders do not set the length field of RFC 4884 messages. When enabled, a message
    /// with a zero length field is only treated as carrying extensions if the checksum over the
    /// would-be extension structure is correct.
    pub extension_checksum_probe: bool,
}

impl DissectConfig {
    #[must_use]
    pub const fn is_verbose(&self) -> bool {
        self.verbose > 0
    }
}

impl Default for DissectConfig {
    fn default() -> Self {
        Self {
            verbose: defaults::DEFAULT_VERBOSE,
            extension_checksum_probe: defaults::DEFAULT_EXTENSION_CHECKSUM_PROBE,
        }
    }
}
