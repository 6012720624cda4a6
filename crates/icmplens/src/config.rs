use anyhow::anyhow;
use clap::ValueEnum;
use file::ConfigFile;
use icmplens_core::DissectConfig;
use serde::Deserialize;

mod cmd;
mod constants;
mod file;

pub use cmd::Args;

/// The first header of each input packet.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputFormat {
    /// Each packet is an `IPv4` datagram.
    Ip,
    /// Each packet is an `ICMPv4` message.
    Icmp,
}

/// How to format log data.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    /// Display log data in a compact format.
    Compact,
    /// Display log data in a pretty format.
    Pretty,
    /// Display log data in a json format.
    Json,
}

/// How to log event spans.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogSpanEvents {
    /// Do not display event spans.
    Off,
    /// Display enter and exit event spans.
    Active,
    /// Display all event spans.
    Full,
}

/// The action to perform.
#[derive(Debug, Eq, PartialEq)]
pub enum IcmplensAction {
    /// Dissect the input packets.
    Dissect(IcmplensConfig),
    /// Print a template toml config file and exit.
    PrintConfigTemplate,
}

impl IcmplensAction {
    pub fn from(args: Args) -> anyhow::Result<Self> {
        Ok(if args.print_config_template {
            Self::PrintConfigTemplate
        } else {
            Self::Dissect(IcmplensConfig::from(args)?)
        })
    }
}

/// Fully parsed and validated configuration.
#[derive(Debug, Eq, PartialEq)]
pub struct IcmplensConfig {
    pub inputs: Vec<String>,
    pub verbose: u8,
    pub numeric: bool,
    pub snaplen: usize,
    pub input_format: InputFormat,
    pub fragmented: bool,
    pub extension_checksum_probe: bool,
    pub log: bool,
    pub log_format: LogFormat,
    pub log_filter: String,
    pub log_span_events: LogSpanEvents,
}

impl IcmplensConfig {
    pub fn from(args: Args) -> anyhow::Result<Self> {
        let cfg_file = if let Some(cfg) = &args.config_file {
            file::read_config_file(cfg)?
        } else {
            file::read_default_config_file()?.unwrap_or_default()
        };
        Self::build_config(args, cfg_file)
    }

    /// The configuration of the dissector.
    pub const fn dissect_config(&self) -> DissectConfig {
        DissectConfig {
            verbose: self.verbose,
            extension_checksum_probe: self.extension_checksum_probe,
        }
    }

    fn build_config(args: Args, cfg_file: ConfigFile) -> anyhow::Result<Self> {
        let cfg_file_dissect = cfg_file.dissect.unwrap_or_default();
        let cfg_file_log = cfg_file.log.unwrap_or_default();
        let verbose = cfg_layer(
            (args.verbose > 0).then_some(args.verbose),
            cfg_file_dissect.verbose,
            constants::DEFAULT_VERBOSE,
        );
        let numeric = cfg_layer_bool_flag(
            args.numeric,
            cfg_file_dissect.numeric,
            constants::DEFAULT_NUMERIC,
        );
        let snaplen = match cfg_layer(
            args.snaplen,
            cfg_file_dissect.snaplen,
            constants::DEFAULT_SNAPLEN,
        ) {
            0 => constants::DEFAULT_SNAPLEN,
            snaplen => snaplen,
        };
        let input_format = cfg_layer(
            args.input_format,
            cfg_file_dissect.input_format,
            constants::DEFAULT_INPUT_FORMAT,
        );
        let fragmented = cfg_layer_bool_flag(
            args.fragmented,
            cfg_file_dissect.fragmented,
            constants::DEFAULT_FRAGMENTED,
        );
        let extension_checksum_probe = !cfg_layer_bool_flag(
            args.no_extension_checksum_probe,
            cfg_file_dissect.extension_checksum_probe.map(|probe| !probe),
            !constants::DEFAULT_EXTENSION_CHECKSUM_PROBE,
        );
        let log_format = cfg_layer(
            args.log_format,
            cfg_file_log.log_format,
            constants::DEFAULT_LOG_FORMAT,
        );
        let log_filter = cfg_layer(
            args.log_filter,
            cfg_file_log.log_filter,
            String::from(constants::DEFAULT_LOG_FILTER),
        );
        let log_span_events = cfg_layer(
            args.log_span_events,
            cfg_file_log.log_span_events,
            constants::DEFAULT_LOG_SPAN_EVENTS,
        );
        validate_fragmented(input_format, fragmented)?;
        Ok(Self {
            inputs: args.inputs,
            verbose,
            numeric,
            snaplen,
            input_format,
            fragmented,
            extension_checksum_probe,
            log: args.log,
            log_format,
            log_filter,
            log_span_events,
        })
    }
}

impl Default for IcmplensConfig {
    fn default() -> Self {
        Self {
            inputs: vec![],
            verbose: constants::DEFAULT_VERBOSE,
            numeric: constants::DEFAULT_NUMERIC,
            snaplen: constants::DEFAULT_SNAPLEN,
            input_format: constants::DEFAULT_INPUT_FORMAT,
            fragmented: constants::DEFAULT_FRAGMENTED,
            extension_checksum_probe: constants::DEFAULT_EXTENSION_CHECKSUM_PROBE,
            log: false,
            log_format: constants::DEFAULT_LOG_FORMAT,
            log_filter: String::from(constants::DEFAULT_LOG_FILTER),
            log_span_events: constants::DEFAULT_LOG_SPAN_EVENTS,
        }
    }
}

fn cfg_layer<T>(fst: Option<T>, snd: Option<T>, def: T) -> T {
    match (fst, snd) {
        (Some(val), _) | (None, Some(val)) => val,
        (None, None) => def,
    }
}

const fn cfg_layer_bool_flag(fst: bool, snd: Option<bool>, default: bool) -> bool {
    match (fst, snd) {
        (true, _) => true,
        (false, Some(val)) => val,
        (false, None) => default,
    }
}

/// The fragmented flag only applies to packets which start with the `ICMP` header.
fn validate_fragmented(input_format: InputFormat, fragmented: bool) -> anyhow::Result<()> {
    match (input_format, fragmented) {
        (InputFormat::Ip, true) => Err(anyhow!(
            "fragmented may only be used with the icmp input format"
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::file::{ConfigDissect, ConfigLog};
    use test_case::test_case;

    #[test]
    fn test_config_default() {
        let args = parse("icmplens").unwrap();
        let config = IcmplensConfig::build_config(args, ConfigFile::default()).unwrap();
        pretty_assertions::assert_eq!(IcmplensConfig::default(), config);
    }

    #[test]
    fn test_config_empty_file() {
        let args = parse("icmplens").unwrap();
        let cfg_file = ConfigFile {
            dissect: None,
            log: None,
        };
        let config = IcmplensConfig::build_config(args, cfg_file).unwrap();
        pretty_assertions::assert_eq!(IcmplensConfig::default(), config);
    }

    #[test_case("icmplens a.hex b.hex", &["a.hex", "b.hex"]; "two inputs")]
    #[test_case("icmplens -", &["-"]; "stdin input")]
    fn test_inputs(cmd: &str, expected: &[&str]) {
        let config = parse_config(cmd).unwrap();
        assert_eq!(expected, config.inputs);
    }

    #[test_case("icmplens", 0; "default verbose")]
    #[test_case("icmplens -v", 1; "verbose")]
    #[test_case("icmplens -vvv", 3; "very verbose")]
    #[test_case("icmplens --verbose --verbose", 2; "verbose long")]
    fn test_verbose(cmd: &str, expected: u8) {
        assert_eq!(expected, parse_config(cmd).unwrap().verbose);
    }

    #[test_case("icmplens", 262_144; "default snaplen")]
    #[test_case("icmplens -s 96", 96; "short snaplen")]
    #[test_case("icmplens --snaplen 0", 262_144; "zero snaplen")]
    fn test_snaplen(cmd: &str, expected: usize) {
        assert_eq!(expected, parse_config(cmd).unwrap().snaplen);
    }

    #[test_case("icmplens", InputFormat::Ip; "default input format")]
    #[test_case("icmplens -f icmp", InputFormat::Icmp; "icmp input format")]
    #[test_case("icmplens --input-format ip", InputFormat::Ip; "ip input format")]
    fn test_input_format(cmd: &str, expected: InputFormat) {
        assert_eq!(expected, parse_config(cmd).unwrap().input_format);
    }

    #[test]
    fn test_fragmented() {
        assert!(parse_config("icmplens -f icmp --fragmented").unwrap().fragmented);
        let err = parse_config("icmplens --fragmented").unwrap_err();
        assert_eq!(
            "fragmented may only be used with the icmp input format",
            err.to_string()
        );
    }

    #[test]
    fn test_numeric() {
        assert!(!parse_config("icmplens").unwrap().numeric);
        assert!(parse_config("icmplens -n").unwrap().numeric);
    }

    #[test]
    fn test_extension_checksum_probe() {
        assert!(parse_config("icmplens").unwrap().extension_checksum_probe);
        assert!(
            !parse_config("icmplens --no-extension-checksum-probe")
                .unwrap()
                .extension_checksum_probe
        );
    }

    #[test]
    fn test_log() {
        let config =
            parse_config("icmplens --log --log-format json --log-span-events active").unwrap();
        assert!(config.log);
        assert_eq!(LogFormat::Json, config.log_format);
        assert_eq!(LogSpanEvents::Active, config.log_span_events);
        assert_eq!("icmplens=debug", config.log_filter);
    }

    #[test]
    fn test_file_values() {
        let cfg_file = ConfigFile {
            dissect: Some(ConfigDissect {
                verbose: Some(2),
                numeric: Some(true),
                snaplen: Some(128),
                input_format: Some(InputFormat::Icmp),
                fragmented: Some(true),
                extension_checksum_probe: Some(false),
            }),
            log: Some(ConfigLog {
                log_format: Some(LogFormat::Compact),
                log_filter: Some(String::from("icmplens_core=trace")),
                log_span_events: Some(LogSpanEvents::Full),
            }),
        };
        let config = IcmplensConfig::build_config(parse("icmplens").unwrap(), cfg_file).unwrap();
        let expected = IcmplensConfig {
            verbose: 2,
            numeric: true,
            snaplen: 128,
            input_format: InputFormat::Icmp,
            fragmented: true,
            extension_checksum_probe: false,
            log_format: LogFormat::Compact,
            log_filter: String::from("icmplens_core=trace"),
            log_span_events: LogSpanEvents::Full,
            ..IcmplensConfig::default()
        };
        pretty_assertions::assert_eq!(expected, config);
    }

    #[test]
    fn test_args_override_file() {
        let cfg_file = ConfigFile {
            dissect: Some(ConfigDissect {
                verbose: Some(2),
                snaplen: Some(128),
                input_format: Some(InputFormat::Icmp),
                ..ConfigDissect::default()
            }),
            log: None,
        };
        let args = parse("icmplens -v -s 64 -f ip").unwrap();
        let config = IcmplensConfig::build_config(args, cfg_file).unwrap();
        assert_eq!(1, config.verbose);
        assert_eq!(64, config.snaplen);
        assert_eq!(InputFormat::Ip, config.input_format);
    }

    #[test]
    fn test_print_config_template() {
        let action = IcmplensAction::from(parse("icmplens --print-config-template").unwrap());
        assert_eq!(IcmplensAction::PrintConfigTemplate, action.unwrap());
    }

    #[test]
    fn test_dissect_config() {
        let config = IcmplensConfig {
            verbose: 2,
            extension_checksum_probe: false,
            ..IcmplensConfig::default()
        };
        assert_eq!(
            DissectConfig {
                verbose: 2,
                extension_checksum_probe: false
            },
            config.dissect_config()
        );
    }

    fn parse_config(cmd: &str) -> anyhow::Result<IcmplensConfig> {
        IcmplensConfig::build_config(parse(cmd)?, ConfigFile::default())
    }

    fn parse(cmd: &str) -> anyhow::Result<Args> {
        use clap::Parser;
        Ok(Args::try_parse_from(
            cmd.split(' ').map(std::ffi::OsString::from),
        )?)
    }
}
