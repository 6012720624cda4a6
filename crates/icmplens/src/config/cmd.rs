use crate::config::{InputFormat, LogFormat, LogSpanEvents};
use clap::builder::Styles;
use clap::{ArgAction, Parser};

/// Print ICMPv4 messages captured as hex
#[derive(Parser, Debug)]
#[command(name = "icmplens", author, version, about, long_about = None, styles=Styles::styled())]
pub struct Args {
    /// Files of hex encoded packets, one per line [default: stdin]
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub inputs: Vec<String>,

    /// Config file
    #[arg(short = 'c', long, value_hint = clap::ValueHint::FilePath)]
    pub config_file: Option<String>,

    /// Print more detail, may be repeated [default: 0]
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print addresses and ports as numbers [default: false]
    #[arg(short = 'n', long)]
    pub numeric: bool,

    /// Decode at most this many bytes of each packet, 0 for the maximum [default: 262144]
    #[arg(short = 's', long)]
    pub snaplen: Option<usize>,

    /// The first header of each packet [default: ip]
    #[arg(value_enum, short = 'f', long)]
    pub input_format: Option<InputFormat>,

    /// Treat each icmp packet as part of a fragmented datagram [default: false]
    #[arg(long)]
    pub fragmented: bool,

    /// Do not detect extensions by checksum when the ICMP length field is zero
    #[arg(long)]
    pub no_extension_checksum_probe: bool,

    /// Print a template toml config file and exit
    #[arg(long)]
    pub print_config_template: bool,

    /// Enable debug logging to stderr
    #[arg(long)]
    pub log: bool,

    /// The debug log format [default: pretty]
    #[arg(value_enum, long)]
    pub log_format: Option<LogFormat>,

    /// The debug log filter [default: icmplens=debug]
    #[arg(long)]
    pub log_filter: Option<String>,

    /// The debug log span events [default: off]
    #[arg(value_enum, long)]
    pub log_span_events: Option<LogSpanEvents>,
}
