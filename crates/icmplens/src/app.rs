use crate::config::{IcmplensConfig, InputFormat, LogFormat, LogSpanEvents};
use crate::input;
use anyhow::Context;
use icmplens_core::{Dissector, Ipv4Decoder, NameResolver, NumericNames, Outcome, ServiceNames};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use tracing_subscriber::fmt::format::FmtSpan;

/// The marker printed after a packet whose decode stopped at a field which was not captured.
const TRUNCATED_MARKER: &str = " [|icmp]";

/// Run the dissector over every input.
pub fn run(cfg: &IcmplensConfig) -> anyhow::Result<()> {
    configure_logging(cfg);
    let names: &dyn NameResolver = if cfg.numeric {
        &NumericNames
    } else {
        &ServiceNames
    };
    let dissector = Dissector::new(cfg.dissect_config(), names, &Ipv4Decoder);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if cfg.inputs.is_empty() {
        process(&dissector, cfg, "<stdin>", io::stdin().lock(), &mut out)?;
    }
    for input in &cfg.inputs {
        if input == "-" {
            process(&dissector, cfg, "<stdin>", io::stdin().lock(), &mut out)?;
        } else {
            let file =
                File::open(input).with_context(|| format!("input file not found: {input}"))?;
            process(&dissector, cfg, input, BufReader::new(file), &mut out)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Print the sample config file.
pub fn print_config_template() {
    println!("{}", include_str!("../icmplens-config-sample.toml"));
}

/// Dissect each packet of one input.
///
/// Lines which are not valid hex are reported on stderr and skipped.
fn process<R: BufRead>(
    dissector: &Dissector<'_>,
    cfg: &IcmplensConfig,
    name: &str,
    reader: R,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {name}"))?;
        match input::parse_line(&line) {
            Ok(Some(packet)) => print_packet(dissector, cfg, out, &packet)?,
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(input = name, line = index + 1, %err, "skipping invalid line");
                eprintln!("{name}:{}: {err}", index + 1);
            }
        }
    }
    Ok(())
}

/// Dissect one packet, limited to the snap length, and end it with a newline.
fn print_packet(
    dissector: &Dissector<'_>,
    cfg: &IcmplensConfig,
    out: &mut dyn Write,
    packet: &[u8],
) -> io::Result<()> {
    let captured = &packet[..packet.len().min(cfg.snaplen)];
    let outcome = match cfg.input_format {
        InputFormat::Ip => dissector.dissect_ip(out, captured, packet.len())?,
        InputFormat::Icmp => {
            dissector.dissect_icmp(out, captured, packet.len(), cfg.fragmented)?
        }
    };
    if outcome == Outcome::Truncated {
        write!(out, "{TRUNCATED_MARKER}")?;
    }
    writeln!(out)
}

fn configure_logging(cfg: &IcmplensConfig) {
    if cfg.log {
        let fmt_span = match cfg.log_span_events {
            LogSpanEvents::Off => FmtSpan::NONE,
            LogSpanEvents::Active => FmtSpan::ACTIVE,
            LogSpanEvents::Full => FmtSpan::FULL,
        };
        match cfg.log_format {
            LogFormat::Compact => {
                tracing_subscriber::fmt()
                    .with_writer(io::stderr)
                    .with_span_events(fmt_span)
                    .with_env_filter(&cfg.log_filter)
                    .compact()
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::fmt()
                    .with_writer(io::stderr)
                    .with_span_events(fmt_span)
                    .with_env_filter(&cfg.log_filter)
                    .pretty()
                    .init();
            }
            LogFormat::Json => {
                tracing_subscriber::fmt()
                    .with_writer(io::stderr)
                    .with_span_events(fmt_span)
                    .with_env_filter(&cfg.log_filter)
                    .json()
                    .init();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const ECHO_REQUEST: &str = "45 00 00 1c 10 92 40 00 40 01 32 b7 c0 a8 01 15 \
                                5d b8 d8 22 08 00 f7 fd 00 01 00 01";

    fn dissect(cfg: &IcmplensConfig, input: &str) -> String {
        let dissector = Dissector::new(cfg.dissect_config(), &NumericNames, &Ipv4Decoder);
        let mut out = Vec::new();
        process(&dissector, cfg, "test", input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_ip_input() {
        let cfg = IcmplensConfig::default();
        assert_eq!(
            "IP 192.168.1.21 > 93.184.216.34: ICMP echo request, id 1, seq 1, length 8\n",
            dissect(&cfg, ECHO_REQUEST)
        );
    }

    #[test]
    fn test_icmp_input() {
        let cfg = IcmplensConfig {
            input_format: InputFormat::Icmp,
            ..IcmplensConfig::default()
        };
        let input = "# echo request\n08 00 f7 fd 00 01 00 01\n\n0x0000 0x1234 0x0001 0x0002\n";
        assert_eq!(
            "ICMP echo request, id 1, seq 1, length 8\nICMP echo reply, id 1, seq 2, length 8\n",
            dissect(&cfg, input)
        );
    }

    #[test_case(27, "IP 192.168.1.21 > 93.184.216.34:  [|icmp]\n"; "truncated sequence")]
    #[test_case(19, " [|icmp]\n"; "truncated ip header")]
    fn test_snaplen(snaplen: usize, expected: &str) {
        let cfg = IcmplensConfig {
            snaplen,
            ..IcmplensConfig::default()
        };
        assert_eq!(expected, dissect(&cfg, ECHO_REQUEST));
    }

    #[test]
    fn test_invalid_line_skipped() {
        let cfg = IcmplensConfig {
            input_format: InputFormat::Icmp,
            ..IcmplensConfig::default()
        };
        let input = "08 00 zz\n08 00 f7 fd 00 01 00 01\n";
        assert_eq!(
            "ICMP echo request, id 1, seq 1, length 8\n",
            dissect(&cfg, input)
        );
    }
}
