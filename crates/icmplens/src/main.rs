#![allow(clippy::struct_excessive_bools)]
#![forbid(unsafe_code)]

use crate::config::{Args, IcmplensAction};
use clap::Parser;

mod app;
mod config;
mod input;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    match IcmplensAction::from(args)? {
        IcmplensAction::Dissect(cfg) => app::run(&cfg)?,
        IcmplensAction::PrintConfigTemplate => app::print_config_template(),
    }
    Ok(())
}
