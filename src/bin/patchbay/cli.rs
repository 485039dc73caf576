//! Command-line configuration

use std::path::PathBuf;

use clap::Parser;
use patchbay::{io::DEFAULT_SCALER, MAX_BLOCK_SIZE};
use tracing::Level;

#[derive(Debug, Parser)]
#[command(name = "patchbay", version, about = "Play a text-patched modular synth")]
pub struct Cli {
    /// Patch file, one module definition per line
    #[arg(default_value = "patch.txt")]
    pub patch: PathBuf,

    /// Frames rendered per block
    #[arg(long, default_value_t = 512, value_parser = parse_block_size)]
    pub block_size: usize,

    /// Render this many blocks offline instead of playing
    #[arg(long)]
    pub blocks: Option<u64>,

    /// Record an instance to a WAV file (repeatable)
    #[arg(long, value_name = "NAME=PATH", value_parser = parse_record)]
    pub record: Vec<RecordTarget>,

    /// Sample scale applied when recording
    #[arg(long, default_value_t = DEFAULT_SCALER)]
    pub scaler: f32,

    /// Hold a control axis at a value (repeatable)
    #[arg(long, value_name = "AXIS=VALUE", value_parser = parse_axis)]
    pub axis: Vec<AxisValue>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordTarget {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy)]
pub struct AxisValue {
    pub axis: i64,
    pub value: f32,
}

fn split_pair(s: &str) -> Result<(&str, &str), String> {
    s.split_once('=')
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))
}

fn parse_record(s: &str) -> Result<RecordTarget, String> {
    let (name, path) = split_pair(s)?;
    Ok(RecordTarget {
        name: name.to_owned(),
        path: PathBuf::from(path),
    })
}

fn parse_axis(s: &str) -> Result<AxisValue, String> {
    let (axis, value) = split_pair(s)?;
    Ok(AxisValue {
        axis: axis.parse().map_err(|_| format!("invalid axis `{axis}`"))?,
        value: value.parse().map_err(|_| format!("invalid value `{value}`"))?,
    })
}

fn parse_block_size(s: &str) -> Result<usize, String> {
    let frames: usize = s.parse().map_err(|_| format!("invalid block size `{s}`"))?;
    if frames == 0 || frames > MAX_BLOCK_SIZE {
        return Err(format!("block size must be between 1 and {MAX_BLOCK_SIZE}"));
    }
    Ok(frames)
}
