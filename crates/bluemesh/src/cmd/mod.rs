use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod dump;
pub mod encode;
pub mod reconstruct;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a hex-encoded record.
    Decode(DecodeArgs),
    /// Encode a record from its fields.
    #[command(subcommand)]
    Encode(EncodeCommand),
    /// Decode every envelope in a capture of back-to-back frames.
    Dump(DumpArgs),
    /// Reconstruct a full timestamp from a 16-bit partial timestamp.
    Reconstruct(ReconstructArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Encode(command) => encode::run(command, format),
        Command::Dump(args) => dump::run(args, format),
        Command::Reconstruct(args) => reconstruct::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RecordKind {
    Address,
    Frame,
    Hub,
    Config,
    Tracked,
    TrackedList,
    Command,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Record layout to decode.
    #[arg(value_enum)]
    pub kind: RecordKind,
    /// Hex bytes (separators ' ', ':' and '-' and a 0x prefix are ignored).
    pub hex: String,
    /// Fail when a declared length disagrees with the bytes present.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Subcommand, Debug)]
pub enum EncodeCommand {
    /// Generic envelope.
    Frame(EncodeFrameArgs),
    /// Hub message inside an envelope.
    Hub(EncodeHubArgs),
    /// Configuration record.
    Config(EncodeConfigArgs),
    /// Tracked device record.
    Tracked(EncodeTrackedArgs),
    /// Mesh command message.
    Command(EncodeMeshCommandArgs),
}

#[derive(Args, Debug)]
pub struct EncodeFrameArgs {
    #[arg(long, value_parser = parse_num::<u8>)]
    pub opcode: u8,
    #[arg(long, value_parser = parse_num::<u16>, default_value = "0")]
    pub handle: u16,
    /// Data bytes as hex.
    #[arg(long, default_value = "")]
    pub data: String,
    /// Declared data length written verbatim. Default: the data size.
    #[arg(long, value_parser = parse_num::<u8>)]
    pub data_length: Option<u8>,
    /// Also append the frame to a capture file.
    #[arg(long, value_name = "FILE")]
    pub append: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EncodeHubArgs {
    #[arg(long, value_parser = parse_num::<u8>, default_value = "0")]
    pub opcode: u8,
    #[arg(long, value_parser = parse_num::<u16>, default_value = "0")]
    pub handle: u16,
    /// Source address (aa:bb:cc:dd:ee:ff). Default: broadcast.
    #[arg(long, default_value = "00:00:00:00:00:00")]
    pub source: String,
    #[arg(long = "type", value_parser = parse_num::<u16>)]
    pub message_type: u16,
    /// Payload bytes as hex.
    #[arg(long, default_value = "")]
    pub payload: String,
    /// Also append the frame to a capture file.
    #[arg(long, value_name = "FILE")]
    pub append: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EncodeConfigArgs {
    #[arg(long = "type", value_parser = parse_num::<u8>)]
    pub config_type: u8,
    /// Payload bytes as hex.
    #[arg(long, default_value = "")]
    pub payload: String,
}

#[derive(Args, Debug)]
pub struct EncodeTrackedArgs {
    /// Device address (aa:bb:cc:dd:ee:ff).
    #[arg(long)]
    pub address: String,
    /// RSSI threshold in dBm.
    #[arg(long, allow_hyphen_values = true)]
    pub rssi: i8,
}

#[derive(Args, Debug)]
pub struct EncodeMeshCommandArgs {
    #[arg(long, value_parser = parse_num::<u8>, default_value = "2")]
    pub channel: u8,
    /// Target address (aa:bb:cc:dd:ee:ff). Default: broadcast.
    #[arg(long, default_value = "00:00:00:00:00:00")]
    pub target: String,
    #[arg(long = "type", value_parser = parse_num::<u16>)]
    pub message_type: u16,
    /// Payload bytes as hex.
    #[arg(long, default_value = "")]
    pub payload: String,
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Capture file, or '-' for stdin.
    pub path: PathBuf,
    /// Interpret each frame as a hub message.
    #[arg(long)]
    pub hub: bool,
    /// Stop after N frames.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ReconstructArgs {
    /// Low 16 bits of the node clock.
    #[arg(long, value_parser = parse_num::<u16>)]
    pub partial: u16,
    /// Reference UTC timestamp in seconds. Default: now.
    #[arg(long, allow_hyphen_values = true)]
    pub reference: Option<i64>,
    /// Node time base offset from UTC in seconds. Default: local time zone.
    #[arg(long, allow_hyphen_values = true)]
    pub utc_offset: Option<i32>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse a decimal or `0x`-prefixed hexadecimal integer.
pub fn parse_num<T: TryFrom<u64>>(input: &str) -> Result<T, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(digits) => u64::from_str_radix(digits, 16),
        None => input.parse::<u64>(),
    };
    let value = parsed.map_err(|_| format!("invalid number: {input}"))?;
    T::try_from(value).map_err(|_| format!("value out of range: {input}"))
}

/// Parse hex bytes, ignoring common separators.
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let trimmed = input.trim();
    let digits: String = trimmed
        .strip_prefix("0x")
        .unwrap_or(trimmed)
        .chars()
        .filter(|c| !matches!(c, ' ' | ':' | '-' | '_'))
        .collect();
    hex::decode(&digits).map_err(|err| CliError::new(USAGE, format!("invalid hex {input:?}: {err}")))
}
