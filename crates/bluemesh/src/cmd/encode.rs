use std::fs::OpenOptions;
use std::path::Path;

use bluemesh_wire::{
    Address, ConfigRecord, Frame, FrameWriter, HubMessage, MeshCommand, TrackedDevice,
};

use crate::cmd::{parse_hex, EncodeCommand};
use crate::exit::{io_error, wire_error, CliResult, SUCCESS};
use crate::output::{print_view, EncodedView, OutputFormat};

pub fn run(command: EncodeCommand, format: OutputFormat) -> CliResult<i32> {
    let fail = |err| wire_error("encode failed", err);

    let (record, bytes) = match command {
        EncodeCommand::Frame(args) => {
            let mut frame = Frame::new(args.opcode, args.handle, parse_hex(&args.data)?)
                .map_err(fail)?;
            if let Some(declared) = args.data_length {
                frame.data_length = declared;
            }
            if let Some(path) = &args.append {
                append_frame(path, &frame)?;
            }
            ("frame", frame.encode().to_vec())
        }
        EncodeCommand::Hub(args) => {
            let source = Address::parse(&args.source).map_err(fail)?;
            let message = HubMessage::new(
                args.opcode,
                args.handle,
                source,
                args.message_type,
                parse_hex(&args.payload)?,
            );
            let frame = message.to_frame().map_err(fail)?;
            if let Some(path) = &args.append {
                append_frame(path, &frame)?;
            }
            ("hub", frame.encode().to_vec())
        }
        EncodeCommand::Config(args) => {
            let record = ConfigRecord::new(args.config_type, parse_hex(&args.payload)?)
                .map_err(fail)?;
            ("config", record.encode().map_err(fail)?.to_vec())
        }
        EncodeCommand::Tracked(args) => {
            let address = Address::parse(&args.address).map_err(fail)?;
            ("tracked", TrackedDevice::new(address, args.rssi).encode().to_vec())
        }
        EncodeCommand::Command(args) => {
            let target = Address::parse(&args.target).map_err(fail)?;
            let command = MeshCommand::new(
                args.channel,
                target,
                args.message_type,
                parse_hex(&args.payload)?,
            );
            ("command", command.encode().map_err(fail)?.to_vec())
        }
    };

    tracing::debug!(record, size = bytes.len(), "encoded");
    print_view(&EncodedView::new(record, &bytes), format);
    Ok(SUCCESS)
}

fn append_frame(path: &Path, frame: &Frame) -> CliResult<()> {
    let context = format!("failed opening {}", path.display());
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| io_error(&context, err))?;

    let mut writer = FrameWriter::new(file);
    writer
        .write_frame(frame)
        .map_err(|err| wire_error("append failed", err))?;
    tracing::info!(path = %path.display(), size = frame.wire_size(), "appended frame");
    Ok(())
}
