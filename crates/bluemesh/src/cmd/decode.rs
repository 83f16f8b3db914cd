use bluemesh_wire::{
    decode_command, decode_frame, decode_hub_message, decode_tracked_list, Address,
    ConfigRecord, TrackedDevice, WireConfig,
};

use crate::cmd::{parse_hex, DecodeArgs, RecordKind};
use crate::exit::{wire_error, CliResult, SUCCESS};
use crate::output::{
    print_view, AddressView, CommandView, ConfigView, FrameView, HubView, OutputFormat,
    TrackedListView, TrackedView,
};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = parse_hex(&args.hex)?;
    let config = if args.strict {
        WireConfig::strict()
    } else {
        WireConfig::default()
    };
    tracing::debug!(kind = ?args.kind, size = bytes.len(), strict = args.strict, "decoding");

    let fail = |err| wire_error("decode failed", err);
    match args.kind {
        RecordKind::Address => {
            let address = Address::decode(&bytes).map_err(fail)?;
            print_view(&AddressView::from(&address), format);
        }
        RecordKind::Frame => {
            let frame = decode_frame(&bytes, &config).map_err(fail)?;
            print_view(&FrameView::from(&frame), format);
        }
        RecordKind::Hub => {
            let message = decode_hub_message(&bytes, &config).map_err(fail)?;
            let body = message.body().map_err(fail)?;
            print_view(&HubView::new(&message, &body), format);
        }
        RecordKind::Config => {
            let record = ConfigRecord::decode(&bytes).map_err(fail)?;
            print_view(&ConfigView::from(&record), format);
        }
        RecordKind::Tracked => {
            let device = TrackedDevice::decode(&bytes).map_err(fail)?;
            print_view(&TrackedView::from(&device), format);
        }
        RecordKind::TrackedList => {
            let devices = decode_tracked_list(&bytes).map_err(fail)?;
            print_view(&TrackedListView::from(devices.as_slice()), format);
        }
        RecordKind::Command => {
            let command = decode_command(&bytes, &config).map_err(fail)?;
            print_view(&CommandView::from(&command), format);
        }
    }

    Ok(SUCCESS)
}
