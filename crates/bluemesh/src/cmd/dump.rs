use std::fs::File;
use std::io::Read;

use bluemesh_wire::{FrameReader, HubMessage};

use crate::cmd::DumpArgs;
use crate::exit::{io_error, wire_error, CliResult, SUCCESS};
use crate::output::{print_view, FrameView, HubView, OutputFormat};

pub fn run(args: DumpArgs, format: OutputFormat) -> CliResult<i32> {
    let source: Box<dyn Read> = if args.path.as_os_str() == "-" {
        Box::new(std::io::stdin().lock())
    } else {
        let file = File::open(&args.path).map_err(|err| {
            io_error(&format!("failed opening {}", args.path.display()), err)
        })?;
        Box::new(file)
    };

    let limit = args.count.unwrap_or(usize::MAX);
    let mut reader = FrameReader::new(source);
    let mut seen = 0usize;

    while seen < limit {
        let Some(frame) = reader
            .read_frame()
            .map_err(|err| wire_error(&format!("frame {seen} unreadable"), err))?
        else {
            break;
        };

        if args.hub {
            let message = HubMessage::from_frame(&frame)
                .map_err(|err| wire_error(&format!("frame {seen} is not a hub message"), err))?;
            let body = message
                .body()
                .map_err(|err| wire_error(&format!("frame {seen} payload invalid"), err))?;
            print_view(&HubView::new(&message, &body), format);
        } else {
            print_view(&FrameView::from(&frame), format);
        }
        seen += 1;
    }

    tracing::info!(frames = seen, "dump complete");
    Ok(SUCCESS)
}
