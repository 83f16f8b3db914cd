use bluemesh_wire::clock::unix_now;
use bluemesh_wire::{ClockConfig, PartialClock};
use chrono::{Datelike, Local, NaiveDate, Offset, TimeZone, Utc};

use crate::cmd::ReconstructArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_view, OutputFormat, ReconstructView};

pub fn run(args: ReconstructArgs, format: OutputFormat) -> CliResult<i32> {
    let utc_offset_secs = args.utc_offset.unwrap_or_else(local_standard_offset);
    let clock = PartialClock::new(ClockConfig { utc_offset_secs });

    let reference = args.reference.unwrap_or_else(unix_now);
    let reconstructed = clock.reconstruct(reference, args.partial);
    tracing::debug!(reference, utc_offset_secs, reconstructed, "reconstructed");

    print_view(
        &ReconstructView {
            reference,
            partial: args.partial,
            utc_offset_secs,
            reconstructed,
        },
        format,
    );
    Ok(SUCCESS)
}

/// Standard (non-daylight-saving) offset of the local time zone, in seconds.
fn local_standard_offset() -> i32 {
    standard_offset(&Local, Utc::now().year())
        .unwrap_or_else(|| Local::now().offset().local_minus_utc())
}

/// Nodes keep standard time all year, so daylight saving is excluded by taking
/// the smaller of the January and July offsets (DST only ever adds).
fn standard_offset<Tz: TimeZone>(tz: &Tz, year: i32) -> Option<i32> {
    let offset_on = |month: u32| -> Option<i32> {
        let instant = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
        Some(tz.offset_from_utc_datetime(&instant).fix().local_minus_utc())
    };
    Some(offset_on(1)?.min(offset_on(7)?))
}
