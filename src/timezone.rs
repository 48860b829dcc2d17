//! Display-time conversion for timestamps returned to clients.
//!
//! Asia/Jakarta has no daylight saving, so a fixed +07:00 offset is exact.

use time::{macros::format_description, macros::offset, OffsetDateTime, UtcOffset};

pub const ASIA_JAKARTA: UtcOffset = offset!(+7);

/// Renders a stored UTC timestamp as Jakarta wall-clock time, `YYYY-MM-DD HH:MM:SS`.
pub fn utc_to_asia_jakarta(at: OffsetDateTime) -> anyhow::Result<String> {
    let fmt = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    Ok(at.to_offset(ASIA_JAKARTA).format(fmt)?)
}

/// RFC 3339 rendering in UTC, used where no display conversion applies.
pub fn rfc3339_utc(at: OffsetDateTime) -> anyhow::Result<String> {
    Ok(at
        .to_offset(UtcOffset::UTC)
        .format(&time::format_description::well_known::Rfc3339)?)
}
