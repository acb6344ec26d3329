use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::domain::{Field, SessionRecord};

const START_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

/// Parse a record's start field. Unparsable values get the earliest
/// representable instant so they sort first instead of erroring out.
pub fn parse_start(record: &SessionRecord) -> PrimitiveDateTime {
    PrimitiveDateTime::parse(record.field(Field::Start).trim(), START_FORMAT)
        .unwrap_or(PrimitiveDateTime::MIN)
}

/// Stable ascending chronological sort; ties keep their relative order.
pub fn sort_by_start(records: &mut [SessionRecord]) {
    records.sort_by_key(parse_start);
}

/// Position of the first record starting at or after `now`. Falls back to
/// the last position when everything is in the past, and 0 when empty.
pub fn index_on_or_after<'a, I>(records: I, now: PrimitiveDateTime) -> usize
where
    I: IntoIterator<Item = &'a SessionRecord>,
{
    let mut last = 0;
    for (position, record) in records.into_iter().enumerate() {
        if parse_start(record) >= now {
            return position;
        }
        last = position;
    }
    last
}
