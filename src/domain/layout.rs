use unicode_width::UnicodeWidthStr;

use crate::domain::{FIELD_COUNT, Field, SessionRecord};

/// Marker right-packed into the type column for intensive-schedule sessions.
pub const INTENSIVE_MARKER: &str = "[I]";

pub const COLUMN_SEPARATOR: &str = " | ";

/// Display widths for every column, derived from the currently visible rows.
/// Always rebuilt from scratch when the visible set or the removed-stations
/// toggle changes, never patched incrementally.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ColumnLayout {
    pub widths: [u16; FIELD_COUNT],
}

impl ColumnLayout {
    pub fn compute<'a, I>(visible: I, show_removed: bool) -> Self
    where
        I: IntoIterator<Item = &'a SessionRecord>,
    {
        let mut widths = [0usize; FIELD_COUNT];
        for field in Field::ALL {
            widths[field.index()] = usize::from(field.min_width()).max(field.label().width());
        }

        let mut any_intensive = false;
        for record in visible {
            any_intensive |= record.stations.intensive;
            for field in Field::ALL {
                let value_width = match field {
                    Field::Stations => record.stations_text(show_removed).width(),
                    _ => record.field(field).width(),
                };
                let width = &mut widths[field.index()];
                *width = (*width).max(value_width);
            }
        }

        if any_intensive {
            widths[Field::Type.index()] += INTENSIVE_MARKER.width();
        }

        let mut out = Self::default();
        for (index, width) in widths.into_iter().enumerate() {
            out.widths[index] = width.min(usize::from(u16::MAX)) as u16;
        }
        out
    }

    pub fn width(&self, field: Field) -> usize {
        usize::from(self.widths[field.index()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationSet;

    fn record(code: &str, active: &[&str], removed: &[&str], intensive: bool) -> SessionRecord {
        let stations = StationSet {
            active: active.iter().map(|c| c.to_string()).collect(),
            removed: removed.iter().map(|c| c.to_string()).collect(),
            intensive,
        };
        let mut fields: [String; FIELD_COUNT] = Default::default();
        fields[Field::Code.index()] = code.to_string();
        fields[Field::Stations.index()] = stations.display();
        SessionRecord {
            fields,
            detail_url: None,
            stations,
        }
    }

    #[test]
    fn minimum_and_label_widths_hold_for_empty_sets() {
        let records: Vec<SessionRecord> = Vec::new();
        let layout = ColumnLayout::compute(&records, true);
        for field in Field::ALL {
            assert!(layout.width(field) >= usize::from(field.min_width()));
            assert!(layout.width(field) >= field.label().len());
        }
        // "DB Code" is 7 wide as a label but has a 9-column minimum.
        assert_eq!(layout.width(Field::DbCode), 9);
    }

    #[test]
    fn content_wider_than_minimum_wins() {
        let records = vec![record(
            "a-session-code-way-beyond-eight",
            &["Ns"],
            &[],
            false,
        )];
        let layout = ColumnLayout::compute(&records, true);
        assert_eq!(
            layout.width(Field::Code),
            "a-session-code-way-beyond-eight".len()
        );
    }

    #[test]
    fn stations_width_follows_the_removed_toggle() {
        let records = vec![record(
            "r1",
            &["Aa", "Bb", "Cc", "Dd"],
            &["Ee", "Ff", "Gg", "Hh", "Ii", "Jj"],
            false,
        )];
        let with_removed = ColumnLayout::compute(&records, true);
        let active_only = ColumnLayout::compute(&records, false);
        assert_eq!(
            with_removed.width(Field::Stations),
            "AaBbCcDd [EeFfGgHhIiJj]".len()
        );
        assert_eq!(active_only.width(Field::Stations), 8);
    }

    #[test]
    fn intensive_rows_reserve_marker_space() {
        let plain = vec![record("r1", &["Ns"], &[], false)];
        let mixed = vec![
            record("r1", &["Ns"], &[], false),
            record("i1", &["Kk"], &[], true),
        ];
        let plain_layout = ColumnLayout::compute(&plain, true);
        let mixed_layout = ColumnLayout::compute(&mixed, true);
        assert_eq!(
            mixed_layout.width(Field::Type),
            plain_layout.width(Field::Type) + INTENSIVE_MARKER.len()
        );
    }
}
