pub const FIELD_COUNT: usize = 11;

/// The schedule table's columns, in display order. This is the single
/// authoritative name/index/label mapping; every component that needs a
/// column goes through it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Field {
    Type,
    Code,
    Start,
    Doy,
    Dur,
    Stations,
    DbCode,
    OpsCenter,
    Correlator,
    Status,
    Analysis,
}

impl Field {
    pub const ALL: [Self; FIELD_COUNT] = [
        Self::Type,
        Self::Code,
        Self::Start,
        Self::Doy,
        Self::Dur,
        Self::Stations,
        Self::DbCode,
        Self::OpsCenter,
        Self::Correlator,
        Self::Status,
        Self::Analysis,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Type => "Type",
            Self::Code => "Code",
            Self::Start => "Start",
            Self::Doy => "DOY",
            Self::Dur => "Dur",
            Self::Stations => "Stations",
            Self::DbCode => "DB Code",
            Self::OpsCenter => "Ops Center",
            Self::Correlator => "Correlator",
            Self::Status => "Status",
            Self::Analysis => "Analysis",
        }
    }

    /// Floor for the displayed column width; content and labels widen it.
    pub fn min_width(self) -> u16 {
        match self {
            Self::Type => 13,
            Self::Code => 8,
            Self::Start => 16,
            Self::Doy => 3,
            Self::Dur => 5,
            Self::Stations => 8,
            Self::DbCode => 9,
            Self::OpsCenter => 10,
            Self::Correlator => 10,
            Self::Status => 6,
            Self::Analysis => 8,
        }
    }

    /// Look up a column by its lowercased query name or alias.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "type" => Some(Self::Type),
            "code" => Some(Self::Code),
            "start" => Some(Self::Start),
            "doy" => Some(Self::Doy),
            "dur" => Some(Self::Dur),
            "stations" => Some(Self::Stations),
            "db code" | "db" => Some(Self::DbCode),
            "ops center" | "ops" => Some(Self::OpsCenter),
            "correlator" => Some(Self::Correlator),
            "status" => Some(Self::Status),
            "analysis" => Some(Self::Analysis),
            _ => None,
        }
    }
}

/// Station membership of one session. `active` and `removed` are disjoint
/// ordered code lists; the display column is rendered from them, never the
/// other way around.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StationSet {
    pub active: Vec<String>,
    pub removed: Vec<String>,
    pub intensive: bool,
}

impl StationSet {
    pub fn active_codes(&self) -> String {
        self.active.concat()
    }

    pub fn removed_codes(&self) -> String {
        self.removed.concat()
    }

    pub fn all_codes(&self) -> String {
        let mut codes = self.active_codes();
        codes.push_str(&self.removed_codes());
        codes
    }

    /// `"NsNn [Ft]"`, `"[Ft]"`, or `"NsNn"`.
    pub fn display(&self) -> String {
        let active = self.active_codes();
        let removed = self.removed_codes();
        match (active.is_empty(), removed.is_empty()) {
            (false, false) => format!("{active} [{removed}]"),
            (true, false) => format!("[{removed}]"),
            _ => active,
        }
    }
}

/// One schedule entry. Immutable once extracted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionRecord {
    pub fields: [String; FIELD_COUNT],
    pub detail_url: Option<String>,
    pub stations: StationSet,
}

impl SessionRecord {
    pub fn field(&self, field: Field) -> &str {
        &self.fields[field.index()]
    }

    /// The stations cell as shown: the stored "active [removed]" rendering,
    /// or the active codes alone when removed stations are hidden.
    pub fn stations_text(&self, show_removed: bool) -> String {
        if show_removed {
            self.field(Field::Stations).to_string()
        } else {
            self.stations.active_codes()
        }
    }
}

/// Which schedule pages to load.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scope {
    Master,
    Intensive,
    Both,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_display_renders_both_sides() {
        let both = StationSet {
            active: vec!["Ns".to_string(), "Nn".to_string()],
            removed: vec!["Ft".to_string()],
            intensive: false,
        };
        assert_eq!(both.display(), "NsNn [Ft]");

        let removed_only = StationSet {
            active: Vec::new(),
            removed: vec!["Ft".to_string()],
            intensive: false,
        };
        assert_eq!(removed_only.display(), "[Ft]");

        let active_only = StationSet {
            active: vec!["Ns".to_string()],
            removed: Vec::new(),
            intensive: false,
        };
        assert_eq!(active_only.display(), "Ns");
    }

    #[test]
    fn field_aliases_resolve() {
        assert_eq!(Field::from_name("db"), Some(Field::DbCode));
        assert_eq!(Field::from_name("db code"), Some(Field::DbCode));
        assert_eq!(Field::from_name("ops"), Some(Field::OpsCenter));
        assert_eq!(Field::from_name("ops center"), Some(Field::OpsCenter));
        assert_eq!(Field::from_name("bogus"), None);
    }

    #[test]
    fn field_indices_match_display_order() {
        for (position, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), position);
        }
    }
}
