use crate::domain::{Field, SessionRecord};

/// Which membership list a reserved `stations*` clause reads.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StationSide {
    Active,
    Removed,
    All,
}

/// A parsed filter query: `;`-separated clauses, all of which must match.
///
/// Grammar, shared by every fielded clause:
/// - `|` (or `||`) separates OR-groups inside a field value;
/// - `&` (or `&&`), space, comma and plus separate AND-tokens inside a group;
/// - tokens match by raw substring containment.
///
/// Station clauses (`stations`, `stations_removed`, `stations_all`) match
/// case-sensitively against the membership code strings; every other clause
/// matches case-insensitively against the display field, and a clause with
/// no `:` matches case-insensitively against any field.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FilterQuery {
    clauses: Vec<Clause>,
}

impl FilterQuery {
    pub fn parse(query: &str) -> Self {
        let clauses = query
            .split(';')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(Clause::parse)
            .collect();
        Self { clauses }
    }

    pub fn matches(&self, record: &SessionRecord) -> bool {
        self.clauses.iter().all(|clause| clause.matches(record))
    }

    /// Station codes referenced by any `stations*` clause, deduplicated and
    /// ordered longest-first so highlight painting can claim long matches
    /// before shorter overlapping ones.
    pub fn highlight_tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self
            .clauses
            .iter()
            .filter_map(|clause| match clause {
                Clause::Stations { expr, .. } => Some(expr.tokens()),
                _ => None,
            })
            .flatten()
            .collect();
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        tokens.dedup();
        tokens
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Clause {
    /// Needle (lowercased) searched in every display field.
    FreeText(String),
    /// Expression against one display field, case-insensitive.
    Display { field: Field, expr: Expr },
    /// Expression against station membership, case-sensitive.
    Stations { side: StationSide, expr: Expr },
    /// Unrecognized field name: matches nothing by rule.
    Unknown,
}

impl Clause {
    fn parse(piece: &str) -> Self {
        let Some((name, value)) = piece.split_once(':') else {
            return Self::FreeText(piece.to_lowercase());
        };

        let name = name.trim().to_lowercase();
        let value = value.trim();
        match name.as_str() {
            "stations" | "stations_active" | "stations-active" => Self::Stations {
                side: StationSide::Active,
                expr: Expr::parse(value, false),
            },
            "stations_removed" | "stations-removed" => Self::Stations {
                side: StationSide::Removed,
                expr: Expr::parse(value, false),
            },
            "stations_all" | "stations-all" => Self::Stations {
                side: StationSide::All,
                expr: Expr::parse(value, false),
            },
            _ => match Field::from_name(&name) {
                Some(field) => Self::Display {
                    field,
                    expr: Expr::parse(value, true),
                },
                None => Self::Unknown,
            },
        }
    }

    fn matches(&self, record: &SessionRecord) -> bool {
        match self {
            Self::FreeText(needle) => record
                .fields
                .iter()
                .any(|value| value.to_lowercase().contains(needle.as_str())),
            Self::Display { field, expr } => expr.matches(&record.field(*field).to_lowercase()),
            Self::Stations { side, expr } => {
                let haystack = match side {
                    StationSide::Active => record.stations.active_codes(),
                    StationSide::Removed => record.stations.removed_codes(),
                    StationSide::All => record.stations.all_codes(),
                };
                expr.matches(&haystack)
            }
            Self::Unknown => false,
        }
    }
}

/// Two-level boolean expression: an OR-list of AND-token groups.
#[derive(Clone, Debug, Eq, PartialEq)]
enum Expr {
    /// The value was empty: no constraint.
    Vacuous,
    /// At least one group must have all of its tokens in the haystack. An
    /// empty group list (operators but no tokens) matches nothing.
    Groups(Vec<Vec<String>>),
}

impl Expr {
    fn parse(value: &str, lowercase: bool) -> Self {
        let text = value.trim();
        if text.is_empty() {
            return Self::Vacuous;
        }

        // Splitting on the single separator and dropping empty pieces treats
        // `|`/`||` and `&`/`&&` alike.
        let mut groups = Vec::new();
        for part in text.split('|') {
            let tokens: Vec<String> = part
                .split('&')
                .flat_map(|chunk| chunk.split([' ', ',', '+']))
                .filter(|token| !token.is_empty())
                .map(|token| {
                    if lowercase {
                        token.to_lowercase()
                    } else {
                        token.to_string()
                    }
                })
                .collect();
            if !tokens.is_empty() {
                groups.push(tokens);
            }
        }
        Self::Groups(groups)
    }

    fn matches(&self, haystack: &str) -> bool {
        match self {
            Self::Vacuous => true,
            Self::Groups(groups) => groups
                .iter()
                .any(|tokens| tokens.iter().all(|token| haystack.contains(token.as_str()))),
        }
    }

    fn tokens(&self) -> Vec<String> {
        match self {
            Self::Vacuous => Vec::new(),
            Self::Groups(groups) => groups.iter().flatten().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FIELD_COUNT, StationSet};

    fn record(active: &[&str], removed: &[&str]) -> SessionRecord {
        let stations = StationSet {
            active: active.iter().map(|code| code.to_string()).collect(),
            removed: removed.iter().map(|code| code.to_string()).collect(),
            intensive: false,
        };
        let mut fields: [String; FIELD_COUNT] = Default::default();
        fields[Field::Type.index()] = "IVS-R1".to_string();
        fields[Field::Code.index()] = "R11234".to_string();
        fields[Field::Start.index()] = "2025-01-10 00:00".to_string();
        fields[Field::Stations.index()] = stations.display();
        fields[Field::Status.index()] = "Released".to_string();
        SessionRecord {
            fields,
            detail_url: None,
            stations,
        }
    }

    #[test]
    fn station_or_matches_either_code() {
        let query = FilterQuery::parse("stations: Ns|Nn");
        assert!(query.matches(&record(&["Ns"], &[])));
        assert!(query.matches(&record(&["Nn"], &[])));
        assert!(!query.matches(&record(&["Ht"], &[])));
    }

    #[test]
    fn station_and_requires_both_codes() {
        let query = FilterQuery::parse("stations: Ns&Nn");
        assert!(query.matches(&record(&["Ns", "Nn"], &[])));
        assert!(!query.matches(&record(&["Ns"], &[])));
        assert!(!query.matches(&record(&["Nn"], &[])));
    }

    #[test]
    fn station_space_separator_means_and() {
        let spaced = FilterQuery::parse("stations: Ns Nn");
        let explicit = FilterQuery::parse("stations: Ns&Nn");
        for rec in [
            record(&["Ns", "Nn"], &[]),
            record(&["Ns"], &[]),
            record(&["Nn", "Ht"], &[]),
        ] {
            assert_eq!(spaced.matches(&rec), explicit.matches(&rec));
        }
    }

    #[test]
    fn doubled_operators_parse_like_single_ones() {
        let query = FilterQuery::parse("stations: Ns&&Nn||Ht");
        assert!(query.matches(&record(&["Ns", "Nn"], &[])));
        assert!(query.matches(&record(&["Ht"], &[])));
        assert!(!query.matches(&record(&["Ns"], &[])));
    }

    #[test]
    fn clauses_are_anded() {
        let combined = FilterQuery::parse("code: R1;stations: Ns");
        let code_only = FilterQuery::parse("code: R1");
        let stations_only = FilterQuery::parse("stations: Ns");
        let rec = record(&["Ns"], &[]);
        assert_eq!(
            combined.matches(&rec),
            code_only.matches(&rec) && stations_only.matches(&rec)
        );
        assert!(combined.matches(&rec));
        assert!(!combined.matches(&record(&["Ht"], &[])));
    }

    #[test]
    fn removed_and_all_sides_read_their_lists() {
        let rec = record(&["Aa"], &["Cc"]);
        assert!(FilterQuery::parse("stations_removed: Cc").matches(&rec));
        assert!(!FilterQuery::parse("stations: Cc").matches(&rec));
        assert!(FilterQuery::parse("stations_all: Cc").matches(&rec));
        assert!(FilterQuery::parse("stations_all: Aa").matches(&rec));
    }

    #[test]
    fn station_matching_is_case_sensitive() {
        let query = FilterQuery::parse("stations: ns");
        assert!(!query.matches(&record(&["Ns"], &[])));
    }

    #[test]
    fn display_field_matching_is_case_insensitive() {
        let query = FilterQuery::parse("status: released");
        assert!(query.matches(&record(&["Ns"], &[])));
        let aliased = FilterQuery::parse("CODE: r11");
        assert!(aliased.matches(&record(&["Ns"], &[])));
    }

    #[test]
    fn free_text_searches_every_field() {
        assert!(FilterQuery::parse("r1123").matches(&record(&["Ns"], &[])));
        assert!(!FilterQuery::parse("zz-nothing").matches(&record(&["Ns"], &[])));
    }

    #[test]
    fn unknown_field_matches_nothing() {
        let query = FilterQuery::parse("bogus: anything");
        assert!(!query.matches(&record(&["Ns"], &[])));
    }

    #[test]
    fn empty_expression_matches_everything() {
        let query = FilterQuery::parse("stations:");
        assert!(query.matches(&record(&["Ns"], &[])));
        assert!(query.matches(&record(&[], &[])));
    }

    #[test]
    fn operator_only_expression_matches_nothing() {
        for text in ["stations: |", "stations: &", "stations: ,|,"] {
            let query = FilterQuery::parse(text);
            assert!(!query.matches(&record(&["Ns"], &[])), "query {text:?}");
        }
    }

    #[test]
    fn empty_clauses_are_dropped() {
        let query = FilterQuery::parse(" ; ;; ");
        assert_eq!(query, FilterQuery::parse(""));
        assert!(query.matches(&record(&["Ns"], &[])));
    }

    #[test]
    fn highlight_tokens_dedupe_longest_first() {
        let query = FilterQuery::parse("stations: Ns|Kokee&Ns; stations_removed: Ft");
        assert_eq!(
            query.highlight_tokens(),
            vec!["Kokee".to_string(), "Ft".to_string(), "Ns".to_string()]
        );
    }

    #[test]
    fn non_station_clauses_contribute_no_highlight_tokens() {
        let query = FilterQuery::parse("code: R1|R4");
        assert!(query.highlight_tokens().is_empty());
    }
}
