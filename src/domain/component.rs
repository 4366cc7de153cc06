//! Component records and board-type index rendering.

use serde::{Deserialize, Serialize};

/// Starting point for the board-type index appended to a prefix.
///
/// Legacy records stored either a single integer or a list, so this
/// serializes untagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefixStart {
    /// The index counts up from this value.
    Offset(u32),
    /// Explicit per-unit values, cycled when a bus holds more units.
    Sequence(Vec<u32>),
}

impl PrefixStart {
    /// Parse a CLI spec: either `"5"` or `"1,2,3"`.
    pub fn parse(spec: &str) -> Option<Self> {
        if spec.contains(',') {
            let values: Option<Vec<u32>> = spec
                .split(',')
                .map(|part| part.trim().parse().ok())
                .collect();
            values.filter(|v| !v.is_empty()).map(PrefixStart::Sequence)
        } else {
            spec.trim().parse().ok().map(PrefixStart::Offset)
        }
    }

    /// Index for the `unit`-th element of a bus (zero-based).
    fn index_for(&self, unit: usize) -> u32 {
        match self {
            PrefixStart::Offset(start) => start + unit as u32,
            PrefixStart::Sequence(values) => values[unit % values.len()],
        }
    }
}

/// A registered component of the production database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub code_12nc: String,
    /// Counter for the next serial to issue; `None` lets the registry decide.
    #[serde(default)]
    pub serial_start: Option<u32>,
    /// Prefix for the board-type column, e.g. `SL`.
    #[serde(default)]
    pub board_prefix: Option<String>,
    /// When false the prefix is written without an index.
    #[serde(default = "default_indexed")]
    pub indexed: bool,
    /// Missing in legacy records; deserializes to `None`.
    #[serde(default)]
    pub prefix_start: Option<PrefixStart>,
}

fn default_indexed() -> bool {
    true
}

impl Component {
    pub fn new(name: impl Into<String>, code_12nc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code_12nc: code_12nc.into(),
            serial_start: None,
            board_prefix: None,
            indexed: true,
            prefix_start: None,
        }
    }
}

/// Render the board-type cell for the `unit`-th element of a bus.
///
/// The index restarts at every bus; without a prefix the cell stays empty,
/// without indexing the bare prefix is written.
pub fn board_type(
    prefix: Option<&str>,
    indexed: bool,
    prefix_start: Option<&PrefixStart>,
    unit: usize,
) -> String {
    let Some(prefix) = prefix else {
        return String::new();
    };
    if prefix.is_empty() {
        return String::new();
    }
    if !indexed {
        return prefix.to_string();
    }
    let index = match prefix_start {
        Some(start) => start.index_for(unit),
        None => unit as u32 + 1,
    };
    format!("{prefix}{index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offset_and_sequence_specs() {
        assert_eq!(PrefixStart::parse("5"), Some(PrefixStart::Offset(5)));
        assert_eq!(
            PrefixStart::parse("1, 2,3"),
            Some(PrefixStart::Sequence(vec![1, 2, 3]))
        );
        assert_eq!(PrefixStart::parse("x"), None);
        assert_eq!(PrefixStart::parse("1,x"), None);
    }

    #[test]
    fn board_type_defaults_start_at_one() {
        assert_eq!(board_type(Some("SL"), true, None, 0), "SL1");
        assert_eq!(board_type(Some("SL"), true, None, 2), "SL3");
    }

    #[test]
    fn board_type_offset_counts_from_start() {
        let start = PrefixStart::Offset(10);
        assert_eq!(board_type(Some("SL"), true, Some(&start), 0), "SL10");
        assert_eq!(board_type(Some("SL"), true, Some(&start), 3), "SL13");
    }

    #[test]
    fn board_type_sequence_cycles() {
        let start = PrefixStart::Sequence(vec![2, 7]);
        assert_eq!(board_type(Some("SL"), true, Some(&start), 0), "SL2");
        assert_eq!(board_type(Some("SL"), true, Some(&start), 1), "SL7");
        assert_eq!(board_type(Some("SL"), true, Some(&start), 2), "SL2");
    }

    #[test]
    fn unindexed_prefix_is_bare() {
        assert_eq!(board_type(Some("SL"), false, None, 4), "SL");
        assert_eq!(board_type(None, true, None, 0), "");
    }

    #[test]
    fn legacy_component_without_prefix_start_deserializes() {
        let json = r#"{"name":"CPU","code_12nc":"310412345678","indexed":true}"#;
        let component: Component = serde_json::from_str(json).expect("deserialize");
        assert_eq!(component.prefix_start, None);
        assert_eq!(component.serial_start, None);
    }

    #[test]
    fn prefix_start_roundtrips_both_shapes() {
        let offset: PrefixStart = serde_json::from_str("4").expect("offset");
        assert_eq!(offset, PrefixStart::Offset(4));
        let sequence: PrefixStart = serde_json::from_str("[1,2]").expect("sequence");
        assert_eq!(sequence, PrefixStart::Sequence(vec![1, 2]));
    }
}
