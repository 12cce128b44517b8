//! Static translation tables from internal answer keys to the CRM's
//! dropdown ordinals. The CRM expects the option's position, not its text,
//! so each table is built once and looked up case-insensitively.

use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::warn;

/// The dropdown families the CRM schema defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrdinalGroup {
    YesNo,
    Segment,
    CurrentStage,
    NinetyDayGoal,
    BiggestObstacle,
    PreferredPath,
}

/// Lowercase, trim, and treat `-` as ` ` so "small-team" and "Small Team"
/// resolve to the same ordinal.
pub fn normalize_option(value: &str) -> String {
    value
        .trim()
        .to_ascii_lowercase()
        .replace('-', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn tables() -> &'static HashMap<OrdinalGroup, HashMap<&'static str, u32>> {
    static TABLES: OnceLock<HashMap<OrdinalGroup, HashMap<&'static str, u32>>> = OnceLock::new();
    TABLES.get_or_init(|| {
        let mut tables = HashMap::new();
        tables.insert(OrdinalGroup::YesNo, HashMap::from([("yes", 0), ("no", 1)]));
        tables.insert(
            OrdinalGroup::Segment,
            HashMap::from([
                ("foundation builder", 0),
                ("system optimizer", 1),
                ("sovereign founder", 2),
            ]),
        );
        tables.insert(
            OrdinalGroup::CurrentStage,
            HashMap::from([
                ("solo", 0),
                ("small team", 1),
                ("scaling", 2),
                ("established", 3),
            ]),
        );
        tables.insert(
            OrdinalGroup::NinetyDayGoal,
            HashMap::from([
                ("automate", 0),
                ("streamline", 1),
                ("launch", 2),
                ("scale", 3),
                ("work less", 4),
            ]),
        );
        tables.insert(
            OrdinalGroup::BiggestObstacle,
            HashMap::from([
                ("manual tasks", 0),
                ("no systems", 1),
                ("team dependence", 2),
                ("product not converting", 3),
                ("weak marketing", 4),
            ]),
        );
        tables.insert(
            OrdinalGroup::PreferredPath,
            HashMap::from([
                ("diy learning", 0),
                ("coaching", 1),
                ("software", 2),
                ("done for you", 3),
            ]),
        );
        tables
    })
}

/// Ordinal position of `value` within its dropdown family. Unknown values
/// log a warning and map to `None`, which the payload builder then omits.
pub fn ordinal(group: OrdinalGroup, value: &str) -> Option<u32> {
    let normalized = normalize_option(value);
    let found = tables()
        .get(&group)
        .and_then(|table| table.get(normalized.as_str()))
        .copied();
    if found.is_none() {
        warn!(?group, value, %normalized, "no dropdown ordinal for value");
    }
    found
}
