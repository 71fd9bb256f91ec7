//! Query operations module
//!
//! The four read operations the API exposes: metric resolution, largest-N
//! selection, position filtering, and distinct position listing.

use std::cmp::Ordering;

use super::dataset::Table;

/// Result row count for the leaderboard operations.
pub const TOP_N: usize = 5;

/// Resolve a metric token to its CSV column name (full map).
///
/// Pure lookup: no fuzzy matching, no case normalization.
pub fn resolve_metric(token: &str) -> Option<&'static str> {
    match token {
        "winrate" => Some("Win rate"),
        "kda" => Some("KDA"),
        "kp" => Some("KP%"),
        "dpm" => Some("DPM"),
        "gpm" => Some("GoldPerMin"),
        _ => None,
    }
}

/// Metric map for the position endpoint. `gpm` is deliberately absent there.
pub fn resolve_position_metric(token: &str) -> Option<&'static str> {
    match token {
        "gpm" => None,
        other => resolve_metric(other),
    }
}

/// Normalize a position token: uppercase exactly the first character,
/// lowercase the rest. The whole token is treated as one word, so
/// `"mid"` → `"Mid"` and `"JUNGLE"` → `"Jungle"`. Matching against the
/// `Position` column is exact equality on the normalized form.
pub fn normalize_position(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Indices of the rows with the largest values in `column`, largest first.
///
/// The sort is stable, so ties keep their original file order. Missing and
/// non-numeric cells rank below every number (see `Value::sort_key`).
pub fn top_rows(
    table: &Table,
    column: usize,
    candidates: impl Iterator<Item = usize>,
    limit: usize,
) -> Vec<usize> {
    let mut rows: Vec<usize> = candidates.collect();
    rows.sort_by(|&a, &b| {
        table
            .value(b, column)
            .sort_key()
            .partial_cmp(&table.value(a, column).sort_key())
            .unwrap_or(Ordering::Equal)
    });
    rows.truncate(limit);
    rows
}

/// Indices of rows whose cell in `column` equals `expected` exactly.
pub fn rows_matching(table: &Table, column: usize, expected: &str) -> Vec<usize> {
    (0..table.len())
        .filter(|&row| table.value(row, column).as_text() == Some(expected))
        .collect()
}

/// Distinct text values of `column` in first-occurrence order, each once.
pub fn distinct_values(table: &Table, column: usize) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for row in 0..table.len() {
        if let Some(value) = table.value(row, column).as_text() {
            if !seen.iter().any(|s| s == value) {
                seen.push(value.to_string());
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::dataset;

    fn table(csv_data: &str) -> Table {
        dataset::from_reader(csv_data.as_bytes()).unwrap()
    }

    const SAMPLE: &str = "\
PlayerName,TeamName,Position,Win rate,KDA,KP%,DPM,GoldPerMin
Zeus,T1,Top,0.55,3.1,60.2,520,410
Oner,T1,Jungle,0.58,4.0,71.5,380,330
Faker,T1,Mid,0.61,5.6,68.9,610,450
Gumayusi,T1,Adc,0.60,6.2,70.1,640,470
Keria,T1,Support,0.62,5.9,74.3,150,250
Chovy,GEN,Mid,0.66,7.1,65.4,650,460
Canyon,GEN,Jungle,0.64,5.2,72.8,400,350
";

    fn names(t: &Table, rows: &[usize]) -> Vec<String> {
        rows.iter()
            .map(|&r| t.value(r, 0).as_text().unwrap().to_string())
            .collect()
    }

    #[test]
    fn full_metric_map_resolves_all_five_tokens() {
        assert_eq!(resolve_metric("winrate"), Some("Win rate"));
        assert_eq!(resolve_metric("kda"), Some("KDA"));
        assert_eq!(resolve_metric("kp"), Some("KP%"));
        assert_eq!(resolve_metric("dpm"), Some("DPM"));
        assert_eq!(resolve_metric("gpm"), Some("GoldPerMin"));
    }

    #[test]
    fn unknown_tokens_do_not_resolve() {
        assert_eq!(resolve_metric("deaths"), None);
        assert_eq!(resolve_metric("KDA"), None); // no case folding
        assert_eq!(resolve_metric(""), None);
    }

    #[test]
    fn position_metric_map_excludes_gpm() {
        assert_eq!(resolve_position_metric("winrate"), Some("Win rate"));
        assert_eq!(resolve_position_metric("kda"), Some("KDA"));
        assert_eq!(resolve_position_metric("kp"), Some("KP%"));
        assert_eq!(resolve_position_metric("dpm"), Some("DPM"));
        assert_eq!(resolve_position_metric("gpm"), None);
    }

    #[test]
    fn position_token_is_capitalized_as_one_word() {
        assert_eq!(normalize_position("mid"), "Mid");
        assert_eq!(normalize_position("JUNGLE"), "Jungle");
        assert_eq!(normalize_position("aDc"), "Adc");
        assert_eq!(normalize_position("Support"), "Support");
        assert_eq!(normalize_position(""), "");
    }

    #[test]
    fn top_rows_sorts_descending() {
        let t = table(SAMPLE);
        let kda = t.column_index("KDA").unwrap();
        let top = top_rows(&t, kda, 0..t.len(), TOP_N);
        assert_eq!(
            names(&t, &top),
            ["Chovy", "Gumayusi", "Keria", "Faker", "Canyon"]
        );
    }

    #[test]
    fn top_rows_returns_fewer_when_dataset_is_small() {
        let t = table("PlayerName,KDA\nFaker,5.6\nChovy,7.1\n");
        let top = top_rows(&t, 1, 0..t.len(), TOP_N);
        assert_eq!(names(&t, &top), ["Chovy", "Faker"]);
    }

    #[test]
    fn ties_keep_file_order() {
        let t = table("PlayerName,KDA\nA,5.0\nB,7.0\nC,5.0\nD,7.0\n");
        let top = top_rows(&t, 1, 0..t.len(), TOP_N);
        assert_eq!(names(&t, &top), ["B", "D", "A", "C"]);
    }

    #[test]
    fn missing_values_sort_last() {
        let t = table("PlayerName,KDA\nA,\nB,2.0\nC,9.0\n");
        let top = top_rows(&t, 1, 0..t.len(), TOP_N);
        assert_eq!(names(&t, &top), ["C", "B", "A"]);
    }

    #[test]
    fn top_rows_respects_candidate_subset() {
        let t = table(SAMPLE);
        let pos = t.column_index("Position").unwrap();
        let kda = t.column_index("KDA").unwrap();
        let mids = rows_matching(&t, pos, "Mid");
        let top = top_rows(&t, kda, mids.into_iter(), TOP_N);
        assert_eq!(names(&t, &top), ["Chovy", "Faker"]);
    }

    #[test]
    fn rows_matching_is_exact() {
        let t = table("PlayerName,Position,KDA\nA,Mid,5.0\nB,mid,7.0\n");
        let pos = t.column_index("Position").unwrap();
        // "mid" normalizes to "Mid"; the stored lowercase "mid" does not
        // equal it, so only row A matches.
        let matched = rows_matching(&t, pos, &normalize_position("mid"));
        assert_eq!(names(&t, &matched), ["A"]);
    }

    #[test]
    fn rows_matching_unknown_position_is_empty() {
        let t = table(SAMPLE);
        let pos = t.column_index("Position").unwrap();
        assert!(rows_matching(&t, pos, "Unknown").is_empty());
    }

    #[test]
    fn distinct_values_first_occurrence_order() {
        let t = table(SAMPLE);
        let pos = t.column_index("Position").unwrap();
        assert_eq!(
            distinct_values(&t, pos),
            ["Top", "Jungle", "Mid", "Adc", "Support"]
        );
    }

    #[test]
    fn distinct_values_deduplicates() {
        let t = table(SAMPLE);
        let team = t.column_index("TeamName").unwrap();
        assert_eq!(distinct_values(&t, team), ["T1", "GEN"]);
    }
}
