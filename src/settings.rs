use std::env;
use std::path::PathBuf;

use chrono::NaiveDate;

pub const DEFAULT_CSV: &str = "padel_analytics.csv";
pub const DEFAULT_EXPORT: &str = "padel_breakdown.xlsx";
pub const DEFAULT_TITLE: &str = "Center Court";
pub const DEFAULT_DEMO_SEED: u64 = 20210423;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchInfo {
    pub title: String,
    pub date: Option<NaiveDate>,
}

impl MatchInfo {
    pub fn heading(&self) -> String {
        match self.date {
            Some(date) => format!("{} {}", self.title, date.format("%Y-%m-%d")),
            None => self.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub csv_path: PathBuf,
    pub export_path: PathBuf,
    pub match_info: MatchInfo,
    pub demo: bool,
    pub demo_seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Settings {
    /// Reads `PADEL_*` variables. Callers load `.env` files first.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|val| !val.trim().is_empty());

        let date = match non_empty("PADEL_MATCH_DATE") {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok(),
            None => NaiveDate::from_ymd_opt(2021, 4, 23),
        };

        Self {
            csv_path: non_empty("PADEL_CSV")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV)),
            export_path: non_empty("PADEL_EXPORT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT)),
            match_info: MatchInfo {
                title: non_empty("PADEL_MATCH_TITLE").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                date,
            },
            demo: non_empty("PADEL_DEMO")
                .map(|val| matches!(val.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            demo_seed: non_empty("PADEL_DEMO_SEED")
                .and_then(|val| val.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_DEMO_SEED),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_point_at_center_court() {
        let s = settings(&[]);
        assert_eq!(s.csv_path, PathBuf::from(DEFAULT_CSV));
        assert_eq!(s.match_info.heading(), "Center Court 2021-04-23");
        assert!(!s.demo);
        assert_eq!(s.demo_seed, DEFAULT_DEMO_SEED);
    }

    #[test]
    fn overrides_are_read() {
        let s = settings(&[
            ("PADEL_CSV", "data/log.csv"),
            ("PADEL_MATCH_TITLE", "Court 2"),
            ("PADEL_MATCH_DATE", "2022-01-05"),
            ("PADEL_DEMO", "TRUE"),
            ("PADEL_DEMO_SEED", "7"),
        ]);
        assert_eq!(s.csv_path, PathBuf::from("data/log.csv"));
        assert_eq!(s.match_info.heading(), "Court 2 2022-01-05");
        assert!(s.demo);
        assert_eq!(s.demo_seed, 7);
    }

    #[test]
    fn bad_values_fall_back() {
        let s = settings(&[("PADEL_MATCH_DATE", "23/04/2021"), ("PADEL_DEMO_SEED", "x")]);
        assert_eq!(s.match_info.date, None);
        assert_eq!(s.match_info.heading(), "Center Court");
        assert_eq!(s.demo_seed, DEFAULT_DEMO_SEED);
    }
}
