//! 読み込み済み報告書のキャッシュ
//!
//! 同じ報告書への再訪問で再取得しないよう、idをキーに保持する。
//! 「Atualizar」操作で該当エントリを明示的に無効化する。

use crate::types::Report;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ReportCache {
    entries: HashMap<String, Report>,
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Report> {
        self.entries.get(id)
    }

    /// 画面で使うid（一覧のid。CARと異なる場合がある）をキーに登録
    ///
    /// 既存エントリは置き換える。
    pub fn insert(&mut self, id: &str, report: Report) {
        self.entries.insert(id.to_string(), report);
    }

    /// 無効化。エントリがあった場合 true
    pub fn invalidate(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: &str, municipality: &str) -> Report {
        Report {
            id: id.into(),
            car: id.into(),
            municipality: municipality.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_and_get() {
        let mut cache = ReportCache::new();
        assert!(cache.is_empty());
        cache.insert("MT-1", report("MT-1", "Vera"));
        assert_eq!(cache.get("MT-1").map(|r| r.municipality.as_str()), Some("Vera"));
        assert!(cache.get("MT-2").is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let mut cache = ReportCache::new();
        cache.insert("MT-1", report("MT-1", "Vera"));
        cache.insert("MT-1", report("MT-1", "Sinop"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("MT-1").unwrap().municipality, "Sinop");
    }

    #[test]
    fn test_insert_under_listing_id() {
        let mut cache = ReportCache::new();
        let loaded = Report {
            id: "MT-1".into(),
            car: "MT-1".into(),
            ..Default::default()
        };
        cache.insert("1", loaded);
        assert_eq!(cache.get("1").map(|r| r.car.as_str()), Some("MT-1"));
        assert!(cache.get("MT-1").is_none());
        assert!(cache.invalidate("1"));
    }

    #[test]
    fn test_invalidate() {
        let mut cache = ReportCache::new();
        cache.insert("MT-1", report("MT-1", "Vera"));
        cache.insert("MT-2", report("MT-2", "Sinop"));
        assert!(cache.invalidate("MT-1"));
        assert!(!cache.invalidate("MT-1"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
