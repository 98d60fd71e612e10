//! 一覧の検索と選択

use crate::types::Report;

/// CAR番号に検索語が含まれるか（大文字小文字を区別しない部分一致）
pub fn matches_car(report: &Report, term: &str) -> bool {
    report.car.to_lowercase().contains(&term.to_lowercase())
}

/// 検索語で絞り込む。空文字なら全件
pub fn filter_reports<'a>(reports: &'a [Report], term: &str) -> Vec<&'a Report> {
    reports.iter().filter(|r| matches_car(r, term)).collect()
}

/// 印刷対象の選択状態（選択順を保持）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    pub fn toggle(&mut self, id: &str) {
        if let Some(pos) = self.ids.iter().position(|s| s == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id.to_string());
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    /// 表示中の全件が選択済みか
    pub fn all_selected(&self, reports: &[Report]) -> bool {
        !reports.is_empty() && reports.iter().all(|r| self.is_selected(&r.id))
    }

    /// 「すべて選択」: 全件選択済みなら解除、そうでなければ全件選択
    pub fn toggle_all(&mut self, reports: &[Report]) {
        if self.all_selected(reports) {
            self.ids.clear();
        } else {
            self.ids = reports.iter().map(|r| r.id.clone()).collect();
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// 選択された報告書（選択順）
    pub fn resolve<'a>(&self, reports: &'a [Report]) -> Vec<&'a Report> {
        self.ids
            .iter()
            .filter_map(|id| reports.iter().find(|r| &r.id == id))
            .collect()
    }
}
