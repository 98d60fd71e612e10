//! クライアント側ルーティング
//!
//! - `/` → 一覧
//! - `/report/:id` → 詳細
//! - それ以外 → 404

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Report(String),
    NotFound,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::List,
            ["report", id] => match percent_decode(id) {
                Some(id) if !id.trim().is_empty() => Route::Report(id),
                _ => Route::NotFound,
            },
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::List => "/".to_string(),
            Route::Report(id) => report_path(id),
            Route::NotFound => "/404".to_string(),
        }
    }
}

/// 詳細ページのパス
pub fn report_path(id: &str) -> String {
    format!("/report/{}", urlencoding::encode(id))
}

/// `%` の後に16進2桁が続かないエスケープは不正として扱う
fn is_well_formed(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.iter().enumerate().filter(|(_, b)| **b == b'%').all(|(i, _)| {
        bytes
            .get(i + 1..i + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    })
}

fn percent_decode(s: &str) -> Option<String> {
    if !is_well_formed(s) {
        return None;
    }
    urlencoding::decode(s).ok().map(|id| id.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/"), Route::List);
        assert_eq!(Route::parse(""), Route::List);
        assert_eq!(
            Route::parse("/report/MT-5108501-70D4821B80A84D2FB942A46B2DC16B41"),
            Route::Report("MT-5108501-70D4821B80A84D2FB942A46B2DC16B41".to_string())
        );
        assert_eq!(Route::parse("/report/abc/"), Route::Report("abc".to_string()));
        assert_eq!(Route::parse("/report/abc?print=1"), Route::Report("abc".to_string()));
        assert_eq!(Route::parse("/report"), Route::NotFound);
        assert_eq!(Route::parse("/report/a/b"), Route::NotFound);
        assert_eq!(Route::parse("/relatorios"), Route::NotFound);
        assert_eq!(Route::parse("/report/%ZZ"), Route::NotFound);
        assert_eq!(Route::parse("/report/%+1"), Route::NotFound);
        assert_eq!(Route::parse("/report/%-1"), Route::NotFound);
        assert_eq!(Route::parse("/report/abc%4"), Route::NotFound);
        assert_eq!(Route::parse("/report/%FF"), Route::NotFound);
    }

    #[test]
    fn test_report_path_uses_exact_id() {
        let id = "MT-5103403-7DE5821C70B84D2FB942A46B2DC16B42";
        assert_eq!(report_path(id), format!("/report/{}", id));
        assert_eq!(Route::parse(&report_path(id)), Route::Report(id.to_string()));
    }

    #[test]
    fn test_encoded_ids_survive() {
        let id = "lote 7/ã";
        let path = report_path(id);
        assert_eq!(path, "/report/lote%207%2F%C3%A3");
        assert_eq!(Route::parse(&path), Route::Report(id.to_string()));
    }

    #[test]
    fn test_route_path() {
        assert_eq!(Route::List.path(), "/");
        assert_eq!(Route::Report("42".into()).path(), "/report/42");
    }
}
