//! 印刷用HTMLの出力

pub mod embed;

use crate::cli::ImageQuality;
use crate::error::{CbioError, Result};
use crate::source::Backend;
use cbio_common::{render_document, PrintOptions, Report};
use std::path::{Path, PathBuf};

/// 既定の出力ファイル名
pub fn default_file_name(ids: &[String]) -> String {
    match ids {
        [single] => format!("relatorio-{}.html", sanitize(single)),
        _ => "relatorios.html".to_string(),
    }
}

/// ファイル名に使えない文字を置き換える
fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// `-o` がディレクトリ（または拡張子なし）ならその中に既定名で出力
pub fn output_path(output: Option<&Path>, ids: &[String]) -> PathBuf {
    let file_name = default_file_name(ids);
    match output {
        Some(path) if path.is_dir() || path.extension().is_none() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}

/// 報告書をHTMLに書き出す
pub async fn export_print(
    backend: &Backend,
    reports: Vec<Report>,
    output: &Path,
    options: &PrintOptions,
    embed: Option<ImageQuality>,
) -> Result<PathBuf> {
    if reports.is_empty() {
        return Err(CbioError::NoReports("印刷対象がありません".into()));
    }

    let reports = match embed {
        Some(quality) => {
            let pb = indicatif::ProgressBar::new(reports.len() as u64);
            pb.set_message(format!("画像を埋め込み中 (品質: {})", quality));
            let mut embedded = Vec::with_capacity(reports.len());
            for report in reports {
                embedded.push(embed::embed_report_images(backend, report, quality).await);
                pb.inc(1);
            }
            pb.finish_and_clear();
            embedded
        }
        None => reports,
    };

    let refs: Vec<&Report> = reports.iter().collect();
    let html = render_document(&refs, options);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, html)
        .map_err(|e| CbioError::Export(format!("{}: {}", output.display(), e)))?;
    Ok(output.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_file_name() {
        assert_eq!(default_file_name(&["MT-1".into()]), "relatorio-MT-1.html");
        assert_eq!(default_file_name(&["a/b".into()]), "relatorio-a_b.html");
        assert_eq!(default_file_name(&["1".into(), "2".into()]), "relatorios.html");
    }

    #[test]
    fn test_output_path_into_directory() {
        let dir = tempdir().unwrap();
        let ids = vec!["MT-1".to_string()];
        assert_eq!(output_path(Some(dir.path()), &ids), dir.path().join("relatorio-MT-1.html"));
        let file = dir.path().join("out.html");
        assert_eq!(output_path(Some(file.as_path()), &ids), file);
        assert_eq!(output_path(None, &ids), PathBuf::from("relatorio-MT-1.html"));
    }
}
