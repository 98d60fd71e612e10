//! 印刷用HTML生成
//!
//! 1件または複数件の報告書を1つのHTML文書にまとめる。文書の末尾に
//! 画像の読み込み完了を待ってから `window.print()` を呼ぶスクリプトを埋め込む。
//! 読み込みが終わらない画像があってもタイムアウトで印刷に進む。

use crate::fields::{
    analysis_fields, image_fields, property_fields, Field, ANALYSIS_SECTION, IMAGES_SECTION,
    PROPERTY_SECTION,
};
use crate::types::Report;

pub const DEFAULT_TITLE: &str = "Relatórios CBIOs";
pub const DEFAULT_PRINT_TIMEOUT_MS: u32 = 5000;

#[derive(Debug, Clone)]
pub struct PrintOptions {
    pub title: String,
    /// フッターに出す生成日時（呼び出し側で整形済み）
    pub generated_at: Option<String>,
    pub logo_url: Option<String>,
    /// 画像待ちの上限。0ならタイムアウトなし
    pub print_timeout_ms: u32,
    /// falseならスクリプトを埋め込まない（CLIでファイル保存する場合）
    pub auto_print: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            generated_at: None,
            logo_url: None,
            print_timeout_ms: DEFAULT_PRINT_TIMEOUT_MS,
            auto_print: true,
        }
    }
}

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const PRINT_CSS: &str = "\
body{margin:0;font-family:Inter,system-ui,-apple-system,Arial,sans-serif;color:#1F2937;background:#fff}\
.page{max-width:960px;margin:0 auto;padding:24px}\
.report{page-break-after:always}\
.report:last-child{page-break-after:auto}\
header{display:flex;justify-content:space-between;align-items:center;border-bottom:2px solid #064C9F;padding-bottom:12px;margin-bottom:16px}\
header h1{color:#064C9F;font-size:22px;margin:0}\
header img{height:32px}\
h2{color:#064C9F;font-size:16px;margin:18px 0 8px}\
table{width:100%;border-collapse:collapse;font-size:13px}\
th,td{text-align:left;padding:6px 8px;border-bottom:1px solid #E5E7EB;vertical-align:top}\
th{width:40%;font-weight:600;background:#F3F4F6}\
.status{display:inline-block;padding:2px 8px;border-radius:999px;font-size:11px}\
.status-eligible{background:#DCFCE7;color:#166534}\
.status-not-eligible{background:#FEE2E2;color:#DC2626}\
.status-pending{background:#FEF3C7;color:#92400E}\
.images{display:grid;grid-template-columns:repeat(3,1fr);gap:12px}\
.image-card{background:#F3F4F6;border-radius:8px;padding:8px;font-size:11px}\
.image-card img{width:100%;height:160px;object-fit:cover;border-radius:6px}\
.image-card h3{color:#064C9F;font-size:13px;margin:6px 0}\
.fallback-note{color:#6B7280;font-style:italic}\
footer{margin-top:16px;color:#6B7280;font-size:11px}\
@page{size:A4;margin:12mm}";

fn render_table(fields: &[Field], status_row: Option<(&str, &str)>) -> String {
    let mut s = String::from("<table>");
    for field in fields {
        let value = match status_row {
            Some((label, class)) if label == field.label => format!(
                "<span class=\"status {}\">{}</span>",
                class,
                html_escape(&field.value)
            ),
            _ => html_escape(&field.value),
        };
        s.push_str(&format!(
            "<tr><th>{}</th><td>{}</td></tr>",
            html_escape(field.label),
            value
        ));
    }
    s.push_str("</table>");
    s
}

/// 報告書1件分のセクション
pub fn render_report_section(report: &Report) -> String {
    let mut s = String::new();
    s.push_str(&format!(
        "<section class=\"report\" data-report-id=\"{}\">",
        html_escape(&report.id)
    ));
    s.push_str(&format!("<h2>{}</h2>", PROPERTY_SECTION));
    s.push_str(&render_table(
        &property_fields(report),
        Some(("Status", report.status.css_class())),
    ));
    s.push_str(&format!("<h2>{}</h2>", ANALYSIS_SECTION));
    s.push_str(&render_table(&analysis_fields(report), None));

    if !report.images.is_empty() {
        s.push_str(&format!("<h2>{}</h2><div class=\"images\">", IMAGES_SECTION));
        for (i, image) in report.images.iter().enumerate() {
            s.push_str("<div class=\"image-card\">");
            s.push_str(&format!(
                "<img src=\"{}\" alt=\"Imagem {}\"/>",
                html_escape(&image.url),
                i + 1
            ));
            s.push_str(&format!("<h3>Imagem {}</h3>", i + 1));
            if image.is_fallback() {
                s.push_str("<p class=\"fallback-note\">Imagem ilustrativa</p>");
            }
            s.push_str(&render_table(&image_fields(image), None));
            s.push_str("</div>");
        }
        s.push_str("</div>");
    }
    s.push_str("</section>");
    s
}

/// 画像の load / error を数え、全件揃うかタイムアウトで印刷する
pub fn print_script(timeout_ms: u32) -> String {
    let timeout = if timeout_ms > 0 {
        format!("setTimeout(go,{});", timeout_ms)
    } else {
        String::new()
    };
    format!(
        "<script>(function(){{var done=false;function go(){{if(done)return;done=true;window.focus();window.print();}}\
var imgs=Array.prototype.slice.call(document.images);var pending=imgs.length;\
function settle(){{pending-=1;if(pending<=0)go();}}\
if(pending===0){{go();return;}}\
imgs.forEach(function(img){{if(img.complete){{settle();}}else{{img.addEventListener('load',settle);img.addEventListener('error',settle);}}}});\
{}}})();</script>",
        timeout
    )
}

/// 印刷用HTML文書を生成
pub fn render_document(reports: &[&Report], options: &PrintOptions) -> String {
    let mut s = String::new();
    s.push_str("<!DOCTYPE html><html lang=\"pt-BR\"><head><meta charset=\"utf-8\">");
    s.push_str(&format!("<title>{}</title>", html_escape(&options.title)));
    s.push_str(&format!("<style>{}</style></head><body><div class=\"page\">", PRINT_CSS));

    s.push_str("<header>");
    s.push_str(&format!("<h1>{}</h1>", html_escape(&options.title)));
    if let Some(logo) = &options.logo_url {
        s.push_str(&format!("<img src=\"{}\" alt=\"Logo\"/>", html_escape(logo)));
    }
    s.push_str("</header>");

    for report in reports {
        s.push_str(&render_report_section(report));
    }

    if let Some(generated_at) = &options.generated_at {
        s.push_str(&format!("<footer>Gerado em {}</footer>", html_escape(generated_at)));
    }
    s.push_str("</div>");
    if options.auto_print {
        s.push_str(&print_script(options.print_timeout_ms));
    }
    s.push_str("</body></html>");
    s
}
