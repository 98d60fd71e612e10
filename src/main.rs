use cbio_common::{filter_reports, LoaderConfig, PrintOptions, Report};
use cbio_reports::{cli, config, display, error, export, server, source};
use clap::Parser;
use cli::{Cli, Commands};
use config::{Config, DataLocation};
use dialoguer::Select;
use futures::future::join_all;
use error::{CbioError, Result};
use source::Backend;

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

/// 一覧から対話的に1件選ぶ
fn select_report(reports: &[Report]) -> Result<String> {
    let items: Vec<String> = reports
        .iter()
        .map(|r| format!("{}  ({} - {}, {})", r.car, r.municipality, r.state, r.status.label()))
        .collect();
    let index = Select::new()
        .with_prompt("報告書を選択")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(reports[index].id.clone())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;
    let location = config.resolve_location(cli.base_url.as_deref(), cli.data_dir.as_deref(), config::process_env);
    let loader = LoaderConfig::default();

    match cli.command {
        Commands::List { search, json } => {
            let backend = Backend::open(&location)?;
            let reports = backend.list_reports().await?;
            let term = search.unwrap_or_default();
            let filtered = filter_reports(&reports, &term);

            if json {
                println!("{}", serde_json::to_string_pretty(&filtered)?);
            } else {
                println!("📋 cbio - 報告書一覧 ({})\n", backend.describe());
                print!("{}", display::report_table(&filtered));
                println!("\n{}件 / 全{}件", filtered.len(), reports.len());
            }
        }

        Commands::Show { id, json } => {
            let backend = Backend::open(&location)?;
            let reports = backend.list_reports().await?;
            let id = match id {
                Some(id) => id,
                None => {
                    if reports.is_empty() {
                        return Err(CbioError::NoReports(backend.describe()));
                    }
                    select_report(&reports)?
                }
            };

            let report = backend.load_listed(&loader, &reports, &id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", display::report_detail(&report));
            }
        }

        Commands::Print { ids, output, title, embed_images, quality, auto_print } => {
            println!("🖨 cbio - 印刷用HTML生成\n");
            let backend = Backend::open(&location)?;

            // 1. 一覧
            println!("[1/3] 一覧を取得中...");
            let listing = backend.list_reports().await?;
            println!("✔ {}件\n", listing.len());

            // 2. 各報告書
            println!("[2/3] 報告書を読み込み中...");
            let loads = ids.iter().map(|id| backend.load_listed(&loader, &listing, id));
            let mut reports = Vec::with_capacity(ids.len());
            for result in join_all(loads).await {
                let report = result?;
                let fallback = report.images.iter().filter(|i| i.is_fallback()).count();
                println!("✔ {} (画像{}枚, うちフォールバック{}枚)", report.car, report.images.len(), fallback);
                reports.push(report);
            }
            println!();

            // 3. 出力
            println!("[3/3] HTMLを出力中...{}", if embed_images { " (画像埋め込み)" } else { "" });
            let output_path = export::output_path(output.as_deref(), &ids);
            let options = PrintOptions {
                title: title
                    .or_else(|| config.print_title.clone())
                    .unwrap_or_else(|| PrintOptions::default().title),
                generated_at: Some(chrono::Local::now().format("%d/%m/%Y %H:%M").to_string()),
                print_timeout_ms: config.print_timeout_ms,
                auto_print,
                ..Default::default()
            };
            let written = export::export_print(
                &backend,
                reports,
                &output_path,
                &options,
                embed_images.then_some(quality),
            )
            .await?;
            println!("✔ 出力: {}", written.display());

            println!("\n✅ 完了");
        }

        Commands::Serve { port } => {
            let data_dir = match location {
                DataLocation::Dir(dir) => dir,
                DataLocation::Http(_) => {
                    return Err(CbioError::Config(
                        "serve にはデータディレクトリが必要です（--data-dir または CBIO_DATA_DIR）".into(),
                    ))
                }
            };
            println!("🌐 cbio - モックAPI: http://127.0.0.1:{}  (データ: {})", port, data_dir.display());
            server::run(data_dir, port)
                .await
                .map_err(|e| CbioError::Server(e.to_string()))?;
        }

        Commands::Config { show, set_base_url, set_data_dir } => {
            let mut config = config;
            let changed = set_base_url.is_some() || set_data_dir.is_some();

            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ ベースURLを設定しました");
            }
            if let Some(dir) = set_data_dir {
                config.set_data_dir(dir)?;
                println!("✔ データディレクトリを設定しました");
            }
            if changed {
                config.save()?;
            }

            if show || !changed {
                println!("設定 ({}):", Config::config_path()?.display());
                println!("  ベースURL: {}", config.base_url.as_deref().unwrap_or("未設定"));
                println!(
                    "  データディレクトリ: {}",
                    config.data_dir.as_ref().map(|d| d.display().to_string()).unwrap_or_else(|| "未設定".into())
                );
                println!("  印刷タイムアウト: {}ms", config.print_timeout_ms);
                println!("  現在の取得先: {}", location);
            }
        }
    }

    Ok(())
}
