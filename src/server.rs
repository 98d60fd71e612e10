//! モックAPIサーバー
//!
//! データディレクトリの内容をダッシュボードと同じ形で配信する。
//!
//! - `GET /api/reports`                 一覧（JSON配列）
//! - `GET /api/reports/{id}`            1件（画像3枠・フォールバック込み）
//! - `GET /api/reports/{id}/images/{n}` 画像メタデータ（n = 1..=3）
//! - `GET /data/{car}/{file}`           data.json / imagemN.tif
//! - `GET /placeholder/{file}`          フォールバック画像

use crate::error::CbioError;
use crate::source::DirSource;
use actix_web::{web, App, HttpResponse, HttpServer};
use cbio_common::loader::find_report;
use cbio_common::{load_report_data, AssetSource, Error, LoaderConfig, Report};
use serde_json::json;
use std::path::PathBuf;

pub const DATA_PREFIX: &str = "/data";
/// 画像番号の上限（1始まり）
pub const MAX_IMAGE_NUMBER: usize = 3;

pub struct ServerState {
    pub source: DirSource,
    pub config: LoaderConfig,
}

impl ServerState {
    pub fn new(data_dir: PathBuf) -> Result<Self, CbioError> {
        Ok(Self {
            source: DirSource::new(data_dir)?.with_url_prefix(DATA_PREFIX),
            config: LoaderConfig::default(),
        })
    }

    /// ディレクトリ走査はブロッキングなのでワーカースレッドの外で行う
    async fn listing(&self) -> Result<Vec<Report>, CbioError> {
        let source = self.source.clone();
        web::block(move || source.scan_reports())
            .await
            .map_err(|e| CbioError::Server(e.to_string()))?
    }

    /// id（一覧のid または CAR）から報告書を組み立てる
    async fn report(&self, id: &str) -> Result<Report, CbioError> {
        let listing = self.listing().await?;
        let listed = find_report(&listing, id)
            .or_else(|| listing.iter().find(|r| r.car == id))
            .cloned();
        let folder = listed.as_ref().map(|r| r.car.clone()).unwrap_or_else(|| id.to_string());

        match load_report_data(&self.source, &self.config, &folder).await {
            Ok(report) => Ok(report),
            // data.json が無いフォルダは一覧の内容だけ返す
            Err(Error::DataUnavailable { reason, .. }) => {
                log::debug!("{}: data.json unavailable ({}), using listing entry", folder, reason);
                listed.ok_or_else(|| Error::NotFound(id.to_string()).into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn error_response(err: &CbioError) -> HttpResponse {
    let body = json!({ "error": err.to_string() });
    match err {
        CbioError::Common(Error::InvalidIdentifier(_)) => HttpResponse::BadRequest().json(body),
        CbioError::Common(Error::NotFound(_)) => HttpResponse::NotFound().json(body),
        _ => {
            log::error!("request failed: {}", err);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn content_type(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match ext.as_str() {
        "json" => "application/json",
        "tif" | "tiff" => "image/tiff",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

async fn list_reports(state: web::Data<ServerState>) -> HttpResponse {
    match state.listing().await {
        Ok(reports) => HttpResponse::Ok().json(reports),
        Err(err) => error_response(&err),
    }
}

async fn get_report(path: web::Path<String>, state: web::Data<ServerState>) -> HttpResponse {
    match state.report(&path.into_inner()).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(err) => error_response(&err),
    }
}

async fn get_report_image(path: web::Path<(String, usize)>, state: web::Data<ServerState>) -> HttpResponse {
    let (id, number) = path.into_inner();
    if !(1..=MAX_IMAGE_NUMBER).contains(&number) {
        return HttpResponse::BadRequest().json(json!({
            "error": format!("image number must be 1..={}, got {}", MAX_IMAGE_NUMBER, number)
        }));
    }

    match state.report(&id).await {
        Ok(report) => match report.images.get(number - 1) {
            Some(image) => HttpResponse::Ok().json(image),
            None => error_response(&Error::NotFound(format!("{}/images/{}", id, number)).into()),
        },
        Err(err) => error_response(&err),
    }
}

async fn serve_asset(state: &ServerState, path: &str) -> HttpResponse {
    match state.source.fetch_bytes(path).await {
        Ok(bytes) => HttpResponse::Ok().content_type(content_type(path)).body(bytes),
        Err(err) => error_response(&err.into()),
    }
}

async fn data_file(path: web::Path<String>, state: web::Data<ServerState>) -> HttpResponse {
    serve_asset(&state, &path.into_inner()).await
}

async fn placeholder_file(path: web::Path<String>, state: web::Data<ServerState>) -> HttpResponse {
    serve_asset(&state, &format!("placeholder/{}", path.into_inner())).await
}

/// ルーティング（テストからも使う）
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/reports", web::get().to(list_reports))
        .route("/api/reports/{id}", web::get().to(get_report))
        .route("/api/reports/{id}/images/{n}", web::get().to(get_report_image))
        .route("/data/{path:.*}", web::get().to(data_file))
        .route("/placeholder/{file}", web::get().to(placeholder_file));
}

pub async fn run(data_dir: PathBuf, port: u16) -> anyhow::Result<()> {
    let state = web::Data::new(ServerState::new(data_dir)?);
    log::info!("serving {} on http://127.0.0.1:{}", state.source.root().display(), port);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(("127.0.0.1", port))?
        .run()
        .await?;
    Ok(())
}
