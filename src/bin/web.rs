//! Single binary web server: JSON API over the bracket service.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, and STORE_PATH (JSON snapshot file; in-memory when unset).

use actix_web::{
    get, post, put,
    http::StatusCode,
    web::{self, Bytes, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use bracket_manager::{
    MatchKey, MatchStatus, MemoryStore, Round, ServerConfig, Table, TournamentError, TournamentId,
    TournamentService,
};
use serde::Deserialize;

/// One store handle for the whole process, shared by every worker.
type AppState = Data<TournamentService<MemoryStore>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct ScheduleBody {
    teams: Option<Vec<String>>,
    #[serde(default)]
    format: String,
}

#[derive(Deserialize)]
struct FormatQuery {
    format: String,
}

#[derive(Deserialize)]
struct ResultBody {
    result: i64,
}

#[derive(Deserialize)]
struct StatusQuery {
    status: MatchStatus,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id, round, and table.
#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    round: Round,
    table: Table,
}

impl MatchPath {
    fn key(&self) -> Option<MatchKey> {
        (self.round != 0 && self.table != 0).then(|| MatchKey::new(self.id, self.round, self.table))
    }
}

fn bad_request(error: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "msg": "failure", "error": error }))
}

fn failure(e: &TournamentError) -> HttpResponse {
    let status = match e {
        TournamentError::InvalidRoster(_)
        | TournamentError::DuplicateTeam(_)
        | TournamentError::UnsupportedFormat(_)
        | TournamentError::InvalidResult(_) => StatusCode::BAD_REQUEST,
        TournamentError::NotFound(_) | TournamentError::UnknownTournament(_) => {
            StatusCode::NOT_FOUND
        }
        TournamentError::AlreadyFinished(_) | TournamentError::RoundNotFinished(_) => {
            StatusCode::CONFLICT
        }
        TournamentError::AdvancementIncomplete { .. } | TournamentError::Persistence(_) => {
            log::error!("{}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    HttpResponse::build(status).json(serde_json::json!({ "msg": "failure", "error": e.to_string() }))
}

/// Run a mutating service call on the blocking pool; with `STORE_PATH` set each write
/// rewrites the snapshot file.
async fn blocking<T, F>(f: F) -> Result<T, TournamentError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, TournamentError> + Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| TournamentError::Persistence(e.to_string()))?
}

fn scheduled(result: Result<bracket_manager::Bracket, TournamentError>) -> HttpResponse {
    match result {
        Ok(bracket) => HttpResponse::Ok().json(serde_json::json!({
            "msg": "success",
            "data": bracket.matches,
            "tournament_id": bracket.tournament_id,
        })),
        Err(e) => failure(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-manager",
    })
}

#[get("/api/ping")]
async fn api_ping() -> impl Responder {
    log::info!("handling ping");
    HttpResponse::Ok().json(serde_json::json!({ "msg": "pong" }))
}

/// Schedule a tournament from a JSON roster.
#[post("/api/tournaments")]
async fn api_schedule(state: AppState, body: Json<ScheduleBody>) -> HttpResponse {
    let ScheduleBody { teams, format } = body.into_inner();
    let Some(teams) = teams else {
        return bad_request("missing mandatory input parameter");
    };
    scheduled(blocking(move || state.schedule(&teams, &format)).await)
}

/// Schedule a tournament from a CSV roster (one team per line).
#[post("/api/tournaments/csv")]
async fn api_schedule_csv(state: AppState, query: Query<FormatQuery>, body: Bytes) -> HttpResponse {
    let format = query.into_inner().format;
    scheduled(blocking(move || state.schedule_csv(body.as_ref(), &format)).await)
}

/// Submit the result for one match; advances the winner when a sibling is ready.
#[put("/api/tournaments/{id}/rounds/{round}/tables/{table}/result")]
async fn api_submit_result(state: AppState, path: Path<MatchPath>, body: Json<ResultBody>) -> HttpResponse {
    let Some(key) = path.key() else {
        return bad_request("missing param");
    };
    let result = body.result;
    match blocking(move || state.submit_result(key, result)).await {
        Ok(outcome) => HttpResponse::Ok().json(serde_json::json!({ "msg": "success", "data": outcome })),
        Err(e) => failure(&e),
    }
}

/// Retry advancement for a decided match.
#[post("/api/tournaments/{id}/rounds/{round}/tables/{table}/advance")]
async fn api_advance(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let Some(key) = path.key() else {
        return bad_request("missing param");
    };
    match blocking(move || state.resume_advancement(key)).await {
        Ok(outcome) => HttpResponse::Ok().json(serde_json::json!({ "msg": "success", "data": outcome })),
        Err(e) => failure(&e),
    }
}

#[get("/api/tournaments/{id}/matches")]
async fn api_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.list_matches(path.id) {
        Ok(matches) => HttpResponse::Ok().json(serde_json::json!({ "msg": "success", "data": matches })),
        Err(e) => failure(&e),
    }
}

#[get("/api/tournaments/{id}/standing")]
async fn api_standing(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.standing(path.id) {
        Ok(standing) => HttpResponse::Ok().json(serde_json::json!({ "msg": "success", "data": standing })),
        Err(e) => failure(&e),
    }
}

/// Matches across all tournaments with the given status (?status=pending|finished).
#[get("/api/matches")]
async fn api_matches_by_status(state: AppState, query: Query<StatusQuery>) -> HttpResponse {
    match state.matches_by_status(query.status) {
        Ok(matches) => HttpResponse::Ok().json(serde_json::json!({ "msg": "success", "data": matches })),
        Err(e) => failure(&e),
    }
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_ping)
        .service(api_schedule_csv)
        .service(api_schedule)
        .service(api_submit_result)
        .service(api_advance)
        .service(api_matches)
        .service(api_standing)
        .service(api_matches_by_status);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let store = match &config.store_path {
        Some(path) => MemoryStore::open(path).map_err(|e| std::io::Error::other(e.to_string()))?,
        None => {
            log::warn!("STORE_PATH not set, matches are kept in memory only");
            MemoryStore::new()
        }
    };
    let state = Data::new(TournamentService::new(store));

    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(routes))
        .bind(bind)?
        .run()
        .await
}
