//! Single binary web server: the tournament engine behind a JSON REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use football_tournament_web::{
    enroll, generate_phase, next_swiss_round, phase_standings, record_result, replace_zones,
    run_import, schedule_fixture, standard_promotion, substitute, EngineError, Enrollment,
    ErrorKind, FixtureId, ImportSpec, ParticipantId, Phase, PhaseConfig, PhaseFormat, PhaseId,
    Tournament, TournamentId, Zone,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory state: many tournaments by ID. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Inactivity threshold: tournaments not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateTournamentBody {
    name: String,
    season_id: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SubstituteBody {
    participant_id: ParticipantId,
    player_id: String,
    player_name: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CreatePhaseBody {
    name: String,
    order: u32,
    format: PhaseFormat,
    #[serde(default)]
    config: PhaseConfig,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedsBody {
    seeds: Vec<ParticipantId>,
}

/// Optional generate payload: an explicit seed list, or a source phase whose
/// standings provide the top-K seeds. With no body the phase's already
/// applied seeds are used.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct GenerateBody {
    #[serde(default)]
    seeds: Option<Vec<ParticipantId>>,
    #[serde(default)]
    from_phase: Option<PhaseId>,
    #[serde(default)]
    count: Option<usize>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ResultBody {
    home_goals: u32,
    away_goals: u32,
    #[serde(default)]
    home_pens: Option<u32>,
    #[serde(default)]
    away_pens: Option<u32>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ScheduleBody {
    #[serde(default)]
    venue: Option<String>,
    #[serde(default)]
    kickoff: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct StandingsQuery {
    group: Option<u32>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and phase id.
#[derive(Deserialize)]
struct TournamentPhasePath {
    id: TournamentId,
    phase_id: PhaseId,
}

/// Path segments: tournament id and fixture id.
#[derive(Deserialize)]
struct TournamentFixturePath {
    id: TournamentId,
    fixture_id: FixtureId,
}

/// Map an engine error to a response: the error class picks the status so
/// callers can tell bad input, bad state and bad data apart.
fn engine_error(e: &EngineError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e.kind() {
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
        ErrorKind::Config => HttpResponse::BadRequest().json(body),
        ErrorKind::State => HttpResponse::Conflict().json(body),
        ErrorKind::Infeasible => HttpResponse::UnprocessableEntity().json(body),
        ErrorKind::Integrity => {
            log::warn!("data integrity error: {}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

/// Run a closure against one tournament under the write lock, touching its
/// last-activity time. 404 when the tournament does not exist.
fn with_entry<F>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> HttpResponse,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            f(&mut entry.tournament)
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "football-tournament-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let tournament = Tournament::new(body.name, body.season_id);
    let id = tournament.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.insert(
        id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    match g.get(&id) {
        Some(entry) => HttpResponse::Ok().json(&entry.tournament),
        None => HttpResponse::InternalServerError().body("lock error"),
    }
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_entry(&state, path.id, |t| HttpResponse::Ok().json(t))
}

/// Enroll a player for a club in this tournament's season.
#[post("/api/tournaments/{id}/enrollments")]
async fn api_enroll(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<Enrollment>,
) -> HttpResponse {
    with_entry(&state, path.id, |t| {
        match enroll(t, body.into_inner()) {
            Ok(_) => HttpResponse::Ok().json(t),
            Err(e) => engine_error(&e),
        }
    })
}

/// Swap the player behind an enrollment; future fixtures follow the new id.
#[put("/api/tournaments/{id}/enrollments/substitute")]
async fn api_substitute(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<SubstituteBody>,
) -> HttpResponse {
    let body = body.into_inner();
    with_entry(&state, path.id, |t| {
        match substitute(t, body.participant_id, body.player_id, body.player_name) {
            Ok(_) => HttpResponse::Ok().json(t),
            Err(e) => engine_error(&e),
        }
    })
}

/// Create a phase (format + configuration). Seeds come later, via
/// /seeds, /import or the generate body.
#[post("/api/tournaments/{id}/phases")]
async fn api_create_phase(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<CreatePhaseBody>,
) -> HttpResponse {
    let body = body.into_inner();
    with_entry(&state, path.id, |t| {
        let phase = Phase::new(t.id, body.name, body.order, body.format, body.config);
        t.phases.push(phase);
        HttpResponse::Ok().json(t)
    })
}

/// Apply an explicit seed list to a phase (must not be generated yet).
#[post("/api/tournaments/{id}/phases/{phase_id}/seeds")]
async fn api_apply_seeds(
    state: AppState,
    path: Path<TournamentPhasePath>,
    body: Json<SeedsBody>,
) -> HttpResponse {
    let seeds = body.into_inner().seeds;
    with_entry(&state, path.id, |t| {
        let phase = match t.phase_mut(path.phase_id) {
            Some(p) => p,
            None => {
                return engine_error(&EngineError::PhaseNotFound {
                    phase: path.phase_id,
                })
            }
        };
        match football_tournament_web::apply_seeds(phase, seeds) {
            Ok(()) => HttpResponse::Ok().json(t),
            Err(e) => engine_error(&e),
        }
    })
}

/// Generate a phase's fixtures (at most once; reset is an admin concern).
#[post("/api/tournaments/{id}/phases/{phase_id}/generate")]
async fn api_generate_phase(
    state: AppState,
    path: Path<TournamentPhasePath>,
    body: Option<Json<GenerateBody>>,
) -> HttpResponse {
    let body = body.map(|b| b.into_inner());
    with_entry(&state, path.id, |t| {
        if let Some(body) = body {
            if let Err(e) = seed_from_body(t, path.phase_id, body) {
                return engine_error(&e);
            }
        }
        match generate_phase(t, path.phase_id) {
            Ok(()) => HttpResponse::Ok().json(t),
            Err(e) => engine_error(&e),
        }
    })
}

/// Resolve a generate body into an applied seed list for the phase.
fn seed_from_body(
    t: &mut Tournament,
    phase_id: PhaseId,
    body: GenerateBody,
) -> Result<(), EngineError> {
    let seeds = if let Some(seeds) = body.seeds {
        Some(seeds)
    } else if let Some(source) = body.from_phase {
        let standings = phase_standings(t, source, None)?;
        let count = body
            .count
            .or_else(|| t.phase(phase_id).and_then(|p| p.config.bracket_size))
            .unwrap_or(standings.len());
        Some(standard_promotion(&standings, count)?)
    } else {
        None
    };
    if let Some(seeds) = seeds {
        let phase = t
            .phase_mut(phase_id)
            .ok_or(EngineError::PhaseNotFound { phase: phase_id })?;
        football_tournament_web::apply_seeds(phase, seeds)?;
    }
    Ok(())
}

/// Pair the next round of a swiss phase (previous round must be complete).
#[post("/api/tournaments/{id}/phases/{phase_id}/rounds")]
async fn api_next_round(state: AppState, path: Path<TournamentPhasePath>) -> HttpResponse {
    with_entry(&state, path.id, |t| {
        match next_swiss_round(t, path.phase_id) {
            Ok(()) => HttpResponse::Ok().json(t),
            Err(e) => engine_error(&e),
        }
    })
}

/// Record a fixture result; standings are recomputed on read, the phase
/// state machine advances here.
#[post("/api/tournaments/{id}/fixtures/{fixture_id}/result")]
async fn api_record_result(
    state: AppState,
    path: Path<TournamentFixturePath>,
    body: Json<ResultBody>,
) -> HttpResponse {
    let body = body.into_inner();
    with_entry(&state, path.id, |t| {
        match record_result(
            t,
            path.fixture_id,
            body.home_goals,
            body.away_goals,
            body.home_pens,
            body.away_pens,
        ) {
            Ok(()) => HttpResponse::Ok().json(t),
            Err(e) => engine_error(&e),
        }
    })
}

/// Set venue/kickoff for a fixture (display data, no scheduling decisions).
#[put("/api/tournaments/{id}/fixtures/{fixture_id}/schedule")]
async fn api_schedule_fixture(
    state: AppState,
    path: Path<TournamentFixturePath>,
    body: Json<ScheduleBody>,
) -> HttpResponse {
    let body = body.into_inner();
    with_entry(&state, path.id, |t| {
        match schedule_fixture(t, path.fixture_id, body.venue, body.kickoff) {
            Ok(()) => HttpResponse::Ok().json(t),
            Err(e) => engine_error(&e),
        }
    })
}

/// Standings for a phase (optionally one group of a grouped phase).
#[get("/api/tournaments/{id}/phases/{phase_id}/standings")]
async fn api_standings(
    state: AppState,
    path: Path<TournamentPhasePath>,
    query: Query<StandingsQuery>,
) -> HttpResponse {
    with_entry(&state, path.id, |t| {
        match phase_standings(t, path.phase_id, query.group) {
            Ok(rows) => HttpResponse::Ok().json(rows),
            Err(e) => engine_error(&e),
        }
    })
}

/// Replace a phase's zone list (full replace, overlap rejected).
#[post("/api/tournaments/{id}/phases/{phase_id}/zones")]
async fn api_replace_zones(
    state: AppState,
    path: Path<TournamentPhasePath>,
    body: Json<Vec<Zone>>,
) -> HttpResponse {
    let zones = body.into_inner();
    with_entry(&state, path.id, |t| {
        match replace_zones(t, path.phase_id, zones) {
            Ok(()) => HttpResponse::Ok().json(t),
            Err(e) => engine_error(&e),
        }
    })
}

/// Import participants from this (source) phase into target phase seed lists.
#[post("/api/tournaments/{id}/phases/{phase_id}/import")]
async fn api_import(
    state: AppState,
    path: Path<TournamentPhasePath>,
    body: Json<ImportSpec>,
) -> HttpResponse {
    let spec = body.into_inner();
    with_entry(&state, path.id, |t| {
        match run_import(t, path.phase_id, spec) {
            Ok(()) => HttpResponse::Ok().json(t),
            Err(e) => engine_error(&e),
        }
    })
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));

    // Background task: every 30 minutes, remove tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!(
                    "Cleaned up {} inactive tournament(s) (no activity for 12h)",
                    removed
                );
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(favicon)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_enroll)
            .service(api_substitute)
            .service(api_create_phase)
            .service(api_apply_seeds)
            .service(api_generate_phase)
            .service(api_next_round)
            .service(api_record_result)
            .service(api_schedule_fixture)
            .service(api_standings)
            .service(api_replace_zones)
            .service(api_import)
    })
    .bind(bind)?
    .run()
    .await
}
