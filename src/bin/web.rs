//! Single binary web server: JSON API over the scheduling library.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, and scheduling defaults TABLE_COUNT, SLOT_MINUTES.

use actix_web::{
    get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use table_tennis_tournament_web::{
    config::{DEFAULT_TABLE_COUNT, SLOT_MINUTES},
    generate_knockout_round, generate_schedule, set_match_winner, submission, Group, MatchId,
    PatternTemplate, Player, PlayerId, RoundNames, ScheduleConfig, ScheduleError, Side, Tournament,
    TournamentId,
};

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory state: many tournaments by ID. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Inactivity threshold: tournaments not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

/// Scheduling defaults read from the environment at startup.
#[derive(Clone, Copy, Debug)]
struct Defaults {
    table_count: u32,
    slot_minutes: u32,
}

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    #[serde(default = "default_name")]
    name: String,
    table_count: Option<u32>,
    day: Option<NaiveDate>,
    round_names: Option<RoundNames>,
}

fn default_name() -> String {
    "Tournament".to_string()
}

#[derive(Deserialize)]
struct RosterBody {
    groups: Vec<Group>,
    players: BTreeMap<PlayerId, Player>,
}

#[derive(Deserialize)]
struct KnockoutBody {
    #[serde(default)]
    division: String,
}

#[derive(Deserialize)]
struct SetMatchWinnerBody {
    side: Side,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id (e.g. /api/tournaments/{id}/matches/0012/winner)
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

fn error_response(e: &ScheduleError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "table-tennis-tournament-web",
    })
}

/// Create a tournament and draw its seed patterns (fixed from here on).
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    defaults: Data<Defaults>,
    body: Option<Json<CreateTournamentBody>>,
) -> HttpResponse {
    let body = body.map(Json::into_inner).unwrap_or(CreateTournamentBody {
        name: default_name(),
        table_count: None,
        day: None,
        round_names: None,
    });
    let day = body.day.unwrap_or_else(|| Local::now().date_naive());
    let config = match ScheduleConfig::new(body.table_count.unwrap_or(defaults.table_count), day) {
        Ok(c) => c.with_slot_minutes(defaults.slot_minutes),
        Err(e) => return error_response(&e),
    };
    let patterns = PatternTemplate::standard().materialize(&mut rand::thread_rng());
    let mut tournament = Tournament::new(body.name, config, patterns);
    if let Some(names) = body.round_names {
        tournament.round_names = names;
    }
    let id = tournament.id;
    log::info!("Created tournament {} ({} tables)", id, tournament.config.table_count);

    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let response = HttpResponse::Ok().json(&tournament);
    g.insert(
        id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    response
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.tournament)
        }
        None => not_found(),
    }
}

/// Replace groups and players. Discards any generated schedule.
#[put("/api/tournaments/{id}/roster")]
async fn api_set_roster(state: AppState, path: Path<TournamentPath>, body: Json<RosterBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    let RosterBody { groups, players } = body.into_inner();
    t.set_roster(groups, players);
    HttpResponse::Ok().json(t)
}

/// Generate the group-play schedule from the roster.
#[post("/api/tournaments/{id}/schedule")]
async fn api_generate_schedule(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match generate_schedule(t) {
        Ok(()) => HttpResponse::Ok().json(&t.schedule),
        Err(e) => error_response(&e),
    }
}

/// Generate the next knockout round for one division.
#[post("/api/tournaments/{id}/knockout")]
async fn api_generate_knockout(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<KnockoutBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match generate_knockout_round(t, body.division.trim()) {
        Ok(summary) => HttpResponse::Ok().json(serde_json::json!({
            "summary": summary,
            "schedule": &t.schedule,
        })),
        Err(e) => error_response(&e),
    }
}

/// Set the winner of one match.
#[put("/api/tournaments/{id}/matches/{match_id}/winner")]
async fn api_set_match_winner(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<SetMatchWinnerBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match set_match_winner(t, path.match_id, body.side) {
        Ok(()) => HttpResponse::Ok().json(&t.schedule),
        Err(e) => error_response(&e),
    }
}

/// The schedule in the shape the storage layer persists (sets start at 0).
#[get("/api/tournaments/{id}/submission")]
async fn api_submission(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &entry.tournament;
    match &t.schedule {
        Some(schedule) => HttpResponse::Ok().json(submission(schedule, &t.config)),
        None => error_response(&ScheduleError::NoSchedule),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = env_number("PORT").unwrap_or_else(default_port);
    let defaults = Defaults {
        table_count: env_number::<u32>("TABLE_COUNT")
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_TABLE_COUNT),
        slot_minutes: env_number("SLOT_MINUTES").unwrap_or(SLOT_MINUTES),
    };
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    log::info!(
        "Scheduling defaults: {} tables, {} minute slots",
        defaults.table_count,
        defaults.slot_minutes
    );

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));
    let defaults = Data::new(defaults);

    // Every 30 minutes, remove tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
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
                log::info!("Cleaned up {} inactive tournament(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(defaults.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_set_roster)
            .service(api_generate_schedule)
            .service(api_generate_knockout)
            .service(api_set_match_winner)
            .service(api_submission)
    })
    .bind(bind)?
    .run()
    .await
}
