use actix_web::{get, web, HttpResponse, Responder};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct LivenessBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadinessBody {
    status: &'static str,
    database: &'static str,
}

/// Liveness probe. Must never touch the database.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(LivenessBody { status: "ok" })
}

/// Readiness probe: one round-trip to Postgres.
#[get("/ready")]
pub async fn readiness(db: web::Data<Arc<DatabaseConnection>>) -> impl Responder {
    let ping = Statement::from_string(db.get_database_backend(), "SELECT 1");

    match db.execute(ping).await {
        Ok(_) => HttpResponse::Ok().json(ReadinessBody {
            status: "ok",
            database: "ok",
        }),
        Err(_) => HttpResponse::ServiceUnavailable().json(ReadinessBody {
            status: "unhealthy",
            database: "unhealthy",
        }),
    }
}
