pub mod modules;
pub use modules::email;
pub use modules::users;
pub mod health;
pub mod shared;

use crate::email::adapter::outgoing::smtp_sender::SmtpEmailSender;
use crate::email::application::ports::outgoing::email_sender::EmailSender;
use crate::email::application::services::OnboardingEmailService;
use crate::users::adapter::outgoing::cloud_storage::GcsDocumentStorage;
use crate::users::adapter::outgoing::jwt::{JwtConfig, JwtTokenProvider};
use crate::users::adapter::outgoing::security::Argon2Hasher;
use crate::users::adapter::outgoing::{UserQueryPostgres, UserRepositoryPostgres};
use crate::users::application::ports::outgoing::{
    document_storage::DocumentStorage, password_hasher::PasswordHasher,
    token_provider::TokenProvider, user_notifier::UserOnboardingNotifier,
};
use crate::users::application::use_cases::{
    create_user::{CreateUserUseCase, ICreateUserUseCase},
    fetch_profile::{FetchProfileUseCase, IFetchProfileUseCase},
    hard_delete_user::{HardDeleteUserUseCase, IHardDeleteUserUseCase},
    list_users::{IListUsersUseCase, ListUsersUseCase},
    restore_user::{IRestoreUserUseCase, RestoreUserUseCase},
    soft_delete_user::{ISoftDeleteUserUseCase, SoftDeleteUserUseCase},
    update_user::{IUpdateUserUseCase, UpdateUserUseCase},
};

use actix_web::{web, App, HttpServer};
use sea_orm::{ConnectOptions, Database};
use std::env;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub create_user_use_case: Arc<dyn ICreateUserUseCase + Send + Sync>,
    pub update_user_use_case: Arc<dyn IUpdateUserUseCase + Send + Sync>,
    pub fetch_profile_use_case: Arc<dyn IFetchProfileUseCase + Send + Sync>,
    pub list_users_use_case: Arc<dyn IListUsersUseCase + Send + Sync>,
    pub soft_delete_user_use_case: Arc<dyn ISoftDeleteUserUseCase + Send + Sync>,
    pub restore_user_use_case: Arc<dyn IRestoreUserUseCase + Send + Sync>,
    pub hard_delete_user_use_case: Arc<dyn IHardDeleteUserUseCase + Send + Sync>,
}

#[actix_web::main]
#[cfg(not(tarpaulin_include))]
async fn start() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting application...");

    // Environment variable loading
    let env = std::env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());

    // Try .env.{environment} first, then fall back to .env
    let env_file = format!(".env.{}", env);
    if dotenvy::from_filename(&env_file).is_err() {
        dotenvy::dotenv().ok();
    }

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL is not set in .env file");
    let host = env::var("HOST").expect("HOST is not set in .env file");
    let port = env::var("PORT").expect("PORT is not set in .env file");

    // SMTP setup
    let from_email = std::env::var("EMAIL_FROM").expect("EMAIL_FROM not set");
    let smtp_sender = if std::env::var("RUST_ENV").as_deref() == Ok("test") {
        // Local Mailpit
        let host = std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port: u16 = std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "1025".to_string())
            .parse()
            .expect("Invalid SMTP_PORT");

        SmtpEmailSender::new_local(&host, port, &from_email)
    } else {
        let smtp_server = std::env::var("SMTP_SERVER").expect("SMTP_SERVER not set");
        let smtp_user = std::env::var("SMTP_USERNAME").expect("SMTP_USERNAME not set");
        let smtp_pass = std::env::var("SMTP_PASSWORD").expect("SMTP_PASSWORD not set");

        SmtpEmailSender::new(&smtp_server, &smtp_user, &smtp_pass, &from_email)
            .expect("Invalid SMTP relay configuration")
    };

    let server_url = format!("{host}:{port}");
    info!("Server will run on: {}", server_url);

    // Database connection
    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(50)
        .min_connections(10)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(false);

    let conn = Database::connect(opt)
        .await
        .expect("Failed to connect to database");

    let db_arc = Arc::new(conn);

    // Outgoing adapters
    let user_repo = UserRepositoryPostgres::new(Arc::clone(&db_arc));
    let user_query = UserQueryPostgres::new(Arc::clone(&db_arc));
    let jwt_provider = JwtTokenProvider::new(JwtConfig::from_env());
    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::from_env());
    let document_storage: Arc<dyn DocumentStorage> = Arc::new(GcsDocumentStorage::new());

    let email_sender: Arc<dyn EmailSender + Send + Sync> = Arc::new(smtp_sender);
    let onboarding_notifier: Arc<dyn UserOnboardingNotifier> =
        Arc::new(OnboardingEmailService::new(email_sender));

    // Use cases
    let create_user_use_case = CreateUserUseCase::new(
        user_query.clone(),
        user_repo.clone(),
        Arc::clone(&password_hasher),
        Arc::clone(&document_storage),
        Arc::clone(&onboarding_notifier),
    );
    let update_user_use_case = UpdateUserUseCase::new(
        user_query.clone(),
        user_repo.clone(),
        Arc::clone(&document_storage),
    );
    let fetch_profile_use_case = FetchProfileUseCase::new(user_query.clone());
    let list_users_use_case = ListUsersUseCase::new(user_query.clone());
    let soft_delete_user_use_case = SoftDeleteUserUseCase::new(user_repo.clone());
    let restore_user_use_case = RestoreUserUseCase::new(user_query, user_repo.clone());
    let hard_delete_user_use_case = HardDeleteUserUseCase::new(user_repo);

    let state = AppState {
        create_user_use_case: Arc::new(create_user_use_case),
        update_user_use_case: Arc::new(update_user_use_case),
        fetch_profile_use_case: Arc::new(fetch_profile_use_case),
        list_users_use_case: Arc::new(list_users_use_case),
        soft_delete_user_use_case: Arc::new(soft_delete_user_use_case),
        restore_user_use_case: Arc::new(restore_user_use_case),
        hard_delete_user_use_case: Arc::new(hard_delete_user_use_case),
    };

    let token_provider_arc: Arc<dyn TokenProvider> = Arc::new(jwt_provider);
    let db_for_server = Arc::clone(&db_arc);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(Arc::clone(&token_provider_arc)))
            .app_data(web::Data::new(Arc::clone(&db_for_server)))
            .app_data(crate::shared::api::json_config::custom_json_config())
            .configure(init_routes)
    })
    .bind(server_url)?
    .run()
    .await
}

#[cfg(not(tarpaulin_include))]
fn init_routes(cfg: &mut web::ServiceConfig) {
    // Health
    cfg.service(crate::health::health);
    cfg.service(crate::health::readiness);
    // Users. `/api/users/me` must register before `/api/users/{user_id}`.
    cfg.service(crate::users::adapter::incoming::web::routes::list_users_handler);
    cfg.service(crate::users::adapter::incoming::web::routes::create_user_handler);
    cfg.service(crate::users::adapter::incoming::web::routes::get_my_profile_handler);
    cfg.service(crate::users::adapter::incoming::web::routes::restore_user_handler);
    cfg.service(crate::users::adapter::incoming::web::routes::hard_delete_user_handler);
    cfg.service(crate::users::adapter::incoming::web::routes::get_user_handler);
    cfg.service(crate::users::adapter::incoming::web::routes::update_user_handler);
    cfg.service(crate::users::adapter::incoming::web::routes::soft_delete_user_handler);
}

fn main() {
    if let Err(e) = start() {
        eprintln!("Error starting app: {e}");
    }
}
