mod config;
mod error;
mod state;
mod telemetry;
pub mod routes {
    pub mod generate;
    pub mod health;
    pub mod jobs;
    pub mod lessons;
    pub mod plans;
    pub mod schema;
    pub mod teachers;
    pub mod validate;
}

use axum::{
    routing::{get, post, put},
    Router,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            routes::health::health,
            routes::generate::generate,
            routes::generate::enqueue,
            routes::jobs::status,
            routes::jobs::result,
            routes::validate::validate_handler,
            routes::schema::catalog_schema,
            routes::lessons::save,
            routes::lessons::change_room,
            routes::lessons::free,
            routes::plans::set_hours,
            routes::teachers::load,
        ),
        components(schemas(
            types::Catalog, types::Building, types::RoomType, types::Room, types::LessonType,
            types::DeliveryMode, types::Discipline, types::Workload, types::DayOverride,
            types::Teacher, types::StudentGroup, types::BuildingPriority,
            types::GroupDisciplinePlan, types::TeachingAssignment, types::Holiday,
            types::TimeSlot, types::Lesson, types::PlanHours,
            types::GenerateRequest, types::GenerateResponse, types::ProposalView,
            types::Conflict, types::ConflictReason, types::Stats,
            types::FreeRoom, types::TeacherLoad,
            types::BuildingId, types::RoomTypeId, types::RoomId, types::LessonTypeId,
            types::DisciplineId, types::TeacherId, types::GroupId, types::TimeslotId,
            types::LessonId, types::StreamId,
            jobs::JobId, jobs::JobStatus, jobs::FailureKind,
            error::ErrorBody,
            routes::health::Health,
            routes::generate::JobCreated,
            routes::validate::ValidationReport,
            routes::lessons::LessonInput,
            routes::lessons::RoomChange,
        )),
        tags(
            (name = "timetable", description = "College timetable generator API")
        )
    )]
struct ApiDoc;

fn router(app_state: state::AppState) -> Router {
    Router::new()
        .route("/v1/health", get(routes::health::health))
        .route("/v1/generate", get(routes::generate::generate))
        .route("/v1/generate/jobs", post(routes::generate::enqueue))
        .route("/v1/jobs/:id", get(routes::jobs::status))
        .route("/v1/jobs/:id/result", get(routes::jobs::result))
        .route("/v1/validate", post(routes::validate::validate_handler))
        .route("/v1/schema/catalog", get(routes::schema::catalog_schema))
        .route("/v1/lessons", post(routes::lessons::save))
        .route("/v1/lessons/:id/room", post(routes::lessons::change_room))
        .route("/v1/lessons/:id/free-rooms", get(routes::lessons::free))
        .route("/v1/plans/hours", put(routes::plans::set_hours))
        .route("/v1/teachers/:id/load", get(routes::teachers::load))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(telemetry::stack())
        .with_state(app_state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let settings = config::Settings::from_env()?;
    let app_state = state::AppState::from_settings(&settings)?;
    let app = router(app_state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!(%addr, academic_minutes = settings.generator.academic_minutes, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
