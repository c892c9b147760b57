use actix_web::{web, App, HttpServer};
use inference_gateway::config::Config;
use inference_gateway::infra::state::StateBuilder;
use inference_gateway::middleware::cors::cors_middleware;
use inference_gateway::middleware::request_trace::RequestTrace;
use inference_gateway::middleware::structured_logger::StructuredLogger;
use inference_gateway::middleware::trace_span::TraceSpan;
use inference_gateway::{routes, telemetry};
use tracing::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {}", e.detail());
            std::process::exit(1);
        }
    };

    let app_state = match StateBuilder::from_config(&config).await {
        Ok(builder) => builder.build().await,
        Err(e) => Err(e),
    };
    let app_state = match app_state {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {}", e.detail());
            std::process::exit(1);
        }
    };

    let (host, port) = config.bind_addr();
    info!(%host, port, model = %app_state.models.current(), "starting inference gateway");

    let max_upload_bytes = app_state.max_upload_bytes;
    let origins = config.cors_allowed_origins.clone();
    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&origins))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
