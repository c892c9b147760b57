use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web::{test, web, App, Error};
use inference_gateway::middleware::request_trace::RequestTrace;
use inference_gateway::middleware::structured_logger::StructuredLogger;
use inference_gateway::middleware::trace_span::TraceSpan;
use inference_gateway::routes;
use inference_gateway::state::app_state::AppState;

/// Build a test service wired like `main.rs`, minus CORS.
///
/// `Compat` on the outermost layer boxes the body so callers can name the
/// response type.
pub async fn create_test_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    let max_upload_bytes = state.max_upload_bytes;

    // Wrap AppState with web::Data at the boundary
    let data = web::Data::new(state);

    test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(Compat::new(RequestTrace))
            .app_data(data)
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .configure(routes::configure),
    )
    .await
}
