use std::time::Duration;

use tower::layer::util::{Identity, Stack};
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::HttpMakeClassifier;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Catalog snapshots can be large; generation runs are bounded by the timeout.
const BODY_LIMIT: usize = 8 * 1024 * 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Body limit sits inside the trace layer and outside CORS, whose preflight
/// responses need a defaultable body.
pub fn stack() -> ServiceBuilder<
    Stack<
        TimeoutLayer,
        Stack<CorsLayer, Stack<RequestBodyLimitLayer, Stack<TraceLayer<HttpMakeClassifier>, Identity>>>,
    >,
> {
    let trace = TraceLayer::new_for_http();
    let cors = CorsLayer::permissive();
    let limit = RequestBodyLimitLayer::new(BODY_LIMIT);
    let timeout = TimeoutLayer::new(REQUEST_TIMEOUT);

    ServiceBuilder::new()
        .layer(trace)
        .layer(limit)
        .layer(cors)
        .layer(timeout)
}
