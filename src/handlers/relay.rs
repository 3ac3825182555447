use std::sync::Arc;

use warp::http::StatusCode;
use warp::{Filter, Reply};

use crate::clients::sms_client::SmsSender;
use crate::models::inbound::InboundMessage;
use crate::service::relay_service::RelayService;

pub const EMPTY_TWIML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response></Response>";
const MAX_FORM_BYTES: u64 = 16 * 1024;

/// `POST /sms`: forwards an inbound text to the relay destination.
pub fn relay_routes(
    sender: Arc<dyn SmsSender>,
    destination: Arc<String>,
) -> impl Filter<Extract = (warp::reply::Response,), Error = warp::Rejection> + Clone {
    warp::path("sms")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_FORM_BYTES))
        .and(warp::body::form::<InboundMessage>())
        .and(warp::any().map(move || sender.clone()))
        .and(warp::any().map(move || destination.clone()))
        .then(handle_inbound)
}

async fn handle_inbound(
    message: InboundMessage,
    sender: Arc<dyn SmsSender>,
    destination: Arc<String>,
) -> warp::reply::Response {
    let status = match RelayService::forward(sender.as_ref(), &destination, &message).await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::BAD_GATEWAY,
    };
    let reply = warp::reply::with_header(EMPTY_TWIML, "content-type", "application/xml");
    warp::reply::with_status(reply, status).into_response()
}
