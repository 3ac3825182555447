use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::clients::sms_client::SmsSender;
use crate::config::RelaySettings;
use crate::errors::CheckError;
use crate::handlers::relay::relay_routes;

pub async fn run_relay(settings: &RelaySettings, sender: Box<dyn SmsSender>) -> Result<(), CheckError> {
    let addr: SocketAddr = settings.bind.parse().map_err(|_| {
        CheckError::Configuration(format!("RELAY_BIND is not a socket address: {}", settings.bind))
    })?;

    let routes = relay_routes(Arc::from(sender), Arc::new(settings.destination.clone()));
    info!(%addr, "inbound relay listening");
    warp::serve(routes).run(addr).await;
    Ok(())
}
