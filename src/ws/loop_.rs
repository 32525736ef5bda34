use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::config::EngineConfig;
use crate::error::ErrorKind;
use crate::model::WsSession;
use crate::services::WebSocketService;
use crate::store::{OutboxStore, PresenceStore, PubSubBus, UserStore, WsSessionStore};

use super::protocol::{ClientFrame, ServerFrame};
use super::transport::WsTransport;

/// Runs a single WebSocket connection's three cooperative duties —
/// heartbeat, outbound fan-out, inbound decode — as branches of one
/// `tokio::select!` loop sharing a `CancellationToken`, generalizing the
/// teacher's two-armed `select!` in `routes/stream.rs`'s `EventStream!`
/// (message recv + heartbeat tick) to a third branch for inbound frames.
///
/// Teardown (re-entering `WebSocketService::disconnect`) always runs on
/// exit, whichever branch tripped the stop signal.
pub async fn run_connection<P, W, B, O, U, T>(
    session: WsSession,
    mut transport: T,
    service: Arc<WebSocketService<P, W, B, O, U>>,
    bus: Arc<B>,
    config: &EngineConfig,
) where
    P: PresenceStore,
    W: WsSessionStore,
    B: PubSubBus,
    O: OutboxStore,
    U: UserStore,
    T: WsTransport,
{
    let stop = CancellationToken::new();

    let mut room_rx = match bus.subscribe(session.room_id).await {
        Ok(rx) => rx,
        Err(err) => {
            error!(error = %err, "failed to subscribe to room channel");
            return;
        }
    };
    let mut user_rx = match bus.subscribe(session.user_id).await {
        Ok(rx) => rx,
        Err(err) => {
            error!(error = %err, "failed to subscribe to user channel");
            return;
        }
    };

    let mut heartbeat = tokio::time::interval(Duration::from_secs(config.ws_heartbeat_interval_secs));
    heartbeat.tick().await;

    loop {
        tokio::select! {
            _ = stop.cancelled() => break,
            _ = heartbeat.tick() => {
                if let Err(err) = service.update_ping(session.id).await {
                    if err.kind() == ErrorKind::NotFound {
                        warn!(error = %err, "session gone, stopping connection");
                        stop.cancel();
                    } else {
                        warn!(error = %err, "heartbeat update_ping failed, backing off");
                        tokio::time::sleep(Duration::from_secs(config.ws_heartbeat_backoff_secs)).await;
                    }
                    continue;
                }
                if transport.send(ServerFrame::Ping.to_text()).await.is_err() {
                    stop.cancel();
                }
            }
            event = room_rx.recv() => {
                match event {
                    Ok(event) => {
                        if transport.send(ServerFrame::from_broadcast(&event).to_text()).await.is_err() {
                            stop.cancel();
                        }
                    }
                    Err(_) => stop.cancel(),
                }
            }
            event = user_rx.recv() => {
                match event {
                    Ok(event) => {
                        if transport.send(ServerFrame::from_broadcast(&event).to_text()).await.is_err() {
                            stop.cancel();
                        }
                    }
                    Err(_) => stop.cancel(),
                }
            }
            frame = transport.recv() => {
                match frame {
                    Some(Ok(ClientFrame::Pong)) => {}
                    Some(Ok(ClientFrame::UserTyping { username, is_typing })) => {
                        if let Err(err) = service
                            .typing_indicator(session.room_id, session.user_id, &username, is_typing)
                            .await
                        {
                            warn!(error = %err, "typing_indicator rejected");
                        }
                    }
                    Some(Ok(ClientFrame::Unknown(kind))) => {
                        warn!(frame_type = %kind, "unrecognized inbound frame type");
                    }
                    Some(Err(err)) => {
                        warn!(error = %err, "inbound frame decode error");
                        stop.cancel();
                    }
                    None => stop.cancel(),
                }
            }
        }
    }

    if let Err(err) = service.disconnect(session.id).await {
        error!(error = %err, "connection teardown failed");
    }
}
