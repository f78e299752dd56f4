//! JSON-RPC Server
//!
//! Serves JSON-RPC 2.0 over HTTP and WebSocket on one TCP port.

use crate::error::to_rpc_error;
use crate::feed::{self, FEED_CAPACITY};
use crate::handler::RpcHandler;
use crate::types::{
    BoardEntry, CompanyRequest, DisplaySubscribeRequest, PressRequest, SetPrinterAddressRequest,
};
use jsonrpsee::core::SubscriptionResult;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::types::{ErrorObjectOwned, Params};
use jsonrpsee::{PendingSubscriptionSink, RpcModule, SubscriptionMessage};
use queueboard_core::port::{Listener, Subscription};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9630;

/// Display feed method names
pub const SUBSCRIBE_DISPLAY: &str = "display.subscribe.v1";
pub const DISPLAY_NOTIFICATION: &str = "display.update.v1";
pub const UNSUBSCRIBE_DISPLAY: &str = "display.unsubscribe.v1";

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, handler: Arc<RpcHandler>) -> Self {
        Self { config, handler }
    }

    /// Start the JSON-RPC server. Returns the bound address (port 0 picks a
    /// free port) and the handle that stops it.
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle), String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;
        let local_addr = server
            .local_addr()
            .map_err(|e| format!("Failed to read bound address: {}", e))?;

        let module = build_module(self.handler)?;

        info!(addr = %local_addr, "JSON-RPC server started (HTTP + WebSocket)");
        let handle = server.start(module);
        Ok((local_addr, handle))
    }
}

fn build_module(handler: Arc<RpcHandler>) -> Result<RpcModule<()>, String> {
    let mut module = RpcModule::new(());

    let h = handler.clone();
    module.register_async_method("queue.increment.v1", move |params, _, _| {
        let handler = h.clone();
        async move {
            let req: CompanyRequest = params.parse()?;
            handler.queue_increment(req).await
        }
    })
    .map_err(|e| e.to_string())?;

    let h = handler.clone();
    module.register_async_method("queue.decrement.v1", move |params, _, _| {
        let handler = h.clone();
        async move {
            let req: CompanyRequest = params.parse()?;
            handler.queue_decrement(req).await
        }
    })
    .map_err(|e| e.to_string())?;

    let h = handler.clone();
    module.register_async_method("queue.reset_all.v1", move |_, _, _| {
        let handler = h.clone();
        async move { handler.queue_reset_all().await }
    })
    .map_err(|e| e.to_string())?;

    let h = handler.clone();
    module.register_async_method("ticket.issue.v1", move |params, _, _| {
        let handler = h.clone();
        async move {
            let req: CompanyRequest = params.parse()?;
            handler.ticket_issue(req).await
        }
    })
    .map_err(|e| e.to_string())?;

    let h = handler.clone();
    module.register_async_method("station.press.v1", move |params, _, _| {
        let handler = h.clone();
        async move {
            let req: PressRequest = params.parse()?;
            handler.station_press(req).await
        }
    })
    .map_err(|e| e.to_string())?;

    let h = handler.clone();
    module.register_method("station.status.v1", move |_, _, _| {
        Ok::<_, ErrorObjectOwned>(h.station_status())
    })
    .map_err(|e| e.to_string())?;

    let h = handler.clone();
    module.register_method("display.snapshot.v1", move |_, _, _| {
        Ok::<_, ErrorObjectOwned>(h.display_snapshot())
    })
    .map_err(|e| e.to_string())?;

    let h = handler.clone();
    module.register_method("printer.address.get.v1", move |_, _, _| {
        Ok::<_, ErrorObjectOwned>(h.printer_address())
    })
    .map_err(|e| e.to_string())?;

    let h = handler.clone();
    module.register_async_method("printer.address.set.v1", move |params, _, _| {
        let handler = h.clone();
        async move {
            let req: SetPrinterAddressRequest = params.parse()?;
            handler.set_printer_address(req).await
        }
    })
    .map_err(|e| e.to_string())?;

    module
        .register_subscription(
            SUBSCRIBE_DISPLAY,
            DISPLAY_NOTIFICATION,
            UNSUBSCRIBE_DISPLAY,
            move |params, pending, _, _| display_feed(handler.clone(), params, pending),
        )
        .map_err(|e| e.to_string())?;

    Ok(module)
}

/// display.subscribe.v1: stream `BoardEntry` updates for the selected paths
/// until the client unsubscribes or disconnects
async fn display_feed(
    handler: Arc<RpcHandler>,
    params: Params<'static>,
    pending: PendingSubscriptionSink,
) -> SubscriptionResult {
    let req = match params.parse::<Option<DisplaySubscribeRequest>>() {
        Ok(req) => req.unwrap_or_default(),
        Err(e) => {
            pending.reject(e).await;
            return Ok(());
        }
    };
    let paths = match req.paths() {
        Ok(paths) => paths,
        Err(e) => {
            pending.reject(to_rpc_error(e)).await;
            return Ok(());
        }
    };

    // Listeners run on the writer's task, so they only enqueue
    let (tx, mut rx) = feed::channel(FEED_CAPACITY);
    let store = handler.store();
    let mut subscriptions: Vec<Subscription> = Vec::with_capacity(paths.len());
    for path in paths {
        let tx = tx.clone();
        let listener: Listener = Arc::new(move |snapshot| {
            tx.push(BoardEntry::from_snapshot(path, snapshot));
        });
        match store.subscribe(&path, listener).await {
            Ok(subscription) => subscriptions.push(subscription),
            Err(e) => {
                warn!(path = %path, error = %e, "Display subscription failed");
                pending.reject(to_rpc_error(e)).await;
                return Ok(());
            }
        }
    }
    drop(tx);

    let sink = pending.accept().await?;
    debug!(paths = subscriptions.len(), "Display feed opened");

    loop {
        tokio::select! {
            _ = sink.closed() => break,
            entry = rx.recv() => {
                let Some(entry) = entry else { break };
                let message = SubscriptionMessage::from_json(&entry)?;
                if sink.send(message).await.is_err() {
                    break;
                }
            }
        }
    }

    drop(subscriptions);
    debug!("Display feed closed");
    Ok(())
}
