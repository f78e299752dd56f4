//! Live display feed over WebSocket

use crate::client::object_params;
use crate::error::Result;
use crate::types::BoardEntry;
use futures::StreamExt;
use jsonrpsee::core::client::{Subscription, SubscriptionClientT};
use jsonrpsee::ws_client::{WsClient, WsClientBuilder};
use serde::Serialize;

const SUBSCRIBE: &str = "display.subscribe.v1";
const UNSUBSCRIBE: &str = "display.unsubscribe.v1";

/// Which counters to follow. Both fields empty means all eight.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl DisplayFilter {
    pub fn queue() -> Self {
        Self {
            kind: Some("queue".to_string()),
            company: None,
        }
    }

    pub fn ticket() -> Self {
        Self {
            kind: Some("ticket".to_string()),
            company: None,
        }
    }

    pub fn company(mut self, company: &str) -> Self {
        self.company = Some(company.to_string());
        self
    }
}

/// Stream of `BoardEntry` updates.
///
/// The current value of every selected counter arrives first, then each
/// later change. Dropping the feed closes the connection.
pub struct DisplayFeed {
    subscription: Subscription<BoardEntry>,
    // Keeps the connection open for the subscription
    _client: WsClient,
}

impl DisplayFeed {
    /// Subscribe to a daemon at `url` (e.g., "ws://127.0.0.1:9630")
    pub async fn connect(url: &str, filter: DisplayFilter) -> Result<Self> {
        let client = WsClientBuilder::default().build(url).await?;
        let params = object_params(&filter)?;
        let subscription = client.subscribe(SUBSCRIBE, params, UNSUBSCRIBE).await?;

        Ok(Self {
            subscription,
            _client: client,
        })
    }

    /// Next update, `None` once the server closed the feed
    pub async fn next(&mut self) -> Option<Result<BoardEntry>> {
        self.subscription
            .next()
            .await
            .map(|entry| entry.map_err(Into::into))
    }

    pub async fn unsubscribe(self) -> Result<()> {
        self.subscription.unsubscribe().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_serializes_only_set_fields() {
        let all = serde_json::to_value(DisplayFilter::default()).unwrap();
        assert_eq!(all, serde_json::json!({}));

        let one = serde_json::to_value(DisplayFilter::ticket().company("d")).unwrap();
        assert_eq!(one, serde_json::json!({"kind": "ticket", "company": "d"}));
    }
}
