//! WebSocket test client

use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Client speaking the gateway's JSON event protocol
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    pub async fn connect(url: &str) -> Result<Self> {
        let (stream, _) = connect_async(url).await.context("WebSocket connect failed")?;
        Ok(Self { stream })
    }

    /// Send `{"event": name, "data": data}`
    pub async fn send(&mut self, event: &str, data: Value) -> Result<()> {
        let frame = if data.is_null() {
            json!({ "event": event })
        } else {
            json!({ "event": event, "data": data })
        };
        self.send_raw(Message::Text(frame.to_string())).await
    }

    pub async fn send_raw(&mut self, message: Message) -> Result<()> {
        self.stream.send(message).await?;
        Ok(())
    }

    /// Next event frame, skipping control frames
    pub async fn recv(&mut self) -> Result<Value> {
        self.recv_within(RECV_TIMEOUT)
            .await?
            .context("timed out waiting for an event")
    }

    /// Next event frame, or `None` if nothing arrives within `wait`
    pub async fn recv_within(&mut self, wait: Duration) -> Result<Option<Value>> {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            let next = tokio::time::timeout_at(deadline, self.stream.next()).await;
            let frame = match next {
                Err(_) => return Ok(None),
                Ok(None) => bail!("connection closed"),
                Ok(Some(frame)) => frame?,
            };
            match frame {
                Message::Text(text) => return Ok(Some(serde_json::from_str(&text)?)),
                Message::Close(_) => bail!("connection closed"),
                _ => continue,
            }
        }
    }

    /// Read until an event called `name` arrives and return it
    pub async fn expect(&mut self, name: &str) -> Result<Value> {
        loop {
            let event = self.recv().await?;
            if event["event"] == name {
                return Ok(event);
            }
        }
    }

    /// Collect every event that arrives within `wait`
    pub async fn drain(&mut self, wait: Duration) -> Result<Vec<Value>> {
        let mut out = Vec::new();
        while let Some(event) = self.recv_within(wait).await? {
            out.push(event);
        }
        Ok(out)
    }

    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}

/// Event names, in order
pub fn names(events: &[Value]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| e["event"].as_str().map(str::to_string))
        .collect()
}
