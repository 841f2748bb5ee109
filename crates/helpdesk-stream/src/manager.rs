use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

use helpdesk_core::{CoreError, ErrorReporter, InboundEvent, IntentSink, OutboundIntent};

const OUTBOUND_CAPACITY: usize = 64;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;

/// Handle for the active receive slot. Unsubscribing with a stale handle
/// (one that has since been replaced) is a no-op, so a torn-down screen
/// can never evict its successor.
#[derive(Debug)]
#[must_use = "dropping the handle leaves the receive slot installed forever"]
pub struct Subscription {
    id: u64,
}

struct Subscriber {
    id: u64,
    label: String,
    events: mpsc::Sender<InboundEvent>,
}

struct Connection {
    outbound: mpsc::Sender<String>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

/// Owns the session's WebSocket and its reader/writer tasks.
pub struct ConnectionManager {
    reporter: Arc<dyn ErrorReporter>,
    state: Mutex<Option<Connection>>,
    subscriber: Arc<Mutex<Option<Subscriber>>>,
    next_subscription_id: AtomicU64,
}

impl ConnectionManager {
    pub fn new(reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            reporter,
            state: Mutex::new(None),
            subscriber: Arc::new(Mutex::new(None)),
            next_subscription_id: AtomicU64::new(1),
        }
    }

    /// Opens the event stream, authenticating through the
    /// `Sec-WebSocket-Protocol` pair `token, <bearer>`. Idempotent while
    /// a connection is open.
    pub async fn connect(&self, endpoint: &str, token: &str) -> Result<(), CoreError> {
        if self.state.lock().expect("connection state lock").is_some() {
            return Ok(());
        }

        let mut request = endpoint
            .into_client_request()
            .map_err(|err| CoreError::Configuration(format!("invalid stream endpoint: {err}")))?;
        let protocols = HeaderValue::from_str(&format!("token, {token}")).map_err(|_| {
            CoreError::Configuration("token is not a valid header value".to_owned())
        })?;
        request
            .headers_mut()
            .insert("Sec-WebSocket-Protocol", protocols);

        let (socket, _) = connect_async(request)
            .await
            .map_err(|err| CoreError::Transport(format!("websocket handshake failed: {err}")))?;
        let (write_half, read_half) = socket.split();

        let (outbound, outbound_rx) = mpsc::channel(OUTBOUND_CAPACITY);
        let reader = spawn_reader(read_half, self.subscriber.clone(), self.reporter.clone());
        let writer = spawn_writer(write_half, outbound_rx);

        let mut state = self.state.lock().expect("connection state lock");
        if state.is_some() {
            // Lost a connect race; keep the existing connection.
            reader.abort();
            writer.abort();
            return Ok(());
        }
        *state = Some(Connection {
            outbound,
            reader,
            writer,
        });
        info!(endpoint, "event stream connected");
        Ok(())
    }

    /// Installs the single receive slot, replacing any previous
    /// subscriber. Events arriving while no slot is installed are
    /// dropped.
    pub fn subscribe(&self, label: &str, events: mpsc::Sender<InboundEvent>) -> Subscription {
        let id = self.next_subscription_id.fetch_add(1, Ordering::Relaxed);
        let previous = self
            .subscriber
            .lock()
            .expect("subscriber slot lock")
            .replace(Subscriber {
                id,
                label: label.to_owned(),
                events,
            });
        if let Some(previous) = previous {
            debug!(replaced = %previous.label, label, "receive slot replaced");
        }
        Subscription { id }
    }

    /// Releases the receive slot, but only if `subscription` still owns
    /// it.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        let mut slot = self.subscriber.lock().expect("subscriber slot lock");
        if slot.as_ref().is_some_and(|active| active.id == subscription.id) {
            *slot = None;
        }
    }

    /// The error surface installed at construction, for callers that
    /// surface their own failures alongside stream faults.
    pub fn reporter(&self) -> Arc<dyn ErrorReporter> {
        self.reporter.clone()
    }

    /// Explicit session-end shutdown. Screens never call this.
    pub fn close(&self) {
        if let Some(connection) = self.state.lock().expect("connection state lock").take() {
            connection.reader.abort();
            connection.writer.abort();
            info!("event stream closed");
        }
    }

    fn queue(&self, payload: String) -> Result<(), CoreError> {
        let state = self.state.lock().expect("connection state lock");
        let Some(connection) = state.as_ref() else {
            return Err(CoreError::NotConnected);
        };
        connection.outbound.try_send(payload).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => {
                CoreError::Transport("outbound queue is full".to_owned())
            }
            mpsc::error::TrySendError::Closed(_) => CoreError::NotConnected,
        })
    }
}

impl IntentSink for ConnectionManager {
    /// Fire-and-forget: the payload is queued for the writer task and
    /// the server confirms by echoing a lifecycle event.
    fn send(&self, intent: OutboundIntent) -> Result<(), CoreError> {
        let payload = intent.encode()?;
        self.queue(payload)
    }
}

fn spawn_reader(
    mut read_half: SplitStream<WsStream>,
    subscriber: Arc<Mutex<Option<Subscriber>>>,
    reporter: Arc<dyn ErrorReporter>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let message = match read_half.next().await {
                Some(Ok(message)) => message,
                Some(Err(err)) => {
                    reporter.report(&CoreError::Transport(format!("event stream failed: {err}")));
                    return;
                }
                None => {
                    reporter.report(&CoreError::Transport(
                        "event stream closed by server".to_owned(),
                    ));
                    return;
                }
            };

            match message {
                WsMessage::Text(payload) => dispatch(&subscriber, reporter.as_ref(), &payload),
                WsMessage::Ping(_) | WsMessage::Pong(_) => continue,
                WsMessage::Close(_) => {
                    reporter.report(&CoreError::Transport(
                        "event stream closed by server".to_owned(),
                    ));
                    return;
                }
                _ => continue,
            }
        }
    })
}

fn spawn_writer(mut write_half: WsSink, mut outbound: mpsc::Receiver<String>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(payload) = outbound.recv().await {
            if write_half.send(WsMessage::Text(payload)).await.is_err() {
                // Connection lost; queued senders observe the closed
                // channel as NotConnected.
                return;
            }
        }
    })
}

/// Decodes one text frame and hands it to the active subscriber.
/// Malformed frames and unknown actions are reported and dropped; so
/// are events arriving with no subscriber installed.
fn dispatch(
    subscriber: &Mutex<Option<Subscriber>>,
    reporter: &dyn ErrorReporter,
    payload: &str,
) {
    let event = match InboundEvent::decode(payload) {
        Ok(event) => event,
        Err(err) => {
            reporter.report(&err);
            return;
        }
    };

    let slot = subscriber.lock().expect("subscriber slot lock");
    match slot.as_ref() {
        Some(active) => {
            if active.events.try_send(event).is_err() {
                debug!(label = %active.label, "subscriber not draining, event dropped");
            }
        }
        None => debug!(action = event.action(), "no subscriber installed, event dropped"),
    }
}
