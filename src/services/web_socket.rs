// ============================================================================
// WEB SOCKET - Conector del navegador + scheduler con gloo_timers
// ============================================================================
// GESTIÓN DE CLOSURES: cada conexión guarda sus closures. Al soltar la conexión
// se desenganchan los handlers antes de liberar los closures, así el navegador
// nunca llama a un closure ya liberado.
// ============================================================================

use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use crate::config::CONFIG;
use crate::error::FeedError;
use crate::services::live_feed::{feed_url, FeedEvent, FeedSink, LiveFeed, Scheduler, SocketConnector};

/// Feed del navegador
pub type BrowserFeed = LiveFeed<WebSocketConnector, TimeoutScheduler>;

/// URL del canal para la página actual (ws://host/ws o wss://host/ws)
pub fn page_feed_url() -> Option<String> {
    let location = web_sys::window()?.location();
    let protocol = location.protocol().ok()?;
    let host = location.host().ok()?;
    Some(feed_url(&protocol, &host, &CONFIG.ws_path))
}

#[derive(Default)]
pub struct WebSocketConnector;

/// Socket abierto + closures que lo escuchan
pub struct WebSocketConnection {
    socket: WebSocket,
    _on_open: Closure<dyn FnMut(Event)>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(Event)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
}

impl SocketConnector for WebSocketConnector {
    type Connection = WebSocketConnection;

    fn connect(&self, url: &str, sink: FeedSink) -> Result<WebSocketConnection, FeedError> {
        let socket = WebSocket::new(url)
            .map_err(|e| FeedError::Transport(format!("{:?}", e)))?;

        let on_open = {
            let sink = sink.clone();
            Closure::wrap(Box::new(move |_e: Event| {
                sink(FeedEvent::Opened);
            }) as Box<dyn FnMut(Event)>)
        };

        let on_message = {
            let sink = sink.clone();
            Closure::wrap(Box::new(move |e: MessageEvent| match e.data().as_string() {
                Some(text) => sink(FeedEvent::Message(text)),
                None => log::warn!("⚠️ [FEED] Frame no textual ignorado"),
            }) as Box<dyn FnMut(MessageEvent)>)
        };

        let on_error = {
            let sink = sink.clone();
            // El evento "error" del WebSocket no trae detalle
            Closure::wrap(Box::new(move |e: Event| {
                sink(FeedEvent::TransportError(format!("websocket {}", e.type_())));
            }) as Box<dyn FnMut(Event)>)
        };

        let on_close = Closure::wrap(Box::new(move |e: CloseEvent| {
            log::info!("🔌 [FEED] close code={} reason='{}'", e.code(), e.reason());
            sink(FeedEvent::Closed);
        }) as Box<dyn FnMut(CloseEvent)>);

        socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        Ok(WebSocketConnection {
            socket,
            _on_open: on_open,
            _on_message: on_message,
            _on_error: on_error,
            _on_close: on_close,
        })
    }
}

impl Drop for WebSocketConnection {
    fn drop(&mut self) {
        self.socket.set_onopen(None);
        self.socket.set_onmessage(None);
        self.socket.set_onerror(None);
        self.socket.set_onclose(None);
        if self.socket.ready_state() == WebSocket::OPEN || self.socket.ready_state() == WebSocket::CONNECTING {
            let _ = self.socket.close();
        }
    }
}

/// Scheduler con setTimeout. Los timeouts no se cancelan nunca.
#[derive(Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        Timeout::new(delay_ms, task).forget();
    }
}
