// ============================================================================
// LIVE FEED - Posiciones de vehículos en vivo por WebSocket
// ============================================================================
// Máquina de estados pura (FeedMachine) + driver (LiveFeed) que ejecuta las
// acciones con un conector de sockets y un scheduler inyectables.
//
//   Disconnected -> Connecting -> Connected -> Disconnected -> (delay) -> Connecting ...
//
// No hay estado terminal: se reintenta para siempre.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::error::FeedError;
use crate::maps::VehicleMarkers;
use crate::models::{FeedMessage, LocationUpdate, LOCATION_UPDATE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    Disconnected,
    Connecting,
    Connected,
}

/// Eventos que alimentan la máquina
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Start,
    Opened,
    Message(String),
    TransportError(String),
    Closed,
    RetryElapsed,
}

/// Efectos que el driver debe ejecutar
#[derive(Debug, Clone, PartialEq)]
pub enum FeedAction {
    Connect,
    ScheduleReconnect { delay_ms: u32 },
    ApplyLocation(LocationUpdate),
}

pub struct FeedMachine {
    state: FeedState,
    started: bool,
    reconnect_pending: bool,
    reconnect_delay_ms: u32,
}

impl FeedMachine {
    pub fn new(reconnect_delay_ms: u32) -> Self {
        Self {
            state: FeedState::Disconnected,
            started: false,
            reconnect_pending: false,
            reconnect_delay_ms,
        }
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    pub fn handle(&mut self, event: FeedEvent) -> Vec<FeedAction> {
        match event {
            FeedEvent::Start => {
                if self.started {
                    return Vec::new();
                }
                self.started = true;
                self.state = FeedState::Connecting;
                vec![FeedAction::Connect]
            }
            FeedEvent::Opened => {
                if self.state == FeedState::Connecting {
                    self.state = FeedState::Connected;
                    log::info!("🔌 [FEED] WebSocket conectado");
                }
                Vec::new()
            }
            FeedEvent::Message(text) => {
                if self.state != FeedState::Connected {
                    return Vec::new();
                }
                match parse_frame(&text) {
                    Ok(Some(update)) => vec![FeedAction::ApplyLocation(update)],
                    Ok(None) => Vec::new(),
                    Err(e) => {
                        log::warn!("⚠️ [FEED] Frame descartado: {}", e);
                        Vec::new()
                    }
                }
            }
            FeedEvent::TransportError(detail) => {
                // La reconexión la dispara el close que sigue, no el error
                log::error!("❌ [FEED] {}", FeedError::Transport(detail));
                Vec::new()
            }
            FeedEvent::Closed => {
                if !self.started || self.reconnect_pending {
                    return Vec::new();
                }
                log::info!("📴 [FEED] WebSocket desconectado, reintento en {} ms", self.reconnect_delay_ms);
                self.state = FeedState::Disconnected;
                self.reconnect_pending = true;
                vec![FeedAction::ScheduleReconnect { delay_ms: self.reconnect_delay_ms }]
            }
            FeedEvent::RetryElapsed => {
                if !self.reconnect_pending {
                    return Vec::new();
                }
                self.reconnect_pending = false;
                self.state = FeedState::Connecting;
                vec![FeedAction::Connect]
            }
        }
    }
}

/// Parsear un frame de texto. Ok(None) = tipo de mensaje que no nos interesa.
pub fn parse_frame(text: &str) -> Result<Option<LocationUpdate>, FeedError> {
    let message: FeedMessage =
        serde_json::from_str(text).map_err(|e| FeedError::Parse(e.to_string()))?;
    if message.message_type != LOCATION_UPDATE {
        return Ok(None);
    }
    serde_json::from_value(message.data)
        .map(Some)
        .map_err(|e| FeedError::Parse(format!("location_update: {}", e)))
}

/// URL del WebSocket derivada de la página: wss si la página es https
pub fn feed_url(page_protocol: &str, page_host: &str, path: &str) -> String {
    let scheme = if page_protocol.starts_with("https") { "wss" } else { "ws" };
    format!("{}://{}{}", scheme, page_host, path)
}

/// Callback por el que una conexión reporta sus eventos
pub type FeedSink = Rc<dyn Fn(FeedEvent)>;

/// Abre conexiones de streaming
pub trait SocketConnector {
    /// Mantiene viva la conexión; soltarla la desengancha
    type Connection;

    fn connect(&self, url: &str, sink: FeedSink) -> Result<Self::Connection, FeedError>;
}

/// Ejecuta una tarea tras un retraso fijo
pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>);
}

struct FeedInner<C: SocketConnector, S: Scheduler> {
    machine: RefCell<FeedMachine>,
    connector: C,
    scheduler: S,
    url: String,
    markers: Rc<RefCell<VehicleMarkers>>,
    connection: RefCell<Option<C::Connection>>,
    /// Los eventos de conexiones anteriores se ignoran
    generation: Cell<u64>,
}

/// Driver del canal en vivo
pub struct LiveFeed<C: SocketConnector + 'static, S: Scheduler + 'static> {
    inner: Rc<FeedInner<C, S>>,
}

impl<C: SocketConnector + 'static, S: Scheduler + 'static> LiveFeed<C, S> {
    pub fn new(
        url: String,
        reconnect_delay_ms: u32,
        connector: C,
        scheduler: S,
        markers: Rc<RefCell<VehicleMarkers>>,
    ) -> Self {
        Self {
            inner: Rc::new(FeedInner {
                machine: RefCell::new(FeedMachine::new(reconnect_delay_ms)),
                connector,
                scheduler,
                url,
                markers,
                connection: RefCell::new(None),
                generation: Cell::new(0),
            }),
        }
    }

    /// Arrancar el canal. Llamadas repetidas no abren más conexiones.
    pub fn start(&self) {
        dispatch(&self.inner, FeedEvent::Start);
    }

    pub fn state(&self) -> FeedState {
        self.inner.machine.borrow().state()
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }
}

fn dispatch<C, S>(inner: &Rc<FeedInner<C, S>>, event: FeedEvent)
where
    C: SocketConnector + 'static,
    S: Scheduler + 'static,
{
    let actions = inner.machine.borrow_mut().handle(event);
    for action in actions {
        match action {
            FeedAction::Connect => open_connection(inner),
            FeedAction::ScheduleReconnect { delay_ms } => {
                let weak: Weak<FeedInner<C, S>> = Rc::downgrade(inner);
                inner.scheduler.schedule(
                    delay_ms,
                    Box::new(move || {
                        if let Some(inner) = weak.upgrade() {
                            dispatch(&inner, FeedEvent::RetryElapsed);
                        }
                    }),
                );
            }
            FeedAction::ApplyLocation(update) => {
                inner.markers.borrow_mut().apply_location(&update);
            }
        }
    }
}

fn open_connection<C, S>(inner: &Rc<FeedInner<C, S>>)
where
    C: SocketConnector + 'static,
    S: Scheduler + 'static,
{
    let generation = inner.generation.get() + 1;
    inner.generation.set(generation);
    inner.connection.borrow_mut().take();

    let weak: Weak<FeedInner<C, S>> = Rc::downgrade(inner);
    let sink: FeedSink = Rc::new(move |event| {
        if let Some(inner) = weak.upgrade() {
            if inner.generation.get() == generation {
                dispatch(&inner, event);
            }
        }
    });

    log::info!("🔄 [FEED] Conectando a {}", inner.url);
    match inner.connector.connect(&inner.url, sink) {
        Ok(connection) => {
            *inner.connection.borrow_mut() = Some(connection);
        }
        Err(e) => {
            // Sin socket no habrá close: se simula para entrar en el ciclo de reintento
            log::error!("❌ [FEED] No se pudo abrir la conexión: {}", e);
            dispatch(inner, FeedEvent::Closed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::markers::tests::RecordingLayer;

    #[derive(Clone, Default)]
    struct FakeConnector {
        sinks: Rc<RefCell<Vec<FeedSink>>>,
        fail: Rc<Cell<bool>>,
    }

    impl SocketConnector for FakeConnector {
        type Connection = ();

        fn connect(&self, _url: &str, sink: FeedSink) -> Result<(), FeedError> {
            if self.fail.get() {
                return Err(FeedError::Transport("refused".to_string()));
            }
            self.sinks.borrow_mut().push(sink);
            Ok(())
        }
    }

    impl FakeConnector {
        fn connects(&self) -> usize {
            self.sinks.borrow().len()
        }

        fn latest(&self) -> FeedSink {
            self.sinks.borrow().last().cloned().expect("no connection opened")
        }
    }

    type Task = Box<dyn FnOnce()>;

    #[derive(Clone, Default)]
    struct ManualScheduler {
        pending: Rc<RefCell<Vec<(u32, Task)>>>,
        delays: Rc<RefCell<Vec<u32>>>,
    }

    impl Scheduler for ManualScheduler {
        fn schedule(&self, delay_ms: u32, task: Task) {
            self.delays.borrow_mut().push(delay_ms);
            self.pending.borrow_mut().push((delay_ms, task));
        }
    }

    impl ManualScheduler {
        /// Dejar pasar el tiempo: ejecutar lo que está pendiente
        fn elapse(&self) {
            let tasks: Vec<_> = self.pending.borrow_mut().drain(..).collect();
            for (_, task) in tasks {
                task();
            }
        }
    }

    fn feed() -> (LiveFeed<FakeConnector, ManualScheduler>, FakeConnector, ManualScheduler, Rc<RefCell<VehicleMarkers>>) {
        let connector = FakeConnector::default();
        let scheduler = ManualScheduler::default();
        let markers = Rc::new(RefCell::new(VehicleMarkers::new(Box::new(RecordingLayer::default()))));
        let live = LiveFeed::new(
            "ws://localhost:8080/ws".to_string(),
            5000,
            connector.clone(),
            scheduler.clone(),
            markers.clone(),
        );
        (live, connector, scheduler, markers)
    }

    fn frame(vehicle_id: &str, lat: f64, lng: f64, speed: f64) -> String {
        format!(
            r#"{{"message_type":"location_update","data":{{"vehicle_id":"{}","latitude":{},"longitude":{},"speed":{}}}}}"#,
            vehicle_id, lat, lng, speed
        )
    }

    #[test]
    fn machine_starts_disconnected_and_ignores_close_before_start() {
        let mut machine = FeedMachine::new(5000);
        assert_eq!(machine.state(), FeedState::Disconnected);
        assert!(machine.handle(FeedEvent::Closed).is_empty());
        assert!(machine.handle(FeedEvent::RetryElapsed).is_empty());
        assert_eq!(machine.handle(FeedEvent::Start), vec![FeedAction::Connect]);
        assert_eq!(machine.state(), FeedState::Connecting);
        assert!(machine.handle(FeedEvent::Start).is_empty());
    }

    #[test]
    fn transport_error_alone_does_not_reconnect() {
        let mut machine = FeedMachine::new(5000);
        machine.handle(FeedEvent::Start);
        machine.handle(FeedEvent::Opened);
        assert!(machine.handle(FeedEvent::TransportError("reset".into())).is_empty());
        assert_eq!(machine.state(), FeedState::Connected);
        assert_eq!(
            machine.handle(FeedEvent::Closed),
            vec![FeedAction::ScheduleReconnect { delay_ms: 5000 }]
        );
        // Un segundo close con el reintento ya programado no programa otro
        assert!(machine.handle(FeedEvent::Closed).is_empty());
    }

    #[test]
    fn frames_are_filtered_by_type_and_validity() {
        assert!(parse_frame("not json").is_err());
        assert_eq!(parse_frame(r#"{"message_type":"route_assigned","data":{}}"#), Ok(None));
        assert!(parse_frame(r#"{"message_type":"location_update","data":{"vehicle_id":"x"}}"#).is_err());

        let update = parse_frame(&frame("v-9", 48.1, 11.5, 63.0)).unwrap().unwrap();
        assert_eq!(update.vehicle_id, "v-9");
        assert_eq!(update.speed, 63.0);
    }

    #[test]
    fn ws_url_follows_page_scheme() {
        assert_eq!(feed_url("http:", "localhost:8080", "/ws"), "ws://localhost:8080/ws");
        assert_eq!(feed_url("https:", "fleet.example.com", "/ws"), "wss://fleet.example.com/ws");
    }

    #[test]
    fn n_closes_trigger_n_delayed_reconnects() {
        let (live, connector, scheduler, _) = feed();
        live.start();
        live.start();
        assert_eq!(connector.connects(), 1);

        const DROPS: usize = 4;
        for round in 1..=DROPS {
            let sink = connector.latest();
            sink(FeedEvent::Opened);
            assert_eq!(live.state(), FeedState::Connected);
            sink(FeedEvent::TransportError("broken pipe".into()));
            sink(FeedEvent::Closed);

            // Nada se reabre hasta que pase el retraso
            assert_eq!(live.state(), FeedState::Disconnected);
            assert_eq!(connector.connects(), round);
            scheduler.elapse();
            assert_eq!(live.state(), FeedState::Connecting);
            assert_eq!(connector.connects(), round + 1);
        }

        assert_eq!(*scheduler.delays.borrow(), vec![5000; DROPS]);
    }

    #[test]
    fn events_from_stale_connections_are_ignored() {
        let (live, connector, scheduler, _) = feed();
        live.start();
        let first = connector.latest();
        first(FeedEvent::Opened);
        first(FeedEvent::Closed);
        scheduler.elapse();

        // La conexión vieja emite otro close tardío
        first(FeedEvent::Closed);
        assert!(scheduler.pending.borrow().is_empty());
        assert_eq!(live.state(), FeedState::Connecting);
    }

    #[test]
    fn failed_open_waits_for_the_delay() {
        let (live, connector, scheduler, _) = feed();
        connector.fail.set(true);
        live.start();
        assert_eq!(connector.connects(), 0);
        assert_eq!(*scheduler.delays.borrow(), vec![5000]);

        connector.fail.set(false);
        scheduler.elapse();
        assert_eq!(connector.connects(), 1);
    }

    #[test]
    fn location_frames_move_markers_and_bad_frames_do_not_disconnect() {
        let (live, connector, _, markers) = feed();
        live.start();
        let sink = connector.latest();
        sink(FeedEvent::Opened);

        sink(FeedEvent::Message(frame("t-1", 51.5, -0.1, 30.0)));
        sink(FeedEvent::Message("{garbage".to_string()));
        sink(FeedEvent::Message(r#"{"message_type":"heartbeat","data":null}"#.to_string()));
        sink(FeedEvent::Message(frame("t-1", 51.6, -0.2, 45.5)));

        assert_eq!(live.state(), FeedState::Connected);
        let markers = markers.borrow();
        let marker = markers.get("t-1").unwrap();
        assert_eq!((marker.latitude, marker.longitude, marker.speed), (51.6, -0.2, Some(45.5)));
        assert_eq!(markers.len(), 1);
    }
}
