//! Host integration surface.
//!
//! Wraps a [`DataModel`] as host-subscribable state and packages a
//! transport-connected surface as a single embeddable entry point, so
//! application code can read/write the protocol's data model as if it were
//! native state.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::mpsc;

use crate::a2ui::{DataModel, Disposer, Renderer, RenderedNode, ResolvedAction, Transport, TransportObserver};
use crate::config::A2uiConfig;
use crate::error::A2uiError;

struct LastErrorObserver {
    last_error: Arc<Mutex<Option<String>>>,
}

impl TransportObserver for LastErrorObserver {
    fn error(&self, _surface_id: &str, error: &A2uiError) {
        *self.last_error.lock().unwrap() = Some(error.to_string());
    }
}

type ActionHandler = Box<dyn Fn(&ResolvedAction) + Send + Sync>;

struct Handlers {
    next_id: u64,
    handlers: Vec<(u64, ActionHandler)>,
}

/// Owns one `DataModel` and an action-handler registry; cheaply cloneable —
/// every clone shares the same underlying state.
#[derive(Clone)]
pub struct A2uiBridge {
    data_model: DataModel,
    renderer: Renderer,
    handlers: Arc<Mutex<Handlers>>,
}

/// Disposes an `on_action` subscription; idempotent.
pub struct ActionDisposer {
    handlers: Arc<Mutex<Handlers>>,
    id: u64,
}

impl ActionDisposer {
    pub fn dispose(&self) {
        self.handlers.lock().unwrap().handlers.retain(|(id, _)| *id != self.id);
    }
}

impl Default for A2uiBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl A2uiBridge {
    /// Creates the data model synchronously so embedding code can read/write
    /// during the same setup pass without ordering hazards.
    pub fn new() -> Self {
        let data_model = DataModel::new();
        let renderer = Renderer::new();
        let bridge = A2uiBridge {
            data_model,
            renderer,
            handlers: Arc::new(Mutex::new(Handlers { next_id: 0, handlers: Vec::new() })),
        };
        let dispatch_bridge = bridge.clone();
        bridge.renderer.set_action_handler(move |action| dispatch_bridge.dispatch_action(action));
        bridge
    }

    /// A cloneable handle into this bridge, usable from any thread the
    /// embedding app schedules work on.
    pub fn handle(&self) -> A2uiBridge {
        self.clone()
    }

    pub fn data_model(&self) -> &DataModel {
        &self.data_model
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn get_value(&self, path: &str) -> Option<Value> {
        self.data_model.get(path)
    }

    pub fn set_value(&self, path: &str, value: Value) {
        self.data_model.set(path, value, true);
    }

    /// Reads the current value at `path`, subscribing to any change under
    /// it (exact path or descendant). Returns a disposer.
    pub fn watch<F>(&self, path: &str, listener: F) -> Disposer
    where
        F: Fn(&str, Option<&Value>) + Send + Sync + 'static,
    {
        let prefix = format!("{}/", path.trim_end_matches('/'));
        let target = path.to_string();
        self.data_model.subscribe(move |changed, value| {
            if changed == target || changed.starts_with(&prefix) {
                listener(changed, value);
            }
        })
    }

    /// If `initial` is provided and `path` currently resolves to `None`,
    /// writes it (not marking dirty) before returning the current value.
    pub fn state(&self, path: &str, initial: Option<Value>) -> Option<Value> {
        if self.data_model.get(path).is_none() {
            if let Some(value) = initial {
                self.data_model.set(path, value, false);
            }
        }
        self.data_model.get(path)
    }

    /// A full flat snapshot of the data model, for debugging/DevTools.
    pub fn snapshot(&self) -> std::collections::BTreeMap<String, Value> {
        self.data_model.snapshot()
    }

    /// Registers an action subscriber for the bridge's lifetime, or until disposed.
    pub fn on_action<F>(&self, handler: F) -> ActionDisposer
    where
        F: Fn(&ResolvedAction) + Send + Sync + 'static,
    {
        let mut guard = self.handlers.lock().unwrap();
        let id = guard.next_id;
        guard.next_id += 1;
        guard.handlers.push((id, Box::new(handler)));
        ActionDisposer { handlers: self.handlers.clone(), id }
    }

    /// Invokes every registered handler; a handler panic is caught and
    /// logged, and does not stop delivery to the others.
    pub fn dispatch_action(&self, action: ResolvedAction) {
        let guard = self.handlers.lock().unwrap();
        for (_, handler) in &guard.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| handler(&action)));
            if result.is_err() {
                log::warn!("a2ui bridge action handler panicked for action '{}'", action.name);
            }
        }
    }
}

/// A transport-connected surface: wires a bridge's `DataModel`/`Renderer`
/// into a running `Transport` task and exposes connection-lifecycle state.
pub struct SurfaceHandle {
    surface_id: String,
    bridge: A2uiBridge,
    transport: Arc<Transport>,
    stop: Mutex<Option<mpsc::Sender<()>>>,
    connected: Arc<Mutex<bool>>,
    last_error: Arc<Mutex<Option<String>>>,
}

impl SurfaceHandle {
    /// Connects a new surface: spawns the transport's stream-reader task and
    /// returns a handle exposing connection state and action dispatch.
    ///
    /// Bypassing the network (e.g. for tests or a fully static surface) is
    /// done by constructing a bridge directly and calling
    /// [`Renderer::set_components`]/[`Renderer::set_root`] without ever
    /// calling `connect`.
    pub fn connect(surface_id: impl Into<String>, config: A2uiConfig, bridge: A2uiBridge) -> Self {
        let surface_id = surface_id.into();
        let last_error = Arc::new(Mutex::new(None));
        let transport = Arc::new(
            Transport::new(
                surface_id.clone(),
                config,
                bridge.data_model().clone(),
                bridge.renderer().clone(),
            )
            .with_observer(Arc::new(LastErrorObserver { last_error: last_error.clone() })),
        );
        let connected = Arc::new(Mutex::new(false));

        let handle = SurfaceHandle {
            surface_id,
            bridge,
            transport,
            stop: Mutex::new(None),
            connected,
            last_error,
        };
        handle.spawn_run_task();
        handle
    }

    fn spawn_run_task(&self) {
        let (tx, rx) = mpsc::channel(1);
        *self.stop.lock().unwrap() = Some(tx);
        let task_transport = self.transport.clone();
        let task_connected = self.connected.clone();
        tokio::spawn(async move {
            *task_connected.lock().unwrap() = true;
            task_transport.run(rx).await;
            *task_connected.lock().unwrap() = false;
        });
    }

    /// The most recent transport error observed, if any.
    pub fn error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }

    /// Disconnects any running task and starts a fresh connection, reusing
    /// this handle's surface id, config, and bridge.
    pub fn reconnect(&self) {
        self.disconnect();
        *self.last_error.lock().unwrap() = None;
        self.spawn_run_task();
    }

    pub fn surface_id(&self) -> &str {
        &self.surface_id
    }

    pub fn is_connected(&self) -> bool {
        *self.connected.lock().unwrap()
    }

    pub fn is_loading(&self) -> bool {
        self.is_connected() && self.root_id().is_none()
    }

    /// Resolves the current component tree against the bridge's data model.
    /// `None` until a root id and its component have both arrived.
    pub fn components(&self) -> Option<RenderedNode> {
        self.bridge.renderer().render(self.bridge.data_model())
    }

    pub fn root_id(&self) -> Option<String> {
        self.bridge.renderer().root_id()
    }

    pub async fn send_action(&self, action: ResolvedAction) -> Result<(), crate::error::A2uiError> {
        self.transport.send_action(action).await
    }

    /// Stops the current connection task; a fresh `connect` call is needed
    /// to resume (this does not itself reopen the stream).
    pub fn disconnect(&self) {
        if let Some(tx) = self.stop.lock().unwrap().take() {
            drop(tx);
        }
    }
}
