//! Mock JSON-RPC node which verifies that exactly the expected calls arrive,
//! in order.

use {
    crate::domain::eth,
    std::{
        net::SocketAddr,
        sync::{
            Arc,
            Mutex,
            atomic::{AtomicBool, Ordering},
        },
    },
    tokio::task::JoinHandle,
};

#[derive(Clone, Debug)]
pub enum Params {
    /// Any parameters are accepted.
    Any,
    /// The received parameters have to match the provided value exactly.
    Exact(serde_json::Value),
}

#[derive(Clone, Debug)]
pub enum Outcome {
    /// Respond with a successful result.
    Result(serde_json::Value),
    /// Respond with a JSON-RPC error object.
    Error { code: i64, message: &'static str },
}

#[derive(Clone, Debug)]
pub struct Expectation {
    pub method: &'static str,
    pub params: Params,
    pub outcome: Outcome,
}

impl Expectation {
    pub fn call(method: &'static str, params: Params, result: serde_json::Value) -> Self {
        Self {
            method,
            params,
            outcome: Outcome::Result(result),
        }
    }

    pub fn failing(method: &'static str) -> Self {
        Self {
            method,
            params: Params::Any,
            outcome: Outcome::Error {
                code: -32000,
                message: "header not found",
            },
        }
    }
}

/// ABI-encodes an unsigned integer the way the node returns it from
/// `eth_call`.
pub fn encode_uint(value: u64) -> serde_json::Value {
    serde_json::json!(format!("{:#066x}", eth::U256::from(value)))
}

/// Hex-encodes a block height the way the node returns it from
/// `eth_blockNumber`.
pub fn encode_block_number(value: u64) -> serde_json::Value {
    serde_json::json!(format!("0x{value:x}"))
}

/// Drop handle that will verify that the server task didn't panic throughout
/// the test and that all the expectations have been met.
pub struct ServerHandle {
    /// The address that handles requests to this server.
    pub address: SocketAddr,
    /// Handle to shut down the server task on drop.
    handle: JoinHandle<()>,
    /// Expectations that are left over after the test.
    expectations: Arc<Mutex<Vec<Expectation>>>,
    /// Indicates if some assertion failed.
    assert_failed: Arc<AtomicBool>,
}

impl ServerHandle {
    pub fn url(&self) -> String {
        format!("http://{}", self.address)
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        // Don't cause mass hysteria!
        if std::thread::panicking() {
            return;
        }

        let server_panicked = self.assert_failed.load(Ordering::SeqCst);
        // Panics happening in the server task might not cause the test to
        // fail and only show up if some assertion fails in the main task.
        // This accomplishes that.
        assert!(!server_panicked);

        assert!(
            !self.handle.is_finished(),
            "mock node terminated before test ended"
        );
        assert_eq!(
            self.expectations.lock().unwrap().len(),
            0,
            "mock node did not receive enough requests"
        );
        self.handle.abort();
    }
}

/// Sets up a mock JSON-RPC node.
pub async fn setup(mut expectations: Vec<Expectation>) -> ServerHandle {
    // Reverse expectations so tests can specify them in natural order while
    // allowing us to simply `.pop()` the last element.
    expectations.reverse();

    let expectations = Arc::new(Mutex::new(expectations));
    let failed_assert = Arc::new(AtomicBool::new(false));

    let app = axum::Router::new()
        .route(
            "/",
            axum::routing::post(
                |axum::extract::State(state): axum::extract::State<State>,
                 axum::extract::Json(req): axum::extract::Json<serde_json::Value>| async move {
                    axum::response::Json(handle_rpc(state, req))
                },
            ),
        )
        .with_state(State {
            expectations: expectations.clone(),
            failed_assert: failed_assert.clone(),
        });

    let server = axum::Server::bind(&"0.0.0.0:0".parse().unwrap()).serve(app.into_make_service());
    let address = server.local_addr();
    let handle = tokio::spawn(async move { server.await.unwrap() });

    ServerHandle {
        handle,
        expectations,
        address,
        assert_failed: failed_assert,
    }
}

#[derive(Clone)]
struct State {
    /// The request handler reads from here which call to expect and what to
    /// respond.
    expectations: Arc<Mutex<Vec<Expectation>>>,
    /// The request handler notifies the test about failed asserts via this
    /// flag.
    failed_assert: Arc<AtomicBool>,
}

/// Runs the given closure and updates a flag if it panics.
fn assert_and_propagate_panics<F, R>(assertions: F, flag: &AtomicBool) -> R
where
    F: FnOnce() -> R + std::panic::UnwindSafe + 'static,
{
    std::panic::catch_unwind(assertions)
        .map_err(|_| {
            flag.store(true, Ordering::SeqCst);
        })
        .expect("ignore this panic; it was caused by the previous panic")
}

fn handle_rpc(state: State, req: serde_json::Value) -> serde_json::Value {
    let expectation = state.expectations.lock().unwrap().pop();

    let assertions = move || {
        // Clients pick their own request ids, so echo whatever arrived.
        let id = req["id"].clone();

        let Some(expectation) = expectation else {
            panic!("got another request, but didn't expect any more: {req}");
        };
        assert_eq!(
            req["method"], expectation.method,
            "request has unexpected method",
        );
        if let Params::Exact(params) = &expectation.params {
            assert_eq!(
                &req["params"], params,
                "{} call has unexpected params",
                expectation.method,
            );
        }

        match &expectation.outcome {
            Outcome::Result(result) => serde_json::json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": result,
            }),
            Outcome::Error { code, message } => serde_json::json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {
                    "code": code,
                    "message": message,
                },
            }),
        }
    };

    assert_and_propagate_panics(assertions, &state.failed_assert)
}
