use axum::{Router, routing};
use bithook::hook::HookRegistry;
use bithook::{AppState, SharedState, handlers};
use std::sync::Arc;
use tracing::{info, warn};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:9000";
const DEFAULT_HOOKS_FILE: &str = "hooks.json";
const DEFAULT_URL_PREFIX: &str = "hooks";

/// Load the hook registry, honoring the NO_PANIC knob: by default a bad
/// hooks file aborts startup, with NO_PANIC=true the daemon starts with
/// an empty registry instead.
fn load_hooks(path: &str, no_panic: bool) -> HookRegistry {
    match HookRegistry::load_from_file(path) {
        Ok(hooks) => {
            info!("found {} hook(s) in file", hooks.len());
            for hook in hooks.iter() {
                info!("\tloaded: {}", hook.id);
            }
            hooks
        }
        Err(e) => {
            if !no_panic {
                eprintln!(
                    "couldn't load any hooks from file! {}\n\
                     aborting webhook execution. If, for some reason, you want \
                     bithook to start without the hooks, set NO_PANIC=true",
                    e
                );
                std::process::exit(1);
            }
            warn!("couldn't load hooks from file! {}", e);
            HookRegistry::default()
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let bind_address =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    let hooks_file = std::env::var("HOOKS_FILE").unwrap_or_else(|_| DEFAULT_HOOKS_FILE.to_string());
    let url_prefix =
        std::env::var("HOOKS_URL_PREFIX").unwrap_or_else(|_| DEFAULT_URL_PREFIX.to_string());
    let no_panic = std::env::var("NO_PANIC").map(|v| v == "true").unwrap_or(false);

    info!("attempting to load hooks from {}", hooks_file);
    let hooks = load_hooks(&hooks_file, no_panic);

    let state: SharedState = Arc::new(AppState { hooks });

    let hooks_url = if url_prefix.is_empty() {
        "/{id}".to_string()
    } else {
        format!("/{}/{{id}}", url_prefix)
    };

    let app = Router::new()
        .route("/", routing::get(handlers::root))
        .route(&hooks_url, routing::post(handlers::handle_hook))
        .with_state(state);

    info!("serving hooks on http://{}{}", bind_address, hooks_url);
    let listener = tokio::net::TcpListener::bind(bind_address).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
