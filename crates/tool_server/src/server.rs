use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
};
use serde_json::Value;

use std::sync::Arc;

use crate::{
    ServerError, tools,
    types::{ToolList, ToolResponse},
};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

async fn list_tools() -> Json<ToolList> {
    Json(ToolList {
        tools: tools::definitions(),
    })
}

async fn call_tool(
    State(state): State<ServerState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<ToolResponse>, ServerError> {
    // An empty body calls the tool without arguments.
    let arguments = if body.is_empty() {
        Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_slice(&body)
            .map_err(|err| ServerError::InvalidArguments(format!("invalid JSON body: {err}")))?
    };
    tracing::debug!("calling tool {name}");
    let response = tools::call(&state.engine, &name, arguments).await?;
    Ok(Json(response))
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/tools", get(list_tools))
        .route("/tools/{name}", post(call_tool))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Tool server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}
