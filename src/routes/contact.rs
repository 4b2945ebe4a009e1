use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::Json;
use tracing::Instrument;
use uuid::Uuid;

use crate::contact::{parser, ContactResponse};
use crate::error::ContactError;
use crate::state::SharedState;

pub async fn submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ContactResponse>, ContactError> {
    let request_id = Uuid::now_v7();

    async move {
        let body = body.map_err(ContactError::from)?;

        let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
        let request = parser::parse_body(content_type, &body).map_err(|reason| {
            tracing::info!("Rejected unreadable body: {reason}");
            ContactError::Malformed(reason)
        })?;

        state.pipeline.run(request).await?;

        Ok(Json(ContactResponse::accepted(
            state.pipeline.config().confirmation_message.clone(),
        )))
    }
    .instrument(tracing::info_span!("contact", %request_id))
    .await
}
