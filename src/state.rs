use std::sync::Arc;

use crate::contact::pipeline::ContactPipeline;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pipeline: ContactPipeline,
}
