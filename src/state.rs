use std::sync::Arc;

use crate::routes::todos::repository::TodoRepository;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn TodoRepository>,
}

impl AppState {
    pub fn new(db: Arc<dyn TodoRepository>) -> Self {
        Self { db }
    }
}
