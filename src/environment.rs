use std::sync::Arc;

use log::Logger;

use crate::db::Db;
use crate::templates::Templates;
use crate::urls::Urls;

/// Draws a selection key, uniformly from `[0, 1)`.
pub type Draw = dyn Fn() -> f64 + Send + Sync;

/// Everything a handler needs, built once at startup.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub db: Arc<dyn Db + Send + Sync>,
    pub urls: Arc<Urls>,
    pub templates: Arc<Templates>,
    pub draw: Arc<Draw>,
}

impl Environment {
    pub fn new(
        logger: Arc<Logger>,
        db: Arc<dyn Db + Send + Sync>,
        urls: Arc<Urls>,
        templates: Arc<Templates>,
        draw: Arc<Draw>,
    ) -> Self {
        Self {
            logger,
            db,
            urls,
            templates,
            draw,
        }
    }
}

/// The production key source.
pub fn random_draw() -> Arc<Draw> {
    Arc::new(rand::random::<f64>)
}
