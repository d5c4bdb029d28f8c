//! Shared application state handed to every handler.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::service::SessionTokens;
use crate::config::Config;

pub type SharedState = Arc<State>;

pub struct State {
    pub config: Config,
    pub pool: SqlitePool,
    pub tokens: SessionTokens,
}

impl State {
    pub fn new(config: Config, pool: SqlitePool) -> SharedState {
        let tokens = SessionTokens::new(&config.jwt_secret, config.session_ttl_secs);

        Arc::new(Self {
            config,
            pool,
            tokens,
        })
    }
}
