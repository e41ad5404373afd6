use std::sync::Arc;

use log::Logger;

use crate::auth::Authenticator;
use crate::db::Db;

/// Everything a request handler needs: the logger, the injected
/// collaborators and the runtime configuration.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub db: Arc<dyn Db + Send + Sync>,
    pub auth: Arc<dyn Authenticator + Send + Sync>,
    pub config: Config,
}

impl Environment {
    pub fn new(
        logger: Arc<Logger>,
        db: Arc<dyn Db + Send + Sync>,
        auth: Arc<dyn Authenticator + Send + Sync>,
        config: Config,
    ) -> Self {
        Self {
            logger,
            db,
            auth,
            config,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub(crate) reference_prefix: String,
    pub(crate) admissions_limit: i64,
}

impl Config {
    pub fn new(reference_prefix: String, admissions_limit: i64) -> Self {
        Self {
            reference_prefix,
            admissions_limit,
        }
    }
}
