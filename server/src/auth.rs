use futures::future::BoxFuture;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::PortalError;

/// A back-office credential holder. There is a single `admin` role.
#[derive(Clone, Debug)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

/// The POST body of the sign-in endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginSubmission {
    pub email: String,
    pub password: String,
}

/// The credential-checking surface of the session subsystem. Session
/// issuance and expiry live with the caller; this trait only answers
/// whether the credentials identify an admin.
pub trait Authenticator {
    fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> BoxFuture<Result<Option<AdminUser>, PortalError>>;
}

pub use self::postgres::*;

mod postgres {
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use sqlx::postgres::PgPool;
    use sqlx::Row;

    use super::{AdminUser, Authenticator};
    use crate::errors::PortalError;

    pub struct PgAuthenticator {
        pool: PgPool,
    }

    impl PgAuthenticator {
        pub fn new(pool: PgPool) -> Self {
            PgAuthenticator { pool }
        }
    }

    impl Authenticator for PgAuthenticator {
        fn authenticate(
            &self,
            email: &str,
            password: &str,
        ) -> BoxFuture<Result<Option<AdminUser>, PortalError>> {
            let email = email.to_owned();
            let password = password.to_owned();

            async move {
                let query = sqlx::query(include_str!("queries/retrieve_admin.sql"));

                let row = query
                    .bind(&email)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|source| PortalError::Sqlx { source })?;

                let row = match row {
                    Some(row) => row,
                    None => return Ok(None),
                };

                let password_hash: String = row
                    .try_get("password_hash")
                    .map_err(|source| PortalError::Sqlx { source })?;

                let verified = bcrypt::verify(&password, &password_hash)
                    .map_err(|source| PortalError::Bcrypt { source })?;

                if !verified {
                    return Ok(None);
                }

                let admin = AdminUser {
                    id: row
                        .try_get("id")
                        .map_err(|source| PortalError::Sqlx { source })?,
                    email: row
                        .try_get("email")
                        .map_err(|source| PortalError::Sqlx { source })?,
                    name: row
                        .try_get("name")
                        .map_err(|source| PortalError::Sqlx { source })?,
                    role: row
                        .try_get("role")
                        .map_err(|source| PortalError::Sqlx { source })?,
                };

                Ok(Some(admin))
            }
            .boxed()
        }
    }
}
