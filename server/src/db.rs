use futures::future::BoxFuture;
use uuid::Uuid;

use crate::admission::{AdmissionFilter, ArmyAdmission, ListType};
use crate::application::{Application, ApplicationKey, NewApplication, Status};
use crate::contact::{ContactMessage, ContactSubmission};
use crate::errors::PortalError;
use crate::settings::SiteSetting;

pub trait Db {
    fn create_application(
        &self,
        reference_id: &str,
        application: NewApplication,
    ) -> BoxFuture<Result<Application, PortalError>>;

    fn find_application_by_phone(
        &self,
        phone: &str,
    ) -> BoxFuture<Result<Option<ApplicationKey>, PortalError>>;

    fn list_applications(&self) -> BoxFuture<Result<Vec<Application>, PortalError>>;

    fn retrieve_application(
        &self,
        id: &Uuid,
    ) -> BoxFuture<Result<Option<Application>, PortalError>>;

    fn update_application_status(
        &self,
        id: &Uuid,
        status: Status,
    ) -> BoxFuture<Result<Application, PortalError>>;

    fn create_message(
        &self,
        submission: ContactSubmission,
    ) -> BoxFuture<Result<ContactMessage, PortalError>>;

    fn list_messages(&self) -> BoxFuture<Result<Vec<ContactMessage>, PortalError>>;

    fn set_message_resolved(
        &self,
        id: &Uuid,
        is_resolved: bool,
    ) -> BoxFuture<Result<ContactMessage, PortalError>>;

    fn delete_message(&self, id: &Uuid) -> BoxFuture<Result<(), PortalError>>;

    fn retrieve_settings(&self) -> BoxFuture<Result<Vec<SiteSetting>, PortalError>>;

    fn upsert_setting(&self, key: &str, value: &str) -> BoxFuture<Result<(), PortalError>>;

    fn search_admissions(
        &self,
        filter: AdmissionFilter,
    ) -> BoxFuture<Result<Vec<ArmyAdmission>, PortalError>>;

    fn count_admissions(&self) -> BoxFuture<Result<Vec<(ListType, i64)>, PortalError>>;
}

#[cfg(test)]
pub(crate) mod mock;

pub use self::postgres::*;

mod postgres {
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use sqlx::{
        self,
        postgres::{PgPool, PgRow},
    };
    use time::OffsetDateTime;
    use uuid::Uuid;

    use crate::admission::{AdmissionFilter, ArmyAdmission, ListType};
    use crate::application::{Application, ApplicationKey, Gender, NewApplication, Status};
    use crate::contact::{ContactMessage, ContactSubmission};
    use crate::errors::PortalError;
    use crate::settings::SiteSetting;

    const APPLICATIONS_PHONE_CONSTRAINT: &str = "applications_phone";
    const APPLICATIONS_REFERENCE_CONSTRAINT: &str = "applications_reference_id";

    pub struct PgDb {
        pool: PgPool,
    }

    impl PgDb {
        pub fn new(pool: PgPool) -> Self {
            PgDb { pool }
        }
    }

    // these can be simplified once async functions in traits are stabilized
    impl super::Db for PgDb {
        fn create_application(
            &self,
            reference_id: &str,
            application: NewApplication,
        ) -> BoxFuture<Result<Application, PortalError>> {
            let reference_id = reference_id.to_owned();

            async move {
                let id = Uuid::new_v4();
                let branches = serialize_list(&application.branches);
                let skills = serialize_list(&application.skills);

                let query = sqlx::query_as(include_str!("queries/create_application.sql"));

                let (created_at,): (OffsetDateTime,) = query
                    .bind(id)
                    .bind(&reference_id)
                    .bind(&application.first_name)
                    .bind(&application.last_name)
                    .bind(&application.middle_name)
                    .bind(&application.phone)
                    .bind(&application.email)
                    .bind(application.gender.as_str())
                    .bind(application.date_of_birth)
                    .bind(&application.lga)
                    .bind(&application.place_of_origin)
                    .bind(&application.home_address)
                    .bind(&application.current_address)
                    .bind(&application.qualification)
                    .bind(application.number_of_passes)
                    .bind(application.number_of_sittings)
                    .bind(&application.year_of_exam)
                    .bind(&branches)
                    .bind(&skills)
                    .bind(Status::New.as_str())
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(Application {
                    id,
                    reference_id,
                    first_name: application.first_name,
                    last_name: application.last_name,
                    middle_name: application.middle_name,
                    phone: application.phone,
                    email: application.email,
                    gender: application.gender,
                    date_of_birth: application.date_of_birth,
                    lga: application.lga,
                    place_of_origin: application.place_of_origin,
                    home_address: application.home_address,
                    current_address: application.current_address,
                    qualification: application.qualification,
                    number_of_passes: application.number_of_passes,
                    number_of_sittings: application.number_of_sittings,
                    year_of_exam: application.year_of_exam,
                    branches: application.branches,
                    skills: application.skills,
                    status: Status::New,
                    created_at,
                })
            }
            .boxed()
        }

        fn find_application_by_phone(
            &self,
            phone: &str,
        ) -> BoxFuture<Result<Option<ApplicationKey>, PortalError>> {
            let phone = phone.to_owned();

            async move {
                let query = sqlx::query_as(include_str!("queries/find_application_by_phone.sql"));

                let result: Option<(Uuid, String)> = query
                    .bind(phone)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(result.map(|(id, reference_id)| ApplicationKey { id, reference_id }))
            }
            .boxed()
        }

        fn list_applications(&self) -> BoxFuture<Result<Vec<Application>, PortalError>> {
            async move {
                let query = sqlx::query(include_str!("queries/list_applications.sql"));

                let applications = query
                    .try_map(|row: PgRow| application_from_row(&row))
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(applications)
            }
            .boxed()
        }

        fn retrieve_application(
            &self,
            id: &Uuid,
        ) -> BoxFuture<Result<Option<Application>, PortalError>> {
            let id = *id;

            async move {
                let query = sqlx::query(include_str!("queries/retrieve_application.sql"));

                let application = query
                    .bind(id)
                    .try_map(|row: PgRow| application_from_row(&row))
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(application)
            }
            .boxed()
        }

        fn update_application_status(
            &self,
            id: &Uuid,
            status: Status,
        ) -> BoxFuture<Result<Application, PortalError>> {
            let id = *id;

            async move {
                let query = sqlx::query(include_str!("queries/update_application_status.sql"));

                let application = query
                    .bind(id)
                    .bind(status.as_str())
                    .try_map(|row: PgRow| application_from_row(&row))
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                application.ok_or(PortalError::NonExistentId(id))
            }
            .boxed()
        }

        fn create_message(
            &self,
            submission: ContactSubmission,
        ) -> BoxFuture<Result<ContactMessage, PortalError>> {
            async move {
                let query = sqlx::query_as::<_, ContactMessage>(include_str!(
                    "queries/create_message.sql"
                ));

                let message = query
                    .bind(Uuid::new_v4())
                    .bind(&submission.name)
                    .bind(&submission.contact)
                    .bind(&submission.message)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(message)
            }
            .boxed()
        }

        fn list_messages(&self) -> BoxFuture<Result<Vec<ContactMessage>, PortalError>> {
            async move {
                let query =
                    sqlx::query_as::<_, ContactMessage>(include_str!("queries/list_messages.sql"));

                let messages = query
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(messages)
            }
            .boxed()
        }

        fn set_message_resolved(
            &self,
            id: &Uuid,
            is_resolved: bool,
        ) -> BoxFuture<Result<ContactMessage, PortalError>> {
            let id = *id;

            async move {
                let query = sqlx::query_as::<_, ContactMessage>(include_str!(
                    "queries/set_message_resolved.sql"
                ));

                let message = query
                    .bind(id)
                    .bind(is_resolved)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                message.ok_or(PortalError::NonExistentId(id))
            }
            .boxed()
        }

        fn delete_message(&self, id: &Uuid) -> BoxFuture<Result<(), PortalError>> {
            let id = *id;

            async move {
                let query = sqlx::query(include_str!("queries/delete_message.sql"));

                let count = query
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?
                    .rows_affected();

                if count == 0 {
                    Err(PortalError::NonExistentId(id))
                } else {
                    Ok(())
                }
            }
            .boxed()
        }

        fn retrieve_settings(&self) -> BoxFuture<Result<Vec<SiteSetting>, PortalError>> {
            async move {
                let query =
                    sqlx::query_as::<_, SiteSetting>(include_str!("queries/retrieve_settings.sql"));

                let settings = query
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(settings)
            }
            .boxed()
        }

        fn upsert_setting(&self, key: &str, value: &str) -> BoxFuture<Result<(), PortalError>> {
            let key = key.to_owned();
            let value = value.to_owned();

            async move {
                let query = sqlx::query(include_str!("queries/upsert_setting.sql"));

                query
                    .bind(key)
                    .bind(value)
                    .execute(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(())
            }
            .boxed()
        }

        fn search_admissions(
            &self,
            filter: AdmissionFilter,
        ) -> BoxFuture<Result<Vec<ArmyAdmission>, PortalError>> {
            async move {
                let query = sqlx::query(include_str!("queries/search_admissions.sql"));

                let admissions = query
                    .bind(filter.list_type.map(|list_type| list_type.as_str()))
                    .bind(filter.search)
                    .bind(filter.limit)
                    .try_map(|row: PgRow| admission_from_row(&row))
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(admissions)
            }
            .boxed()
        }

        fn count_admissions(&self) -> BoxFuture<Result<Vec<(ListType, i64)>, PortalError>> {
            async move {
                let query = sqlx::query(include_str!("queries/count_admissions.sql"));

                let counts = query
                    .try_map(|row: PgRow| {
                        let raw: String = try_get(&row, "list_type")?;
                        let list_type = parse_list_type(&raw)?;
                        let count: i64 = try_get(&row, "count")?;

                        Ok((list_type, count))
                    })
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(counts)
            }
            .boxed()
        }
    }

    fn application_from_row(row: &PgRow) -> Result<Application, sqlx::Error> {
        let gender_raw: String = try_get(row, "gender")?;
        let gender = Gender::parse(&gender_raw).ok_or_else(|| {
            decode_error(PortalError::InvalidField {
                field: "gender",
                message: format!("unrecognized stored gender: {}", gender_raw),
            })
        })?;

        let status_raw: String = try_get(row, "status")?;
        let status = Status::parse(&status_raw)
            .ok_or_else(|| decode_error(PortalError::InvalidStatus(status_raw.clone())))?;

        let branches_raw: String = try_get(row, "branches")?;
        let skills_raw: String = try_get(row, "skills")?;

        Ok(Application {
            id: try_get(row, "id")?,
            reference_id: try_get(row, "reference_id")?,
            first_name: try_get(row, "first_name")?,
            last_name: try_get(row, "last_name")?,
            middle_name: try_get(row, "middle_name")?,
            phone: try_get(row, "phone")?,
            email: try_get(row, "email")?,
            gender,
            date_of_birth: try_get(row, "date_of_birth")?,
            lga: try_get(row, "lga")?,
            place_of_origin: try_get(row, "place_of_origin")?,
            home_address: try_get(row, "home_address")?,
            current_address: try_get(row, "current_address")?,
            qualification: try_get(row, "qualification")?,
            number_of_passes: try_get(row, "number_of_passes")?,
            number_of_sittings: try_get(row, "number_of_sittings")?,
            year_of_exam: try_get(row, "year_of_exam")?,
            branches: parse_list(&branches_raw)?,
            skills: parse_list(&skills_raw)?,
            status,
            created_at: try_get(row, "created_at")?,
        })
    }

    fn admission_from_row(row: &PgRow) -> Result<ArmyAdmission, sqlx::Error> {
        let raw: String = try_get(row, "list_type")?;

        Ok(ArmyAdmission {
            application_no: try_get(row, "application_no")?,
            surname: try_get(row, "surname")?,
            first_name: try_get(row, "first_name")?,
            other_name: try_get(row, "other_name")?,
            list_type: parse_list_type(&raw)?,
        })
    }

    fn parse_list_type(raw: &str) -> Result<ListType, sqlx::Error> {
        ListType::parse(raw).ok_or_else(|| {
            decode_error(PortalError::InvalidField {
                field: "listType",
                message: format!("unrecognized stored list type: {}", raw),
            })
        })
    }

    fn serialize_list(values: &[String]) -> String {
        serde_json::to_string(values).expect("serialize list as JSON")
    }

    fn parse_list(raw: &str) -> Result<Vec<String>, sqlx::Error> {
        serde_json::from_str(raw).map_err(|e| sqlx::Error::Decode(Box::new(e)))
    }

    fn decode_error(error: PortalError) -> sqlx::Error {
        sqlx::Error::Decode(Box::new(error))
    }

    fn try_get<'a, T: sqlx::Type<sqlx::Postgres> + sqlx::decode::Decode<'a, sqlx::Postgres>>(
        row: &'a PgRow,
        column: &str,
    ) -> Result<T, sqlx::Error> {
        use sqlx::prelude::*;

        row.try_get(column)
    }

    fn map_sqlx_error(error: sqlx::Error) -> PortalError {
        use sqlx::Error;

        match error {
            Error::Database(ref e) if e.constraint() == Some(APPLICATIONS_PHONE_CONSTRAINT) => {
                PortalError::PhoneAlreadyExists
            }
            Error::Database(ref e)
                if e.constraint() == Some(APPLICATIONS_REFERENCE_CONSTRAINT) =>
            {
                PortalError::ReferenceIdAlreadyExists
            }
            _ => PortalError::Sqlx { source: error },
        }
    }
}
