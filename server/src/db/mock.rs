use std::collections::HashMap;
use std::sync::RwLock;

use futures::future::BoxFuture;
use futures::FutureExt;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::admission::{AdmissionFilter, ArmyAdmission, ListType};
use crate::application::{Application, ApplicationKey, NewApplication, Status};
use crate::contact::{ContactMessage, ContactSubmission};
use crate::errors::PortalError;
use crate::settings::SiteSetting;

use super::Db;

/// An in-memory stand-in for the relational store, mirroring its
/// constraint behavior (unique phone and reference columns, newest-first
/// ordering) closely enough for handler tests.
#[derive(Default)]
pub(crate) struct MockDb {
    pub(crate) applications: RwLock<Vec<Application>>,
    pub(crate) messages: RwLock<Vec<ContactMessage>>,
    pub(crate) settings: RwLock<HashMap<String, String>>,
    pub(crate) admissions: RwLock<Vec<ArmyAdmission>>,
}

impl Db for MockDb {
    fn create_application(
        &self,
        reference_id: &str,
        application: NewApplication,
    ) -> BoxFuture<Result<Application, PortalError>> {
        let reference_id = reference_id.to_owned();

        async move {
            let mut applications = self.applications.write().unwrap();

            if applications
                .iter()
                .any(|stored| stored.reference_id == reference_id)
            {
                return Err(PortalError::ReferenceIdAlreadyExists);
            }

            if applications.iter().any(|stored| stored.phone == application.phone) {
                return Err(PortalError::PhoneAlreadyExists);
            }

            let stored = Application {
                id: Uuid::new_v4(),
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
                created_at: OffsetDateTime::now_utc(),
            };

            applications.push(stored.clone());

            Ok(stored)
        }
        .boxed()
    }

    fn find_application_by_phone(
        &self,
        phone: &str,
    ) -> BoxFuture<Result<Option<ApplicationKey>, PortalError>> {
        let phone = phone.to_owned();

        async move {
            let applications = self.applications.read().unwrap();

            Ok(applications
                .iter()
                .find(|stored| stored.phone == phone)
                .map(|stored| ApplicationKey {
                    id: stored.id,
                    reference_id: stored.reference_id.clone(),
                }))
        }
        .boxed()
    }

    fn list_applications(&self) -> BoxFuture<Result<Vec<Application>, PortalError>> {
        async move {
            let mut applications = self.applications.read().unwrap().clone();
            applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));

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
            let applications = self.applications.read().unwrap();

            Ok(applications.iter().find(|stored| stored.id == id).cloned())
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
            let mut applications = self.applications.write().unwrap();

            match applications.iter_mut().find(|stored| stored.id == id) {
                Some(stored) => {
                    stored.status = status;
                    Ok(stored.clone())
                }
                None => Err(PortalError::NonExistentId(id)),
            }
        }
        .boxed()
    }

    fn create_message(
        &self,
        submission: ContactSubmission,
    ) -> BoxFuture<Result<ContactMessage, PortalError>> {
        async move {
            let message = ContactMessage {
                id: Uuid::new_v4(),
                name: submission.name,
                contact: submission.contact,
                message: submission.message,
                is_resolved: false,
                created_at: OffsetDateTime::now_utc(),
            };

            self.messages.write().unwrap().push(message.clone());

            Ok(message)
        }
        .boxed()
    }

    fn list_messages(&self) -> BoxFuture<Result<Vec<ContactMessage>, PortalError>> {
        async move {
            let mut messages = self.messages.read().unwrap().clone();
            messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));

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
            let mut messages = self.messages.write().unwrap();

            match messages.iter_mut().find(|message| message.id == id) {
                Some(message) => {
                    message.is_resolved = is_resolved;
                    Ok(message.clone())
                }
                None => Err(PortalError::NonExistentId(id)),
            }
        }
        .boxed()
    }

    fn delete_message(&self, id: &Uuid) -> BoxFuture<Result<(), PortalError>> {
        let id = *id;

        async move {
            let mut messages = self.messages.write().unwrap();
            let before = messages.len();

            messages.retain(|message| message.id != id);

            if messages.len() == before {
                Err(PortalError::NonExistentId(id))
            } else {
                Ok(())
            }
        }
        .boxed()
    }

    fn retrieve_settings(&self) -> BoxFuture<Result<Vec<SiteSetting>, PortalError>> {
        async move {
            let settings = self.settings.read().unwrap();

            Ok(settings
                .iter()
                .map(|(key, value)| SiteSetting {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect())
        }
        .boxed()
    }

    fn upsert_setting(&self, key: &str, value: &str) -> BoxFuture<Result<(), PortalError>> {
        let key = key.to_owned();
        let value = value.to_owned();

        async move {
            self.settings.write().unwrap().insert(key, value);

            Ok(())
        }
        .boxed()
    }

    fn search_admissions(
        &self,
        filter: AdmissionFilter,
    ) -> BoxFuture<Result<Vec<ArmyAdmission>, PortalError>> {
        async move {
            let admissions = self.admissions.read().unwrap();

            let mut matched: Vec<ArmyAdmission> = admissions
                .iter()
                .filter(|admission| {
                    filter
                        .list_type
                        .map(|list_type| admission.list_type == list_type)
                        .unwrap_or(true)
                })
                .filter(|admission| match &filter.search {
                    Some(term) => {
                        admission.application_no.contains(term.as_str())
                            || admission.surname.contains(term.as_str())
                            || admission.first_name.contains(term.as_str())
                            || admission
                                .other_name
                                .as_ref()
                                .map(|name| name.contains(term.as_str()))
                                .unwrap_or(false)
                    }
                    None => true,
                })
                .cloned()
                .collect();

            matched.sort_by(|a, b| a.application_no.cmp(&b.application_no));
            matched.truncate(filter.limit.max(0) as usize);

            Ok(matched)
        }
        .boxed()
    }

    fn count_admissions(&self) -> BoxFuture<Result<Vec<(ListType, i64)>, PortalError>> {
        async move {
            let admissions = self.admissions.read().unwrap();
            let mut counts: HashMap<ListType, i64> = HashMap::new();

            for admission in admissions.iter() {
                *counts.entry(admission.list_type).or_insert(0) += 1;
            }

            Ok(counts.into_iter().collect())
        }
        .boxed()
    }
}
