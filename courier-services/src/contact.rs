//! Contact service for the local contact mirror.
//!
//! Contacts sync independently of conversations: a full backend listing
//! replaces the mirror wholesale, and membership rows referencing a contact
//! that has not arrived yet simply resolve to nothing in the list join.

use tracing::{info, debug};

use courier_core::error::CourierResult;
use courier_models::{Database, Contact};
use courier_models::queries;
use courier_api::ApiClient;

use crate::event_bus::{AppEvent, EventBus};
use crate::service::{Service, ServiceState};

/// Service managing the local contact mirror.
pub struct ContactService {
    state: ServiceState,
    database: Database,
    event_bus: EventBus,
}

impl ContactService {
    /// Create a new ContactService.
    pub fn new(database: Database, event_bus: EventBus) -> Self {
        Self {
            state: ServiceState::Created,
            database,
            event_bus,
        }
    }

    /// Replace the local contact mirror with the backend listing.
    ///
    /// Runs in a single transaction so readers never observe a half-synced
    /// mirror. Returns the number of contacts stored.
    pub async fn sync_contacts(&self, api: &ApiClient) -> CourierResult<usize> {
        let listing = api.contacts().await?;

        let count = self.database.transaction(|conn| {
            Contact::delete_all(conn)?;
            for response in &listing {
                Contact::new(&response.id, &response.name).save(conn)?;
            }
            Ok(listing.len())
        })?;

        info!("contact sync complete: {count} contacts");
        self.event_bus.emit(AppEvent::ContactsUpdated { count });
        Ok(count)
    }

    /// All stored contacts in name order.
    pub fn all_contacts(&self) -> CourierResult<Vec<Contact>> {
        let conn = self.database.conn()?;
        Contact::all(&conn)
    }

    /// Contacts matching the given ids; unsynced ids are absent from the
    /// result.
    pub fn contacts_by_ids(&self, ids: &[String]) -> CourierResult<Vec<Contact>> {
        let conn = self.database.conn()?;
        queries::contacts_by_ids(&conn, ids)
    }

    /// Look up a single contact.
    pub fn find_contact(&self, id: &str) -> CourierResult<Option<Contact>> {
        let conn = self.database.conn()?;
        Contact::find_by_id(&conn, id)
    }

    /// Record the local path of a downloaded profile picture.
    pub fn set_profile_picture_path(
        &self,
        id: &str,
        path: Option<&str>,
    ) -> CourierResult<bool> {
        let conn = self.database.conn()?;
        let changed = Contact::set_profile_picture_path(&conn, id, path)?;
        if changed {
            debug!("profile picture path updated for contact {id}");
        }
        Ok(changed)
    }
}

impl Service for ContactService {
    fn name(&self) -> &str { "contact" }
    fn state(&self) -> ServiceState { self.state }
    fn init(&mut self) -> CourierResult<()> {
        self.state = ServiceState::Running;
        info!("contact service initialized");
        Ok(())
    }
    fn shutdown(&mut self) -> CourierResult<()> {
        self.state = ServiceState::Stopped;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> Database {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("test.db");
        let config = courier_core::config::DatabaseConfig::default();
        let db = Database::init(&path, &config).unwrap();
        std::mem::forget(dir);
        db
    }

    #[test]
    fn test_contact_service_name() {
        let db = create_test_db();
        let bus = EventBus::new(16);
        let svc = ContactService::new(db, bus);
        assert_eq!(svc.name(), "contact");
    }

    #[test]
    fn test_lookups() {
        let db = create_test_db();
        let bus = EventBus::new(16);
        let svc = ContactService::new(db.clone(), bus);

        {
            let conn = db.conn().unwrap();
            Contact::new("u1", "Alice").save(&conn).unwrap();
            Contact::new("u2", "Bob").save(&conn).unwrap();
        }

        assert_eq!(svc.all_contacts().unwrap().len(), 2);
        assert_eq!(
            svc.find_contact("u1").unwrap().unwrap().name,
            "Alice"
        );
        assert!(svc.find_contact("missing").unwrap().is_none());

        let subset = svc
            .contacts_by_ids(&["u2".to_string(), "nope".to_string()])
            .unwrap();
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].id, "u2");
    }

    #[test]
    fn test_set_profile_picture_path() {
        let db = create_test_db();
        let bus = EventBus::new(16);
        let svc = ContactService::new(db.clone(), bus);

        {
            let conn = db.conn().unwrap();
            Contact::new("u1", "Alice").save(&conn).unwrap();
        }

        assert!(svc
            .set_profile_picture_path("u1", Some("/tmp/u1.jpg"))
            .unwrap());
        assert_eq!(
            svc.find_contact("u1")
                .unwrap()
                .unwrap()
                .profile_picture_path
                .as_deref(),
            Some("/tmp/u1.jpg")
        );
        assert!(!svc.set_profile_picture_path("missing", None).unwrap());
    }
}
