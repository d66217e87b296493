//! In-memory adapters for development runs and tests.
//!
//! `InMemorySalonStore` implements every persistence port over one mutex
//! guarded state. Overlap checks and the write they guard happen under the
//! same lock, mirroring the exclusion constraints of the PostgreSQL schema.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    AppointmentRepository, AppointmentRepositoryError, CalendarEntryRepository,
    CalendarEntryRepositoryError, CatalogueRepository, CatalogueRepositoryError,
    MessageLogRepository, MessageLogRepositoryError,
};
use crate::domain::{
    Appointment, AppointmentId, AppointmentStatus, CalendarEntry, CalendarEntryStatus,
    ClientPhone, MessageLogEntry, SalonId, Service, ServiceId, Stylist, StylistId, TimeInterval,
    overlaps,
};

#[derive(Debug, Default)]
struct StoreState {
    services: Vec<Service>,
    stylists: Vec<Stylist>,
    appointments: Vec<Appointment>,
    calendar_entries: Vec<CalendarEntry>,
    messages: Vec<MessageLogEntry>,
}

/// Process-local store implementing the catalogue, appointment, calendar and
/// message log ports.
#[derive(Debug, Default)]
pub struct InMemorySalonStore {
    state: Mutex<StoreState>,
}

const POISONED: &str = "in-memory store lock poisoned";

fn entry_blocks(entry: &CalendarEntry, interval: &TimeInterval) -> bool {
    entry.status == CalendarEntryStatus::Confirmed
        && overlaps(entry.start, entry.end, interval.start(), interval.end())
}

impl InMemorySalonStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Option<MutexGuard<'_, StoreState>> {
        self.state.lock().ok()
    }

    /// Add a service to the catalogue.
    pub fn add_service(&self, service: Service) {
        if let Some(mut state) = self.lock() {
            state.services.push(service);
        }
    }

    /// Add a stylist to the catalogue.
    pub fn add_stylist(&self, stylist: Stylist) {
        if let Some(mut state) = self.lock() {
            state.stylists.push(stylist);
        }
    }

    /// Snapshot of every stored appointment, in insertion order.
    pub fn appointments(&self) -> Vec<Appointment> {
        self.lock()
            .map(|state| state.appointments.clone())
            .unwrap_or_default()
    }

    /// Snapshot of every stored calendar entry, in insertion order.
    pub fn calendar_entries(&self) -> Vec<CalendarEntry> {
        self.lock()
            .map(|state| state.calendar_entries.clone())
            .unwrap_or_default()
    }

    /// Snapshot of the message audit log.
    pub fn messages(&self) -> Vec<MessageLogEntry> {
        self.lock()
            .map(|state| state.messages.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CatalogueRepository for InMemorySalonStore {
    async fn find_service(
        &self,
        service_id: &ServiceId,
    ) -> Result<Option<Service>, CatalogueRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| CatalogueRepositoryError::query(POISONED))?;
        Ok(state
            .services
            .iter()
            .find(|service| service.id() == *service_id)
            .cloned())
    }

    async fn list_services(
        &self,
        salon_id: &SalonId,
    ) -> Result<Vec<Service>, CatalogueRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| CatalogueRepositoryError::query(POISONED))?;
        let mut services: Vec<Service> = state
            .services
            .iter()
            .filter(|service| service.salon_id() == *salon_id)
            .cloned()
            .collect();
        services.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(services)
    }

    async fn find_stylist(
        &self,
        stylist_id: &StylistId,
    ) -> Result<Option<Stylist>, CatalogueRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| CatalogueRepositoryError::query(POISONED))?;
        Ok(state
            .stylists
            .iter()
            .find(|stylist| stylist.id() == *stylist_id)
            .cloned())
    }

    async fn list_stylists(
        &self,
        salon_id: &SalonId,
    ) -> Result<Vec<Stylist>, CatalogueRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| CatalogueRepositoryError::query(POISONED))?;
        let mut stylists: Vec<Stylist> = state
            .stylists
            .iter()
            .filter(|stylist| stylist.salon_id() == *salon_id)
            .cloned()
            .collect();
        stylists.sort_by_key(Stylist::position);
        Ok(stylists)
    }
}

#[async_trait]
impl AppointmentRepository for InMemorySalonStore {
    async fn insert(&self, appointment: &Appointment) -> Result<(), AppointmentRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| AppointmentRepositoryError::query(POISONED))?;
        if appointment.status.is_active() {
            let clash = state.appointments.iter().any(|existing| {
                existing.stylist_id == appointment.stylist_id
                    && existing.status.is_active()
                    && overlaps(existing.start, existing.end, appointment.start, appointment.end)
            });
            if clash {
                return Err(AppointmentRepositoryError::conflict(format!(
                    "stylist {} already booked between {} and {}",
                    appointment.stylist_id, appointment.start, appointment.end
                )));
            }
        }
        state.appointments.push(appointment.clone());
        Ok(())
    }

    async fn delete(&self, id: &AppointmentId) -> Result<(), AppointmentRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| AppointmentRepositoryError::query(POISONED))?;
        let before = state.appointments.len();
        state.appointments.retain(|appointment| appointment.id != *id);
        if state.appointments.len() == before {
            return Err(AppointmentRepositoryError::not_found(*id));
        }
        Ok(())
    }

    async fn list_active_for_stylist(
        &self,
        stylist_id: &StylistId,
        window: &TimeInterval,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| AppointmentRepositoryError::query(POISONED))?;
        Ok(state
            .appointments
            .iter()
            .filter(|appointment| appointment.stylist_id == *stylist_id)
            .filter(|appointment| appointment.blocks(window))
            .cloned()
            .collect())
    }

    async fn list_active_for_phone(
        &self,
        phone: &ClientPhone,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| AppointmentRepositoryError::query(POISONED))?;
        let mut matches: Vec<Appointment> = state
            .appointments
            .iter()
            .filter(|appointment| appointment.client_phone == *phone)
            .filter(|appointment| appointment.status.is_active())
            .cloned()
            .collect();
        matches.sort_by_key(|appointment| appointment.start);
        Ok(matches)
    }

    async fn update_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> Result<(), AppointmentRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| AppointmentRepositoryError::query(POISONED))?;
        let appointment = state
            .appointments
            .iter_mut()
            .find(|appointment| appointment.id == *id)
            .ok_or_else(|| AppointmentRepositoryError::not_found(*id))?;
        appointment.status = status;
        Ok(())
    }

    async fn update_interval(
        &self,
        id: &AppointmentId,
        interval: &TimeInterval,
    ) -> Result<Appointment, AppointmentRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| AppointmentRepositoryError::query(POISONED))?;
        let stylist_id = state
            .appointments
            .iter()
            .find(|appointment| appointment.id == *id)
            .map(|appointment| appointment.stylist_id)
            .ok_or_else(|| AppointmentRepositoryError::not_found(*id))?;
        let clash = state.appointments.iter().any(|other| {
            other.id != *id && other.stylist_id == stylist_id && other.blocks(interval)
        });
        if clash {
            return Err(AppointmentRepositoryError::conflict(format!(
                "stylist {stylist_id} already booked between {} and {}",
                interval.start(),
                interval.end()
            )));
        }
        let appointment = state
            .appointments
            .iter_mut()
            .find(|appointment| appointment.id == *id)
            .ok_or_else(|| AppointmentRepositoryError::not_found(*id))?;
        appointment.start = interval.start();
        appointment.end = interval.end();
        Ok(appointment.clone())
    }
}

#[async_trait]
impl CalendarEntryRepository for InMemorySalonStore {
    async fn insert(&self, entry: &CalendarEntry) -> Result<(), CalendarEntryRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| CalendarEntryRepositoryError::query(POISONED))?;
        if entry.status == CalendarEntryStatus::Confirmed {
            let interval = TimeInterval::new(entry.start, entry.end)
                .map_err(|err| CalendarEntryRepositoryError::query(err.to_string()))?;
            let clash = state
                .calendar_entries
                .iter()
                .any(|existing| existing.stylist_id == entry.stylist_id && entry_blocks(existing, &interval));
            if clash {
                return Err(CalendarEntryRepositoryError::conflict(format!(
                    "stylist {} already has a calendar entry between {} and {}",
                    entry.stylist_id, entry.start, entry.end
                )));
            }
        }
        state.calendar_entries.push(entry.clone());
        Ok(())
    }

    async fn find_by_appointment(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<Option<CalendarEntry>, CalendarEntryRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| CalendarEntryRepositoryError::query(POISONED))?;
        Ok(state
            .calendar_entries
            .iter()
            .find(|entry| entry.appointment_id == *appointment_id)
            .cloned())
    }

    async fn update_status_by_appointment(
        &self,
        appointment_id: &AppointmentId,
        status: CalendarEntryStatus,
    ) -> Result<bool, CalendarEntryRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| CalendarEntryRepositoryError::query(POISONED))?;
        let mut matched = false;
        for entry in state
            .calendar_entries
            .iter_mut()
            .filter(|entry| entry.appointment_id == *appointment_id)
        {
            entry.status = status;
            matched = true;
        }
        Ok(matched)
    }

    async fn update_interval_by_appointment(
        &self,
        appointment_id: &AppointmentId,
        interval: &TimeInterval,
    ) -> Result<bool, CalendarEntryRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| CalendarEntryRepositoryError::query(POISONED))?;
        let Some(stylist_id) = state
            .calendar_entries
            .iter()
            .find(|entry| entry.appointment_id == *appointment_id)
            .map(|entry| entry.stylist_id)
        else {
            return Ok(false);
        };
        let clash = state.calendar_entries.iter().any(|other| {
            other.appointment_id != *appointment_id
                && other.stylist_id == stylist_id
                && entry_blocks(other, interval)
        });
        if clash {
            return Err(CalendarEntryRepositoryError::conflict(format!(
                "stylist {stylist_id} already has a calendar entry between {} and {}",
                interval.start(),
                interval.end()
            )));
        }
        for entry in state
            .calendar_entries
            .iter_mut()
            .filter(|entry| entry.appointment_id == *appointment_id)
        {
            entry.start = interval.start();
            entry.end = interval.end();
        }
        Ok(true)
    }
}

#[async_trait]
impl MessageLogRepository for InMemorySalonStore {
    async fn record(&self, entry: &MessageLogEntry) -> Result<(), MessageLogRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| MessageLogRepositoryError::query(POISONED))?;
        state.messages.push(entry.clone());
        Ok(())
    }
}
