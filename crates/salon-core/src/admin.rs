//! # Admin Descriptors
//!
//! Static descriptions of how each entity appears on the back-office screens:
//! which fields the edit form shows, which columns the list shows and which
//! fields the search box matches.
//!
//! ```text
//! Hairdressers
//! ┌──────────────────┬──────────────────────┐
//! │ name             │ list_specializations │
//! ├──────────────────┼──────────────────────┤
//! │ Anna             │ M, F                 │
//! │ Ola              │ S                    │
//! └──────────────────┴──────────────────────┘
//! search: name
//! ```

use crate::types::{Hairdresser, Reservation, Service, Specialization};

/// Layout of one entity's admin pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityAdmin {
    /// Entity name as shown in navigation.
    pub name: &'static str,
    /// Editable fields, in form order.
    pub fields: &'static [&'static str],
    /// Columns of the list view.
    pub list_display: &'static [&'static str],
    /// Fields matched by the search box. Empty disables search.
    pub search_fields: &'static [&'static str],
}

impl EntityAdmin {
    pub fn is_searchable(&self) -> bool {
        !self.search_fields.is_empty()
    }
}

pub const SPECIALIZATION_ADMIN: EntityAdmin = EntityAdmin {
    name: "Specialization",
    fields: &["name"],
    list_display: &["name", "label"],
    search_fields: &[],
};

pub const HAIRDRESSER_ADMIN: EntityAdmin = EntityAdmin {
    name: "Hairdresser",
    fields: &["name", "specializations"],
    list_display: &["name", "list_specializations"],
    search_fields: &["name"],
};

pub const SERVICE_ADMIN: EntityAdmin = EntityAdmin {
    name: "Service",
    fields: &["name", "specializations", "duration", "cost"],
    list_display: &["name", "duration", "cost"],
    search_fields: &["name"],
};

pub const RESERVATION_ADMIN: EntityAdmin = EntityAdmin {
    name: "Reservation",
    fields: &["hairdresser", "service", "start", "end"],
    list_display: &["hairdresser", "service", "start", "end"],
    search_fields: &[],
};

/// Renders the list-view columns of an entity.
pub trait AdminListing {
    const ADMIN: EntityAdmin;

    /// Value of one `list_display` column, `None` for unknown columns.
    fn column(&self, column: &str) -> Option<String>;

    /// Every `list_display` column in order.
    fn row(&self) -> Vec<String> {
        Self::ADMIN
            .list_display
            .iter()
            .map(|c| self.column(c).unwrap_or_default())
            .collect()
    }

    /// Case-insensitive match of `query` against the search fields.
    fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        Self::ADMIN.search_fields.iter().any(|field| {
            self.column(field)
                .map(|value| value.to_lowercase().contains(&query))
                .unwrap_or(false)
        })
    }
}

/// Comma-joined specialization codes, e.g. "M, F".
pub fn list_specializations(hairdresser: &Hairdresser) -> String {
    hairdresser
        .specializations
        .iter()
        .map(Specialization::code)
        .collect::<Vec<_>>()
        .join(", ")
}

impl AdminListing for Specialization {
    const ADMIN: EntityAdmin = SPECIALIZATION_ADMIN;

    fn column(&self, column: &str) -> Option<String> {
        match column {
            "name" => Some(self.code().to_string()),
            "label" => Some(self.label().to_string()),
            _ => None,
        }
    }
}

impl AdminListing for Hairdresser {
    const ADMIN: EntityAdmin = HAIRDRESSER_ADMIN;

    fn column(&self, column: &str) -> Option<String> {
        match column {
            "name" => Some(self.name.clone()),
            "list_specializations" | "specializations" => Some(list_specializations(self)),
            _ => None,
        }
    }
}

impl AdminListing for Service {
    const ADMIN: EntityAdmin = SERVICE_ADMIN;

    fn column(&self, column: &str) -> Option<String> {
        match column {
            "name" => Some(self.name.clone()),
            "duration" => Some(format!("{} min", self.duration_minutes)),
            "cost" => Some(self.cost().to_string()),
            "specializations" => Some(
                self.specializations
                    .iter()
                    .map(Specialization::code)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        }
    }
}

impl AdminListing for Reservation {
    const ADMIN: EntityAdmin = RESERVATION_ADMIN;

    fn column(&self, column: &str) -> Option<String> {
        match column {
            "hairdresser" => Some(self.hairdresser_id.clone()),
            "service" => Some(self.service_id.clone().unwrap_or_default()),
            "start" => Some(self.start.format("%Y-%m-%d %H:%M").to_string()),
            "end" => Some(self.end.format("%Y-%m-%d %H:%M").to_string()),
            _ => None,
        }
    }
}
