//! # Qualification Module
//!
//! Decides whether a hairdresser may perform a service.
//!
//! ```text
//! hairdresser {M}      ∩  service {M, F}  = {M}  → qualified
//! hairdresser {S}      ∩  service {M, F}  = {}   → not qualified
//! hairdresser {M, F}   ∩  service {}      = {}   → not qualified
//! ```
//!
//! A service that requires nothing can never be booked. Catalogue
//! validation (`validate_new_service`) stops such services from being
//! created in the first place.

use std::collections::BTreeSet;

use crate::types::{Hairdresser, Service, Specialization};

/// True iff the hairdresser holds at least one required specialization.
///
/// ## Example
/// ```rust
/// use std::collections::BTreeSet;
/// use salon_core::qualification::is_qualified;
/// use salon_core::Specialization::{MensCut, Stylist, WomensCut};
///
/// let required = BTreeSet::from([MensCut, WomensCut]);
/// assert!(is_qualified(&BTreeSet::from([MensCut]), &required));
/// assert!(!is_qualified(&BTreeSet::from([Stylist]), &required));
/// ```
pub fn is_qualified(
    hairdresser_specializations: &BTreeSet<Specialization>,
    service_required: &BTreeSet<Specialization>,
) -> bool {
    !hairdresser_specializations.is_disjoint(service_required)
}

/// The specializations a hairdresser and a service have in common.
pub fn shared_specializations(
    hairdresser_specializations: &BTreeSet<Specialization>,
    service_required: &BTreeSet<Specialization>,
) -> BTreeSet<Specialization> {
    hairdresser_specializations
        .intersection(service_required)
        .copied()
        .collect()
}

/// Entity-level shorthand for [`is_qualified`].
pub fn can_perform(hairdresser: &Hairdresser, service: &Service) -> bool {
    is_qualified(&hairdresser.specializations, &service.specializations)
}

/// Hairdressers from `staff` who can perform `service`, in input order.
pub fn qualified_for<'a>(
    staff: &'a [Hairdresser],
    service: &'a Service,
) -> impl Iterator<Item = &'a Hairdresser> + 'a {
    staff.iter().filter(move |h| can_perform(h, service))
}

// =============================================================================
// Unit Tests
// =============================================================================
