//! Relation-augmented views.
//!
//! Relation targets are always base schemas, except where two entities embed
//! each other: Service embeds its Etablissement without `services`, and Lit
//! embeds its Service without `lits`. Those reduced targets are derived from
//! the already-built relation view, so no schema ever refers back to itself.

use std::sync::Arc;

use super::Entity;
use crate::error::SchemaError;
use crate::types::{Relation, Schema, derive_omit, derive_with_relations};

/// Base schemas indexed by entity.
pub struct Bases(Vec<Arc<Schema>>);

impl Bases {
    pub fn new(schemas: Vec<Arc<Schema>>) -> Self {
        Self(schemas)
    }

    pub fn of(&self, entity: Entity) -> Arc<Schema> {
        Arc::clone(&self.0[entity.index()])
    }
}

/// Build every relation view. Entities without one are absent from the result.
pub fn build(bases: &Bases) -> Result<Vec<(Entity, Schema)>, SchemaError> {
    use Entity::*;

    let etablissement = derive_with_relations(
        &bases.of(Etablissement),
        [
            ("services", Relation::many(bases.of(Service))),
            ("reservations", Relation::many(bases.of(ReservationLit))),
        ],
    )?;

    let service = derive_with_relations(
        &bases.of(Service),
        [
            (
                "etablissement",
                Relation::one(derive_omit(&etablissement, &["services"])?),
            ),
            ("lits", Relation::many(bases.of(Lit))),
            ("personnel", Relation::many(bases.of(Personnel))),
            ("materiels", Relation::many(bases.of(Materiel))),
        ],
    )?;

    let lit = derive_with_relations(
        &bases.of(Lit),
        [
            ("service", Relation::one(derive_omit(&service, &["lits"])?)),
            ("patient", Relation::one(bases.of(Patient))),
            ("reservations", Relation::many(bases.of(ReservationLit))),
        ],
    )?;

    let personnel = derive_with_relations(
        &bases.of(Personnel),
        [
            ("service", Relation::one(bases.of(Service))),
            ("prisesEnCharge", Relation::many(bases.of(PriseEnCharge))),
        ],
    )?;

    let patient = derive_with_relations(
        &bases.of(Patient),
        [
            ("lits", Relation::many(bases.of(Lit))),
            ("transferts", Relation::many(bases.of(Transfert))),
            ("prisesEnCharge", Relation::many(bases.of(PriseEnCharge))),
            ("reservations", Relation::many(bases.of(ReservationLit))),
            ("documents", Relation::many(bases.of(Document))),
        ],
    )?;

    let transfert = derive_with_relations(
        &bases.of(Transfert),
        [
            ("patient", Relation::one(bases.of(Patient))),
            ("serviceDepart", Relation::one(bases.of(Service))),
            ("serviceArrivee", Relation::one(bases.of(Service))),
        ],
    )?;

    let materiel = derive_with_relations(
        &bases.of(Materiel),
        [("service", Relation::one(bases.of(Service)))],
    )?;

    let prise_en_charge = derive_with_relations(
        &bases.of(PriseEnCharge),
        [
            ("patient", Relation::one(bases.of(Patient))),
            ("personnel", Relation::one(bases.of(Personnel))),
        ],
    )?;

    let reservation_lit = derive_with_relations(
        &bases.of(ReservationLit),
        [
            ("patient", Relation::one(bases.of(Patient))),
            ("lit", Relation::one(bases.of(Lit))),
            ("etablissement", Relation::one(bases.of(Etablissement))),
        ],
    )?;

    Ok(vec![
        (Etablissement, etablissement),
        (Service, service),
        (Lit, lit),
        (Personnel, personnel),
        (Patient, patient),
        (Transfert, transfert),
        (Materiel, materiel),
        (PriseEnCharge, prise_en_charge),
        (ReservationLit, reservation_lit),
    ])
}
