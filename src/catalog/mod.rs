//! Schema catalog: every entity with its base, create, update and (for most
//! entities) with-relations schemas.

pub mod entities;
pub mod relations;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{HospitalSchemaError, SchemaError};
use crate::types::{Schema, derive_create, derive_update};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Entity {
    Etablissement,
    Service,
    Lit,
    Patient,
    Personnel,
    Transfert,
    Materiel,
    PriseEnCharge,
    ReservationLit,
    Medicament,
    Document,
    User,
}

impl Entity {
    pub const ALL: [Entity; 12] = [
        Entity::Etablissement,
        Entity::Service,
        Entity::Lit,
        Entity::Patient,
        Entity::Personnel,
        Entity::Transfert,
        Entity::Materiel,
        Entity::PriseEnCharge,
        Entity::ReservationLit,
        Entity::Medicament,
        Entity::Document,
        Entity::User,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Entity::Etablissement => "Etablissement",
            Entity::Service => "Service",
            Entity::Lit => "Lit",
            Entity::Patient => "Patient",
            Entity::Personnel => "Personnel",
            Entity::Transfert => "Transfert",
            Entity::Materiel => "Materiel",
            Entity::PriseEnCharge => "PriseEnCharge",
            Entity::ReservationLit => "ReservationLit",
            Entity::Medicament => "Medicament",
            Entity::Document => "Document",
            Entity::User => "User",
        }
    }

    /// Position in [`Entity::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Case-insensitive; `-` and `_` are ignored, so `reservation-lit`,
/// `reservation_lit` and `ReservationLit` are the same entity.
impl FromStr for Entity {
    type Err = HospitalSchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Entity::ALL
            .into_iter()
            .find(|entity| normalize(entity.name()) == wanted)
            .ok_or_else(|| HospitalSchemaError::unknown_entity(s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemaVariant {
    Base,
    Create,
    Update,
    WithRelations,
}

impl SchemaVariant {
    pub const ALL: [SchemaVariant; 4] = [
        SchemaVariant::Base,
        SchemaVariant::Create,
        SchemaVariant::Update,
        SchemaVariant::WithRelations,
    ];
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaVariant::Base => "base",
            SchemaVariant::Create => "create",
            SchemaVariant::Update => "update",
            SchemaVariant::WithRelations => "with-relations",
        };
        f.write_str(name)
    }
}

impl FromStr for SchemaVariant {
    type Err = HospitalSchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "base" => Ok(SchemaVariant::Base),
            "create" => Ok(SchemaVariant::Create),
            "update" => Ok(SchemaVariant::Update),
            "withrelations" | "relations" => Ok(SchemaVariant::WithRelations),
            _ => Err(HospitalSchemaError::unknown_variant(s)),
        }
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// All schema views of one entity.
#[derive(Debug, Clone)]
pub struct EntitySchemas {
    pub base: Arc<Schema>,
    pub create: Arc<Schema>,
    pub update: Arc<Schema>,
    pub with_relations: Option<Arc<Schema>>,
}

impl EntitySchemas {
    pub fn get(&self, variant: SchemaVariant) -> Option<&Arc<Schema>> {
        match variant {
            SchemaVariant::Base => Some(&self.base),
            SchemaVariant::Create => Some(&self.create),
            SchemaVariant::Update => Some(&self.update),
            SchemaVariant::WithRelations => self.with_relations.as_ref(),
        }
    }

    pub fn variants(&self) -> Vec<SchemaVariant> {
        SchemaVariant::ALL
            .into_iter()
            .filter(|variant| self.get(*variant).is_some())
            .collect()
    }
}

static GLOBAL: Lazy<SchemaCatalog> = Lazy::new(|| match SchemaCatalog::build() {
    Ok(catalog) => catalog,
    Err(err) => panic!("schema catalog declarations are inconsistent: {err}"),
});

/// Immutable registry of every entity schema.
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    entries: Vec<EntitySchemas>,
}

impl SchemaCatalog {
    /// Build and check every schema view.
    pub fn build() -> Result<Self, SchemaError> {
        let mut bases = Vec::with_capacity(Entity::ALL.len());
        for entity in Entity::ALL {
            let base = entities::base_schema(entity);
            base.validate_structure()?;
            bases.push(Arc::new(base));
        }

        let bases = relations::Bases::new(bases);
        let mut with_relations: Vec<Option<Arc<Schema>>> = vec![None; Entity::ALL.len()];
        for (entity, schema) in relations::build(&bases)? {
            schema.validate_structure()?;
            with_relations[entity.index()] = Some(Arc::new(schema));
        }

        let mut entries = Vec::with_capacity(Entity::ALL.len());
        for (entity, with_relations) in Entity::ALL.into_iter().zip(with_relations) {
            let base = bases.of(entity);
            entries.push(EntitySchemas {
                create: Arc::new(derive_create(&base)),
                update: Arc::new(derive_update(&base)?),
                base,
                with_relations,
            });
        }

        tracing::debug!(entities = entries.len(), "schema catalog built");
        Ok(Self { entries })
    }

    /// Process-wide catalog, built on first use.
    ///
    /// # Panics
    ///
    /// On first access if the built-in declarations are inconsistent.
    pub fn global() -> &'static SchemaCatalog {
        &GLOBAL
    }

    pub fn entity(&self, entity: Entity) -> &EntitySchemas {
        &self.entries[entity.index()]
    }

    pub fn schema(&self, entity: Entity, variant: SchemaVariant) -> Option<Arc<Schema>> {
        self.entity(entity).get(variant).cloned()
    }

    pub fn entities(&self) -> impl Iterator<Item = (Entity, &EntitySchemas)> {
        Entity::ALL.into_iter().zip(self.entries.iter())
    }
}

/// Shorthand for `SchemaCatalog::global().schema(entity, variant)`.
pub fn schema(entity: Entity, variant: SchemaVariant) -> Option<Arc<Schema>> {
    SchemaCatalog::global().schema(entity, variant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_parsing() {
        assert_eq!("patient".parse::<Entity>().unwrap(), Entity::Patient);
        assert_eq!("reservation-lit".parse::<Entity>().unwrap(), Entity::ReservationLit);
        assert_eq!("PRISE_EN_CHARGE".parse::<Entity>().unwrap(), Entity::PriseEnCharge);
        assert!(matches!(
            "chambre".parse::<Entity>(),
            Err(HospitalSchemaError::UnknownEntity { .. })
        ));
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("update".parse::<SchemaVariant>().unwrap(), SchemaVariant::Update);
        assert_eq!(
            "with-relations".parse::<SchemaVariant>().unwrap(),
            SchemaVariant::WithRelations
        );
        assert!("partial".parse::<SchemaVariant>().is_err());
    }

    #[test]
    fn test_entity_index_matches_all() {
        for (i, entity) in Entity::ALL.iter().enumerate() {
            assert_eq!(entity.index(), i);
        }
    }

    #[test]
    fn test_catalog_builds() {
        let catalog = SchemaCatalog::build().unwrap();
        assert_eq!(catalog.entities().count(), 12);
        let with_relations = catalog
            .entities()
            .filter(|(_, schemas)| schemas.with_relations.is_some())
            .count();
        assert_eq!(with_relations, 9);
        assert!(catalog.schema(Entity::User, SchemaVariant::WithRelations).is_none());
        assert_eq!(
            catalog.entity(Entity::Medicament).variants(),
            vec![SchemaVariant::Base, SchemaVariant::Create, SchemaVariant::Update]
        );
    }
}
