//! Base schema declarations, one per entity.
//!
//! Only the canonical field set lives here. Create/update views are derived by
//! the catalog and relation views are assembled in [`super::relations`].

use super::Entity;
use crate::types::{FieldDescriptor, Rule, Schema};

const NAME_REQUIRED: &str = "the name is required";
const FIRST_NAME_REQUIRED: &str = "the first name is required";

pub fn base_schema(entity: Entity) -> Schema {
    match entity {
        Entity::Etablissement => etablissement(),
        Entity::Service => service(),
        Entity::Lit => lit(),
        Entity::Patient => patient(),
        Entity::Personnel => personnel(),
        Entity::Transfert => transfert(),
        Entity::Materiel => materiel(),
        Entity::PriseEnCharge => prise_en_charge(),
        Entity::ReservationLit => reservation_lit(),
        Entity::Medicament => medicament(),
        Entity::Document => document(),
        Entity::User => user(),
    }
}

pub fn etablissement() -> Schema {
    Schema::new("Etablissement")
        .with_identifier("id")
        .with_field(FieldDescriptor::string("nom").min_length(1, NAME_REQUIRED))
        .with_field(FieldDescriptor::string("adresse").min_length(1, "the address is required"))
        .with_field(FieldDescriptor::string("ville").nullish())
        .with_field(FieldDescriptor::string("codePostal").nullish())
        .with_field(FieldDescriptor::string("pays").with_default("France"))
        .with_field(
            FieldDescriptor::string("telephone").min_length(1, "the phone number is required"),
        )
        .with_field(FieldDescriptor::email("email"))
        .with_field(FieldDescriptor::url("siteWeb").nullish())
        .with_field(
            FieldDescriptor::integer("capacite")
                .non_negative()
                .with_default(0i64),
        )
        .with_field(FieldDescriptor::string("type").nullish())
}

pub fn service() -> Schema {
    Schema::new("Service")
        .with_identifier("id")
        .with_field(FieldDescriptor::string("nom").min_length(1, NAME_REQUIRED))
        .with_field(FieldDescriptor::string("description").nullish())
        .with_field(FieldDescriptor::string("etablissementId"))
        .with_field(
            FieldDescriptor::integer("capacite")
                .non_negative()
                .with_default(0i64),
        )
        .with_field(FieldDescriptor::string("statut").with_default("Active"))
}

pub fn lit() -> Schema {
    Schema::new("Lit")
        .with_identifier("id")
        .with_field(FieldDescriptor::string("numeroLit").min_length(1, "the bed number is required"))
        .with_field(FieldDescriptor::string("type").nullish())
        .with_field(FieldDescriptor::boolean("estOccupe").with_default(false))
        .with_field(FieldDescriptor::string("serviceId"))
        .with_field(FieldDescriptor::string("patientId").nullish())
}

pub fn patient() -> Schema {
    Schema::new("Patient")
        .with_identifier("id")
        .with_field(FieldDescriptor::string("nom").min_length(1, NAME_REQUIRED))
        .with_field(FieldDescriptor::string("prenom").min_length(1, FIRST_NAME_REQUIRED))
        .with_field(FieldDescriptor::date("dateNaissance"))
        .with_field(FieldDescriptor::enumeration("sexe", &["M", "F", "Autre"]).nullish())
        .with_field(FieldDescriptor::string("adresse").nullish())
        .with_field(FieldDescriptor::string("telephone").nullish())
        .with_field(FieldDescriptor::email("email").nullish())
        .with_field(FieldDescriptor::string("numeroSecuriteSociale").nullish())
        .with_field(FieldDescriptor::string("groupeSanguin").nullish())
        .with_field(FieldDescriptor::string("allergies").nullish())
        .with_field(FieldDescriptor::string("antecedents").nullish())
        .with_field(FieldDescriptor::date("dateAdmission").nullish())
        .with_field(FieldDescriptor::string("statut").with_default("Active"))
}

pub fn personnel() -> Schema {
    Schema::new("Personnel")
        .with_identifier("id")
        .with_field(FieldDescriptor::string("nom").min_length(1, NAME_REQUIRED))
        .with_field(FieldDescriptor::string("prenom").min_length(1, FIRST_NAME_REQUIRED))
        .with_field(FieldDescriptor::email("email"))
        .with_field(FieldDescriptor::string("telephone").nullish())
        .with_field(FieldDescriptor::string("poste").min_length(1, "the position is required"))
        .with_field(FieldDescriptor::string("specialite").nullish())
        .with_field(FieldDescriptor::date("dateEmbauche").nullish())
        .with_field(FieldDescriptor::string("statut").with_default("Active"))
        .with_field(FieldDescriptor::string("serviceId").nullish())
}

pub fn transfert() -> Schema {
    Schema::new("Transfert")
        .with_identifier("id")
        .with_field(FieldDescriptor::string("patientId"))
        .with_field(FieldDescriptor::string("serviceDepartId"))
        .with_field(FieldDescriptor::string("serviceArriveeId"))
        .with_field(FieldDescriptor::string("etablissementDepartId").nullish())
        .with_field(FieldDescriptor::string("etablissementArriveeId").nullish())
        .with_field(FieldDescriptor::date("dateTransfert"))
        .with_field(FieldDescriptor::string("motif").nullish())
        .with_field(FieldDescriptor::string("statut").with_default("En attente"))
        .with_field(FieldDescriptor::string("autorisePar").nullish())
}

pub fn materiel() -> Schema {
    Schema::new("Materiel")
        .with_identifier("id")
        .with_field(FieldDescriptor::string("nom").min_length(1, NAME_REQUIRED))
        .with_field(FieldDescriptor::string("description").nullish())
        .with_field(FieldDescriptor::integer("quantite").positive().with_default(1i64))
        .with_field(FieldDescriptor::string("type").nullish())
        .with_field(FieldDescriptor::string("etat").with_default("Fonctionnel"))
        .with_field(FieldDescriptor::string("serviceId").nullish())
}

pub fn prise_en_charge() -> Schema {
    Schema::new("PriseEnCharge")
        .with_identifier("id")
        .with_field(FieldDescriptor::string("patientId"))
        .with_field(FieldDescriptor::string("personnelId"))
        .with_field(FieldDescriptor::date("dateDebut"))
        .with_field(FieldDescriptor::date("dateFin").nullish())
        .with_field(FieldDescriptor::string("description").nullish())
        .with_field(FieldDescriptor::string("diagnostic").nullish())
        .with_field(FieldDescriptor::string("traitement").nullish())
}

pub fn reservation_lit() -> Schema {
    Schema::new("ReservationLit")
        .with_identifier("id")
        .with_field(FieldDescriptor::string("patientId"))
        .with_field(FieldDescriptor::string("litId"))
        .with_field(FieldDescriptor::date("dateArrivee"))
        .with_field(FieldDescriptor::date("dateDepart").nullish())
        .with_field(FieldDescriptor::string("etablissementId").nullish())
}

pub fn medicament() -> Schema {
    Schema::new("Medicament")
        .with_identifier("id")
        .with_field(FieldDescriptor::string("nom").min_length(1, NAME_REQUIRED))
        .with_field(FieldDescriptor::string("description").nullish())
        .with_field(FieldDescriptor::string("dosage").nullish())
        .with_field(
            FieldDescriptor::integer("quantiteStock")
                .non_negative()
                .with_default(0i64),
        )
        .with_field(FieldDescriptor::number("prixUnitaire").non_negative().nullish())
        .with_field(FieldDescriptor::date("datePeremption").nullish())
}

pub fn document() -> Schema {
    Schema::new("Document")
        .with_identifier("id")
        .with_field(FieldDescriptor::string("titre").min_length(1, "the title is required"))
        .with_field(FieldDescriptor::string("type"))
        .with_field(FieldDescriptor::url("url"))
        .with_field(FieldDescriptor::string("patientId"))
        .with_field(FieldDescriptor::integer("taille").non_negative().nullish())
        .with_field(FieldDescriptor::binary("fichier").optional())
        .with_field(FieldDescriptor::date("dateCreation").nullish())
}

pub fn user() -> Schema {
    Schema::new("User")
        .with_identifier("id")
        .with_field(FieldDescriptor::email("email"))
        .with_field(FieldDescriptor::string("name").min_length(1, NAME_REQUIRED))
        .with_field(FieldDescriptor::string("password").with_rule(
            Rule::min_length(8).with_message("the password must contain at least 8 characters"),
        ))
        .with_field(
            FieldDescriptor::enumeration("role", &["ADMIN", "MEDECIN", "INFIRMIER", "USER"])
                .with_default("USER"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_base_schema_is_well_formed() {
        for entity in Entity::ALL {
            let schema = base_schema(entity);
            assert_eq!(schema.name(), entity.name());
            assert_eq!(schema.identifier(), Some("id"));
            schema
                .validate_structure()
                .unwrap_or_else(|err| panic!("{entity}: {err}"));
        }
    }

    #[test]
    fn test_declared_defaults() {
        use crate::types::FieldValue;

        let etablissement = etablissement();
        assert_eq!(
            etablissement.field("capacite").unwrap().default,
            Some(FieldValue::Int(0))
        );
        assert_eq!(
            materiel().field("quantite").unwrap().default,
            Some(FieldValue::Int(1))
        );
        assert_eq!(
            personnel().field("statut").unwrap().default,
            Some(FieldValue::from("Active"))
        );
    }
}
