//! Whois record models built from the `WhoisRecord` document.
//!
//! `RegistryData` and `WhoisRecord` extend [`BaseWhoisRecord`] by embedding it
//! and dereferencing to it, so shared fields read the same on all three.

use crate::{
    audit::{Audit, NameServers},
    coerce::{int_of, string_of, timestamp_of, Fields},
    contact::{Contact, Registrant},
};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BaseWhoisRecord {
    pub created_date: Option<DateTime<FixedOffset>>,
    pub created_date_raw: String,
    pub updated_date: Option<DateTime<FixedOffset>>,
    pub updated_date_raw: String,
    pub expires_date: Option<DateTime<FixedOffset>>,
    pub expires_date_raw: String,
    pub created_date_normalized: Option<DateTime<FixedOffset>>,
    pub updated_date_normalized: Option<DateTime<FixedOffset>>,
    pub expires_date_normalized: Option<DateTime<FixedOffset>>,
    pub data_error: String,
    pub contact_email: String,
    pub custom1_field_name: String,
    pub custom1_field_value: String,
    pub custom2_field_name: String,
    pub custom2_field_value: String,
    pub custom3_field_name: String,
    pub custom3_field_value: String,
    /// `Some(true)` when available, `Some(false)` when taken, `None` when the service didn't say.
    pub domain_availability: Option<bool>,
    pub domain_availability_raw: String,
    pub domain_name: String,
    pub domain_name_ext: String,
    pub estimated_domain_age: i64,
    pub estimated_domain_age_raw: String,
    pub footer: String,
    pub header: String,
    pub parse_code: i64,
    pub raw_text: String,
    pub stripped_text: String,
    pub registrar_name: String,
    pub registrar_ianaid: String,
    pub whois_server: String,
    pub audit: Option<Audit>,
    pub name_servers: Option<NameServers>,
    pub registrant: Option<Registrant>,
    pub administrative_contact: Option<Contact>,
    pub billing_contact: Option<Contact>,
    pub technical_contact: Option<Contact>,
    pub zone_contact: Option<Contact>,
}

impl BaseWhoisRecord {
    pub fn from_fields(values: &Fields) -> Self {
        let availability = string_of(values, "domainAvailability");

        Self {
            created_date: timestamp_of(values, "createdDate"),
            created_date_raw: string_of(values, "createdDate"),
            updated_date: timestamp_of(values, "updatedDate"),
            updated_date_raw: string_of(values, "updatedDate"),
            expires_date: timestamp_of(values, "expiresDate"),
            expires_date_raw: string_of(values, "expiresDate"),
            created_date_normalized: timestamp_of(values, "createdDateNormalized"),
            updated_date_normalized: timestamp_of(values, "updatedDateNormalized"),
            expires_date_normalized: timestamp_of(values, "expiresDateNormalized"),
            data_error: string_of(values, "dataError"),
            contact_email: string_of(values, "contactEmail"),
            custom1_field_name: string_of(values, "custom1FieldName"),
            custom1_field_value: string_of(values, "custom1FieldValue"),
            custom2_field_name: string_of(values, "custom2FieldName"),
            custom2_field_value: string_of(values, "custom2FieldValue"),
            custom3_field_name: string_of(values, "custom3FieldName"),
            custom3_field_value: string_of(values, "custom3FieldValue"),
            domain_availability: parse_domain_availability(&availability),
            domain_availability_raw: availability,
            domain_name: string_of(values, "domainName"),
            domain_name_ext: string_of(values, "domainNameExt"),
            estimated_domain_age: int_of(values, "estimatedDomainAge"),
            estimated_domain_age_raw: string_of(values, "estimatedDomainAge"),
            footer: string_of(values, "footer"),
            header: string_of(values, "header"),
            parse_code: int_of(values, "parseCode"),
            raw_text: string_of(values, "rawText"),
            stripped_text: string_of(values, "strippedText"),
            registrar_name: string_of(values, "registrarName"),
            registrar_ianaid: registrar_iana_id(values),
            whois_server: string_of(values, "whoisServer"),
            audit: child(values, "audit", Audit::from_fields),
            name_servers: child(values, "nameServers", NameServers::from_fields),
            registrant: child(values, "registrant", Registrant::from_fields),
            administrative_contact: child(values, "administrativeContact", Contact::from_fields),
            billing_contact: child(values, "billingContact", Contact::from_fields),
            technical_contact: child(values, "technicalContact", Contact::from_fields),
            zone_contact: child(values, "zoneContact", Contact::from_fields),
        }
    }
}

/// Record as returned by the registry, nested inside a [`WhoisRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegistryData {
    #[serde(flatten)]
    pub base: BaseWhoisRecord,
    pub referral_url: String,
    pub status: String,
}

impl RegistryData {
    pub fn from_fields(values: &Fields) -> Self {
        Self {
            base: BaseWhoisRecord::from_fields(values),
            referral_url: string_of(values, "referralURL"),
            status: string_of(values, "status"),
        }
    }
}

impl std::ops::Deref for RegistryData {
    type Target = BaseWhoisRecord;

    fn deref(&self) -> &BaseWhoisRecord {
        &self.base
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WhoisRecord {
    #[serde(flatten)]
    pub base: BaseWhoisRecord,
    pub registry_data: Option<RegistryData>,
}

impl WhoisRecord {
    pub fn from_fields(values: &Fields) -> Self {
        Self {
            base: BaseWhoisRecord::from_fields(values),
            registry_data: child(values, "registryData", RegistryData::from_fields),
        }
    }
}

impl std::ops::Deref for WhoisRecord {
    type Target = BaseWhoisRecord;

    fn deref(&self) -> &BaseWhoisRecord {
        &self.base
    }
}

/// Case-insensitive `available` / `unavailable`; anything else is unknown.
pub fn parse_domain_availability(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "available" => Some(true),
        "unavailable" => Some(false),
        _ => None,
    }
}

// Older payloads spell the key `registrarIANANID`.
fn registrar_iana_id(values: &Fields) -> String {
    if values.contains_key("registrarIANAID") {
        string_of(values, "registrarIANAID")
    } else {
        string_of(values, "registrarIANANID")
    }
}

/// Build a sub-record only when `key` is present. A present key whose value is
/// not an object (including `null`) yields the default-filled child.
fn child<T>(values: &Fields, key: &str, build: fn(&Fields) -> T) -> Option<T> {
    match values.get(key)? {
        Value::Object(nested) => Some(build(nested)),
        _ => Some(build(&Fields::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> WhoisRecord {
        WhoisRecord::from_fields(value.as_object().unwrap())
    }

    #[test]
    fn test_domain_availability() {
        assert_eq!(parse_domain_availability("AVAILABLE"), Some(true));
        assert_eq!(parse_domain_availability("Unavailable"), Some(false));
        assert_eq!(parse_domain_availability("unknown"), None);
        assert_eq!(parse_domain_availability(""), None);
    }

    #[test]
    fn test_missing_children_stay_absent() {
        let whois = record(json!({"domainName": "example.com"}));

        assert_eq!(whois.domain_name, "example.com");
        assert!(whois.audit.is_none());
        assert!(whois.name_servers.is_none());
        assert!(whois.registrant.is_none());
        assert!(whois.administrative_contact.is_none());
        assert!(whois.billing_contact.is_none());
        assert!(whois.technical_contact.is_none());
        assert!(whois.zone_contact.is_none());
        assert!(whois.registry_data.is_none());
        assert!(whois.domain_availability.is_none());
    }

    #[test]
    fn test_present_children_are_built() {
        let whois = record(json!({
            "registrant": {"name": "Jane Doe", "unparsable": "line"},
            "technicalContact": {"email": "tech@example.com"},
            "zoneContact": null,
            "nameServers": {"hostNames": ["ns1.example.com"]},
            "audit": {"createdDate": "2020-01-01T00:00:00Z"},
        }));

        assert_eq!(whois.registrant.as_ref().unwrap().name, "Jane Doe");
        assert_eq!(whois.technical_contact.as_ref().unwrap().email, "tech@example.com");
        assert_eq!(whois.zone_contact, Some(Contact::default()));
        assert_eq!(whois.name_servers.as_ref().unwrap().host_names, vec!["ns1.example.com"]);
        assert!(whois.audit.as_ref().unwrap().created_date.is_some());
    }

    #[test]
    fn test_scalar_fields_and_dates() {
        let whois = record(json!({
            "createdDate": "2009-03-19T21:47:17-04:00",
            "expiresDate": "garbage",
            "expiresDateNormalized": "2030-03-19 01:47:17 UTC",
            "estimatedDomainAge": "5470",
            "parseCode": 3579,
            "registrarIANANID": "1068",
            "custom2FieldName": "Registrar Contact Email",
            "custom2FieldValue": "abuse@example.com",
        }));

        assert_eq!(
            whois.created_date.unwrap().format("%Y-%m-%d %H:%M:%S").to_string(),
            "2009-03-19 21:47:17"
        );
        assert!(whois.expires_date.is_none());
        assert_eq!(whois.expires_date_raw, "garbage");
        assert!(whois.expires_date_normalized.is_some());
        assert_eq!(whois.estimated_domain_age, 5470);
        assert_eq!(whois.estimated_domain_age_raw, "5470");
        assert_eq!(whois.parse_code, 3579);
        assert_eq!(whois.registrar_ianaid, "1068");
        assert_eq!(whois.custom2_field_value, "abuse@example.com");
        assert_eq!(whois.custom1_field_name, "");
    }

    #[test]
    fn test_registry_data_is_independent() {
        let whois = record(json!({
            "domainName": "example.com",
            "registrarName": "Outer Registrar",
            "registryData": {
                "domainName": "EXAMPLE.COM",
                "registrarName": "Registry Registrar",
                "referralURL": "http://www.example-registrar.com",
                "status": "clientTransferProhibited",
                "domainAvailability": "UNAVAILABLE",
            },
        }));

        let registry = whois.registry_data.as_ref().unwrap();
        assert_eq!(registry.domain_name, "EXAMPLE.COM");
        assert_eq!(registry.registrar_name, "Registry Registrar");
        assert_eq!(registry.referral_url, "http://www.example-registrar.com");
        assert_eq!(registry.status, "clientTransferProhibited");
        assert_eq!(registry.domain_availability, Some(false));
        assert!(registry.registrant.is_none());
        assert_eq!(whois.registrar_name, "Outer Registrar");
        assert!(whois.domain_availability.is_none());
    }
}
