use crate::coerce::{int_of, string_of, Fields};
use serde::Serialize;

/// Postal and contact details of one whois contact block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub name: String,
    pub organization: String,
    pub street1: String,
    pub street2: String,
    pub street3: String,
    pub street4: String,
    pub city: String,
    pub state: String,
    pub postal_code: i64,
    pub country: String,
    pub country_code: String,
    pub email: String,
    pub telephone: String,
    pub telephone_ext: String,
    pub fax: String,
    pub fax_ext: String,
}

impl Contact {
    pub fn from_fields(values: &Fields) -> Self {
        Self {
            name: string_of(values, "name"),
            organization: string_of(values, "organization"),
            street1: string_of(values, "street1"),
            street2: string_of(values, "street2"),
            street3: string_of(values, "street3"),
            street4: string_of(values, "street4"),
            city: string_of(values, "city"),
            state: string_of(values, "state"),
            postal_code: int_of(values, "postalCode"),
            country: string_of(values, "country"),
            country_code: string_of(values, "countryCode"),
            email: string_of(values, "email"),
            telephone: string_of(values, "telephone"),
            telephone_ext: string_of(values, "telephoneExt"),
            fax: string_of(values, "fax"),
            fax_ext: string_of(values, "faxExt"),
        }
    }
}

/// The registrant contact, with whatever the service could not split into fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Registrant {
    #[serde(flatten)]
    pub contact: Contact,
    pub unparsable: String,
}

impl Registrant {
    pub fn from_fields(values: &Fields) -> Self {
        Self {
            contact: Contact::from_fields(values),
            unparsable: string_of(values, "unparsable"),
        }
    }
}

impl std::ops::Deref for Registrant {
    type Target = Contact;

    fn deref(&self) -> &Contact {
        &self.contact
    }
}
