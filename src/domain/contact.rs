//! Contact domain entity and related types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Address book contact as persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Store-assigned identifier
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Rekha Khantal")]
    pub full_name: String,
    #[schema(example = "12 MG Road")]
    pub address: String,
    #[schema(example = "Indore")]
    pub city: String,
    #[schema(example = "Madhya Pradesh")]
    pub state: String,
    #[schema(example = "452001")]
    pub zip_code: String,
    #[schema(example = "2843184672")]
    pub phone_number: String,
}

/// Contact fields without an identity, used for inserts and full overwrites.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone_number: String,
}

impl NewContact {
    /// Attach a store-assigned id.
    pub fn with_id(self, id: i32) -> Contact {
        Contact {
            id,
            full_name: self.full_name,
            address: self.address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            phone_number: self.phone_number,
        }
    }
}

impl Contact {
    /// Overwrite every mutable field, keeping the id.
    pub fn overwrite(&mut self, fields: NewContact) {
        self.full_name = fields.full_name;
        self.address = fields.address;
        self.city = fields.city;
        self.state = fields.state;
        self.zip_code = fields.zip_code;
        self.phone_number = fields.phone_number;
    }
}
