//! Address book handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::MAX_FULL_NAME_LENGTH;
use crate::domain::{Contact, NewContact};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

static PHONE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{10}$").expect("phone number pattern is valid"));

/// Contact fields accepted on create and update
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[validate(length(
        min = 1,
        max = MAX_FULL_NAME_LENGTH,
        message = "Full Name is required and cannot exceed 100 characters"
    ))]
    #[schema(example = "Rekha Khantal", max_length = 100)]
    pub full_name: String,
    #[serde(default)]
    #[schema(example = "12 MG Road")]
    pub address: String,
    #[serde(default)]
    #[schema(example = "Indore")]
    pub city: String,
    #[serde(default)]
    #[schema(example = "Madhya Pradesh")]
    pub state: String,
    #[serde(default)]
    #[schema(example = "452001")]
    pub zip_code: String,
    #[validate(regex(path = *PHONE_NUMBER, message = "Phone Number must be exactly 10 digits"))]
    #[schema(example = "2843184672", pattern = r"^\d{10}$")]
    pub phone_number: String,
}

impl From<ContactRequest> for NewContact {
    fn from(request: ContactRequest) -> Self {
        Self {
            full_name: request.full_name,
            address: request.address,
            city: request.city,
            state: request.state,
            zip_code: request.zip_code,
            phone_number: request.phone_number,
        }
    }
}

/// Create address book routes
pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_contacts).post(add_contact))
        .route(
            "/:id",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
}

/// List all contacts
#[utoipa::path(
    get,
    path = "/addressbook",
    tag = "Address Book",
    responses(
        (status = 200, description = "Contacts retrieved", body = Vec<Contact>)
    )
)]
pub async fn list_contacts(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Contact>>>> {
    let contacts = state.contact_service.list().await?;

    Ok(Json(ApiResponse::with_message(
        contacts,
        "Contacts retrieved successfully",
    )))
}

/// Get a contact by id
#[utoipa::path(
    get,
    path = "/addressbook/{id}",
    tag = "Address Book",
    params(("id" = i32, Path, description = "Contact id")),
    responses(
        (status = 200, description = "Contact retrieved", body = Contact),
        (status = 404, description = "Contact not found")
    )
)]
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Contact>>> {
    let contact = state.contact_service.get(id).await?;

    Ok(Json(ApiResponse::with_message(
        contact,
        "Contact retrieved successfully",
    )))
}

/// Add a contact
#[utoipa::path(
    post,
    path = "/addressbook",
    tag = "Address Book",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Contact added", body = Contact),
        (status = 400, description = "Validation error")
    )
)]
pub async fn add_contact(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ContactRequest>,
) -> AppResult<Created<Contact>> {
    let contact = state.contact_service.add(payload.into()).await?;

    Ok(Created(contact, "Contact added successfully"))
}

/// Replace every field of a contact
#[utoipa::path(
    put,
    path = "/addressbook/{id}",
    tag = "Address Book",
    params(("id" = i32, Path, description = "Contact id")),
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Contact updated", body = Contact),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Contact not found")
    )
)]
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<ContactRequest>,
) -> AppResult<Json<ApiResponse<Contact>>> {
    state.contact_service.update(id, payload.into()).await?;
    let contact = state.contact_service.get(id).await?;

    Ok(Json(ApiResponse::with_message(
        contact,
        "Contact updated successfully",
    )))
}

/// Delete a contact
#[utoipa::path(
    delete,
    path = "/addressbook/{id}",
    tag = "Address Book",
    params(("id" = i32, Path, description = "Contact id")),
    responses(
        (status = 200, description = "Contact deleted"),
        (status = 404, description = "Contact not found")
    )
)]
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.contact_service.delete(id).await?;

    Ok(Json(ApiResponse::message("Contact deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(full_name: &str, phone_number: &str) -> ContactRequest {
        ContactRequest {
            full_name: full_name.to_string(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            phone_number: phone_number.to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request("Rekha Khantal", "2843184672").validate().is_ok());
    }

    #[test]
    fn test_phone_must_be_ten_digits() {
        for phone in ["", "12345", "12345678901", "12345abcde", "+912843184"] {
            let errors = request("Rekha", phone).validate().unwrap_err();
            assert!(errors.field_errors().contains_key("phone_number"), "{phone}");
        }
    }

    #[test]
    fn test_full_name_bounds() {
        assert!(request("", "2843184672").validate().is_err());
        assert!(request(&"a".repeat(100), "2843184672").validate().is_ok());
        assert!(request(&"a".repeat(101), "2843184672").validate().is_err());
    }

    #[test]
    fn test_optional_fields_default_to_empty() {
        let parsed: ContactRequest =
            serde_json::from_str(r#"{"fullName":"Rekha","phoneNumber":"2843184672"}"#).unwrap();
        assert_eq!(parsed.city, "");
        assert_eq!(NewContact::from(parsed).full_name, "Rekha");
    }
}
