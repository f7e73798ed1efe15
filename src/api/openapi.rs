//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::{contact_handler, user_handler};
use crate::domain::{Contact, UserProfile};
use crate::services::LoginResponse;

/// OpenAPI documentation for the Address Book API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Address Book API",
        version = "0.1.0",
        description = "Contacts and user accounts with JWT login and password reset"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        contact_handler::list_contacts,
        contact_handler::get_contact,
        contact_handler::add_contact,
        contact_handler::update_contact,
        contact_handler::delete_contact,
        user_handler::register,
        user_handler::login,
        user_handler::forgot_password,
        user_handler::reset_password,
    ),
    components(
        schemas(
            Contact,
            UserProfile,
            LoginResponse,
            contact_handler::ContactRequest,
            user_handler::RegisterRequest,
            user_handler::LoginRequest,
            user_handler::ForgotPasswordRequest,
            user_handler::ResetPasswordRequest,
        )
    ),
    tags(
        (name = "Address Book", description = "Contact management"),
        (name = "User", description = "Registration, login and password reset")
    )
)]
pub struct ApiDoc;
