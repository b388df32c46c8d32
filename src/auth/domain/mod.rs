//! Domain model for the authenticated client.
//!
//! Sessions, tokens, and the request/response descriptors that cross the
//! transport boundary, independent of any concrete HTTP stack.

mod request;
mod session;

pub use request::{ApiRequest, ApiResponse, HttpMethod, MultipartPart, RequestBody};
pub use session::{AccessToken, Session, UserProfile, UserRole};
