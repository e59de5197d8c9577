//! Success-response envelope.
//!
//! Every successful endpoint wraps its payload as `{ "data": ... }`;
//! [`DataResponse`] keeps that typed instead of scattering `json!` literals
//! through the handlers.

use serde::Serialize;

/// The `{ "data": T }` envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
