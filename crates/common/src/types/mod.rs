use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Success envelope shared by every JSON endpoint: `{ "data": <payload> }`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Failure envelope: `{ "error": <message> }`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}
