use serde::Serialize;
use uuid::Uuid;

/// `{"success": true, "data": ...}`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

/// Returned after a document is appended.
#[derive(Debug, Serialize)]
pub struct SavedResponse {
    pub success: bool,
    pub id: Uuid,
}

impl SavedResponse {
    pub fn ok(id: Uuid) -> Self {
        Self { success: true, id }
    }
}
