use servicedesk_auth::CallerPayload;

/// Authenticated caller attached to a request by the auth middleware.
///
/// Absent from the request extensions when no bearer token was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    payload: CallerPayload,
}

impl CallerContext {
    pub fn new(payload: CallerPayload) -> Self {
        Self { payload }
    }

    pub fn payload(&self) -> &CallerPayload {
        &self.payload
    }
}
