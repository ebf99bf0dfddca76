#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidRequest,
    Internal,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::InvalidRequest => "invalid_request",
            Self::Internal => "internal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    NotFound {
        resource: &'static str,
        id: String,
        /// Parent of a nested entity, e.g. `server[100000000001]`.
        scope: Option<String>,
    },
    Conflict {
        resource: &'static str,
        id: String,
        reason: String,
    },
    InvalidRequest {
        resource: &'static str,
        id: String,
        reason: String,
    },
    Internal {
        reason: String,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
            scope: None,
        }
    }

    pub fn not_found_in(resource: &'static str, id: impl ToString, scope: String) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
            scope: Some(scope),
        }
    }

    pub fn conflict(resource: &'static str, id: impl ToString, reason: impl Into<String>) -> Self {
        Self::Conflict {
            resource,
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_request(
        resource: &'static str,
        id: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidRequest {
            resource,
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound {
                resource,
                id,
                scope: Some(scope),
            } => write!(f, "{resource} not found: {scope}.{resource}[{id}]"),
            Self::NotFound {
                resource,
                id,
                scope: None,
            } => write!(f, "{resource} not found: {resource}[{id}]"),
            Self::Conflict {
                resource,
                id,
                reason,
            } => write!(f, "{resource}[{id}] conflict: {reason}"),
            Self::InvalidRequest {
                resource,
                id,
                reason,
            } => write!(f, "invalid request for {resource}[{id}]: {reason}"),
            Self::Internal { reason } => write!(f, "internal error: {reason}"),
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_kind() {
        assert_eq!(EngineError::not_found("server", "1").code(), "not_found");
        assert_eq!(
            EngineError::conflict("server", "1", "locked").code(),
            "conflict"
        );
        assert_eq!(
            EngineError::invalid_request("port", 2, "bad").code(),
            "invalid_request"
        );
        assert_eq!(EngineError::internal("boom").code(), "internal");
    }

    #[test]
    fn nested_not_found_names_its_scope() {
        let err = EngineError::not_found_in("port", 2001, "server[100000000001]".to_string());
        assert_eq!(
            err.to_string(),
            "port not found: server[100000000001].port[2001]"
        );
        assert_eq!(
            EngineError::not_found("server", "x").to_string(),
            "server not found: server[x]"
        );
    }
}
