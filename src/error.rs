use thiserror::Error;

/// Failure conditions shared by every container in this crate.
///
/// Errors are raised before anything is mutated, so a container that
/// returned one is exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// A removal was attempted on a collection holding no elements.
    #[error("cannot {operation} when collection is empty")]
    EmptyCollection { operation: &'static str },

    /// A position was used outside the range it is valid for: the end was
    /// dereferenced or erased, a cursor stepped past either boundary, or the
    /// position does not denote anything in the current contents.
    #[error("invalid position: {reason}")]
    InvalidPosition { reason: &'static str },
}

impl CollectionError {
    pub(crate) fn empty(operation: &'static str) -> Self {
        CollectionError::EmptyCollection { operation }
    }

    pub(crate) fn position(reason: &'static str) -> Self {
        CollectionError::InvalidPosition { reason }
    }
}

pub type Result<T, E = CollectionError> = std::result::Result<T, E>;
