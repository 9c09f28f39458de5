use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Rejection reasons of the checked operations (`try_insert_at`, `try_set`,
/// `try_reserve`, `from_backing`).
///
/// The unchecked counterparts treat the same conditions as programming
/// errors and only catch them with `debug_assert!`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("position {pos} is out of range for a map of {len} entries")]
    OutOfRange { pos: usize, len: usize },

    #[error("entry at position {pos} breaks ascending key order")]
    Unordered { pos: usize },

    #[error("key at position {pos} is already present")]
    Duplicate { pos: usize },

    #[error("backing store cannot make room for {requested} more entries")]
    CapacityExceeded { requested: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_position() {
        let err = Error::OutOfRange { pos: 7, len: 3 };
        assert_eq!(err.to_string(), "position 7 is out of range for a map of 3 entries");
        assert_eq!(
            Error::Duplicate { pos: 2 }.to_string(),
            "key at position 2 is already present"
        );
    }

    #[test]
    fn boxes_as_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(Error::CapacityExceeded { requested: 1 });
        assert!(err.to_string().contains("1 more entries"));
    }
}
