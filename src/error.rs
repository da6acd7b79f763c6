/// Errors triggered while building an [`OrderedTree`](crate::OrderedTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A tree always has a root, so it can't be built from zero keys.
    #[error("cannot build an ordered tree from an empty key sequence")]
    EmptyKeys,
}

/// Shorthand for results whose error is this crate's [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_keys_message() {
        assert_eq!(
            Error::EmptyKeys.to_string(),
            "cannot build an ordered tree from an empty key sequence"
        );
    }
}
