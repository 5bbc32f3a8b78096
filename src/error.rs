use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors originated by the integration core.
///
/// The only structural failure the core itself can produce is a size mismatch
/// between the state buffers handed to a system constructor. Anything raised
/// inside a caller-supplied acceleration evaluator or step handler propagates
/// to the caller of `do_step` untouched.
#[derive(Debug, Error)]
pub enum Error {
    /// State buffers passed to a system constructor do not all have the same
    /// length. Carries the constructor name and the offending lengths.
    #[error("state buffer size mismatch in {context}: got lengths {lengths:?}")]
    SizeMismatch {
        context: &'static str,
        lengths: Vec<usize>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_mismatch_display_names_the_constructor() {
        let e = Error::SizeMismatch {
            context: "System::new",
            lengths: vec![3, 2],
        };
        let msg = format!("{e}");
        assert!(msg.contains("System::new"));
        assert!(msg.contains("[3, 2]"));
    }
}
