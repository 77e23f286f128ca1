//! Stage name lookup.

use crate::errors::UnknownStageError;

/// Returns the position of `name` in `stages`.
///
/// An unknown name is a hard error.
pub fn locate_stage<S: AsRef<str>>(stages: &[S], name: &str) -> Result<usize, UnknownStageError> {
    stages
        .iter()
        .position(|stage| stage.as_ref() == name)
        .ok_or_else(|| {
            UnknownStageError::new(
                name,
                stages.iter().map(|s| s.as_ref().to_string()).collect(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_first_match() {
        let stages = ["load", "detect", "detect", "characterize"];
        assert_eq!(locate_stage(&stages, "load").unwrap(), 0);
        assert_eq!(locate_stage(&stages, "detect").unwrap(), 1);
        assert_eq!(locate_stage(&stages, "characterize").unwrap(), 3);
    }

    #[test]
    fn test_unknown_stage_is_error() {
        let stages = vec!["load".to_string(), "detect".to_string()];
        let err = locate_stage(&stages, "detct").unwrap_err();
        assert_eq!(err.stage, "detct");
        assert_eq!(err.known, vec!["load", "detect"]);
    }
}
