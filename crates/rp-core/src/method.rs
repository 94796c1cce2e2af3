//! Case-insensitive parsing of correlation method names.

use crate::{PvtError, PvtResult};

/// Look `input` up in `names`, ignoring case, spaces, `_` and `-`.
///
/// Each entry of `names` must already be normalized (upper case, no
/// separators). `what` names the selector in the error message.
pub fn parse_method<T: Copy>(input: &str, what: &str, names: &[(&str, T)]) -> PvtResult<T> {
    let key: String = input
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .map(|c| c.to_ascii_uppercase())
        .collect();
    names
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, method)| *method)
        .ok_or_else(|| PvtError::configuration(format!("unknown {what} '{input}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FailureKind;

    const NAMES: &[(&str, u8)] = &[("DAK", 1), ("HY", 2), ("HALLYARBOROUGH", 2)];

    #[test]
    fn ignores_case_and_separators() {
        assert_eq!(parse_method("dak", "z-factor method", NAMES).unwrap(), 1);
        assert_eq!(parse_method(" Hall_Yarborough", "z-factor method", NAMES).unwrap(), 2);
    }

    #[test]
    fn unknown_name_is_configuration_error() {
        let err = parse_method("SRK", "z-factor method", NAMES).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Configuration);
        assert!(err.to_string().contains("SRK"));
    }
}
