use crate::artifacts::branch::INVALID_BRANCH_NAME_REGEX;
use crate::errors::{RepositoryError, Result};

/// Prefix of branch refs relative to the repository directory
pub const REF_PREFIX: &str = "refs/heads/";

/// Name reserved for HEAD, never usable as a branch
const HEAD_NAME: &str = "HEAD";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: String) -> Result<Self> {
        if name.is_empty() || name == HEAD_NAME {
            return Err(RepositoryError::InvalidBranchName(name));
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .map_err(|_| RepositoryError::corrupt("invalid branch name pattern"))?;

        if re.is_match(&name) {
            Err(RepositoryError::InvalidBranchName(name))
        } else {
            Ok(Self(name))
        }
    }

    /// Parse the branch out of a symbolic ref target such as `refs/heads/main`
    pub fn try_parse_ref_path(ref_path: &str) -> Result<Self> {
        let name = ref_path.strip_prefix(REF_PREFIX).ok_or_else(|| {
            RepositoryError::corrupt(format!(
                "symbolic ref must start with '{REF_PREFIX}', got '{ref_path}'"
            ))
        })?;

        Self::try_parse(name.to_string())
    }

    /// `refs/heads/<name>`
    pub fn to_ref_path(&self) -> String {
        format!("{REF_PREFIX}{}", self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::proptest;

    proptest! {
        #[test]
        fn test_is_valid_branch_name_with_valid_branch_name(
            branch_name in "[a-zA-Z0-9_-]+"
        ) {
            // Valid names: alphanumeric, underscore, hyphen
            if branch_name != HEAD_NAME {
                assert!(BranchName::try_parse(branch_name).is_ok());
            }
        }

        #[test]
        fn test_is_valid_branch_name_with_slashes(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let branch_name = format!("{}/{}", prefix, suffix);
            assert!(BranchName::try_parse(branch_name).is_ok());
        }

        #[test]
        fn test_is_invalid_branch_name_starting_with_dot(
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let branch_name = format!(".{}", suffix);
            assert!(BranchName::try_parse(branch_name).is_err());
        }

        #[test]
        fn test_is_invalid_branch_name_ending_with_lock(
            prefix in "[a-zA-Z0-9_-]+"
        ) {
            let branch_name = format!("{}.lock", prefix);
            assert!(BranchName::try_parse(branch_name).is_err());
        }

        #[test]
        fn test_is_invalid_branch_name_with_consecutive_dots(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let branch_name = format!("{}..{}", prefix, suffix);
            assert!(BranchName::try_parse(branch_name).is_err());
        }

        #[test]
        fn test_is_invalid_branch_name_at_slash_boundaries(
            name in "[a-zA-Z0-9_-]+"
        ) {
            assert!(BranchName::try_parse(format!("/{}", name)).is_err());
            assert!(BranchName::try_parse(format!("{}/", name)).is_err());
        }

        #[test]
        fn test_is_invalid_branch_name_with_special_chars(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+",
            special_char in r"[\*:\?\[\\^~ ]"
        ) {
            let branch_name = format!("{}{}{}", prefix, special_char, suffix);
            assert!(matches!(
                BranchName::try_parse(branch_name),
                Err(RepositoryError::InvalidBranchName(_))
            ));
        }
    }

    #[test]
    fn test_is_invalid_branch_name_empty_or_head() {
        assert!(BranchName::try_parse("".to_string()).is_err());
        assert!(BranchName::try_parse("HEAD".to_string()).is_err());
    }

    #[test]
    fn test_ref_path_round_trip() {
        let name = BranchName::try_parse("feature/login".to_string()).unwrap();

        assert_eq!(name.to_ref_path(), "refs/heads/feature/login");
        assert_eq!(BranchName::try_parse_ref_path(&name.to_ref_path()).unwrap(), name);
    }
}
