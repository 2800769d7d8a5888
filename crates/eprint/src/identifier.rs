//! Article identifiers and version references

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EprintError, Result};

/// Stable identifier of an article, constant across its versions
///
/// Both new-style (`0704.0001`) and old-style (`math/0309136`) identifiers
/// are accepted. Validation is deliberately light: the archive's identifier
/// scheme has grown over decades, so only clearly malformed input is
/// rejected here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(String);

impl ArticleId {
    /// Validate and wrap a raw identifier
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(EprintError::InvalidIdentifier {
                raw,
                reason: "identifier is empty".to_string(),
            });
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(EprintError::InvalidIdentifier {
                raw,
                reason: "identifier contains whitespace".to_string(),
            });
        }
        if raw.starts_with('/') || raw.ends_with('/') {
            return Err(EprintError::InvalidIdentifier {
                raw,
                reason: "identifier has a leading or trailing slash".to_string(),
            });
        }
        Ok(ArticleId(raw))
    }

    /// Split an abs-page style `{id}vN` string into the identifier and the
    /// optional explicit version
    ///
    /// A trailing `v` followed only by digits is treated as a version
    /// suffix; anything else is part of the identifier (old-style archive
    /// names such as `solv-int` contain a `v` of their own).
    pub fn parse_with_version(raw: &str) -> Result<(ArticleId, Option<u32>)> {
        if let Some(pos) = raw.rfind('v') {
            let head = &raw[..pos];
            let digits = &raw[pos + 1..];
            if !head.is_empty() && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
            {
                let version: u32 =
                    digits
                        .parse()
                        .map_err(|_| EprintError::InvalidIdentifier {
                            raw: raw.to_string(),
                            reason: "version suffix out of range".to_string(),
                        })?;
                if version == 0 {
                    return Err(EprintError::InvalidVersion {
                        article_id: head.to_string(),
                        version,
                        reason: "versions start at 1".to_string(),
                    });
                }
                return Ok((ArticleId::new(head)?, Some(version)));
            }
        }
        Ok((ArticleId::new(raw)?, None))
    }
}

impl AsRef<str> for ArticleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ArticleId {
    type Err = EprintError;

    fn from_str(s: &str) -> Result<Self> {
        ArticleId::new(s)
    }
}

/// One version of one article, together with the most recent version known
/// for it
///
/// Immutable once constructed; the constructor enforces that versions start
/// at 1 and that `highest_version` is never below `version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleVersionRef {
    article_id: ArticleId,
    version: u32,
    highest_version: u32,
}

impl ArticleVersionRef {
    /// Validate and build a version reference
    pub fn new(article_id: ArticleId, version: u32, highest_version: u32) -> Result<Self> {
        if version == 0 {
            return Err(EprintError::InvalidVersion {
                article_id: article_id.to_string(),
                version,
                reason: "versions start at 1".to_string(),
            });
        }
        if highest_version < version {
            return Err(EprintError::InvalidVersion {
                article_id: article_id.to_string(),
                version: highest_version,
                reason: format!("highest version below requested version {version}"),
            });
        }
        Ok(Self {
            article_id,
            version,
            highest_version,
        })
    }

    pub fn article_id(&self) -> &ArticleId {
        &self.article_id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn highest_version(&self) -> u32 {
        self.highest_version
    }

    /// Whether this reference names the most recent known version
    pub fn is_latest(&self) -> bool {
        self.version == self.highest_version
    }

    /// The `{id}v{n}` form used in page URLs and logs
    pub fn id_with_version(&self) -> String {
        format!("{}v{}", self.article_id, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_style_identifier() {
        let id = ArticleId::new("0704.0001").unwrap();
        assert_eq!(id.as_ref(), "0704.0001");
    }

    #[test]
    fn test_old_style_identifier() {
        let id = ArticleId::new("math/0309136").unwrap();
        assert_eq!(id.to_string(), "math/0309136");
    }

    #[test]
    fn test_rejects_malformed_identifiers() {
        assert!(ArticleId::new("").is_err());
        assert!(ArticleId::new("0704 .0001").is_err());
        assert!(ArticleId::new("/math/0309136").is_err());
        assert!(ArticleId::new("math/0309136/").is_err());
    }

    #[test]
    fn test_parse_with_version_suffix() {
        let (id, version) = ArticleId::parse_with_version("0704.0001v2").unwrap();
        assert_eq!(id.as_ref(), "0704.0001");
        assert_eq!(version, Some(2));
    }

    #[test]
    fn test_parse_without_version_suffix() {
        let (id, version) = ArticleId::parse_with_version("math/0309136").unwrap();
        assert_eq!(id.as_ref(), "math/0309136");
        assert_eq!(version, None);
    }

    #[test]
    fn test_parse_keeps_archive_names_containing_v() {
        // "solv-int" ends in neither a bare v nor a digit suffix
        let (id, version) = ArticleId::parse_with_version("solv-int/9701001").unwrap();
        assert_eq!(id.as_ref(), "solv-int/9701001");
        assert_eq!(version, None);
    }

    #[test]
    fn test_parse_rejects_version_zero() {
        let err = ArticleId::parse_with_version("0704.0001v0").unwrap_err();
        assert!(matches!(err, EprintError::InvalidVersion { version: 0, .. }));
    }

    #[test]
    fn test_version_ref_validation() {
        let id = ArticleId::new("0704.0001").unwrap();
        assert!(ArticleVersionRef::new(id.clone(), 0, 1).is_err());
        assert!(ArticleVersionRef::new(id.clone(), 3, 2).is_err());

        let article = ArticleVersionRef::new(id, 2, 3).unwrap();
        assert_eq!(article.version(), 2);
        assert_eq!(article.highest_version(), 3);
        assert!(!article.is_latest());
        assert_eq!(article.id_with_version(), "0704.0001v2");
    }
}
