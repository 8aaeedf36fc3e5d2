//! Credentials identifying the remote workbook.
//!
//! The credential file holds two whitespace-separated tokens on one line:
//! `<accountId> <spreadsheetId>`.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use tracing::debug;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetCredentials {
    /// Service account the workbook is shared with.
    pub account_id: String,
    /// Identifier of the spreadsheet holding one sheet per source.
    pub spreadsheet_id: String,
}

impl SheetCredentials {
    /// Loads credentials from `path`.
    ///
    /// Fails with [`Error::MalformedConfig`] unless the file holds exactly two tokens.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading sheet credentials");
        let content = fs::read_to_string(path)?;
        parse(&content).map_err(|message| Error::malformed_config(path, message))
    }
}

impl FromStr for SheetCredentials {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s).map_err(|message| Error::malformed_config(PathBuf::new(), message))
    }
}

fn parse(content: &str) -> Result<SheetCredentials, String> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    match tokens.as_slice() {
        [account_id, spreadsheet_id] => Ok(SheetCredentials {
            account_id: account_id.to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
        }),
        _ => Err(format!(
            "must contain credentials in format 'accountId spreadsheetId', found {} token(s)",
            tokens.len()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_tokens() {
        let credentials: SheetCredentials = "robot@example.iam 1AbCdEf\n".parse().unwrap();
        assert_eq!(credentials.account_id, "robot@example.iam");
        assert_eq!(credentials.spreadsheet_id, "1AbCdEf");
    }

    #[test]
    fn test_rejects_wrong_token_count() {
        for content in ["", "only-one", "one two three"] {
            let error = content.parse::<SheetCredentials>().unwrap_err();
            assert!(matches!(error, Error::MalformedConfig { .. }), "{content:?}");
        }
    }

    #[test]
    fn test_from_file_reports_path() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("google-storage.config");
        fs::write(&path, "just-the-account").unwrap();

        let error = SheetCredentials::from_file(&path).unwrap_err();
        match error {
            Error::MalformedConfig { path: reported, message } => {
                assert_eq!(reported, path);
                assert!(message.contains("found 1 token(s)"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_file_missing_is_io_error() {
        let error = SheetCredentials::from_file("/definitely/not/here.config").unwrap_err();
        assert!(matches!(error, Error::Io(_)));
    }
}
