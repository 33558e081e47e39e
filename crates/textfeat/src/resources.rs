use std::{fs, path::Path};

use tracing::debug;

use crate::{Error, Result, config::ResourcePaths};

/// Reads a newline-delimited list, trimming each line and skipping blank ones.
pub fn load_list(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let list = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect::<Vec<_>>();
    debug!(path = %path.display(), entries = list.len(), "Loaded list");
    Ok(list)
}

/// Static word lists loaded alongside an extractor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceLists {
    pub sentence_symbols: Vec<String>,
    pub stop_words: Vec<String>,
}

impl ResourceLists {
    /// Loads every configured list; unset paths yield empty lists.
    pub fn load(paths: &ResourcePaths) -> Result<Self> {
        let load_opt = |path: Option<&Path>| path.map_or_else(|| Ok(Vec::new()), load_list);
        Ok(Self {
            sentence_symbols: load_opt(paths.sentence_symbols.as_deref())?,
            stop_words: load_opt(paths.stop_words.as_deref())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_load_list_trims_and_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stop_words.txt");
        fs::write(&path, "the\n  a \n\nand\r\n").unwrap();
        assert_eq!(load_list(&path).unwrap(), vec!["the", "a", "and"]);
    }

    #[test]
    fn test_missing_list_is_not_found() {
        let err = load_list(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_resource_lists_default_to_empty() {
        let lists = ResourceLists::load(&ResourcePaths::default()).unwrap();
        assert_eq!(lists, ResourceLists::default());
    }

    #[test]
    fn test_resource_lists_load_both() {
        let dir = tempfile::tempdir().unwrap();
        let symbols = dir.path().join("sentence_symbol.txt");
        let stops = dir.path().join("stop_words.txt");
        fs::write(&symbols, "。\n！\n").unwrap();
        fs::write(&stops, "of\n").unwrap();
        let paths = ResourcePaths {
            sentence_symbols: Some(symbols),
            stop_words: Some(PathBuf::from(&stops)),
        };
        let lists = ResourceLists::load(&paths).unwrap();
        assert_eq!(lists.sentence_symbols, vec!["。", "！"]);
        assert_eq!(lists.stop_words, vec!["of"]);
    }
}
