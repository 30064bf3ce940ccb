//! Raw configuration loader
//!
//! Parses the line-oriented `NAME=VALUE` configuration file into a symbol
//! table. Lines are independent; a later duplicate overrides an earlier one.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MkconfigError;
use crate::symbols::ConfigTable;

/// Fixed configuration file name inside the board directory
pub const DEFCONFIG: &str = ".config";

/// Build the path to the configuration file inside `dir`
pub fn config_file_path(dir: &Path) -> Result<PathBuf, MkconfigError> {
    if dir.as_os_str().is_empty() {
        return Err(MkconfigError::Path(
            "empty configuration directory path".to_string(),
        ));
    }
    Ok(dir.join(DEFCONFIG))
}

/// Load and parse the configuration file found in `dir`
pub fn load_config(dir: &Path) -> Result<ConfigTable, MkconfigError> {
    let path = config_file_path(dir)?;
    let text = fs::read_to_string(&path).map_err(|source| MkconfigError::Open {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_config(&text))
}

/// Parse configuration text into a symbol table.
///
/// `NAME` alone or `NAME=y` defines a flag; `NAME=` and `NAME=n` undefine the
/// symbol, revoking any earlier line for the same name. Any other value is
/// classified as an integer, a quoted string, or a raw expression. `#` comment
/// lines and blank lines are skipped. Nothing here is validated; garbage
/// values are carried through untouched.
pub fn parse_config(text: &str) -> ConfigTable {
    let mut table = ConfigTable::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.split_once('=') {
            None => table.define(line),
            Some((name, value)) => {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                match value.trim() {
                    "" | "n" => table.undefine(name),
                    "y" => table.define(name),
                    raw => set_literal(&mut table, name, raw),
                }
            }
        }
    }

    table
}

fn set_literal(table: &mut ConfigTable, name: &str, raw: &str) {
    if let Ok(value) = raw.parse::<i64>() {
        table.set_int(name, value);
    } else if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        table.set_str(name, &raw[1..raw.len() - 1]);
    } else {
        table.set_expr(name, raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{SymbolState, Value};

    #[test]
    fn test_parse_flags_and_values() {
        let table = parse_config(
            "CONFIG_DEV_CONSOLE=y\n\
             CONFIG_NFILE_DESCRIPTORS=8\n\
             CONFIG_TASK_NAME=\"init\"\n\
             CONFIG_RAM_END=(CONFIG_RAM_START+CONFIG_RAM_SIZE)\n\
             CONFIG_BARE_FLAG\n",
        );

        assert_eq!(table.get("CONFIG_DEV_CONSOLE"), &SymbolState::DefinedFlag);
        assert_eq!(
            table.get("CONFIG_NFILE_DESCRIPTORS"),
            &SymbolState::DefinedValue(Value::Int(8))
        );
        assert_eq!(
            table.get("CONFIG_TASK_NAME"),
            &SymbolState::DefinedValue(Value::Str("init".to_string()))
        );
        assert_eq!(
            table.get("CONFIG_RAM_END"),
            &SymbolState::DefinedValue(Value::Expr(
                "(CONFIG_RAM_START+CONFIG_RAM_SIZE)".to_string()
            ))
        );
        assert_eq!(table.get("CONFIG_BARE_FLAG"), &SymbolState::DefinedFlag);
    }

    #[test]
    fn test_n_and_empty_undefine() {
        let table = parse_config(
            "CONFIG_NET=y\n\
             CONFIG_NET=n\n\
             CONFIG_ELF=y\n\
             CONFIG_ELF=\n",
        );

        assert!(!table.is_defined("CONFIG_NET"));
        assert!(!table.is_defined("CONFIG_ELF"));
    }

    #[test]
    fn test_later_duplicate_overrides() {
        let table = parse_config(
            "CONFIG_RR_INTERVAL=100\n\
             CONFIG_RR_INTERVAL=200\n",
        );

        assert_eq!(
            table.get("CONFIG_RR_INTERVAL"),
            &SymbolState::DefinedValue(Value::Int(200))
        );
    }

    #[test]
    fn test_comments_and_blanks_skipped() {
        let table = parse_config(
            "# CONFIG_NET is not set\n\
             \n\
             CONFIG_DEBUG=y\n",
        );

        assert_eq!(table.len(), 1);
        assert!(table.is_defined("CONFIG_DEBUG"));
        assert!(!table.is_defined("CONFIG_NET"));
    }

    #[test]
    fn test_negative_integer_value() {
        let table = parse_config("CONFIG_NSOCKET_DESCRIPTORS=-1\n");
        assert_eq!(
            table.get("CONFIG_NSOCKET_DESCRIPTORS"),
            &SymbolState::DefinedValue(Value::Int(-1))
        );
    }

    #[test]
    fn test_config_file_path() {
        let path = config_file_path(Path::new("/boards/demo")).unwrap();
        assert_eq!(path, PathBuf::from("/boards/demo/.config"));

        let err = config_file_path(Path::new("")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
