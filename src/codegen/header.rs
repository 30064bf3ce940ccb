//! C header file generation for resolved configuration tables
//!
//! Generates the config.h content: one definition per defined symbol,
//! followed by the rule catalogue's sanity-check directive blocks.

use std::fmt::Write;

use crate::engine::CATALOGUE;
use crate::error::CodegenError;
use crate::symbols::{ConfigTable, SymbolState, Value};

const GUARD: &str = "__INCLUDE_NUTTX_CONFIG_H";

/// Generate the complete header text for a resolved table.
///
/// Symbols left undefined are omitted. The trailing sanity-check section
/// repeats the catalogue's constraints as conditional directives so that a
/// header assembled by other means is held to the same rules.
pub fn generate_header(table: &ConfigTable) -> Result<String, CodegenError> {
    let mut output = String::new();

    output.push_str("/* config.h -- Autogenerated! Do not edit. */\n\n");
    writeln!(output, "#ifndef {}", GUARD)?;
    writeln!(output, "#define {}", GUARD)?;
    output.push('\n');

    output.push_str("/* Architecture-specific options *************************/\n\n");

    for (name, state) in table.iter() {
        match state {
            SymbolState::DefinedFlag => writeln!(output, "#define {} 1", name)?,
            SymbolState::DefinedValue(Value::Int(value)) => {
                writeln!(output, "#define {} {}", name, value)?
            }
            SymbolState::DefinedValue(Value::Str(value)) => {
                writeln!(output, "#define {} \"{}\"", name, value)?
            }
            SymbolState::DefinedValue(Value::Expr(value)) => {
                writeln!(output, "#define {} {}", name, value)?
            }
            SymbolState::Undefined => {}
        }
    }

    output.push_str("\n/* Sanity Checks *****************************************/\n\n");

    for rule in CATALOGUE {
        push_comment(&mut output, rule.comment);
        output.push_str(rule.directives);
        output.push('\n');
    }

    writeln!(output, "#endif /* {} */", GUARD)?;

    Ok(output)
}

/// Render comment lines as a C block comment followed by a blank line.
/// An empty line inside the text becomes a bare ` *` spacer line.
fn push_comment(output: &mut String, lines: &[&str]) {
    match lines {
        [] => {}
        [line] => {
            output.push_str(&format!("/* {} */\n\n", line));
        }
        [first, rest @ ..] => {
            output.push_str(&format!("/* {}\n", first));
            for line in rest {
                if line.is_empty() {
                    output.push_str(" *\n");
                } else {
                    output.push_str(&format!(" * {}\n", line));
                }
            }
            output.push_str(" */\n\n");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::resolve;
    use crate::loader::parse_config;

    #[test]
    fn test_header_structure() {
        let mut table = parse_config("CONFIG_DEV_CONSOLE=y\n");
        resolve(&mut table);
        let header = generate_header(&table).expect("generation failed");

        assert!(header.starts_with("/* config.h -- Autogenerated! Do not edit. */"));
        assert!(header.contains("#ifndef __INCLUDE_NUTTX_CONFIG_H"));
        assert!(header.contains("#define __INCLUDE_NUTTX_CONFIG_H"));
        assert!(header.contains("/* Architecture-specific options"));
        assert!(header.contains("/* Sanity Checks"));
        assert!(header.ends_with("#endif /* __INCLUDE_NUTTX_CONFIG_H */\n"));
    }

    #[test]
    fn test_definitions_by_value_kind() {
        let mut table = ConfigTable::new();
        table.define("CONFIG_DEV_CONSOLE");
        table.set_int("CONFIG_NFILE_DESCRIPTORS", 8);
        table.set_str("CONFIG_TASK_NAME", "init");
        table.set_expr("CONFIG_RAM_END", "(CONFIG_RAM_START+CONFIG_RAM_SIZE)");

        let header = generate_header(&table).expect("generation failed");

        assert!(header.contains("#define CONFIG_DEV_CONSOLE 1\n"));
        assert!(header.contains("#define CONFIG_NFILE_DESCRIPTORS 8\n"));
        assert!(header.contains("#define CONFIG_TASK_NAME \"init\"\n"));
        assert!(header.contains("#define CONFIG_RAM_END (CONFIG_RAM_START+CONFIG_RAM_SIZE)\n"));
    }

    #[test]
    fn test_undefined_symbols_omitted() {
        let mut table = ConfigTable::new();
        table.define("CONFIG_NET");
        table.undefine("CONFIG_NET");

        let header = generate_header(&table).expect("generation failed");
        assert!(!header.contains("#define CONFIG_NET "));
    }

    #[test]
    fn test_sanity_section_carries_error_directive() {
        let table = ConfigTable::new();
        let header = generate_header(&table).expect("generation failed");

        assert!(header.contains("#if defined(__NXFLAT__) && !defined(CONFIG_NXFLAT)"));
        assert!(header.contains("# error \"NXFLAT support not enabled in this configuration\""));
    }

    #[test]
    fn test_console_block_if_else_shape() {
        let table = ConfigTable::new();
        let header = generate_header(&table).expect("generation failed");

        let if_pos = header
            .find("#if defined(CONFIG_DEV_CONSOLE)")
            .expect("console #if missing");
        let else_pos = header.find("#else").expect("console #else missing");
        assert!(if_pos < else_pos);
        assert!(header.contains("#  undef CONFIG_DEV_LOWCONSOLE"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let mut table = parse_config(
            "CONFIG_NET=y\n\
             CONFIG_NSOCKET_DESCRIPTORS=8\n\
             CONFIG_DEV_CONSOLE=y\n",
        );
        resolve(&mut table);

        let first = generate_header(&table).expect("generation failed");
        let second = generate_header(&table).expect("generation failed");
        assert_eq!(first, second);
    }
}
