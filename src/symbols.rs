//! Symbol table for configuration options

use std::collections::BTreeMap;

/// Literal carried by a symbol that is defined with an explicit value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Decimal integer literal
    Int(i64),
    /// Quoted string literal (stored without the surrounding quotes)
    Str(String),
    /// Raw preprocessor expression or bare identifier, kept verbatim
    Expr(String),
}

/// State of a configuration symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolState {
    /// Symbol is undefined
    Undefined,
    /// Symbol is defined with no explicit value (boolean true)
    DefinedFlag,
    /// Symbol is defined with a literal value
    DefinedValue(Value),
}

impl SymbolState {
    /// Check if the symbol is defined (regardless of value)
    pub fn is_defined(&self) -> bool {
        !matches!(self, SymbolState::Undefined)
    }
}

/// Symbol table mapping configuration names to their state
///
/// Lookup of an unknown name yields `Undefined`, never an error. Entries are
/// kept in sorted name order so that iteration is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigTable {
    symbols: BTreeMap<String, SymbolState>,
}

impl ConfigTable {
    /// Create a new empty symbol table
    pub fn new() -> Self {
        Self {
            symbols: BTreeMap::new(),
        }
    }

    /// Number of defined symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check whether no symbols are defined
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Get the state of a symbol
    pub fn get(&self, name: &str) -> &SymbolState {
        static UNDEFINED: SymbolState = SymbolState::Undefined;
        self.symbols.get(name).unwrap_or(&UNDEFINED)
    }

    /// Check if a symbol is defined
    pub fn is_defined(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Define a symbol as a bare flag
    pub fn define(&mut self, name: &str) {
        self.symbols
            .insert(name.to_string(), SymbolState::DefinedFlag);
    }

    /// Undefine a symbol
    pub fn undefine(&mut self, name: &str) {
        self.symbols.remove(name);
    }

    /// Define a symbol with a literal value
    pub fn set_value(&mut self, name: &str, value: Value) {
        self.symbols
            .insert(name.to_string(), SymbolState::DefinedValue(value));
    }

    /// Define a symbol with an integer value
    pub fn set_int(&mut self, name: &str, value: i64) {
        self.set_value(name, Value::Int(value));
    }

    /// Define a symbol with a string value (unquoted form)
    pub fn set_str(&mut self, name: &str, value: &str) {
        self.set_value(name, Value::Str(value.to_string()));
    }

    /// Define a symbol with a raw expression value
    pub fn set_expr(&mut self, name: &str, value: &str) {
        self.set_value(name, Value::Expr(value.to_string()));
    }

    /// Value of the symbol as the C preprocessor sees it inside an `#if`:
    /// an undefined name evaluates to 0, a bare flag macro expands to 1, and
    /// an integer value is itself. String and expression values have no
    /// numeric reading and yield `None`.
    pub fn numeric(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            SymbolState::Undefined => Some(0),
            SymbolState::DefinedFlag => Some(1),
            SymbolState::DefinedValue(Value::Int(v)) => Some(*v),
            SymbolState::DefinedValue(_) => None,
        }
    }

    /// True when the symbol is defined and numerically at least `n`.
    /// Undefined symbols and non-numeric values compare false.
    pub fn is_defined_and_at_least(&self, name: &str, n: i64) -> bool {
        self.is_defined(name) && self.numeric(name).map_or(false, |v| v >= n)
    }

    /// True when the symbol is defined and numerically at most `n`.
    /// Undefined symbols and non-numeric values compare false.
    pub fn is_defined_and_at_most(&self, name: &str, n: i64) -> bool {
        self.is_defined(name) && self.numeric(name).map_or(false, |v| v <= n)
    }

    /// Iterate over all defined symbols in sorted name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolState)> {
        self.symbols.iter().map(|(name, state)| (name.as_str(), state))
    }
}
