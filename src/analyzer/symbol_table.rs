use std::collections::HashMap;

use super::Ty;

#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub ty: Ty,
    pub line: usize,
}

/// One scope's worth of name → type bindings. The analyzer owns one
/// instance for the global scope and one short-lived instance per function.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            symbols: HashMap::new(),
        }
    }

    /// Registers `name`, rejecting duplicates within this table instance.
    pub fn declare(&mut self, name: &str, ty: Ty, line: usize) -> Result<(), String> {
        if let Some(existing) = self.symbols.get(name) {
            return Err(format!(
                "variable '{}' is already declared (first declaration at line {})",
                name, existing.line
            ));
        }
        self.symbols.insert(
            name.to_string(),
            Symbol {
                name: name.to_string(),
                ty,
                line,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
