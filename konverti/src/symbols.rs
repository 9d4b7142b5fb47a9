//! Maps from strings to (shared) symbols.

use crate::error::SymbolsError as Error;
use crate::symbol::{Owned, Symbol};
use fnv::FnvHashMap;
use nested_modules::Context;

/// Map from strings to (shared) symbols.
#[derive(Default)]
pub struct Symbols {
    ctx: Context<String, FnvHashMap<String, Symbol>>,
    /// path of the module currently open
    path: Vec<String>,
}

impl Symbols {
    pub fn new() -> Self {
        Default::default()
    }

    /// Resolve a name in a module path to a previously inserted symbol.
    pub fn get(&self, path: &[String], name: &str) -> Option<Symbol> {
        self.ctx
            .find(path)
            .filter_map(|module| module.data.get(name))
            .next()
            .cloned()
    }

    /// Insert a new name into the currently open module.
    pub fn insert(&mut self, name: String) -> Result<Symbol, Error> {
        let sym = Symbol::new(Owned::new(self.path.clone(), name.clone()));
        // `insert` returns the previous symbol if the name is not new
        if self.ctx.get_mut().data.insert(name, sym.clone()).is_some() {
            return Err(Error::Reinsertion);
        }
        Ok(sym)
    }

    /// Close all open modules and open the modules of the given path.
    pub fn set_path(&mut self, path: Vec<String>) {
        while self.ctx.close() {}
        path.iter().for_each(|p| self.ctx.open_or_default(p.clone()));
        self.path = path;
    }
}

/// Collect names into a fresh symbol table. Used for testing.
impl<'a> core::iter::FromIterator<&'a str> for Symbols {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut syms = Self::new();
        iter.into_iter().for_each(|name| {
            syms.insert(name.to_string()).unwrap();
        });
        syms
    }
}
