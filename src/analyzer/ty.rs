use std::fmt;

/// The four declarable types. Arithmetic promotes Entier to Reel; nothing
/// else converts implicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ty {
    Entier,
    Reel,
    Texte,
    Booleen,
}

impl Ty {
    pub fn is_numeric(self) -> bool {
        matches!(self, Ty::Entier | Ty::Reel)
    }

    /// Python literal a declared local of this type starts out as.
    pub fn zero_literal(self) -> &'static str {
        match self {
            Ty::Entier => "0",
            Ty::Reel => "0.0",
            Ty::Texte => "\"\"",
            Ty::Booleen => "False",
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Ty::Entier => "ENTIER",
            Ty::Reel => "REEL",
            Ty::Texte => "TEXTE",
            Ty::Booleen => "BOOLEEN",
        };
        write!(f, "{}", name)
    }
}
