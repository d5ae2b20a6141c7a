use phf::phf_map;

/// Keyword table, keyed by the upper-cased word. `AFFICHER` is an alias of
/// `ECRIRE`. The single-letter range keyword `A` is listed here but handled
/// specially by the lexer: only a bare upper-case `A` is the keyword, so
/// `a` stays usable as an identifier.
pub static KEYWORDS: phf::Map<&str, TokenKind> = phf_map! {
    "ALGORITHME" => TokenKind::Algorithme,
    "VARIABLES" => TokenKind::Variables,
    "DEBUT" => TokenKind::Debut,
    "FIN" => TokenKind::Fin,

    "FONCTION" => TokenKind::Fonction,
    "PROCEDURE" => TokenKind::Procedure,
    "RETOURNE" => TokenKind::Retourne,
    "FINFONCTION" => TokenKind::FinFonction,
    "FINPROCEDURE" => TokenKind::FinProcedure,

    "ENTIER" => TokenKind::Entier,
    "REEL" => TokenKind::Reel,
    "TEXTE" => TokenKind::Texte,
    "BOOLEEN" => TokenKind::Booleen,

    "VRAI" => TokenKind::Vrai,
    "FAUX" => TokenKind::Faux,

    "ECRIRE" => TokenKind::Ecrire,
    "AFFICHER" => TokenKind::Ecrire,
    "LIRE" => TokenKind::Lire,

    "SI" => TokenKind::Si,
    "ALORS" => TokenKind::Alors,
    "SINON" => TokenKind::Sinon,
    "FINSI" => TokenKind::FinSi,

    "TANTQUE" => TokenKind::TantQue,
    "FAIRE" => TokenKind::Faire,
    "FINTANTQUE" => TokenKind::FinTantQue,
    "POUR" => TokenKind::Pour,
    "DE" => TokenKind::De,
    "A" => TokenKind::A,
    "FINPOUR" => TokenKind::FinPour,

    "CAS" => TokenKind::Cas,
    "DEFAUT" => TokenKind::Defaut,
    "FINCAS" => TokenKind::FinCas,

    "ET" => TokenKind::Et,
    "OU" => TokenKind::Ou,
    "NON" => TokenKind::Non,
};

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Program structure
    Algorithme,
    Variables,
    Debut,
    Fin,

    // Functions and procedures
    Fonction,
    Procedure,
    Retourne,
    FinFonction,
    FinProcedure,

    // Type names
    Entier,
    Reel,
    Texte,
    Booleen,

    // Boolean literals
    Vrai,
    Faux,

    // I/O
    Ecrire,
    Lire,

    // Conditional
    Si,
    Alors,
    Sinon,
    FinSi,

    // Loops
    TantQue,
    Faire,
    FinTantQue,
    Pour,
    De,
    A,
    FinPour,

    // Switch
    Cas,
    Defaut,
    FinCas,

    // Logical keyword operators
    Et,
    Ou,
    Non,

    // `<-`
    Assign,

    // Arithmetic operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Comparison operators
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    DoubleEqual,
    NotEqual,

    // Punctuation
    OpenParen,
    CloseParen,
    OpenSquareBrace,
    CloseSquareBrace,
    Colon,
    Comma,

    // Literals and identifiers
    Ident(String),
    Num(i64),
    Real(f64),
    Str(String),

    // `\n`, grammatically inert
    Newline,
    Eof,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    /// Human description used in "found ..." halves of syntax errors.
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::Num(_) | TokenKind::Real(_) => format!("number '{}'", self.text),
            TokenKind::Str(s) => format!("string \"{}\"", s),
            TokenKind::Newline => "end of line".to_string(),
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}
