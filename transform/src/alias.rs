//! Canonical display names for counterparties.
//!
//! The table is a fixed, human-curated many-to-one mapping loaded once at
//! startup; resolution never fails, it just passes unrecognized names
//! through.

use std::collections::HashMap;

use tracing::warn;

/// The curated consolidation table shipped with the crate. Aliases come
/// straight from observed extractor output, including its misspellings
/// and one full-sentence "best guess" the model produced.
const CURATED_MAPPING: &[(&str, &[&str])] = &[
    ("Al Seckel", &["al seckel"]),
    ("Alan Dershowitz", &["Alan M. Dershowitz"]),
    ("Alireza Ittihadieh", &["Alireza ITTIHADIEH"]),
    ("Anas Alrasheed", &["anasalrasheed"]),
    ("Anil Ambani", &["anil.ambani", "Anil.Ambani"]),
    (
        "Barbro C. Ehnbom",
        &["Barbro C Ehnbo", "Barbro C Ehnbom", "BARBRO EHNBOM", "Barbro Ehnbom"],
    ),
    ("Barry J. Cohen", &["Barry"]),
    ("Boris Nikolic", &["boris", "Boris Nikolic (bgC3)"]),
    ("Brad S Karp", &["Karp, Brad S"]),
    ("Darren K. Indyke", &["Darren Indyke"]),
    ("David Schoen", &["David I. Schoen", "DAVID SCHOEN"]),
    ("Deepak Chopra", &["drsra"]),
    ("Ehud Barak", &["ehbarak", "ehud barak"]),
    ("Faith Kates", &["Faith Kate"]),
    ("Gerald G. Barton", &["Gerald Barton"]),
    ("Ghislaine Maxwell", &["G Maxwell", "GMAX", "Gmax", "gmax"]),
    ("Gwendolyn Beck", &["Gwendolyn"]),
    ("Alan S. Halperin", &["Halperin, Alan S", "Dlugash, Alan"]),
    ("Heather Mann", &["Heather"]),
    ("Jack Lang", &["Jack LANG"]),
    ("Jean Huguen", &["jean", "jean.huguen"]),
    (
        "Jeffrey Epstein",
        &[
            "Jeffrey",
            "jeffrey E.",
            "jeffrey epstein",
            "Jeffrey epstein",
            "jeffrey Epstein",
            "Jeff",
            "jeffreyepsteinorg@gmail.com",
        ],
    ),
    ("Jeannine Jeskewitz", &["Jeskewitz, Jeannine"]),
    ("Joichi Ito", &["Joi Ito", "Joi"]),
    ("Jonathan Farkas", &["JONATHAN FARKAS"]),
    ("Joscha Bach", &["Joscha"]),
    ("Kathy Ruemmler", &["Kathy Ruemmle", "Kathryn H. Ruemmler", "Kathy"]),
    ("Ken Starr", &["ken", "Ken", "Starr, Ken"]),
    ("Kirsty MacKenzie", &["Kirsty Mackenzie"]),
    (
        "Landon Thomas Jr.",
        &["Landon Thomas, Jr.", "Landon Thomas", "Thomas Jr., Landon", "Thomas Jr.", "Landon"],
    ),
    ("Larry Summers", &["Lawrence H. Summers", "Lawrence Summers", "LHS", "Larry"]),
    ("Larry Visoski", &["Lawrance Visoski"]),
    ("Lawrence M. Krauss", &["Lawrence Krauss"]),
    ("Leon Black", &["leon black", "Leon"]),
    ("Leslie Wexner", &["Les Wexner"]),
    ("Lilly Ann Sanchez", &["Lilly Sanchez"]),
    ("Linda Pinto", &["Linda PINTO"]),
    (
        "Mark L. Epstein",
        &["Based on the email thread, the recipient is Mark L. Epstein."],
    ),
    ("Martin G. Weinberg", &["Martin Weinberg", "Martin weinberg", "Martin Weinberg Esq"]),
    ("Masha Drokova", &["masha"]),
    ("Melanie Walker", &["Melanie Walker, MD", "Melanie"]),
    ("Michael Miller", &["Miller, Michael"]),
    ("Miroslav Lajčák", &["Lajcak Miroslav/MINISTER/MZV"]),
    ("Mohamed Waheed Hassan", &["Mohamed Waheed", "Mohammed Waheed Hassan", "Waheed"]),
    ("Nadia Marcinkova", &["Nadia"]),
    ("Nav Gupta", &["Nav"]),
    ("Neal Kassell", &["Neal"]),
    ("Nicholas Ribis", &["nicholas.ribis"]),
    ("Noam Chomsky", &["Noam"]),
    ("OLIVIER COLOM", &["COLOM, Olivier"]),
    ("Paul Morris", &["Morris, Paul V"]),
    ("Peggy Siegal", &["Peggy"]),
    ("Peter Mandelson", &["PETER MANDELSON", "Peter Mandelson BT", "Peter Mandelson, BT"]),
    ("Redacted", &["[Redacted]", "[REDACTED]", "REDACTED", "redacted"]),
    ("Reid Hoffman", &["Reid"]),
    ("Renata Bolotova", &["Renata B"]),
    ("Robert Lawrence Kuhn", &["Robert Kuhn", "Robert L. Kuhn"]),
    ("Soon-Yi Previn", &["Soon-Yi", "soon yi previn", "Soon-Yi Previn or Woody Allen"]),
    ("Stephen Hanson", &["Steve Hanson"]),
    ("Caroline Lang", &["Lang, Caroline"]),
    ("Amanda Ens", &["Ens, Amanda"]),
    ("Tom Pritzker", &["Pritzker, Tom"]),
    ("Reid Weingarten", &["Weingarten, Reid", "Weingarten"]),
    ("Martin A. Nowak", &["Nowak, Martin A.", "Martin Nowak"]),
    ("David Haig", &["Haig, David"]),
    ("Alex Yablon", &["Yablon, Alex"]),
    ("Ed Boyden", &["Ed"]),
    (
        "Flipboard",
        &[
            "Flipboard 10 for Today",
            "Flipboard Photo Desk",
            "Flipboard Week in Review",
            "Flipboard, Inc.",
        ],
    ),
];

/// Many-to-one alias table with a lowercase reverse index built once.
#[derive(Debug, Clone)]
pub struct AliasTable {
    reverse: HashMap<String, String>,
}

impl AliasTable {
    /// Build a table from (canonical name, aliases) pairs.
    ///
    /// An alias registered under two different canonical names keeps the
    /// last registration and is reported, since a silent collision would
    /// quietly reroute a contact's history.
    pub fn new<I, A>(mapping: I) -> Self
    where
        I: IntoIterator<Item = (String, A)>,
        A: IntoIterator<Item = String>,
    {
        let mut reverse = HashMap::new();
        for (canonical, aliases) in mapping {
            for alias in aliases {
                let key = alias.trim().to_lowercase();
                if let Some(previous) = reverse.insert(key, canonical.clone()) {
                    if previous != canonical {
                        warn!(
                            alias = %alias,
                            previous = %previous,
                            canonical = %canonical,
                            "alias registered under two canonical names, keeping the latter"
                        );
                    }
                }
            }
        }
        Self { reverse }
    }

    /// Resolve a free-text name to its canonical display name.
    ///
    /// Lookup is case-insensitive on a trimmed copy of the input; a miss
    /// returns the input unchanged, original case and spacing included.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        if name.is_empty() {
            return name;
        }
        match self.reverse.get(&name.trim().to_lowercase()) {
            Some(canonical) => canonical.as_str(),
            None => name,
        }
    }

    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }
}

/// The curated table shipped with the crate.
impl Default for AliasTable {
    fn default() -> Self {
        Self::new(CURATED_MAPPING.iter().map(|(canonical, aliases)| {
            (
                (*canonical).to_string(),
                aliases.iter().map(|alias| (*alias).to_string()),
            )
        }))
    }
}
