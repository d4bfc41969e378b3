//! Deterministic business name generation using curated word lists.
//!
//! Names are unique for the lifetime of a `NameGenerator`: the used-name
//! set is owned by the generator value, so separate runs (and tests) never
//! share state. All generation is deterministic (same RNG seed = same names).

use crate::{
    error::{GenError, GenResult},
    rng::GenRng,
};
use std::collections::HashSet;

/// Random template attempts before falling back to a numeric suffix.
pub const MAX_TEMPLATE_ATTEMPTS: usize = 64;
/// Highest numeric suffix tried before giving up.
pub const MAX_NUMERIC_SUFFIX: usize = 10_000;

/// Word lists the templates draw from.
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub first_names: Vec<&'static str>,
    pub last_names: Vec<&'static str>,
    pub prefixes: Vec<&'static str>,
    pub suffixes: Vec<&'static str>,
    pub business_types: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Template {
    LastSuffix,
    PrefixType,
    FirstType,
    LastTypeSuffix,
    PrefixFirstSuffix,
}

const TEMPLATES: [Template; 5] = [
    Template::LastSuffix,
    Template::PrefixType,
    Template::FirstType,
    Template::LastTypeSuffix,
    Template::PrefixFirstSuffix,
];

pub struct NameGenerator {
    lexicon: Lexicon,
    used: HashSet<String>,
    max_attempts: usize,
    max_suffix: usize,
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::with_lexicon(Lexicon::builtin())
    }

    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        Self {
            lexicon,
            used: HashSet::new(),
            max_attempts: MAX_TEMPLATE_ATTEMPTS,
            max_suffix: MAX_NUMERIC_SUFFIX,
        }
    }

    pub fn with_limits(mut self, max_attempts: usize, max_suffix: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.max_suffix = max_suffix;
        self
    }

    /// Number of names handed out so far.
    pub fn issued(&self) -> usize {
        self.used.len()
    }

    /// Generate a business name not returned before by this generator.
    ///
    /// Retries template + fill up to the attempt limit, then appends a
    /// counter (`"Sharma Traders 2"`) to the last candidate. Errors only if
    /// every counter value is taken as well.
    pub fn generate_business_name(&mut self, rng: &mut GenRng) -> GenResult<String> {
        let mut candidate = String::new();
        for _ in 0..self.max_attempts {
            candidate = self.fill_template(rng);
            if self.used.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }

        log::debug!("name retries exhausted for '{candidate}', falling back to numeric suffix");
        for n in 2..=self.max_suffix {
            let numbered = format!("{candidate} {n}");
            if self.used.insert(numbered.clone()) {
                return Ok(numbered);
            }
        }

        log::warn!("business name space exhausted after {} names", self.used.len());
        Err(GenError::NameSpaceExhausted {
            attempts: self.max_attempts + self.max_suffix.saturating_sub(1),
        })
    }

    fn fill_template(&self, rng: &mut GenRng) -> String {
        let lex = &self.lexicon;
        match *rng.pick(&TEMPLATES) {
            Template::LastSuffix => {
                format!("{} {}", rng.pick(&lex.last_names), rng.pick(&lex.suffixes))
            }
            Template::PrefixType => {
                format!("{} {}", rng.pick(&lex.prefixes), rng.pick(&lex.business_types))
            }
            Template::FirstType => {
                format!("{} {}", rng.pick(&lex.first_names), rng.pick(&lex.business_types))
            }
            Template::LastTypeSuffix => format!(
                "{} {} {}",
                rng.pick(&lex.last_names),
                rng.pick(&lex.business_types),
                rng.pick(&lex.suffixes)
            ),
            Template::PrefixFirstSuffix => format!(
                "{} {} {}",
                rng.pick(&lex.prefixes),
                rng.pick(&lex.first_names),
                rng.pick(&lex.suffixes)
            ),
        }
    }
}

impl Lexicon {
    pub fn builtin() -> Self {
        Self {
            first_names: vec![
                "Aarav", "Vivaan", "Aditya", "Arjun", "Sai", "Reyansh", "Krishna", "Ishaan",
                "Rohan", "Rahul", "Amit", "Suresh", "Ramesh", "Mahesh", "Rajesh", "Vikram",
                "Sanjay", "Anil", "Deepak", "Manoj", "Ravi", "Sunil", "Gopal", "Harish",
                "Imran", "Faisal", "Gurpreet", "Harpreet", "Joseph", "Thomas",
                "Ananya", "Diya", "Priya", "Pooja", "Neha", "Kavya", "Sneha", "Anjali",
                "Lakshmi", "Meena", "Sunita", "Geeta", "Rekha", "Shalini", "Nisha", "Divya",
                "Fatima", "Ayesha", "Simran", "Mary",
            ],
            last_names: vec![
                "Sharma", "Verma", "Gupta", "Agarwal", "Jain", "Patel", "Shah", "Mehta",
                "Singh", "Kumar", "Yadav", "Reddy", "Rao", "Naidu", "Iyer", "Iyengar",
                "Nair", "Menon", "Pillai", "Das", "Ghosh", "Banerjee", "Chatterjee", "Mukherjee",
                "Bose", "Sen", "Khan", "Sheikh", "Qureshi", "Ansari", "Gill", "Sandhu",
                "Dhillon", "Joshi", "Kulkarni", "Deshpande", "Patil", "Pawar", "Chauhan", "Rathore",
                "Malhotra", "Kapoor", "Khanna", "Bhatia", "Sethi", "Mishra", "Tiwari", "Pandey",
                "Dubey", "Srivastava", "Saxena", "Goyal", "Bansal", "Mittal", "Chaudhary", "Thakur",
                "Fernandes", "D'Souza", "Kamath", "Hegde",
            ],
            prefixes: vec![
                "Shree", "Sri", "New", "Royal", "Om", "Jai", "Maa", "Krishna",
                "Ganesh", "Balaji", "Laxmi", "Sai", "Star", "Galaxy", "Metro", "City",
                "Modern", "Classic", "Golden", "National",
            ],
            suffixes: vec![
                "Traders", "Enterprises", "& Sons", "Stores", "Mart", "Brothers",
                "Agencies", "Corporation", "Emporium", "Bhandar",
            ],
            business_types: vec![
                "Kirana", "General Store", "Medicals", "Electronics", "Sweets", "Textiles",
                "Hardware", "Mobiles", "Bakery", "Dhaba", "Salon", "Auto Works",
                "Provisions", "Fashions", "Opticals",
            ],
        }
    }
}
