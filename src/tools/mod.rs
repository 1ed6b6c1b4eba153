//! Legal-assistant tool capability.
//!
//! One capability, two transport bindings: the REST routes in `main` and the
//! JSON-RPC dispatcher in [`rpc`]. Lookups are static-dictionary filters;
//! the clause summarizer and precedent search are curated stand-ins, not
//! real legal analysis.

pub mod rpc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A glossary term with its plain-language definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    pub term: String,
    pub definition: String,
}

/// Stub summary of a clause, keyed by the detected clause category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClauseSummary {
    pub clause_type: String,
    pub summary: String,
}

/// Precedent-search envelope (curated content, same shape on hit and miss).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecedentSearch {
    pub success: bool,
    pub clause: String,
    pub location: String,
    pub precedents: Option<String>,
    pub error: Option<String>,
}

const GLOSSARY: &[(&str, &str)] = &[
    (
        "arbitration",
        "A way of settling a dispute outside court: a neutral third party hears both sides and makes a binding decision.",
    ),
    (
        "breach of contract",
        "When one party fails to do what the contract requires, such as missing a payment or deadline.",
    ),
    (
        "consideration",
        "The thing of value each side gives in a contract — money, goods, or a promise — without which the contract is not enforceable.",
    ),
    (
        "covenant",
        "A formal promise inside a contract to do, or not do, a particular thing.",
    ),
    (
        "due diligence",
        "The careful investigation a party performs before signing a deal, such as reviewing finances or legal obligations.",
    ),
    (
        "estoppel",
        "A rule preventing someone from going back on a statement or promise that another party reasonably relied on.",
    ),
    (
        "force majeure",
        "A clause excusing a party from its obligations when extraordinary events outside its control — disasters, war, epidemics — make performance impossible.",
    ),
    (
        "indemnification",
        "A promise by one party to cover the losses or legal costs of the other if certain things go wrong.",
    ),
    (
        "lien",
        "A legal claim against property as security for a debt; the property cannot be freely sold until the debt is settled.",
    ),
    (
        "liquidated damages",
        "A fixed amount, agreed in advance, that one party pays the other if it breaks the contract.",
    ),
    (
        "severability",
        "A clause saying that if one part of the contract turns out to be invalid, the rest still stands.",
    ),
    (
        "tort",
        "A wrongful act, other than breaking a contract, that injures someone and for which the law allows a claim for damages.",
    ),
];

/// Clause categories the summarizer stub recognizes.
struct ClausePattern {
    clause_type: &'static str,
    pattern: &'static str,
    summary: &'static str,
}

const CLAUSE_PATTERNS: &[ClausePattern] = &[
    ClausePattern {
        clause_type: "Payment",
        pattern: r"(?i)\b(rent|payment|pay|fee|invoice)\b",
        summary: "This clause sets out who pays what, and when. Missing the stated deadline can put the paying party in breach, so note the due date and any grace period.",
    },
    ClausePattern {
        clause_type: "Governing law",
        pattern: r"(?i)\b(governed by|governing law|construed in accordance)\b",
        summary: "This clause picks which state's or country's law applies to the agreement. Disputes will be decided under that law, regardless of where the parties live.",
    },
    ClausePattern {
        clause_type: "Limitation of liability",
        pattern: r"(?i)\b(liab(le|ility)|consequential|punitive|damages)\b",
        summary: "This clause caps what one party can recover from the other if things go wrong, typically excluding indirect or punitive damages. It shifts risk toward the party suffering the loss.",
    },
    ClausePattern {
        clause_type: "Termination",
        pattern: r"(?i)\b(terminat(e|ion)|notice period|written notice)\b",
        summary: "This clause explains how the agreement can be ended, usually by giving written notice a set number of days in advance. Check who may terminate and whether cause is required.",
    },
    ClausePattern {
        clause_type: "Confidentiality",
        pattern: r"(?i)\b(confidential|non-disclosure|proprietary information)\b",
        summary: "This clause obliges the parties to keep certain information secret, often surviving after the agreement itself ends.",
    },
];

/// Per-jurisdiction curated precedent text. The default jurisdiction is US.
const PRECEDENTS: &[(&str, &str)] = &[
    (
        "california",
        "1. Green v. Superior Court (1974) — California Supreme Court recognized the implied warranty of habitability in residential leases.\n2. Graham v. Scissor-Tail, Inc. (1981) — unconscionable terms in adhesion contracts are unenforceable.\n3. Foley v. Interactive Data Corp. (1988) — limits on tort remedies for contract breach.",
    ),
    (
        "new york",
        "1. Jacob & Youngs v. Kent (1921) — substantial performance doctrine; trivial defects do not defeat payment.\n2. Wood v. Lucy, Lady Duff-Gordon (1917) — implied obligation of good-faith efforts in exclusive dealings.\n3. 159 MP Corp. v. Redbridge Bedford (2019) — sophisticated parties are held to their bargained-for waivers.",
    ),
    (
        "india",
        "1. Central Inland Water Transport Corp. v. Brojo Nath Ganguly (1986) — unconscionable terms in unequal bargaining are void under Section 23.\n2. ONGC v. Saw Pipes (2003) — scope of public-policy review of arbitral awards.\n3. Satyabrata Ghose v. Mugneeram Bangur (1954) — doctrine of frustration under Section 56.",
    ),
    (
        "us",
        "1. Hadley v. Baxendale (1854, adopted throughout US law) — consequential damages must be foreseeable at contracting time.\n2. Carnival Cruise Lines v. Shute (1991) — forum-selection clauses in form contracts are enforceable if fundamentally fair.\n3. AT&T Mobility v. Concepcion (2011) — arbitration clauses preempt state-law class-action rules.",
    ),
];

/// The shared tool capability. Construct once and hand to every transport.
pub struct LegalTools {
    clause_patterns: Vec<(Regex, &'static ClausePattern)>,
}

impl LegalTools {
    pub fn new() -> Self {
        let mut clause_patterns = Vec::with_capacity(CLAUSE_PATTERNS.len());
        for cp in CLAUSE_PATTERNS {
            match Regex::new(cp.pattern) {
                Ok(regex) => clause_patterns.push((regex, cp)),
                Err(e) => warn!("Skipping clause pattern '{}': {}", cp.clause_type, e),
            }
        }
        Self { clause_patterns }
    }

    /// Exact (case-insensitive) glossary lookup. `None` on miss.
    pub fn lookup_term(&self, term: &str) -> Option<GlossaryEntry> {
        let wanted = term.trim().to_lowercase();
        GLOSSARY
            .iter()
            .find(|(t, _)| *t == wanted)
            .map(|(t, d)| GlossaryEntry {
                term: (*t).to_string(),
                definition: (*d).to_string(),
            })
    }

    /// Case-insensitive substring search over terms and definitions.
    pub fn search_glossary(&self, query: &str) -> Vec<GlossaryEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        GLOSSARY
            .iter()
            .filter(|(t, d)| t.contains(&needle) || d.to_lowercase().contains(&needle))
            .map(|(t, d)| GlossaryEntry {
                term: (*t).to_string(),
                definition: (*d).to_string(),
            })
            .collect()
    }

    /// Stub clause summary: classify by keyword pattern, return the canned
    /// summary for that category. `None` for an empty clause.
    pub fn summarize_clause(&self, clause: &str) -> Option<ClauseSummary> {
        let clause = clause.trim();
        if clause.is_empty() {
            return None;
        }

        for (regex, cp) in &self.clause_patterns {
            if regex.is_match(clause) {
                return Some(ClauseSummary {
                    clause_type: cp.clause_type.to_string(),
                    summary: cp.summary.to_string(),
                });
            }
        }

        Some(ClauseSummary {
            clause_type: "General".to_string(),
            summary: "This clause states a general obligation between the parties. Read it together with the definitions and termination sections to understand its full effect."
                .to_string(),
        })
    }

    /// Stub precedent search: curated case law per jurisdiction, US default.
    pub fn find_precedents(&self, clause: &str, location: Option<&str>) -> PrecedentSearch {
        let location = location.unwrap_or("US").trim().to_string();
        let clause = clause.trim().to_string();

        if clause.is_empty() {
            return PrecedentSearch {
                success: false,
                clause,
                location,
                precedents: None,
                error: Some("No clause provided".to_string()),
            };
        }

        let key = location.to_lowercase();
        let precedents = PRECEDENTS
            .iter()
            .find(|(jurisdiction, _)| *jurisdiction == key)
            .or_else(|| PRECEDENTS.iter().find(|(j, _)| *j == "us"))
            .map(|(_, text)| (*text).to_string());

        PrecedentSearch {
            success: true,
            clause,
            location,
            precedents,
            error: None,
        }
    }
}

impl Default for LegalTools {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_lookup_hits_case_insensitively() {
        let tools = LegalTools::new();
        let entry = tools.lookup_term("Force Majeure").unwrap();
        assert_eq!(entry.term, "force majeure");
        assert!(entry.definition.contains("extraordinary events"));
    }

    #[test]
    fn exact_lookup_misses_return_none() {
        let tools = LegalTools::new();
        assert!(tools.lookup_term("habeas corpus").is_none());
        assert!(tools.lookup_term("").is_none());
    }

    #[test]
    fn search_matches_terms_and_definitions() {
        let tools = LegalTools::new();

        let by_term = tools.search_glossary("lien");
        assert!(by_term.iter().any(|e| e.term == "lien"));

        // "binding decision" only appears in the arbitration definition
        let by_definition = tools.search_glossary("binding decision");
        assert_eq!(by_definition.len(), 1);
        assert_eq!(by_definition[0].term, "arbitration");
    }

    #[test]
    fn empty_search_returns_nothing() {
        let tools = LegalTools::new();
        assert!(tools.search_glossary("   ").is_empty());
    }

    #[test]
    fn summarizer_classifies_known_categories() {
        let tools = LegalTools::new();

        let rent = tools
            .summarize_clause("The tenant shall pay rent on or before the 5th day of each month.")
            .unwrap();
        assert_eq!(rent.clause_type, "Payment");

        let law = tools
            .summarize_clause("This agreement shall be governed by the laws of New York.")
            .unwrap();
        assert_eq!(law.clause_type, "Governing law");

        let notice = tools
            .summarize_clause("Either party may terminate this agreement with 30 days written notice.")
            .unwrap();
        assert_eq!(notice.clause_type, "Termination");
    }

    #[test]
    fn summarizer_falls_back_to_general() {
        let tools = LegalTools::new();
        let summary = tools.summarize_clause("The sky is blue.").unwrap();
        assert_eq!(summary.clause_type, "General");
    }

    #[test]
    fn summarizer_rejects_empty_clause() {
        let tools = LegalTools::new();
        assert!(tools.summarize_clause("  ").is_none());
    }

    #[test]
    fn precedents_prefer_the_named_jurisdiction() {
        let tools = LegalTools::new();
        let result = tools.find_precedents("rent is due monthly", Some("California"));
        assert!(result.success);
        assert_eq!(result.location, "California");
        assert!(result.precedents.unwrap().contains("Green v. Superior Court"));
    }

    #[test]
    fn precedents_default_to_us() {
        let tools = LegalTools::new();
        let result = tools.find_precedents("limitation of liability", None);
        assert_eq!(result.location, "US");
        assert!(result.precedents.unwrap().contains("Hadley v. Baxendale"));

        let unknown = tools.find_precedents("some clause", Some("Atlantis"));
        assert!(unknown.success);
        assert!(unknown.precedents.unwrap().contains("Hadley v. Baxendale"));
    }

    #[test]
    fn precedents_require_a_clause() {
        let tools = LegalTools::new();
        let result = tools.find_precedents("", Some("US"));
        assert!(!result.success);
        assert!(result.error.is_some());
        assert!(result.precedents.is_none());
    }
}
