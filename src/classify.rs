//! Keyword-based article categorization.
//!
//! Classification is a declarative table of [`Rule`]s evaluated in order; the
//! first rule that applies decides the category. The categories overlap on
//! purpose (a court ruling about an actress is both legal and entertainment
//! news), so the order of [`RULES`] is part of the behavior:
//!
//! | # | Category | Applies when | Unless |
//! |---|----------|--------------|--------|
//! | 1 | Entertainment | media, celebrity, awards, drag, festivals | |
//! | 2 | Rights & Politics | legal, legislative, political terms | film/TV/celebrity terms |
//! | 3 | Health | medical and gender-affirming care terms | |
//! | 4 | Sports | sports terms, or competition + athlete context | dating/romance terms |
//! | 5 | Business | workplace, corporate, finance terms | |
//! | 6 | Education | school, academic, youth terms | |
//! | 7 | Technology | tech, social platforms, AI | |
//! | 8 | Community | activism, advocacy, pride events | |
//!
//! Anything else is [`Category::LgbtqNews`].

use crate::models::Category;
use once_cell::sync::Lazy;
use regex::Regex;

const ENTERTAINMENT: &str = "movie|film|tv|television|show|series|netflix|hulu|disney|streaming|actor|actress|celebrity|music|album|song|artist|concert|performance|award|oscar|emmy|grammy|entertainment|hollywood|broadway|theater|theatre|drag|festival|culture|representation|character|role";
const ENTERTAINMENT_CONTEXT: &str = "movie|film|tv|actor|actress|celebrity|entertainment|hollywood";
const POLITICS: &str = "rights|law|legal|court|ruling|legislation|bill|policy|government|political|politics|congress|senate|parliament|election|vote|voting|campaign|candidate|president|minister|judge|supreme court|ban|banned|protect|protection|discrimination|equality|marriage|adoption";
const HEALTH: &str = "health|healthcare|medical|medicine|doctor|hospital|treatment|therapy|mental health|wellness|surgery|clinic|patient|disease|condition|diagnosis|prescription|vaccine|hormone|transition|gender|affirming|care";
const SPORTS: &str = "sport|sports|athlete|championship|league|tournament|olympics|fifa|nfl|nba|mlb|nhl|soccer|football|basketball|baseball|tennis|golf|swimming";
const COMPETITION: &str = "match|team|compete|competition";
const ATHLETE_CONTEXT: &str = "athlete|player|coach|stadium|field|court|olympic";
const DATING: &str = "date|dating|relationship|love|flirt|crush|romance";
const BUSINESS: &str = "business|company|corporate|ceo|startup|entrepreneur|investment|finance|financial|economy|economic|market|stock|trade|industry|workplace|job|career|employment|work|office|inclusive|diversity";
const EDUCATION: &str = "education|school|university|college|student|teacher|professor|academic|study|research|scholarship|graduation|campus|classroom|learning|youth|young|teen|teenager|child|children|kid|kids";
const TECHNOLOGY: &str = "technology|tech|digital|app|software|internet|online|social media|facebook|twitter|instagram|tiktok|platform|ai|artificial intelligence|data|cyber|dating";
const COMMUNITY: &str = "community|social|activism|activist|protest|march|rally|movement|organization|charity|volunteer|support|advocacy|inclusion|diversity|pride|event|celebration|group|center|resource";

/// Compile a word-boundary-delimited alternation.
fn words(alternation: &str) -> Regex {
    Regex::new(&format!(r"\b(?:{})\b", alternation)).expect("classifier patterns are valid")
}

/// One row of the classification table.
#[derive(Debug)]
pub struct Rule {
    pub category: Category,
    /// Alternatives: the rule applies when every pattern of at least one
    /// alternative matches.
    pub when: Vec<Vec<Regex>>,
    /// Vetoes the rule when it matches.
    pub unless: Option<Regex>,
}

impl Rule {
    fn new(category: Category, pattern: &str) -> Self {
        Self {
            category,
            when: vec![vec![words(pattern)]],
            unless: None,
        }
    }

    fn or_all(mut self, patterns: &[&str]) -> Self {
        self.when.push(patterns.iter().map(|p| words(p)).collect());
        self
    }

    fn unless(mut self, pattern: &str) -> Self {
        self.unless = Some(words(pattern));
        self
    }

    /// Whether this rule assigns its category to the normalized `text`.
    pub fn applies(&self, text: &str) -> bool {
        let hit = self
            .when
            .iter()
            .any(|all| all.iter().all(|re| re.is_match(text)));
        hit && !self.unless.as_ref().is_some_and(|re| re.is_match(text))
    }
}

/// The ordered classification table.
pub static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::new(Category::Entertainment, ENTERTAINMENT),
        Rule::new(Category::RightsPolitics, POLITICS).unless(ENTERTAINMENT_CONTEXT),
        Rule::new(Category::Health, HEALTH),
        Rule::new(Category::Sports, SPORTS)
            .or_all(&[COMPETITION, ATHLETE_CONTEXT])
            .unless(DATING),
        Rule::new(Category::Business, BUSINESS),
        Rule::new(Category::Education, EDUCATION),
        Rule::new(Category::Technology, TECHNOLOGY),
        Rule::new(Category::Community, COMMUNITY),
    ]
});

/// Join and lower-case the searchable fields of an article.
pub fn normalize(title: &str, description: &str, content: &str) -> String {
    format!("{} {} {}", title, description, content).to_lowercase()
}

/// Assign exactly one category to an article.
///
/// Total and deterministic: the same input always yields the same category,
/// and [`Category::LgbtqNews`] is returned when no rule applies.
pub fn classify(title: &str, description: &str, content: &str) -> Category {
    let text = normalize(title, description, content);
    RULES
        .iter()
        .find(|rule| rule.applies(&text))
        .map(|rule| rule.category)
        .unwrap_or(Category::LgbtqNews)
}
