/// Tiered suffix rules for English inflection, with a built-in rule book
/// and RON loading for user overrides.

use regex::Regex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid rule pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Rule priority. Exceptions are tried before generic rules, and the
/// default rule only fires when nothing else matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleTier {
    Exception,
    Generic,
    Default,
}

/// Which inflected form a rule set builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Inflection {
    Plural,
    GrecoLatinPlural,
    Present3s,
    Past,
    PastParticiple,
    PresentParticiple,
    Comparative,
    Superlative,
}

/// A single rewrite: when `pattern` matches the baseform, drop `truncate`
/// trailing characters and append `suffix`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorphRule {
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub truncate: usize,
    #[serde(default)]
    pub suffix: String,
    #[serde(default = "default_tier")]
    pub tier: RuleTier,
    #[serde(skip)]
    compiled: Option<Regex>,
}

fn default_tier() -> RuleTier {
    RuleTier::Generic
}

impl PartialEq for MorphRule {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
            && self.truncate == other.truncate
            && self.suffix == other.suffix
            && self.tier == other.tier
    }
}

impl MorphRule {
    /// Build a rule whose pattern is known to be valid. An invalid pattern
    /// yields a rule that never matches.
    pub fn new(pattern: &str, truncate: usize, suffix: &str, tier: RuleTier) -> Self {
        Self {
            pattern: pattern.to_string(),
            truncate,
            suffix: suffix.to_string(),
            tier,
            compiled: Regex::new(&format!("(?i){pattern}")).ok(),
        }
    }

    /// Whole-word exception mapping `base` to `form`.
    pub fn exception(base: &str, form: &str) -> Self {
        let shared = base
            .chars()
            .zip(form.chars())
            .take_while(|(a, b)| a == b)
            .count();
        let truncate = base.chars().count() - shared;
        let suffix: String = form.chars().skip(shared).collect();
        Self::new(
            &format!("^{}$", regex::escape(base)),
            truncate,
            &suffix,
            RuleTier::Exception,
        )
    }

    pub fn generic(pattern: &str, truncate: usize, suffix: &str) -> Self {
        Self::new(pattern, truncate, suffix, RuleTier::Generic)
    }

    /// Unconditional fallback rule.
    pub fn fallback(truncate: usize, suffix: &str) -> Self {
        Self::new("", truncate, suffix, RuleTier::Default)
    }

    fn compile(&mut self) -> Result<(), RuleError> {
        let regex =
            Regex::new(&format!("(?i){}", self.pattern)).map_err(|source| RuleError::Pattern {
                pattern: self.pattern.clone(),
                source,
            })?;
        self.compiled = Some(regex);
        Ok(())
    }

    pub fn matches(&self, base: &str) -> bool {
        self.compiled.as_ref().is_some_and(|re| re.is_match(base))
    }

    /// Apply the rewrite unconditionally.
    pub fn apply(&self, base: &str) -> String {
        let keep = base.chars().count().saturating_sub(self.truncate);
        let mut out: String = base.chars().take(keep).collect();
        out.push_str(&self.suffix);
        out
    }
}

/// Ordered rules for one inflection plus the default rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub rules: Vec<MorphRule>,
    pub default: MorphRule,
    /// Double the final consonant of words marked for it before the
    /// default suffix ("tug" -> "tugged").
    #[serde(default)]
    pub doubling: bool,
}

impl RuleSet {
    pub fn new(rules: Vec<MorphRule>, default: MorphRule, doubling: bool) -> Self {
        let mut set = Self {
            rules,
            default,
            doubling,
        };
        set.sort();
        set
    }

    /// Stable sort by tier; declaration order survives within a tier.
    fn sort(&mut self) {
        self.rules.sort_by_key(|r| r.tier);
    }

    fn compile(&mut self) -> Result<(), RuleError> {
        for rule in &mut self.rules {
            rule.compile()?;
        }
        self.sort();
        Ok(())
    }

    /// Inflect `base`. The first matching rule fires; otherwise the default
    /// rule applies, after consonant doubling when `double` is requested.
    pub fn apply(&self, base: &str, double: bool) -> String {
        if let Some(rule) = self.rules.iter().find(|r| r.matches(base)) {
            trace!(base, pattern = %rule.pattern, tier = ?rule.tier, "rule fired");
            return rule.apply(base);
        }
        if self.doubling && double {
            if let Some(last) = base.chars().last() {
                let mut doubled = base.to_string();
                doubled.push(last);
                return self.default.apply(&doubled);
            }
        }
        self.default.apply(base)
    }
}

/// All rule sets, keyed by inflection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleBook {
    sets: FxHashMap<Inflection, RuleSet>,
}

static ENGLISH: LazyLock<RuleBook> = LazyLock::new(build_english);

impl RuleBook {
    /// The built-in English rules.
    pub fn english() -> RuleBook {
        ENGLISH.clone()
    }

    pub fn get(&self, inflection: Inflection) -> Option<&RuleSet> {
        self.sets.get(&inflection)
    }

    pub fn insert(&mut self, inflection: Inflection, set: RuleSet) {
        self.sets.insert(inflection, set);
    }

    /// Inflect `base`, or `None` when the book has no rules for `inflection`.
    pub fn inflect(&self, inflection: Inflection, base: &str, double: bool) -> Option<String> {
        self.get(inflection).map(|set| set.apply(base, double))
    }

    /// Load a rule book from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<RuleBook, RuleError> {
        let contents = std::fs::read_to_string(path)?;
        let book = Self::parse_ron(&contents)?;
        debug!(path = %path.display(), sets = book.sets.len(), "loaded rule book");
        Ok(book)
    }

    /// Parse a rule book from a RON map of inflection to rule set.
    /// Every pattern is compiled here so a bad one fails the load.
    pub fn parse_ron(input: &str) -> Result<RuleBook, RuleError> {
        let mut sets: FxHashMap<Inflection, RuleSet> = ron::from_str(input)?;
        for set in sets.values_mut() {
            set.compile()?;
        }
        Ok(RuleBook { sets })
    }

    /// Merge another rule book into this one. For a shared inflection the
    /// rules of `other` are tried ahead of ours within each tier, and its
    /// default rule and doubling flag replace ours.
    pub fn merge(&mut self, other: RuleBook) {
        for (inflection, incoming) in other.sets {
            match self.sets.get_mut(&inflection) {
                Some(existing) => {
                    let mut rules = incoming.rules;
                    rules.append(&mut existing.rules);
                    existing.rules = rules;
                    existing.default = incoming.default;
                    existing.doubling = incoming.doubling;
                    existing.sort();
                }
                None => {
                    self.sets.insert(inflection, incoming);
                }
            }
        }
    }
}

const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("person", "people"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("goose", "geese"),
    ("mouse", "mice"),
    ("louse", "lice"),
    ("ox", "oxen"),
    ("sheep", "sheep"),
    ("deer", "deer"),
    ("fish", "fish"),
    ("series", "series"),
    ("species", "species"),
    ("aircraft", "aircraft"),
    ("knife", "knives"),
    ("wife", "wives"),
    ("life", "lives"),
    ("leaf", "leaves"),
    ("half", "halves"),
    ("wolf", "wolves"),
    ("calf", "calves"),
    ("loaf", "loaves"),
    ("thief", "thieves"),
    ("shelf", "shelves"),
    ("self", "selves"),
    ("potato", "potatoes"),
    ("tomato", "tomatoes"),
    ("hero", "heroes"),
    ("echo", "echoes"),
    ("focus", "foci"),
    ("cactus", "cacti"),
    ("fungus", "fungi"),
    ("nucleus", "nuclei"),
    ("radius", "radii"),
    ("stimulus", "stimuli"),
    ("alumnus", "alumni"),
    ("syllabus", "syllabi"),
    ("larva", "larvae"),
    ("alga", "algae"),
    ("vertebra", "vertebrae"),
    ("formula", "formulae"),
    ("antenna", "antennae"),
    ("taxon", "taxa"),
    ("criterion", "criteria"),
    ("phenomenon", "phenomena"),
    ("datum", "data"),
    ("bacterium", "bacteria"),
    ("medium", "media"),
    ("curriculum", "curricula"),
    ("analysis", "analyses"),
    ("crisis", "crises"),
    ("thesis", "theses"),
    ("hypothesis", "hypotheses"),
    ("diagnosis", "diagnoses"),
    ("axis", "axes"),
    ("index", "indices"),
    ("matrix", "matrices"),
    ("appendix", "appendices"),
    ("vertex", "vertices"),
    ("schema", "schemata"),
    ("stigma", "stigmata"),
];

/// (base, past, past participle)
const IRREGULAR_VERBS: &[(&str, &str, &str)] = &[
    ("arise", "arose", "arisen"),
    ("awake", "awoke", "awoken"),
    ("bear", "bore", "borne"),
    ("beat", "beat", "beaten"),
    ("become", "became", "become"),
    ("begin", "began", "begun"),
    ("bend", "bent", "bent"),
    ("bet", "bet", "bet"),
    ("bind", "bound", "bound"),
    ("bite", "bit", "bitten"),
    ("bleed", "bled", "bled"),
    ("blow", "blew", "blown"),
    ("break", "broke", "broken"),
    ("breed", "bred", "bred"),
    ("bring", "brought", "brought"),
    ("build", "built", "built"),
    ("buy", "bought", "bought"),
    ("catch", "caught", "caught"),
    ("choose", "chose", "chosen"),
    ("come", "came", "come"),
    ("cost", "cost", "cost"),
    ("creep", "crept", "crept"),
    ("cut", "cut", "cut"),
    ("deal", "dealt", "dealt"),
    ("dig", "dug", "dug"),
    ("do", "did", "done"),
    ("draw", "drew", "drawn"),
    ("drink", "drank", "drunk"),
    ("drive", "drove", "driven"),
    ("eat", "ate", "eaten"),
    ("fall", "fell", "fallen"),
    ("feed", "fed", "fed"),
    ("feel", "felt", "felt"),
    ("fight", "fought", "fought"),
    ("find", "found", "found"),
    ("flee", "fled", "fled"),
    ("fly", "flew", "flown"),
    ("forbid", "forbade", "forbidden"),
    ("forget", "forgot", "forgotten"),
    ("forgive", "forgave", "forgiven"),
    ("freeze", "froze", "frozen"),
    ("get", "got", "got"),
    ("give", "gave", "given"),
    ("go", "went", "gone"),
    ("grind", "ground", "ground"),
    ("grow", "grew", "grown"),
    ("hang", "hung", "hung"),
    ("have", "had", "had"),
    ("hear", "heard", "heard"),
    ("hide", "hid", "hidden"),
    ("hit", "hit", "hit"),
    ("hold", "held", "held"),
    ("hurt", "hurt", "hurt"),
    ("keep", "kept", "kept"),
    ("kneel", "knelt", "knelt"),
    ("know", "knew", "known"),
    ("lay", "laid", "laid"),
    ("lead", "led", "led"),
    ("leave", "left", "left"),
    ("lend", "lent", "lent"),
    ("let", "let", "let"),
    ("lie", "lay", "lain"),
    ("light", "lit", "lit"),
    ("lose", "lost", "lost"),
    ("make", "made", "made"),
    ("mean", "meant", "meant"),
    ("meet", "met", "met"),
    ("pay", "paid", "paid"),
    ("put", "put", "put"),
    ("quit", "quit", "quit"),
    ("read", "read", "read"),
    ("ride", "rode", "ridden"),
    ("ring", "rang", "rung"),
    ("rise", "rose", "risen"),
    ("run", "ran", "run"),
    ("say", "said", "said"),
    ("see", "saw", "seen"),
    ("seek", "sought", "sought"),
    ("sell", "sold", "sold"),
    ("send", "sent", "sent"),
    ("set", "set", "set"),
    ("shake", "shook", "shaken"),
    ("shine", "shone", "shone"),
    ("shoot", "shot", "shot"),
    ("show", "showed", "shown"),
    ("shut", "shut", "shut"),
    ("sing", "sang", "sung"),
    ("sink", "sank", "sunk"),
    ("sit", "sat", "sat"),
    ("sleep", "slept", "slept"),
    ("slide", "slid", "slid"),
    ("speak", "spoke", "spoken"),
    ("spend", "spent", "spent"),
    ("spin", "spun", "spun"),
    ("stand", "stood", "stood"),
    ("steal", "stole", "stolen"),
    ("stick", "stuck", "stuck"),
    ("sting", "stung", "stung"),
    ("strike", "struck", "struck"),
    ("swear", "swore", "sworn"),
    ("sweep", "swept", "swept"),
    ("swim", "swam", "swum"),
    ("swing", "swung", "swung"),
    ("take", "took", "taken"),
    ("teach", "taught", "taught"),
    ("tear", "tore", "torn"),
    ("tell", "told", "told"),
    ("think", "thought", "thought"),
    ("throw", "threw", "thrown"),
    ("understand", "understood", "understood"),
    ("wake", "woke", "woken"),
    ("wear", "wore", "worn"),
    ("weep", "wept", "wept"),
    ("win", "won", "won"),
    ("write", "wrote", "written"),
];

/// (base, comparative, superlative)
const IRREGULAR_GRADES: &[(&str, &str, &str)] = &[
    ("good", "better", "best"),
    ("well", "better", "best"),
    ("bad", "worse", "worst"),
    ("badly", "worse", "worst"),
    ("far", "farther", "farthest"),
    ("little", "less", "least"),
    ("many", "more", "most"),
    ("much", "more", "most"),
];

fn build_english() -> RuleBook {
    let mut book = RuleBook::default();

    let sibilant = "(s|x|z|ch|sh)$";
    let consonant_y = "[^aeiou]y$";

    let mut plural: Vec<MorphRule> = IRREGULAR_PLURALS
        .iter()
        .map(|(base, form)| MorphRule::exception(base, form))
        .collect();
    plural.extend([
        MorphRule::generic(consonant_y, 1, "ies"),
        MorphRule::generic(sibilant, 0, "es"),
    ]);
    book.insert(
        Inflection::Plural,
        RuleSet::new(plural, MorphRule::fallback(0, "s"), false),
    );

    book.insert(
        Inflection::GrecoLatinPlural,
        RuleSet::new(
            vec![
                MorphRule::generic("us$", 2, "i"),
                MorphRule::generic("ma$", 0, "ta"),
                MorphRule::generic("men$", 2, "ina"),
                MorphRule::generic("(um|on)$", 2, "a"),
                MorphRule::generic("sis$", 2, "es"),
                MorphRule::generic("is$", 2, "ides"),
                MorphRule::generic("ex$", 2, "ices"),
                MorphRule::generic("x$", 1, "ces"),
                MorphRule::generic("a$", 0, "e"),
            ],
            MorphRule::fallback(0, "s"),
            false,
        ),
    );

    book.insert(
        Inflection::Present3s,
        RuleSet::new(
            vec![
                MorphRule::exception("have", "has"),
                MorphRule::exception("do", "does"),
                MorphRule::exception("go", "goes"),
                MorphRule::exception("be", "is"),
                MorphRule::generic(sibilant, 0, "es"),
                MorphRule::generic(consonant_y, 1, "ies"),
            ],
            MorphRule::fallback(0, "s"),
            false,
        ),
    );

    let mut past: Vec<MorphRule> = IRREGULAR_VERBS
        .iter()
        .map(|(base, form, _)| MorphRule::exception(base, form))
        .collect();
    let mut participle: Vec<MorphRule> = IRREGULAR_VERBS
        .iter()
        .map(|(base, _, form)| MorphRule::exception(base, form))
        .collect();
    participle.push(MorphRule::exception("be", "been"));
    for rules in [&mut past, &mut participle] {
        rules.extend([
            MorphRule::generic("e$", 0, "d"),
            MorphRule::generic(consonant_y, 1, "ied"),
        ]);
    }
    book.insert(
        Inflection::Past,
        RuleSet::new(past, MorphRule::fallback(0, "ed"), true),
    );
    book.insert(
        Inflection::PastParticiple,
        RuleSet::new(participle, MorphRule::fallback(0, "ed"), true),
    );

    book.insert(
        Inflection::PresentParticiple,
        RuleSet::new(
            vec![
                MorphRule::exception("be", "being"),
                MorphRule::generic("ie$", 2, "ying"),
                MorphRule::generic("[^iyeo]e$", 1, "ing"),
            ],
            MorphRule::fallback(0, "ing"),
            true,
        ),
    );

    let mut comparative: Vec<MorphRule> = IRREGULAR_GRADES
        .iter()
        .map(|(base, form, _)| MorphRule::exception(base, form))
        .collect();
    comparative.extend([
        MorphRule::generic(consonant_y, 1, "ier"),
        MorphRule::generic("e$", 0, "r"),
    ]);
    book.insert(
        Inflection::Comparative,
        RuleSet::new(comparative, MorphRule::fallback(0, "er"), true),
    );

    let mut superlative: Vec<MorphRule> = IRREGULAR_GRADES
        .iter()
        .map(|(base, _, form)| MorphRule::exception(base, form))
        .collect();
    superlative.extend([
        MorphRule::generic(consonant_y, 1, "iest"),
        MorphRule::generic("e$", 0, "st"),
    ]);
    book.insert(
        Inflection::Superlative,
        RuleSet::new(superlative, MorphRule::fallback(0, "est"), true),
    );

    book
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english(inflection: Inflection, base: &str) -> String {
        RuleBook::english().inflect(inflection, base, false).unwrap()
    }

    #[test]
    fn exception_rule_computes_edit() {
        let rule = MorphRule::exception("child", "children");
        assert_eq!(rule.truncate, 0);
        assert_eq!(rule.suffix, "ren");
        assert_eq!(rule.apply("child"), "children");

        let rule = MorphRule::exception("mouse", "mice");
        assert_eq!(rule.truncate, 4);
        assert_eq!(rule.apply("mouse"), "mice");
    }

    #[test]
    fn exceptions_match_whole_words_only() {
        assert_eq!(english(Inflection::Plural, "man"), "men");
        assert_eq!(english(Inflection::Plural, "human"), "humans");
        assert_eq!(english(Inflection::Plural, "Man"), "Men");
    }

    #[test]
    fn plural_suffix_table() {
        assert_eq!(english(Inflection::Plural, "dog"), "dogs");
        assert_eq!(english(Inflection::Plural, "fly"), "flies");
        assert_eq!(english(Inflection::Plural, "day"), "days");
        assert_eq!(english(Inflection::Plural, "box"), "boxes");
        assert_eq!(english(Inflection::Plural, "church"), "churches");
    }

    #[test]
    fn greco_latin_table() {
        let cases = [
            ("locus", "loci"),
            ("dogma", "dogmata"),
            ("nova", "novae"),
            ("stratum", "strata"),
            ("automaton", "automata"),
            ("basis", "bases"),
            ("iris", "irides"),
            ("foramen", "foramina"),
            ("codex", "codices"),
            ("helix", "helices"),
        ];
        for (base, plural) in cases {
            assert_eq!(english(Inflection::GrecoLatinPlural, base), plural, "{base}");
        }
    }

    #[test]
    fn doubling_only_applies_to_default_rule() {
        let book = RuleBook::english();
        assert_eq!(book.inflect(Inflection::Past, "tug", true).unwrap(), "tugged");
        assert_eq!(book.inflect(Inflection::Past, "tug", false).unwrap(), "tuged");
        assert_eq!(book.inflect(Inflection::Past, "dry", true).unwrap(), "dried");
        assert_eq!(
            book.inflect(Inflection::Comparative, "big", true).unwrap(),
            "bigger"
        );
    }

    #[test]
    fn participles() {
        assert_eq!(english(Inflection::PresentParticiple, "lie"), "lying");
        assert_eq!(english(Inflection::PresentParticiple, "make"), "making");
        assert_eq!(english(Inflection::PresentParticiple, "see"), "seeing");
        assert_eq!(english(Inflection::PresentParticiple, "be"), "being");
        assert_eq!(english(Inflection::PastParticiple, "eat"), "eaten");
        assert_eq!(english(Inflection::PastParticiple, "be"), "been");
    }

    #[test]
    fn sort_is_stable_within_tier() {
        let set = RuleSet::new(
            vec![
                MorphRule::generic("x$", 0, "first"),
                MorphRule::exception("box", "boxen"),
                MorphRule::generic("x$", 0, "second"),
            ],
            MorphRule::fallback(0, "s"),
            false,
        );
        assert_eq!(set.rules[0].tier, RuleTier::Exception);
        assert_eq!(set.rules[1].suffix, "first");
        assert_eq!(set.rules[2].suffix, "second");
        assert_eq!(set.apply("box", false), "boxen");
        assert_eq!(set.apply("fox", false), "foxfirst");
    }

    #[test]
    fn parse_and_merge_user_rules() {
        let input = r#"{
            Plural: (
                rules: [(pattern: "^octopus$", truncate: 2, suffix: "i", tier: Exception)],
                default: (suffix: "s", tier: Default),
            ),
        }"#;
        let user = RuleBook::parse_ron(input).unwrap();
        let mut book = RuleBook::english();
        book.merge(user);
        assert_eq!(book.inflect(Inflection::Plural, "octopus", false).unwrap(), "octopi");
        assert_eq!(book.inflect(Inflection::Plural, "child", false).unwrap(), "children");
        assert_eq!(book.inflect(Inflection::Plural, "cat", false).unwrap(), "cats");
    }

    #[test]
    fn bad_pattern_fails_the_load() {
        let input = r#"{ Plural: (rules: [(pattern: "(unclosed")], default: (suffix: "s")) }"#;
        let err = RuleBook::parse_ron(input).unwrap_err();
        assert!(matches!(err, RuleError::Pattern { .. }));
    }
}
