//! Closed-class word lists for the rule annotator.

/// English stop words (spaCy's default list).
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "amount",
    "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "bottom", "but", "by", "ca", "call", "can", "cannot", "could", "did", "do",
    "does", "doing", "done", "down", "due", "during", "each", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "first", "five", "for", "former",
    "formerly", "forty", "four", "from", "front", "full", "further", "get", "give", "go", "had",
    "has", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon",
    "hers", "herself", "him", "himself", "his", "how", "however", "hundred", "i", "if", "in",
    "indeed", "into", "is", "it", "its", "itself", "just", "keep", "last", "latter", "latterly",
    "least", "less", "made", "make", "many", "may", "me", "meanwhile", "might", "mine", "more",
    "moreover", "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely",
    "neither", "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor",
    "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
    "part", "per", "perhaps", "please", "put", "quite", "rather", "re", "really", "regarding",
    "same", "say", "see", "seem", "seemed", "seeming", "seems", "serious", "several", "she",
    "should", "show", "side", "since", "six", "sixty", "so", "some", "somehow", "someone",
    "something", "sometime", "sometimes", "somewhere", "still", "such", "take", "ten", "than",
    "that", "the", "their", "them", "themselves", "then", "thence", "there", "thereafter",
    "thereby", "therefore", "therein", "thereupon", "these", "they", "third", "this", "those",
    "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too", "top",
    "toward", "towards", "twelve", "twenty", "two", "under", "unless", "until", "up", "upon",
    "us", "used", "using", "various", "very", "via", "was", "we", "well", "were", "what",
    "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas", "whereby",
    "wherein", "whereupon", "wherever", "whether", "which", "while", "whither", "who", "whoever",
    "whole", "whom", "whose", "why", "will", "with", "within", "without", "would", "yet", "you",
    "your", "yours", "yourself", "yourselves", "'s", "'re", "'ve", "'ll", "'d", "'m", "n't",
];

pub const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "any", "some", "each", "every", "no",
    "our", "your", "their", "my", "his", "her", "its", "all", "several", "many",
];

pub const PREPOSITIONS: &[&str] = &[
    "in", "with", "of", "for", "on", "at", "by", "from", "to", "into", "about", "as", "across",
    "through", "over", "under", "within", "without", "via", "including", "like", "among",
    "between", "during", "per", "toward", "towards", "upon",
];

/// Modal auxiliaries: attach to the next verb as `aux`.
pub const MODALS: &[&str] = &[
    "must", "should", "will", "would", "can", "could", "may", "might", "shall",
];

/// Forms that head a clause when no lexical verb is present.
pub const COPULAS: &[&str] = &["is", "are", "was", "were", "be", "been", "being", "am"];

pub const LIGHT_VERBS: &[&str] = &["have", "has", "had", "do", "does", "did", "get", "make"];

pub const VERBS: &[&str] = &[
    "looking", "seeking", "require", "requires", "join", "build", "develop", "design", "manage",
    "work", "create", "maintain", "implement", "deliver", "drive", "support", "collaborate",
    "use", "know", "write", "analyze", "analyse", "own", "led", "hire", "hiring",
    "ship", "deploy", "mentor", "partner", "apply", "include", "includes", "seek", "need",
    "needs", "want", "wants", "bring", "improve", "optimize",
];

pub const ADJECTIVES: &[&str] = &[
    "strong", "good", "excellent", "solid", "proficient", "familiar", "capable", "senior",
    "junior", "remote", "new", "great", "deep", "preferred", "able", "relevant", "proven",
    "hands-on", "fluent", "advanced", "basic", "effective", "modern", "large",
    "small", "big", "key", "fast", "real", "high", "low", "best", "better", "similar", "related",
    "technical", "analytical", "professional", "cross-functional", "agile", "open", "top",
];

/// Common nouns that would otherwise be caught by a suffix rule or read as a
/// proper noun in sentence-initial position.
pub const NOUNS: &[&str] = &[
    "experience", "knowledge", "understanding", "expertise", "ability", "skills", "skill",
    "engineering", "programming", "marketing", "testing", "learning", "training", "computing",
    "processing", "modeling", "modelling", "networking", "accounting", "building", "reporting",
    "consulting", "scripting", "scheduling", "banking", "hosting", "monitoring", "tooling",
    "lead", "years", "year", "team", "teams", "objective", "executive", "initiative",
    "developer", "engineer", "analyst", "architect", "manager", "specialist", "consultant",
    "director", "expert", "scientist", "programmer", "designer", "administrator", "coordinator",
];

const ADJECTIVE_SUFFIXES: &[&str] = &["ical", "ful", "ous", "ive", "able", "ible", "less"];

pub fn is_stop_word(lower: &str) -> bool {
    STOP_WORDS.contains(&lower)
}

pub fn is_determiner(lower: &str) -> bool {
    DETERMINERS.contains(&lower)
}

pub fn is_preposition(lower: &str) -> bool {
    PREPOSITIONS.contains(&lower)
}

pub fn is_modal(lower: &str) -> bool {
    MODALS.contains(&lower)
}

pub fn is_copula(lower: &str) -> bool {
    COPULAS.contains(&lower)
}

pub fn is_light_verb(lower: &str) -> bool {
    LIGHT_VERBS.contains(&lower)
}

pub fn is_known_verb(lower: &str) -> bool {
    VERBS.contains(&lower)
}

pub fn is_known_adjective(lower: &str) -> bool {
    ADJECTIVES.contains(&lower)
}

pub fn is_known_noun(lower: &str) -> bool {
    NOUNS.contains(&lower)
}

pub fn has_adjective_suffix(lower: &str) -> bool {
    lower.chars().count() > 4 && ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s))
}

pub fn is_punct_char(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '•' | '–' | '—' | '“' | '”' | '‘' | '’' | '…' | '·' | '«' | '»'
        )
}
