//! Question classification into houses and significators.
//!
//! [`QuestionClassifier`] is the seam; [`KeywordClassifier`] is the
//! traditional keyword table. Sale and possession words are checked
//! first, then the category keyword lists in order, with education
//! preferred over lawsuit when exam or student words appear.

use crate::western::types::Planet;
use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    LostObject,
    Marriage,
    Pregnancy,
    Children,
    Travel,
    Gambling,
    Funding,
    Money,
    Career,
    Health,
    Lawsuit,
    Relationship,
    Education,
    Parent,
    Sibling,
    FriendEnemy,
    Property,
    Death,
    Spiritual,
    General,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::LostObject => "lost_object",
            QuestionType::Marriage => "marriage",
            QuestionType::Pregnancy => "pregnancy",
            QuestionType::Children => "children",
            QuestionType::Travel => "travel",
            QuestionType::Gambling => "gambling",
            QuestionType::Funding => "funding",
            QuestionType::Money => "money",
            QuestionType::Career => "career",
            QuestionType::Health => "health",
            QuestionType::Lawsuit => "lawsuit",
            QuestionType::Relationship => "relationship",
            QuestionType::Education => "education",
            QuestionType::Parent => "parent",
            QuestionType::Sibling => "sibling",
            QuestionType::FriendEnemy => "friend_enemy",
            QuestionType::Property => "property",
            QuestionType::Death => "death",
            QuestionType::Spiritual => "spiritual",
            QuestionType::General => "general",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category keyword lists, checked in this order.
const CATEGORY_KEYWORDS: [(QuestionType, &[&str]); 19] = [
    (QuestionType::LostObject, &["where is", "lost", "missing", "find", "stolen", "disappeared", "locate"]),
    (QuestionType::Marriage, &["marry", "wedding", "spouse", "husband", "wife", "engagement", "propose"]),
    (QuestionType::Pregnancy, &["pregnant", "conceive", "conception", "expecting", "baby", "fertility"]),
    (QuestionType::Children, &["child", "children", "son", "daughter", "offspring", "kids"]),
    (QuestionType::Travel, &["journey", "travel", "trip", "go to", "visit", "vacation", "move to"]),
    (
        QuestionType::Gambling,
        &[
            "lottery", "lotto", "win lottery", "jackpot", "scratch", "raffle", "betting", "bet", "gamble",
            "gambling", "casino", "poker", "blackjack", "slots", "dice", "win money", "lucky", "speculation",
        ],
    ),
    (
        QuestionType::Funding,
        &[
            "funding", "fund", "investment", "invest", "investor", "funding round", "seed", "series a",
            "series b", "venture capital", "vc", "angel", "capital", "raise money", "raise capital",
            "secure funding", "startup funding", "business loan", "finance", "financial backing", "sponsor",
            "grant", "equity", "valuation",
        ],
    ),
    (
        QuestionType::Money,
        &[
            "money", "wealth", "rich", "profit", "gain", "debt", "financial", "income", "salary", "pay",
            "trading", "stock",
        ],
    ),
    (QuestionType::Career, &["job", "career", "work", "employment", "business", "promotion", "interview"]),
    (
        QuestionType::Health,
        &["sick", "illness", "disease", "health", "recover", "die", "cure", "healing", "medical"],
    ),
    (QuestionType::Lawsuit, &["court", "lawsuit", "legal", "judge", "trial", "litigation", "case"]),
    (
        QuestionType::Relationship,
        &[
            "love", "relationship", "friend", "enemy", "romance", "dating", "go out", "go out with", "date",
            "ask out", "see each other", "like me", "interested in", "attracted to", "reconciliation",
            "reconcile", "get back together", "ex", "former", "past relationship", "breakup", "break up",
            "makeup", "make up", "together", "couple", "partner", "boyfriend", "girlfriend", "romantic",
            "crush", "feelings", "attraction",
        ],
    ),
    (
        QuestionType::Education,
        &[
            "exam", "test", "study", "student", "school", "college", "university", "learn", "pass",
            "graduate", "degree", "education", "academic", "course", "class", "conference", "paper",
            "publication", "publish", "journal", "research", "submit", "accepted", "peer review", "review",
            "presentation", "symposium", "seminar",
        ],
    ),
    (QuestionType::Parent, &["father", "mother", "dad", "mom", "parent", "stepfather", "stepmother"]),
    (QuestionType::Sibling, &["brother", "sister", "sibling"]),
    (QuestionType::FriendEnemy, &["friend", "enemy", "ally", "rival", "competitor"]),
    (
        QuestionType::Property,
        &["house", "home", "property", "real estate", "land", "apartment", "buy house", "sell house"],
    ),
    (
        QuestionType::Death,
        &["death", "die", "inheritance", "testament", "legacy", "last will", "will and testament"],
    ),
    (QuestionType::Spiritual, &["god", "religion", "spiritual", "prayer", "divine", "faith", "church"]),
];

/// Topics of each house, used to add houses a question touches on.
const HOUSE_MEANINGS: [(u8, &[&str]); 12] = [
    (1, &["querent", "self", "body", "life", "personality", "appearance"]),
    (2, &["money", "possessions", "moveable goods", "income", "resources", "values"]),
    (3, &["siblings", "neighbors", "short journeys", "communication", "letters", "rumors"]),
    (4, &["father", "home", "land", "property", "endings", "foundations", "graves"]),
    (5, &["children", "pregnancy", "pleasure", "gambling", "creativity", "entertainment"]),
    (6, &["illness", "servants", "small animals", "work", "daily routine", "uncle/aunt"]),
    (7, &["spouse", "partner", "open enemies", "thieves", "others", "contracts"]),
    (8, &["death", "partner's money", "wills", "transformation", "fear", "surgery"]),
    (9, &["long journeys", "foreign lands", "religion", "law", "higher learning", "dreams"]),
    (10, &["mother", "career", "honor", "reputation", "authority", "government"]),
    (11, &["friends", "hopes", "wishes", "advisors", "king's money", "groups"]),
    (12, &["hidden enemies", "large animals", "prisons", "secrets", "self-undoing", "witchcraft"]),
];

const TRANSACTION_WORDS: [&str; 12] = [
    "sell", "buy", "purchase", "sale", "profit", "gain", "lose", "cost", "price", "payment", "trade", "exchange",
];

const POSSESSION_WORDS: [&str; 10] = [
    "car", "house", "vehicle", "property", "possessions", "belongings", "assets", "furniture", "jewelry",
    "valuables",
];

const SALE_WORDS: [&str; 5] = ["sell", "buy", "sale", "purchase", "trade"];

const OWNERSHIP_WORDS: [&str; 5] = ["property", "money", "possessions", "belongings", "assets"];

/// Natural significators of things bought and sold.
const NATURAL_ITEMS: [(&str, &[&str], Planet); 6] = [
    ("vehicle", &["car", "vehicle", "automobile", "truck", "motorcycle", "bike"], Planet::Sun),
    ("property", &["house", "home", "property", "building", "land", "estate"], Planet::Moon),
    ("precious", &["jewelry", "gold", "silver", "diamond", "ring", "watch", "precious"], Planet::Venus),
    ("technology", &["computer", "phone", "laptop", "electronics", "device", "gadget"], Planet::Mercury),
    ("livestock", &["horse", "cattle", "cow", "livestock", "animal"], Planet::Mars),
    ("maritime", &["boat", "ship", "yacht", "vessel"], Planet::Moon),
];

const LONG_DISTANCE_WORDS: [&str; 14] = [
    "far", "foreign", "abroad", "overseas", "international", "long-distance", "long distance", "long-term",
    "extended", "distant", "vacation", "holiday", "cruise", "pilgrimage",
];

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september", "october",
    "november", "december",
];

lazy_static! {
    static ref THIRD_PERSON: Vec<(Regex, &'static str)> = [
        r"\bwill he\b", r"\bwill she\b", r"\bwill they\b",
        r"\bdid he\b", r"\bdid she\b",
        r"\bhas he\b", r"\bhas she\b",
        r"\bdoes he\b", r"\bdoes she\b",
        r"\bcan he\b", r"\bcan she\b",
        r"\bshould he\b", r"\bshould she\b",
        r"\bis he\b", r"\bis she\b", r"\bis they\b",
        r"\bhis\b", r"\bher\b", r"\btheir\b",
        r"the student", r"my student", r"the teacher", r"my friend", r"my partner", r"my husband",
        r"my wife", r"my child", r"my son", r"my daughter", r"the patient", r"my client",
        r"asked by his", r"asked by her", r"asked by the",
    ]
    .iter()
    .map(|p| (Regex::new(p).unwrap(), *p))
    .collect();

    static ref PARTNER_WORDS: Regex = Regex::new(r"\b(his|her|husband|wife|spouse)\b").unwrap();
    static ref FATHER_WORDS: Regex = Regex::new(r"\b(father|dad)\b").unwrap();
    static ref MOTHER_WORDS: Regex = Regex::new(r"\b(mother|mom)\b").unwrap();

    static ref TIMEFRAMES: Vec<(TimeframeKind, Regex)> = [
        (TimeframeKind::ThisMonth, r"this month|by the end of this month|within this month"),
        (TimeframeKind::NextMonth, r"next month|by next month"),
        (TimeframeKind::ThisYear, r"this year|by the end of this year|within this year"),
        (TimeframeKind::ThisWeek, r"this week|by the end of this week|within this week"),
        (TimeframeKind::Today, r"\btoday\b"),
        (TimeframeKind::Soon, r"\b(soon|quickly|fast)\b"),
        (TimeframeKind::ByDate, r"\b(by|before) (\w+ \d+)"),
        (
            TimeframeKind::SpecificMonth,
            r"\bin (january|february|march|april|may|june|july|august|september|october|november|december)\b",
        ),
    ]
    .iter()
    .map(|(kind, p)| (*kind, Regex::new(&format!("(?i){p}")).unwrap()))
    .collect();
}

/// Whole word, allowing a plain inflection (cars, selling, traded).
fn contains_word(text: &str, word: &str) -> bool {
    Regex::new(&format!(r"\b{}(s|es|d|ed|ing)?\b", regex::escape(word)))
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

/// Short keywords must stand alone ("ex" is not "next"); longer ones
/// match anywhere.
fn contains_keyword(text: &str, keyword: &str) -> bool {
    if keyword.len() <= 3 {
        contains_word(text, keyword)
    } else {
        text.contains(keyword)
    }
}

fn push_unique(house: u8, houses: &mut Vec<u8>) {
    if !houses.contains(&house) {
        houses.push(house);
    }
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

/// House `offset` steps on from `base`, counting `base` as the first.
pub fn derive_house(base: u8, offset: u8) -> u8 {
    ((base as u16 + offset as u16 - 2) % 12 + 1) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeframeKind {
    ThisMonth,
    NextMonth,
    ThisYear,
    ThisWeek,
    Today,
    Soon,
    ByDate,
    SpecificMonth,
}

/// Deadline language found in the question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeframe {
    #[serde(rename = "type")]
    pub kind: TimeframeKind,
    pub patterns_matched: Vec<TimeframeKind>,
    /// Month number for "in March" style questions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
}

impl Timeframe {
    /// Last day the question allows, relative to `today`.
    pub fn end_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self.kind {
            TimeframeKind::ThisMonth => last_day_of_month(today.year(), today.month()),
            TimeframeKind::ThisWeek => {
                let to_sunday = 6 - today.weekday().num_days_from_monday();
                today.checked_add_days(chrono::Days::new(to_sunday as u64))
            }
            TimeframeKind::Today => Some(today),
            TimeframeKind::SpecificMonth => self.month.and_then(|m| last_day_of_month(today.year(), m)),
            _ => None,
        }
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

fn parse_timeframe(question: &str) -> Option<Timeframe> {
    let patterns_matched: Vec<TimeframeKind> = TIMEFRAMES
        .iter()
        .filter(|(_, re)| re.is_match(question))
        .map(|(kind, _)| *kind)
        .collect();
    let kind = *patterns_matched.first()?;

    let month = MONTHS
        .iter()
        .position(|m| question.contains(&format!("in {m}")))
        .map(|i| i as u32 + 1);

    Some(Timeframe {
        kind,
        patterns_matched,
        month,
    })
}

/// The question is about someone else; their house is turned to the 7th.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThirdPerson {
    pub subject_house: u8,
    pub pattern_matched: String,
}

fn detect_third_person(question: &str) -> Option<ThirdPerson> {
    THIRD_PERSON
        .iter()
        .find(|(re, _)| re.is_match(question))
        .map(|(_, pattern)| ThirdPerson {
            subject_house: 7,
            pattern_matched: pattern.trim_start_matches(r"\b").trim_end_matches(r"\b").to_string(),
        })
}

/// An item whose natural significator stands for it in a sale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NaturalItem {
    pub name: String,
    pub category: &'static str,
    pub planet: Planet,
}

fn detect_natural_item(question: &str) -> Option<NaturalItem> {
    NATURAL_ITEMS.iter().find_map(|(category, words, planet)| {
        words.iter().find(|w| contains_word(question, w)).map(|w| NaturalItem {
            name: w.to_string(),
            category: *category,
            planet: *planet,
        })
    })
}

/// A planet that signifies the matter by nature rather than by house.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NaturalSignificator {
    pub planet: Planet,
    pub role: &'static str,
}

fn natural_significators(question_type: QuestionType) -> Vec<NaturalSignificator> {
    let pairs: &[(Planet, &'static str)] = match question_type {
        QuestionType::Marriage => &[
            (Planet::Venus, "natural significator of love"),
            (Planet::Mars, "natural significator of men"),
        ],
        QuestionType::Gambling => &[
            (Planet::Jupiter, "natural significator of fortune and luck"),
            (Planet::Venus, "natural significator of pleasure and enjoyment"),
        ],
        QuestionType::Funding => &[
            (Planet::Jupiter, "natural significator of abundance and investors"),
            (Planet::Venus, "natural significator of attraction and partnerships"),
            (Planet::Mercury, "natural significator of contracts and negotiations"),
        ],
        QuestionType::Money => &[(Planet::Jupiter, "greater fortune"), (Planet::Venus, "lesser fortune")],
        QuestionType::Career => &[(Planet::Sun, "honor and reputation"), (Planet::Jupiter, "success")],
        QuestionType::Health => &[(Planet::Mars, "fever and inflammation"), (Planet::Saturn, "chronic illness")],
        QuestionType::Education => &[
            (Planet::Mercury, "natural significator of learning and knowledge"),
            (Planet::Jupiter, "wisdom and higher learning"),
        ],
        QuestionType::Travel => &[
            (Planet::Mercury, "short journeys"),
            (Planet::Jupiter, "long journeys and foreign travel"),
        ],
        _ => &[],
    };
    pairs
        .iter()
        .map(|(planet, role)| NaturalSignificator {
            planet: *planet,
            role: *role,
        })
        .collect()
}

/// Extra roles when the question is about someone else.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThirdPersonRoles {
    /// Teacher asking about a student: student 7th, preparation 3rd from
    /// the student, success 10th.
    Education {
        student_house: u8,
        preparation_house: u8,
        success_house: u8,
    },
    Pregnancy {
        subject_house: u8,
        pregnancy_house: u8,
    },
}

/// Which houses, and so which planets, stand for the parties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignificatorPlan {
    pub querent_house: u8,
    pub quesited_house: u8,
    pub moon_role: &'static str,
    pub special_significators: Vec<NaturalSignificator>,
    /// Item for sale; present only for sale questions naming one.
    pub transaction_item: Option<NaturalItem>,
    pub transaction_type: bool,
    pub third_person: Option<ThirdPersonRoles>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionAnalysis {
    pub question_type: QuestionType,
    pub relevant_houses: Vec<u8>,
    pub significators: SignificatorPlan,
    pub third_person_analysis: Option<ThirdPerson>,
    pub timeframe_analysis: Option<Timeframe>,
    pub matched_keywords: Vec<String>,
}

impl QuestionAnalysis {
    /// Houses chosen by the user replace the classifier's choice; the
    /// second entry becomes the quesited.
    pub fn with_manual_houses(mut self, houses: &[u8]) -> Self {
        let houses: Vec<u8> = houses.iter().copied().filter(|h| (1..=12).contains(h)).collect();
        if houses.is_empty() {
            return self;
        }
        self.significators.quesited_house = houses.get(1).copied().unwrap_or(7);
        self.relevant_houses = houses;
        self
    }
}

pub trait QuestionClassifier {
    fn classify(&self, question: &str) -> QuestionAnalysis;
}

/// Traditional keyword tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

/// Houses and sale context from possession language.
struct PossessionContext {
    houses: Vec<u8>,
    item: Option<NaturalItem>,
    transaction: bool,
}

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    fn question_type(&self, question: &str) -> (QuestionType, Vec<String>) {
        let transaction: Vec<String> = TRANSACTION_WORDS
            .iter()
            .filter(|w| contains_word(question, w))
            .map(|w| w.to_string())
            .collect();
        if !transaction.is_empty() {
            return (QuestionType::Money, transaction);
        }

        let possession: Vec<String> = POSSESSION_WORDS
            .iter()
            .filter(|w| contains_word(question, w))
            .map(|w| w.to_string())
            .collect();
        if !possession.is_empty() {
            return (QuestionType::Money, possession);
        }

        let matches: Vec<(QuestionType, Vec<String>)> = CATEGORY_KEYWORDS
            .iter()
            .filter_map(|(kind, keywords)| {
                let found: Vec<String> = keywords
                    .iter()
                    .filter(|k| contains_keyword(question, k))
                    .map(|k| k.to_string())
                    .collect();
                (!found.is_empty()).then_some((*kind, found))
            })
            .collect();

        let Some(first) = matches.first().cloned() else {
            return (QuestionType::General, Vec::new());
        };

        let education = matches.iter().find(|(k, _)| *k == QuestionType::Education);
        let lawsuit = matches.iter().find(|(k, _)| *k == QuestionType::Lawsuit);
        if let (Some(education), Some(lawsuit)) = (education, lawsuit) {
            let education_words = ["exam", "test", "student", "school", "college", "university", "pass", "graduate"];
            let legal_words = ["court", "lawsuit", "judge", "trial", "litigation", "case"];
            if contains_any(question, &education_words) {
                return education.clone();
            }
            if contains_any(question, &legal_words) {
                return lawsuit.clone();
            }
        }

        first
    }

    fn possession_context(&self, question: &str) -> Option<PossessionContext> {
        if SALE_WORDS.iter().any(|w| contains_word(question, w)) {
            let item = detect_natural_item(question);
            return Some(PossessionContext {
                houses: vec![1, 7],
                transaction: item.is_some(),
                item,
            });
        }

        if OWNERSHIP_WORDS.iter().any(|w| contains_word(question, w)) {
            let houses = if PARTNER_WORDS.is_match(question) {
                vec![1, 7, 8]
            } else if FATHER_WORDS.is_match(question) {
                vec![1, 4, 5]
            } else if MOTHER_WORDS.is_match(question) {
                vec![1, 10, 11]
            } else {
                vec![1, 2]
            };
            return Some(PossessionContext {
                houses,
                item: None,
                transaction: false,
            });
        }

        None
    }

    fn houses(&self, question: &str, question_type: QuestionType, third_person: Option<&ThirdPerson>) -> Vec<u8> {
        if question_type == QuestionType::General {
            return vec![1, 7];
        }
        let mut houses = vec![1u8];

        match question_type {
            QuestionType::LostObject => push_unique(2, &mut houses),
            QuestionType::Marriage => push_unique(7, &mut houses),
            _ if question.contains("spouse") => push_unique(7, &mut houses),
            QuestionType::Relationship => push_unique(7, &mut houses),
            QuestionType::Pregnancy => match third_person {
                Some(tp) => {
                    push_unique(tp.subject_house, &mut houses);
                    push_unique(derive_house(tp.subject_house, 5), &mut houses);
                }
                None => push_unique(5, &mut houses),
            },
            QuestionType::Children | QuestionType::Gambling => push_unique(5, &mut houses),
            QuestionType::Travel => {
                let journey = if contains_any(question, &LONG_DISTANCE_WORDS) { 9 } else { 3 };
                push_unique(journey, &mut houses);
                push_unique(6, &mut houses);
            }
            QuestionType::Funding => {
                let seeking = ["secure", "get", "receive", "obtain", "raise", "from investors", "investor", "vc", "angel"];
                let own = ["my funding", "our funding", "have enough", "sufficient capital"];
                if seeking.iter().any(|w| contains_keyword(question, w)) {
                    push_unique(8, &mut houses);
                } else if contains_any(question, &own) {
                    push_unique(2, &mut houses);
                } else {
                    houses = vec![2, 8];
                }
            }
            QuestionType::Money => {
                let debt = if ["debt", "loan", "owe", "borrow"].iter().any(|w| contains_keyword(question, w)) {
                    8
                } else {
                    2
                };
                push_unique(debt, &mut houses);
            }
            QuestionType::Career => push_unique(10, &mut houses),
            QuestionType::Health => push_unique(6, &mut houses),
            QuestionType::Lawsuit => push_unique(7, &mut houses),
            QuestionType::Education => match third_person {
                Some(tp) => {
                    let student = tp.subject_house;
                    houses = vec![1, student, derive_house(student, 3), 10];
                }
                None => push_unique(9, &mut houses),
            },
            QuestionType::Parent => {
                let parent = if contains_any(question, &["mother", "mom"]) && !contains_any(question, &["father", "dad"]) {
                    10
                } else {
                    4
                };
                push_unique(parent, &mut houses);
            }
            QuestionType::Sibling => push_unique(3, &mut houses),
            QuestionType::FriendEnemy => {
                let house = if contains_any(question, &["friend", "ally"]) { 11 } else { 7 };
                push_unique(house, &mut houses);
            }
            QuestionType::Property => push_unique(4, &mut houses),
            QuestionType::Death => push_unique(8, &mut houses),
            QuestionType::Spiritual => push_unique(9, &mut houses),
            QuestionType::General => {}
        }

        for (house, topics) in HOUSE_MEANINGS {
            if !houses.contains(&house) && contains_any(question, topics) {
                houses.push(house);
            }
        }
        houses
    }

    fn plan(
        &self,
        houses: &[u8],
        question_type: QuestionType,
        possession: Option<PossessionContext>,
        third_person: Option<&ThirdPerson>,
    ) -> SignificatorPlan {
        let special_significators = natural_significators(question_type);

        if let Some(PossessionContext {
            item: Some(item),
            transaction: true,
            ..
        }) = possession
        {
            return SignificatorPlan {
                querent_house: 1,
                quesited_house: 7,
                moon_role: "co-significator of querent and general flow",
                special_significators,
                transaction_item: Some(item),
                transaction_type: true,
                third_person: None,
            };
        }

        let nth = |i: usize, fallback: u8| houses.get(i).copied().unwrap_or(fallback);

        if third_person.is_some() && question_type == QuestionType::Education {
            let success_house = nth(3, 10);
            return SignificatorPlan {
                querent_house: 1,
                quesited_house: success_house,
                moon_role: "translation of light between significators",
                special_significators,
                transaction_item: None,
                transaction_type: false,
                third_person: Some(ThirdPersonRoles::Education {
                    student_house: nth(1, 7),
                    preparation_house: nth(2, 9),
                    success_house,
                }),
            };
        }

        if let (Some(tp), QuestionType::Pregnancy) = (third_person, question_type) {
            let subject_house = nth(1, tp.subject_house);
            let pregnancy_house = nth(2, derive_house(subject_house, 5));
            return SignificatorPlan {
                querent_house: 1,
                quesited_house: pregnancy_house,
                moon_role: "co-significator of querent and general flow",
                special_significators,
                transaction_item: None,
                transaction_type: false,
                third_person: Some(ThirdPersonRoles::Pregnancy {
                    subject_house,
                    pregnancy_house,
                }),
            };
        }

        let quesited_house = match question_type {
            QuestionType::General => 7,
            QuestionType::Relationship | QuestionType::Marriage if houses.contains(&7) => 7,
            _ if houses.len() > 1 => houses[houses.len() - 1],
            _ => 7,
        };

        SignificatorPlan {
            querent_house: 1,
            quesited_house,
            moon_role: "co-significator of querent and general flow",
            special_significators,
            transaction_item: None,
            transaction_type: false,
            third_person: None,
        }
    }
}

impl QuestionClassifier for KeywordClassifier {
    fn classify(&self, question: &str) -> QuestionAnalysis {
        let lower = question.to_lowercase();
        let third_person = detect_third_person(&lower);
        let timeframe = parse_timeframe(&lower);
        let (question_type, matched) = self.question_type(&lower);

        let possession = self.possession_context(&lower);
        let houses = match &possession {
            Some(ctx) => ctx.houses.clone(),
            None => self.houses(&lower, question_type, third_person.as_ref()),
        };
        let significators = self.plan(&houses, question_type, possession, third_person.as_ref());

        log::debug!("category={question_type}, matched={matched:?}, houses={houses:?}");

        QuestionAnalysis {
            question_type,
            relevant_houses: houses,
            significators,
            third_person_analysis: third_person,
            timeframe_analysis: timeframe,
            matched_keywords: matched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(q: &str) -> QuestionAnalysis {
        KeywordClassifier::new().classify(q)
    }

    #[test]
    fn test_derive_house() {
        assert_eq!(derive_house(7, 5), 11);
        assert_eq!(derive_house(7, 3), 9);
        assert_eq!(derive_house(10, 2), 11);
        assert_eq!(derive_house(12, 2), 1);
        assert_eq!(derive_house(1, 1), 1);
    }

    #[test]
    fn test_sale_with_item_uses_natural_significator() {
        let a = classify("Will I sell my car this month?");
        assert_eq!(a.question_type, QuestionType::Money);
        assert_eq!(a.relevant_houses, vec![1, 7]);
        let item = a.significators.transaction_item.as_ref().unwrap();
        assert_eq!(item.name, "car");
        assert_eq!(item.planet, Planet::Sun);
        assert!(a.significators.transaction_type);
        assert_eq!(a.timeframe_analysis.unwrap().kind, TimeframeKind::ThisMonth);
    }

    #[test]
    fn test_career_is_not_mistaken_for_car() {
        let a = classify("Will my career improve?");
        assert_eq!(a.question_type, QuestionType::Career);
        assert_eq!(a.significators.quesited_house, 10);
    }

    #[test]
    fn test_education_beats_lawsuit_for_exams() {
        let a = classify("Will I pass the exam on legal ethics?");
        assert_eq!(a.question_type, QuestionType::Education);
        assert_eq!(a.significators.quesited_house, 9);
    }

    #[test]
    fn test_third_person_education_turns_houses() {
        let a = classify("Will he pass the exam?");
        assert_eq!(a.relevant_houses, vec![1, 7, 9, 10]);
        assert_eq!(a.significators.quesited_house, 10);
        assert_eq!(
            a.significators.third_person,
            Some(ThirdPersonRoles::Education {
                student_house: 7,
                preparation_house: 9,
                success_house: 10,
            })
        );
    }

    #[test]
    fn test_third_person_pregnancy() {
        let a = classify("Is she pregnant?");
        assert_eq!(a.question_type, QuestionType::Pregnancy);
        assert_eq!(a.significators.quesited_house, 11);
    }

    #[test]
    fn test_relationship_quesited_is_seventh() {
        let a = classify("Does he love me?");
        assert_eq!(a.question_type, QuestionType::Relationship);
        assert_eq!(a.significators.quesited_house, 7);
    }

    #[test]
    fn test_general_fallback_and_manual_houses() {
        let a = classify("Should I?");
        assert_eq!(a.question_type, QuestionType::General);
        assert_eq!(a.relevant_houses, vec![1, 7]);

        let manual = a.with_manual_houses(&[1, 5]);
        assert_eq!(manual.significators.quesited_house, 5);
        assert_eq!(manual.relevant_houses, vec![1, 5]);
    }

    #[test]
    fn test_timeframe_end_dates() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
        let month = classify("Will it happen this month?").timeframe_analysis.unwrap();
        assert_eq!(month.end_date(today), NaiveDate::from_ymd_opt(2024, 2, 29));

        let named = classify("Will I hear back in june?").timeframe_analysis.unwrap();
        assert_eq!(named.kind, TimeframeKind::SpecificMonth);
        assert_eq!(named.end_date(today), NaiveDate::from_ymd_opt(2024, 6, 30));
    }
}
