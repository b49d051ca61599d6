//! Offline English → Korean dictionary used when no remote translation is available.
//!
//! The transform is lossy: sentence punctuation is normalized to ". " and
//! unknown words are echoed back untouched.

use std::collections::HashMap;

/// Whole-phrase entries, matched against a full input or a full sentence.
const PHRASES: &[(&str, &str)] = &[
    ("hello world", "안녕, 세상"),
    ("good morning", "좋은 아침"),
    ("good evening", "좋은 저녁"),
    ("good night", "잘 자"),
    ("thank you", "감사합니다"),
    ("how are you", "어떻게 지내세요"),
    ("i am fine", "저는 괜찮습니다"),
    ("what is your name", "이름이 뭐예요"),
    ("nice to meet you", "만나서 반갑습니다"),
    ("see you later", "나중에 봐요"),
    ("have a good day", "좋은 하루 보내세요"),
];

/// Single-word entries. An empty translation means "drop this word".
const WORDS: &[(&str, &str)] = &[
    // greetings, time, place
    ("hello", "안녕하세요"),
    ("hi", "안녕"),
    ("world", "세상"),
    ("good", "좋은"),
    ("bad", "나쁜"),
    ("morning", "아침"),
    ("afternoon", "오후"),
    ("evening", "저녁"),
    ("night", "밤"),
    ("today", "오늘"),
    ("tomorrow", "내일"),
    ("yesterday", "어제"),
    ("now", "지금"),
    ("later", "나중에"),
    ("here", "여기"),
    ("there", "저기"),
    ("this", "이것"),
    ("that", "저것"),
    ("these", "이것들"),
    ("those", "저것들"),
    // pronouns
    ("i", "나는"),
    ("you", "당신은"),
    ("he", "그는"),
    ("she", "그녀는"),
    ("we", "우리는"),
    ("they", "그들은"),
    ("my", "나의"),
    ("your", "당신의"),
    ("his", "그의"),
    ("her", "그녀의"),
    ("our", "우리의"),
    ("their", "그들의"),
    ("me", "나를"),
    ("him", "그를"),
    ("us", "우리를"),
    ("them", "그들을"),
    // verbs
    ("am", "입니다"),
    ("is", "입니다"),
    ("are", "입니다"),
    ("was", "였습니다"),
    ("were", "였습니다"),
    ("have", "가지고 있다"),
    ("has", "가지고 있다"),
    ("do", "하다"),
    ("does", "하다"),
    ("did", "했다"),
    ("will", "할 것이다"),
    ("would", "할 것이다"),
    ("can", "할 수 있다"),
    ("could", "할 수 있었다"),
    ("should", "해야 한다"),
    ("must", "해야 한다"),
    ("go", "가다"),
    ("come", "오다"),
    ("see", "보다"),
    ("look", "보다"),
    ("hear", "듣다"),
    ("listen", "듣다"),
    ("speak", "말하다"),
    ("talk", "이야기하다"),
    ("say", "말하다"),
    ("tell", "말하다"),
    ("know", "알다"),
    ("think", "생각하다"),
    ("want", "원하다"),
    ("need", "필요하다"),
    ("like", "좋아하다"),
    ("love", "사랑하다"),
    ("eat", "먹다"),
    ("drink", "마시다"),
    ("sleep", "자다"),
    ("work", "일하다"),
    ("play", "놀다"),
    ("study", "공부하다"),
    ("learn", "배우다"),
    ("teach", "가르치다"),
    ("read", "읽다"),
    ("write", "쓰다"),
    // function words
    ("the", ""),
    ("a", ""),
    ("an", ""),
    ("and", "그리고"),
    ("or", "또는"),
    ("but", "하지만"),
    ("so", "그래서"),
    ("if", "만약"),
    ("when", "언제"),
    ("where", "어디"),
    ("what", "무엇"),
    ("who", "누구"),
    ("why", "왜"),
    ("how", "어떻게"),
    ("yes", "네"),
    ("no", "아니오"),
    ("not", "않다"),
    ("very", "매우"),
    ("really", "정말"),
    ("please", "부탁합니다"),
    ("sorry", "죄송합니다"),
    ("excuse", "실례합니다"),
    ("thank", "감사"),
    ("welcome", "환영합니다"),
];

const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?'];
const TOKEN_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '(', ')', '"'];

#[derive(Debug, Clone)]
pub struct Dictionary {
    entries: HashMap<String, String>,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Dictionary {
    pub fn builtin() -> Self {
        let entries = PHRASES
            .iter()
            .chain(WORDS.iter())
            .map(|(en, ko)| (en.to_string(), ko.to_string()))
            .collect();
        Self { entries }
    }

    /// Built-in table plus `overrides`; override keys are normalized and win on conflict.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut dict = Self::builtin();
        for (key, value) in overrides {
            dict.entries.insert(normalize(key.as_ref()), value.into());
        }
        dict
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, phrase: &str) -> Option<&str> {
        self.entries.get(&normalize(phrase)).map(String::as_str)
    }

    /// Translate `text`. Never fails; unknown words pass through unchanged.
    pub fn translate(&self, text: &str) -> String {
        if let Some(whole) = self.lookup(text) {
            return whole.to_string();
        }

        text.split(SENTENCE_TERMINATORS)
            .filter(|segment| !segment.trim().is_empty())
            .map(|segment| self.translate_segment(segment))
            .collect::<Vec<_>>()
            .join(". ")
    }

    fn translate_segment(&self, segment: &str) -> String {
        if let Some(whole) = self.lookup(segment) {
            return whole.to_string();
        }

        segment
            .split_whitespace()
            .filter_map(|word| {
                let clean = word.trim_matches(TOKEN_PUNCTUATION).to_lowercase();
                match self.entries.get(&clean) {
                    Some(ko) if ko.is_empty() => None,
                    Some(ko) => Some(ko.as_str()),
                    None => Some(word),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
