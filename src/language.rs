use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use whatlang::Lang;

/// Language of an article's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Language {
    German,
    English,
    /// Any other language, by its ISO 639-3 code.
    Other(String),
}

impl Language {
    /// The ISO code, e.g. `de`.
    pub fn identifier(&self) -> &str {
        match self {
            Language::German => "de",
            Language::English => "en",
            Language::Other(s) => s.as_str(),
        }
    }

    /// Detect the language of `text`, `None` for blank text or if no
    /// language could be detected.
    pub fn detect(text: &str) -> Option<Language> {
        if text.trim().is_empty() {
            return None;
        }
        whatlang::detect(text).map(|info| info.lang().into())
    }
}

impl From<Lang> for Language {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::Deu => Language::German,
            Lang::Eng => Language::English,
            other => Language::Other(other.code().to_string()),
        }
    }
}

impl FromStr for Language {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Ok(match s.as_str() {
            "de" | "deu" => Language::German,
            "en" | "eng" => Language::English,
            _ => Language::Other(s),
        })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.identifier())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_else(|never| match never {}))
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::German
    }
}
