use std::fmt;
use std::slice::Iter;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};

use crate::date::DateRange;
use crate::error::PressespiegelError;
use crate::keywords::{KeywordConfig, Keywords};

/// The news topics a corpus can be collected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    RefugeesMigration,
    Grundeinkommen,
    GreenDeal,
    WindPower,
    Homeopathy,
    LegalizationSoftDrugs,
}

impl Topic {
    /// All known topics.
    pub fn known_topics() -> Iter<'static, Topic> {
        static TOPICS: [Topic; 6] = [
            Topic::RefugeesMigration,
            Topic::Grundeinkommen,
            Topic::GreenDeal,
            Topic::WindPower,
            Topic::Homeopathy,
            Topic::LegalizationSoftDrugs,
        ];
        TOPICS.iter()
    }

    /// Name of the topic, also used as its data directory.
    pub fn identifier(&self) -> &'static str {
        match self {
            Topic::RefugeesMigration => "refugees_migration",
            Topic::Grundeinkommen => "grundeinkommen",
            Topic::GreenDeal => "green_deal",
            Topic::WindPower => "wind_power",
            Topic::Homeopathy => "homeopathy",
            Topic::LegalizationSoftDrugs => "legalization_soft_drugs",
        }
    }

    /// The keyword stems articles of this topic are queried with.
    pub fn keywords(&self) -> Keywords {
        fn stems(stems: &[&str]) -> Vec<String> {
            stems.iter().map(|s| s.to_string()).collect()
        }

        match self {
            Topic::RefugeesMigration => Keywords::Stems(stems(&[
                "flüchtl",
                "geflücht",
                "asyl",
                "zuwander",
                "immigrant",
                "immigration",
                "migration",
                "migrant",
                "ausländer",
                "einwander",
                "refug",
                "rapefug",
                "invasor",
            ])),
            Topic::Grundeinkommen => {
                Keywords::Stems(stems(&["grundeinkommen", "bedingungslos einkommen"]))
            }
            Topic::GreenDeal => {
                Keywords::Stems(stems(&["green deal", "eu green deal", "eu grüne deal"]))
            }
            Topic::WindPower => {
                Keywords::Stems(stems(&["windkraft", "windenergie", "windrad", "windräder"]))
            }
            Topic::Homeopathy => Keywords::Stems(stems(&[
                "homöopathie",
                "globuli",
                "alternativmedizin",
                "alternativ medizin",
            ])),
            Topic::LegalizationSoftDrugs => Keywords::Combination(vec![
                stems(&["weich droge", "soft drug", "soft droge", "entkriminalisierung"]),
                stems(&[
                    "marihuana",
                    "cannabis",
                    "hanf",
                    "haschisch",
                    "tetrahydrocannabinol",
                    "thc",
                    "weed",
                    "psilocybin",
                    "psilocin",
                    "magic mushroom",
                    "zauberpilz",
                    "halluzinogen pilz",
                ]),
                stems(&["legal", "entkriminalisierung"]),
            ]),
        }
    }

    /// The keyword policy with the default thresholds.
    pub fn keyword_config(&self) -> Result<KeywordConfig, PressespiegelError> {
        KeywordConfig::from_keywords(
            self.keywords(),
            KeywordConfig::DEFAULT_MIN_FREQUENCY,
            KeywordConfig::DEFAULT_MIN_DISTANCE,
        )
    }

    /// The publication window articles of this topic were collected for.
    pub fn date_range(&self) -> DateRange {
        let (start, end) = match self {
            Topic::RefugeesMigration => ((2019, 1, 1), (2020, 10, 20)),
            Topic::Grundeinkommen => ((2015, 1, 1), (2020, 12, 16)),
            Topic::GreenDeal => ((2019, 12, 1), (2021, 1, 31)),
            Topic::WindPower | Topic::Homeopathy | Topic::LegalizationSoftDrugs => {
                ((2015, 1, 1), (2021, 1, 31))
            }
        };
        let date = |(y, m, d): (i32, u32, u32)| {
            NaiveDate::from_ymd_opt(y, m, d)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .unwrap_or(NaiveDateTime::MIN)
        };
        DateRange::new(date(start), date(end))
    }
}

impl Default for Topic {
    fn default() -> Self {
        Topic::RefugeesMigration
    }
}

impl FromStr for Topic {
    type Err = PressespiegelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Topic::known_topics()
            .find(|topic| topic.identifier() == s)
            .copied()
            .ok_or(PressespiegelError::UnknownTopic(s))
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}
