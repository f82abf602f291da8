//! English/Hebrew string table for operator-facing text

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    He,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::He => "he",
        }
    }

    /// Text direction for the rendering layer
    pub fn direction(&self) -> &'static str {
        match self {
            Self::En => "ltr",
            Self::He => "rtl",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "he" => Ok(Self::He),
            other => Err(format!("unsupported language '{}'", other)),
        }
    }
}

// (key, en, he)
const TRANSLATIONS: &[(&str, &str, &str)] = &[
    ("app.title", "Calling App", "אפליקציית שיחות"),
    ("app.subtitle", "Bridge calls to your phone", "גשר שיחות לטלפון שלך"),
    ("agent.number", "Agent Phone Number", "מספר טלפון של הסוכן"),
    ("customer.number", "Customer Phone Number", "מספר טלפון של הלקוח"),
    ("button.bridge", "Bridge Call", "גשר שיחה"),
    ("button.connecting", "Connecting...", "מתחבר..."),
    ("button.tripleCall", "Triple Call Leads", "שיחה משולשת ללידים"),
    ("button.viewHistory", "View Call History", "צפה בהיסטוריית שיחות"),
    ("history.title", "Call History", "היסטוריית שיחות"),
    ("history.subtitle", "Recent calls bridged to agents", "שיחות אחרונות שגושרו לסוכנים"),
    ("history.viewFull", "View Full History", "צפה בהיסטוריה מלאה"),
    ("history.fullTitle", "Complete record of calls bridged to agents", "רשומה מלאה של שיחות שגושרו לסוכנים"),
    ("history.back", "Back to Calling App", "חזרה לאפליקציית השיחות"),
    ("table.datetime", "Date & Time", "תאריך ושעה"),
    ("table.customer", "Customer Number", "מספר לקוח"),
    ("table.agent", "Agent Number", "מספר סוכן"),
    ("table.status", "Status", "סטטוס"),
    ("table.duration", "Duration", "משך"),
    ("table.seconds", "{count} seconds", "{count} שניות"),
    ("table.notAvailable", "N/A", "לא זמין"),
    ("status.connected", "Connected", "מחובר"),
    ("status.busy", "Busy", "תפוס"),
    ("status.failed", "Failed", "נכשל"),
    ("status.noanswer", "No Answer", "אין מענה"),
    ("status.canceled", "Canceled", "בוטל"),
    ("status.queued", "Queued", "בתור"),
    ("status.initiated", "Initiated", "הותחל"),
    ("status.ringing", "Ringing", "מצלצל"),
    ("status.unknown", "Unknown", "לא ידוע"),
    ("bridge.failed", "Failed to initiate call", "הפעלת השיחה נכשלה"),
    ("triple.success", "Successfully initiated calls to {count} leads", "הופעלו בהצלחה שיחות ל-{count} לידים"),
    ("triple.failed", "Failed to initiate calls", "הפעלת השיחות נכשלה"),
    ("placeholder.agent", "Enter your phone number", "הזן את מספר הטלפון שלך"),
    ("placeholder.customer", "Enter customer phone number", "הזן את מספר הטלפון של הלקוח"),
];

/// Lookup table bound to one language
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog {
    language: Language,
}

impl Catalog {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Translated text, or the key itself when it is missing
    pub fn t(&self, key: &str) -> String {
        match TRANSLATIONS.iter().find(|(k, _, _)| *k == key) {
            Some((_, en, he)) => match self.language {
                Language::En => en.to_string(),
                Language::He => he.to_string(),
            },
            None => {
                warn!(key = %key, "Translation key not found");
                key.to_string()
            }
        }
    }

    /// [`Catalog::t`] with `{name}` placeholders substituted
    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter().fold(self.t(key), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
    }
}
