use serde::{Deserialize, Serialize};
use tracing::warn;

/// Upper bound on the optional free-text answer.
pub const NOTES_MAX_CHARS: usize = 500;

/// Collapse the differences a human-entered option key can carry: leading and
/// trailing space, casing, and `-` versus ` ` separators.
fn canonical(value: &str) -> String {
    value
        .trim()
        .to_ascii_lowercase()
        .replace('-', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// A yes/no answer to one of the ten binary questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Binary {
    Yes,
    No,
}

impl Binary {
    pub fn key(self) -> &'static str {
        match self {
            Binary::Yes => "yes",
            Binary::No => "no",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Binary::Yes => "Yes",
            Binary::No => "No",
        }
    }

    pub fn from_key(value: &str) -> Option<Self> {
        match canonical(value).as_str() {
            "yes" => Some(Binary::Yes),
            "no" => Some(Binary::No),
            _ => None,
        }
    }
}

macro_rules! categorical {
    ($(#[$doc:meta])* $name:ident { $($variant:ident => $key:literal, $label:literal;)+ }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const OPTIONS: &'static [$name] = &[$($name::$variant,)+];

            pub fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn from_key(value: &str) -> Option<Self> {
                let normalized = canonical(value);
                Self::OPTIONS
                    .iter()
                    .copied()
                    .find(|option| canonical(option.key()) == normalized)
            }
        }
    };
}

categorical! {
    /// Where the founder's business currently sits.
    CurrentStage {
        Solo => "solo", "Solo";
        SmallTeam => "small-team", "Small Team";
        Scaling => "scaling", "Scaling";
        Established => "established", "Established";
    }
}

categorical! {
    /// The single outcome the founder wants from the next quarter.
    NinetyDayGoal {
        Automate => "automate", "Automate";
        Streamline => "streamline", "Streamline";
        Launch => "launch", "Launch";
        Scale => "scale", "Scale";
        WorkLess => "work-less", "Work Less";
    }
}

categorical! {
    BiggestObstacle {
        ManualTasks => "manual-tasks", "Manual Tasks";
        NoSystems => "no-systems", "No Systems";
        TeamDependence => "team-dependence", "Team Dependence";
        ProductNotConverting => "product-not-converting", "Product Not Converting";
        WeakMarketing => "weak-marketing", "Weak Marketing";
    }
}

categorical! {
    PreferredPath {
        DiyLearning => "diy-learning", "DIY Learning";
        Coaching => "coaching", "Coaching";
        Software => "software", "Software";
        DoneForYou => "done-for-you", "Done-For-You";
    }
}

/// Statically-checked key for every answer field. All cross-field access
/// goes through this enum so a typo is a compile error, not a silent miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerField {
    Q1,
    Q2,
    Q3,
    Q4,
    Q5,
    Q6,
    Q7,
    Q8,
    Q9,
    Q10,
    CurrentStage,
    NinetyDayGoal,
    BiggestObstacle,
    PreferredPath,
    Notes,
}

impl AnswerField {
    /// Every field in wizard presentation order.
    pub const ALL: [AnswerField; 15] = [
        AnswerField::Q1,
        AnswerField::Q2,
        AnswerField::Q3,
        AnswerField::Q4,
        AnswerField::Q5,
        AnswerField::Q6,
        AnswerField::Q7,
        AnswerField::Q8,
        AnswerField::Q9,
        AnswerField::Q10,
        AnswerField::CurrentStage,
        AnswerField::NinetyDayGoal,
        AnswerField::BiggestObstacle,
        AnswerField::PreferredPath,
        AnswerField::Notes,
    ];

    pub fn key(self) -> &'static str {
        match self {
            AnswerField::Q1 => "q1",
            AnswerField::Q2 => "q2",
            AnswerField::Q3 => "q3",
            AnswerField::Q4 => "q4",
            AnswerField::Q5 => "q5",
            AnswerField::Q6 => "q6",
            AnswerField::Q7 => "q7",
            AnswerField::Q8 => "q8",
            AnswerField::Q9 => "q9",
            AnswerField::Q10 => "q10",
            AnswerField::CurrentStage => "current_stage",
            AnswerField::NinetyDayGoal => "next_90_day_goal",
            AnswerField::BiggestObstacle => "biggest_obstacle",
            AnswerField::PreferredPath => "preferred_path",
            AnswerField::Notes => "notes",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.key() == key)
    }

    /// Question text shown at this field's wizard step.
    pub fn prompt(self) -> &'static str {
        match self {
            AnswerField::Q1 => "Do you spend most of your week on operations?",
            AnswerField::Q2 => "Do you have documented systems / SOPs?",
            AnswerField::Q3 => "Does revenue depend on your time?",
            AnswerField::Q4 => "Can your team deliver without you?",
            AnswerField::Q5 => "Could you leave for two weeks and stay profitable?",
            AnswerField::Q6 => "Do you review key metrics weekly?",
            AnswerField::Q7 => "Are workflows automated with AI or software?",
            AnswerField::Q8 => "Do you block time for strategy and creation?",
            AnswerField::Q9 => "Are quarterly goals clear and executed?",
            AnswerField::Q10 => "Is your brand and marketing consistent?",
            AnswerField::CurrentStage => "Current Stage?",
            AnswerField::NinetyDayGoal => "Next 90-Day Goal?",
            AnswerField::BiggestObstacle => "Biggest Obstacle?",
            AnswerField::PreferredPath => "Preferred Path?",
            AnswerField::Notes => "Anything else?",
        }
    }

    pub fn is_binary(self) -> bool {
        matches!(
            self,
            AnswerField::Q1
                | AnswerField::Q2
                | AnswerField::Q3
                | AnswerField::Q4
                | AnswerField::Q5
                | AnswerField::Q6
                | AnswerField::Q7
                | AnswerField::Q8
                | AnswerField::Q9
                | AnswerField::Q10
        )
    }

    /// Notes is the only field that may stay empty through finalization.
    pub fn is_required(self) -> bool {
        !matches!(self, AnswerField::Notes)
    }

    /// Option keys a respondent may pick for this field (empty for notes).
    pub fn option_keys(self) -> Vec<&'static str> {
        match self {
            field if field.is_binary() => vec![Binary::Yes.key(), Binary::No.key()],
            AnswerField::CurrentStage => {
                CurrentStage::OPTIONS.iter().map(|o| o.key()).collect()
            }
            AnswerField::NinetyDayGoal => {
                NinetyDayGoal::OPTIONS.iter().map(|o| o.key()).collect()
            }
            AnswerField::BiggestObstacle => {
                BiggestObstacle::OPTIONS.iter().map(|o| o.key()).collect()
            }
            AnswerField::PreferredPath => {
                PreferredPath::OPTIONS.iter().map(|o| o.key()).collect()
            }
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AnswerParseError {
    #[error("'{value}' is not a valid answer for {field:?}")]
    UnknownValue { field: AnswerField, value: String },
    #[error("notes exceed {NOTES_MAX_CHARS} characters ({len})")]
    NotesTooLong { len: usize },
}

/// The fixed 15-field record of a respondent's quiz answers.
///
/// Unanswered fields are `None`; `notes` may legitimately stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSet {
    pub q1: Option<Binary>,
    pub q2: Option<Binary>,
    pub q3: Option<Binary>,
    pub q4: Option<Binary>,
    pub q5: Option<Binary>,
    pub q6: Option<Binary>,
    pub q7: Option<Binary>,
    pub q8: Option<Binary>,
    pub q9: Option<Binary>,
    pub q10: Option<Binary>,
    pub current_stage: Option<CurrentStage>,
    pub next_90_day_goal: Option<NinetyDayGoal>,
    pub biggest_obstacle: Option<BiggestObstacle>,
    pub preferred_path: Option<PreferredPath>,
    pub notes: String,
}

impl AnswerSet {
    pub fn binary(&self, field: AnswerField) -> Option<Binary> {
        match field {
            AnswerField::Q1 => self.q1,
            AnswerField::Q2 => self.q2,
            AnswerField::Q3 => self.q3,
            AnswerField::Q4 => self.q4,
            AnswerField::Q5 => self.q5,
            AnswerField::Q6 => self.q6,
            AnswerField::Q7 => self.q7,
            AnswerField::Q8 => self.q8,
            AnswerField::Q9 => self.q9,
            AnswerField::Q10 => self.q10,
            _ => None,
        }
    }

    /// Canonical key form of the stored answer, `None` when unanswered.
    /// For notes, empty text counts as unanswered.
    pub fn value(&self, field: AnswerField) -> Option<String> {
        match field {
            field if field.is_binary() => self.binary(field).map(|b| b.key().to_string()),
            AnswerField::CurrentStage => self.current_stage.map(|v| v.key().to_string()),
            AnswerField::NinetyDayGoal => self.next_90_day_goal.map(|v| v.key().to_string()),
            AnswerField::BiggestObstacle => self.biggest_obstacle.map(|v| v.key().to_string()),
            AnswerField::PreferredPath => self.preferred_path.map(|v| v.key().to_string()),
            AnswerField::Notes => {
                let trimmed = self.notes.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            _ => None,
        }
    }

    /// Display label of the stored answer, for human-readable summaries.
    pub fn label(&self, field: AnswerField) -> Option<String> {
        match field {
            field if field.is_binary() => self.binary(field).map(|b| b.label().to_string()),
            AnswerField::CurrentStage => self.current_stage.map(|v| v.label().to_string()),
            AnswerField::NinetyDayGoal => self.next_90_day_goal.map(|v| v.label().to_string()),
            AnswerField::BiggestObstacle => self.biggest_obstacle.map(|v| v.label().to_string()),
            AnswerField::PreferredPath => self.preferred_path.map(|v| v.label().to_string()),
            AnswerField::Notes => self.value(AnswerField::Notes),
            _ => None,
        }
    }

    pub fn is_answered(&self, field: AnswerField) -> bool {
        self.value(field).is_some()
    }

    /// First required field still missing, in presentation order.
    pub fn missing_required(&self) -> Option<AnswerField> {
        AnswerField::ALL
            .iter()
            .copied()
            .find(|field| field.is_required() && !self.is_answered(*field))
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required().is_none()
    }

    /// Store a raw answer. An empty raw value clears the field.
    pub fn set(&mut self, field: AnswerField, raw: &str) -> Result<(), AnswerParseError> {
        if raw.trim().is_empty() && field != AnswerField::Notes {
            self.clear(field);
            return Ok(());
        }

        let unknown = || AnswerParseError::UnknownValue {
            field,
            value: raw.to_string(),
        };

        match field {
            AnswerField::Q1
            | AnswerField::Q2
            | AnswerField::Q3
            | AnswerField::Q4
            | AnswerField::Q5
            | AnswerField::Q6
            | AnswerField::Q7
            | AnswerField::Q8
            | AnswerField::Q9
            | AnswerField::Q10 => {
                let value = Binary::from_key(raw).ok_or_else(unknown)?;
                self.set_binary(field, Some(value));
            }
            AnswerField::CurrentStage => {
                self.current_stage = Some(CurrentStage::from_key(raw).ok_or_else(unknown)?);
            }
            AnswerField::NinetyDayGoal => {
                self.next_90_day_goal = Some(NinetyDayGoal::from_key(raw).ok_or_else(unknown)?);
            }
            AnswerField::BiggestObstacle => {
                self.biggest_obstacle = Some(BiggestObstacle::from_key(raw).ok_or_else(unknown)?);
            }
            AnswerField::PreferredPath => {
                self.preferred_path = Some(PreferredPath::from_key(raw).ok_or_else(unknown)?);
            }
            AnswerField::Notes => {
                let len = raw.chars().count();
                if len > NOTES_MAX_CHARS {
                    return Err(AnswerParseError::NotesTooLong { len });
                }
                self.notes = raw.trim().to_string();
            }
        }

        Ok(())
    }

    fn set_binary(&mut self, field: AnswerField, value: Option<Binary>) {
        match field {
            AnswerField::Q1 => self.q1 = value,
            AnswerField::Q2 => self.q2 = value,
            AnswerField::Q3 => self.q3 = value,
            AnswerField::Q4 => self.q4 = value,
            AnswerField::Q5 => self.q5 = value,
            AnswerField::Q6 => self.q6 = value,
            AnswerField::Q7 => self.q7 = value,
            AnswerField::Q8 => self.q8 = value,
            AnswerField::Q9 => self.q9 = value,
            AnswerField::Q10 => self.q10 = value,
            _ => {}
        }
    }

    fn clear(&mut self, field: AnswerField) {
        match field {
            field if field.is_binary() => self.set_binary(field, None),
            AnswerField::CurrentStage => self.current_stage = None,
            AnswerField::NinetyDayGoal => self.next_90_day_goal = None,
            AnswerField::BiggestObstacle => self.biggest_obstacle = None,
            AnswerField::PreferredPath => self.preferred_path = None,
            AnswerField::Notes => self.notes.clear(),
            _ => {}
        }
    }

    /// Lenient decode from key/value parameters (one transport encoding of
    /// the answer set, not the data model). Absent keys stay unanswered,
    /// unrecognized values are dropped with a warning, and overlong notes
    /// are truncated rather than rejected.
    pub fn from_params<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut answers = AnswerSet::default();
        for (key, raw) in params {
            let Some(field) = AnswerField::from_key(key) else {
                continue;
            };
            let raw = if field == AnswerField::Notes && raw.chars().count() > NOTES_MAX_CHARS {
                warn!(field = field.key(), "notes truncated to {NOTES_MAX_CHARS} characters");
                &raw[..raw
                    .char_indices()
                    .nth(NOTES_MAX_CHARS)
                    .map(|(idx, _)| idx)
                    .unwrap_or(raw.len())]
            } else {
                raw
            };
            if let Err(err) = answers.set(field, raw) {
                warn!(field = field.key(), %err, "dropping unrecognized answer value");
            }
        }
        answers
    }

    /// Encode every field as key/value pairs; unanswered fields serialize as
    /// empty strings so the full shape survives the handoff.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        AnswerField::ALL
            .iter()
            .map(|field| (field.key(), self.value(*field).unwrap_or_default()))
            .collect()
    }
}
