use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);
    };
}

id_newtype!(EventId);
id_newtype!(TicketId);
id_newtype!(LineupId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FestivalDate {
    FirstDay,
    SecondDay,
    ThirdDay,
}

impl FestivalDate {
    pub const ALL: [FestivalDate; 3] = [Self::FirstDay, Self::SecondDay, Self::ThirdDay];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstDay => "FIRST_DAY",
            Self::SecondDay => "SECOND_DAY",
            Self::ThirdDay => "THIRD_DAY",
        }
    }
}

/// Opaque credential issued by the verification endpoint. Threaded through
/// the signup pages without being inspected.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignupToken(String);

impl SignupToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SignupToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SignupToken(..)")
    }
}
