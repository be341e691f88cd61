use std::fmt::{self, Display, Formatter};

use serde::Serialize;

const MAX_ID_LEN: usize = 64;

fn parse_identifier(s: String, kind: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err(format!("Invalid {kind}: cannot be empty."));
    }

    if s.len() > MAX_ID_LEN {
        return Err(format!(
            "Invalid {kind}: cannot be longer than {MAX_ID_LEN} characters."
        ));
    }

    if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!("Invalid {kind}: must be alphanumeric."));
    }

    Ok(s)
}

macro_rules! identifier {
    ($name:ident, $kind:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn parse(s: String) -> Result<Self, String> {
                parse_identifier(s, $kind).map(Self)
            }

            /// For ids read back from storage or produced by this crate.
            pub(crate) fn from_trusted(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

identifier!(CheckinId, "checkin id");
identifier!(CommentId, "comment id");

/// A user id as handed out by the identity collaborator. Never parsed from
/// client input, so it carries no format rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
