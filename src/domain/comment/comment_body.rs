use std::fmt::{self, Display, Formatter};

use unicode_segmentation::UnicodeSegmentation;

const MAX_GRAPHEMES: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBody(String);

impl CommentBody {
    pub fn parse(s: String) -> Result<Self, String> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err("Invalid comment: cannot be empty.".to_string());
        }

        if trimmed.graphemes(true).count() > MAX_GRAPHEMES {
            return Err(format!(
                "Invalid comment: cannot exceed {MAX_GRAPHEMES} characters."
            ));
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for CommentBody {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CommentBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
