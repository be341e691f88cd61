use crate::domain::{CheckinId, CommentBody};

#[derive(Debug)]
pub struct NewComment {
    pub body: CommentBody,
    pub checkin_id: CheckinId,
}

impl NewComment {
    pub fn parse(body: String, checkin_id: String) -> Result<Self, String> {
        Ok(Self {
            body: CommentBody::parse(body)?,
            checkin_id: CheckinId::parse(checkin_id)?,
        })
    }
}
