use crate::merge::{concat_notes, push_unique};
use crate::output::UtilityNoticeRequirement;

/// Merges utility notice requirements.
///
/// Notice lead time takes the maximum, utility types are unioned keeping
/// first-seen order, and notes are concatenated in input order.
#[must_use]
pub fn merge_utility_notice_requirements<'a, I>(requirements: I) -> UtilityNoticeRequirement
where
    I: IntoIterator<Item = &'a UtilityNoticeRequirement>,
{
    let mut notice_hours = 0;
    let mut utility_types = Vec::new();
    let mut notes = Vec::new();

    for req in requirements {
        notice_hours = notice_hours.max(req.notice_hours);
        for t in &req.utility_types {
            push_unique(&mut utility_types, t);
        }
        notes.push(req.notes.as_deref());
    }

    UtilityNoticeRequirement {
        notice_hours,
        utility_types,
        notes: concat_notes(notes),
    }
}
