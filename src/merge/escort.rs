use crate::merge::concat_notes;
use crate::output::EscortRequirement;

/// Merges escort requirements.
///
/// Escort counts take the maximum (0 when empty), height poles are OR-ed
/// (`false` when empty), and notes are concatenated in input order.
#[must_use]
pub fn merge_escort_requirements<'a, I>(requirements: I) -> EscortRequirement
where
    I: IntoIterator<Item = &'a EscortRequirement>,
{
    let mut front_escorts = 0;
    let mut rear_escorts = 0;
    let mut front_pole = false;
    let mut rear_pole = false;
    let mut notes = Vec::new();

    for req in requirements {
        front_escorts = front_escorts.max(req.front_escorts);
        rear_escorts = rear_escorts.max(req.rear_escorts);
        front_pole |= req.front_has_height_pole.unwrap_or(false);
        rear_pole |= req.rear_has_height_pole.unwrap_or(false);
        notes.push(req.notes.as_deref());
    }

    EscortRequirement {
        front_escorts,
        rear_escorts,
        front_has_height_pole: Some(front_pole),
        rear_has_height_pole: Some(rear_pole),
        notes: concat_notes(notes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_take_the_maximum() {
        let reqs = [
            EscortRequirement::new(1, 0),
            EscortRequirement::new(2, 1),
            EscortRequirement::new(1, 2),
        ];
        let merged = merge_escort_requirements(&reqs);
        assert_eq!(merged.front_escorts, 2);
        assert_eq!(merged.rear_escorts, 2);
    }

    #[test]
    fn height_poles_are_or_ed() {
        let front = EscortRequirement {
            front_has_height_pole: Some(true),
            ..EscortRequirement::new(1, 0)
        };
        let rear = EscortRequirement {
            rear_has_height_pole: Some(false),
            ..EscortRequirement::new(0, 1)
        };
        let merged = merge_escort_requirements([&front, &rear]);
        assert_eq!(merged.front_has_height_pole, Some(true));
        assert_eq!(merged.rear_has_height_pole, Some(false));

        // Order does not matter.
        let merged = merge_escort_requirements([&rear, &front]);
        assert_eq!(merged.front_has_height_pole, Some(true));
    }

    #[test]
    fn notes_are_concatenated() {
        let reqs = [
            EscortRequirement::new(1, 0).with_notes("Note 1"),
            EscortRequirement::new(1, 0),
            EscortRequirement::new(1, 0).with_notes("Note 2"),
        ];
        let notes = merge_escort_requirements(&reqs).notes.unwrap();
        assert!(notes.contains("Note 1"));
        assert!(notes.contains("Note 2"));
        assert!(notes.find("Note 1") < notes.find("Note 2"));
    }

    #[test]
    fn empty_input_defaults() {
        let merged = merge_escort_requirements(std::iter::empty::<&EscortRequirement>());
        assert_eq!(merged.front_escorts, 0);
        assert_eq!(merged.rear_escorts, 0);
        assert_eq!(merged.front_has_height_pole, Some(false));
        assert_eq!(merged.rear_has_height_pole, Some(false));
        assert!(merged.notes.is_none());
    }
}
