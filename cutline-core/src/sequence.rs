//! Sequences and the range math of their children
//!
//! Children of a [`Sequence`] play one after another. Transitions are the
//! exception: they overlap the items on either side, so they never advance
//! the running start time and are placed `in_offset` before the position they
//! would otherwise occupy.

use crate::{Error, Gap, Item, ItemKind, RationalTime, Result, TimeRange};
use std::borrow::Cow;
use tracing::debug;

/// Media type a sequence carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SequenceKind {
    #[default]
    Video,
    Audio,
}

/// Decides whether [`Sequence::neighbors_of`] synthesizes gaps at the edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeighborGapPolicy {
    /// Items at either edge have no neighbor on that side
    #[default]
    Never,
    /// Transitions at either edge get a gap sized to the offset they borrow
    AroundTransitions,
}

/// An ordered run of items played back to back
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sequence {
    /// Display name
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Media type of the sequence
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: SequenceKind,
    /// Override of the sequence's extent, shifting its start and cropping either edge
    #[cfg_attr(feature = "serde", serde(default))]
    pub source_range: Option<TimeRange>,
    #[cfg_attr(feature = "serde", serde(default))]
    children: Vec<Item>,
}

impl Sequence {
    /// Creates an empty video sequence
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Appends the given children in order
    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Item>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Sets the range that trims the sequence
    pub fn with_source_range(mut self, source_range: TimeRange) -> Self {
        self.source_range = Some(source_range);
        self
    }

    /// Sets the media type of the sequence
    pub fn with_kind(mut self, kind: SequenceKind) -> Self {
        self.kind = kind;
        self
    }

    /// Appends a child at the end of the sequence
    pub fn push(&mut self, item: impl Into<Item>) {
        self.children.push(item.into());
    }

    /// Inserts a child before `index`, or at the end when `index == len()`
    pub fn insert(&mut self, index: usize, item: impl Into<Item>) -> Result<()> {
        if index > self.children.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.children.len(),
            });
        }
        self.children.insert(index, item.into());
        Ok(())
    }

    /// Removes and returns the child at `index`
    pub fn remove(&mut self, index: usize) -> Result<Item> {
        self.child(index)?;
        Ok(self.children.remove(index))
    }

    /// Returns the number of children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Checks if the sequence has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the children in timeline order
    pub fn children(&self) -> &[Item] {
        &self.children
    }

    /// Iterates over the children in timeline order
    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.children.iter()
    }

    /// Returns the child at `index`
    pub fn child(&self, index: usize) -> Result<&Item> {
        self.children.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.children.len(),
        })
    }

    /// Finds the position of `item` in this sequence
    ///
    /// Lookup is by identity: `item` must be a reference to one of this
    /// sequence's own children. An equal item held elsewhere is not found.
    pub fn index_of(&self, item: &Item) -> Result<usize> {
        self.children
            .iter()
            .position(|child| std::ptr::eq(child, item))
            .ok_or_else(|| Error::ItemNotFound {
                item: item.to_string(),
                sequence: self.name.clone(),
            })
    }

    /// Returns the untrimmed range of the child at `index` in sequence time
    ///
    /// The start is the summed duration of every preceding non-transition
    /// child. A transition starts `in_offset` earlier than that.
    pub fn range_of_child_at_index(&self, index: usize) -> Result<TimeRange> {
        let child = self.child(index)?;
        let duration = child.duration()?;

        let mut start_time = RationalTime::zero(duration.rate());
        for preceding in self.children[..index].iter().filter(|c| !c.overlapping()) {
            start_time = start_time.try_add(preceding.duration()?)?;
        }

        if let Item::Transition(transition) = child {
            start_time = start_time.try_sub(transition.in_offset)?;
        }

        Ok(TimeRange::new(start_time, duration))
    }

    /// Returns the untrimmed range of every child, in order
    pub fn range_of_all_children(&self) -> Result<Vec<TimeRange>> {
        let mut ranges = Vec::with_capacity(self.children.len());
        let mut running = RationalTime::default();

        for child in &self.children {
            let duration = child.duration()?;
            let mut start_time = RationalTime::zero(duration.rate()).try_add(running)?;
            match child {
                Item::Transition(transition) => {
                    start_time = start_time.try_sub(transition.in_offset)?
                }
                Item::Clip(_) | Item::Gap(_) => running = running.try_add(duration)?,
            }
            ranges.push(TimeRange::new(start_time, duration));
        }

        Ok(ranges)
    }

    /// Returns the part of the child at `index` left visible by the sequence's trim
    ///
    /// `Ok(None)` means the child lies entirely outside `source_range`.
    /// Ranges that only touch `source_range` at an endpoint count as outside.
    pub fn trimmed_range_of_child_at_index(&self, index: usize) -> Result<Option<TimeRange>> {
        let range = self.range_of_child_at_index(index)?;
        let trimmed = self.trim_child_range(range)?;
        if trimmed.is_none() {
            debug!(index, range = %range, "child cropped out by sequence trim");
        }
        Ok(trimmed)
    }

    fn trim_child_range(&self, mut range: TimeRange) -> Result<Option<TimeRange>> {
        let Some(source_range) = self.source_range else {
            return Ok(Some(range));
        };
        let source_end = source_range.end_time_exclusive()?;

        if source_range.start_time >= range.end_time_exclusive()?
            || source_end <= range.start_time
        {
            return Ok(None);
        }

        if range.start_time < source_range.start_time {
            let end = range.end_time_exclusive()?;
            range = TimeRange::from_start_end_time(source_range.start_time, end)?;
        }

        if range.end_time_exclusive()? > source_end {
            range = TimeRange::from_start_end_time(range.start_time, source_end)?;
        }

        Ok(Some(range))
    }

    /// Returns the total untrimmed extent implied by the children
    ///
    /// A transition at either edge borrows time from outside the sequence, so
    /// its offset on that side is counted as an implicit gap. Transitions
    /// contribute nothing else; clips and gaps contribute their durations.
    pub fn available_range(&self) -> Result<TimeRange> {
        let mut durations = Vec::with_capacity(self.children.len() + 2);

        if let Some(Item::Transition(first)) = self.children.first() {
            durations.push(first.in_offset);
        }
        if let Some(Item::Transition(last)) = self.children.last() {
            durations.push(last.out_offset);
        }

        for child in &self.children {
            match child {
                Item::Clip(_) | Item::Gap(_) => durations.push(child.duration()?),
                Item::Transition(_) => {}
            }
        }

        let duration = RationalTime::try_sum(durations)?;
        Ok(TimeRange::from_duration(duration))
    }

    /// Returns `source_range` if set, otherwise the available range
    pub fn trimmed_range(&self) -> Result<TimeRange> {
        match self.source_range {
            Some(range) => Ok(range),
            None => self.available_range(),
        }
    }

    /// Returns how long the sequence plays after its own trim
    pub fn duration(&self) -> Result<RationalTime> {
        Ok(self.trimmed_range()?.duration)
    }

    /// Returns children in order, with their index, matching both filters
    ///
    /// With a `search_range`, only children whose trimmed range overlaps it
    /// are returned. Cropped-out children never overlap anything.
    pub fn each_child(
        &self,
        search_range: Option<TimeRange>,
        kind: Option<ItemKind>,
    ) -> Result<Vec<(usize, &Item)>> {
        let ranges = match search_range {
            Some(_) => Some(self.range_of_all_children()?),
            None => None,
        };

        let mut matches = Vec::new();
        for (index, child) in self.children.iter().enumerate() {
            if kind.is_some_and(|kind| child.kind() != kind) {
                continue;
            }
            if let (Some(search), Some(ranges)) = (search_range, &ranges) {
                match self.trim_child_range(ranges[index])? {
                    Some(trimmed) if trimmed.overlaps(&search)? => {}
                    _ => continue,
                }
            }
            matches.push((index, child));
        }

        Ok(matches)
    }

    /// Returns the clips of this sequence, optionally restricted to `search_range`
    pub fn each_clip(&self, search_range: Option<TimeRange>) -> Result<Vec<(usize, &Item)>> {
        self.each_child(search_range, Some(ItemKind::Clip))
    }

    /// Returns the items bordering `item`, with `item` itself in the middle
    ///
    /// `item` must be one of this sequence's own children. Borrowed entries
    /// are children of the sequence; owned entries are gaps synthesized for a
    /// boundary transition under [`NeighborGapPolicy::AroundTransitions`].
    pub fn neighbors_of(&self, item: &Item, policy: NeighborGapPolicy) -> Result<Vec<Cow<'_, Item>>> {
        let index = self.index_of(item)?;
        self.neighbors_of_index(index, policy)
    }

    /// Same as [`neighbors_of`](Self::neighbors_of), addressed by position
    pub fn neighbors_of_index(
        &self,
        index: usize,
        policy: NeighborGapPolicy,
    ) -> Result<Vec<Cow<'_, Item>>> {
        let item = self.child(index)?;
        let last = self.children.len() - 1;

        let boundary_transition = match (item, policy) {
            (Item::Transition(transition), NeighborGapPolicy::AroundTransitions) => Some(transition),
            (_, NeighborGapPolicy::Never) | (Item::Clip(_) | Item::Gap(_), _) => None,
        };

        let mut result = Vec::with_capacity(3);

        match boundary_transition {
            Some(transition) if index == 0 => {
                debug!(index, offset = %transition.in_offset, "synthesizing leading gap");
                result.push(Cow::Owned(Item::Gap(Gap::with_duration(transition.in_offset))));
            }
            _ if index > 0 => result.push(Cow::Borrowed(&self.children[index - 1])),
            _ => {}
        }

        result.push(Cow::Borrowed(item));

        match boundary_transition {
            Some(transition) if index == last => {
                debug!(index, offset = %transition.out_offset, "synthesizing trailing gap");
                result.push(Cow::Owned(Item::Gap(Gap::with_duration(transition.out_offset))));
            }
            _ if index < last => result.push(Cow::Borrowed(&self.children[index + 1])),
            _ => {}
        }

        Ok(result)
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Clip, Transition};

    const RATE: i64 = 24;

    fn rt(value: i64) -> RationalTime {
        RationalTime::new(value, RATE)
    }

    fn range(start: i64, duration: i64) -> TimeRange {
        TimeRange::new(rt(start), rt(duration))
    }

    fn clip(name: &str, duration: i64) -> Item {
        Clip::new(name, TimeRange::from_duration(rt(duration))).into()
    }

    fn dissolve(in_offset: i64, out_offset: i64) -> Item {
        Transition::new("dissolve", rt(in_offset), rt(out_offset)).into()
    }

    fn clip_transition_clip() -> Sequence {
        Sequence::new("main").with_children([clip("a", 10), dissolve(2, 2), clip("b", 10)])
    }

    #[test]
    fn test_ranges_are_contiguous_without_transitions() {
        let seq = Sequence::new("cuts").with_children([
            clip("a", 10),
            Gap::with_duration(rt(5)).into(),
            clip("b", 7),
        ]);

        assert_eq!(seq.range_of_child_at_index(0).unwrap(), range(0, 10));
        assert_eq!(seq.range_of_child_at_index(1).unwrap(), range(10, 5));
        assert_eq!(seq.range_of_child_at_index(2).unwrap(), range(15, 7));

        for i in 0..seq.len() - 1 {
            let current = seq.range_of_child_at_index(i).unwrap();
            let next = seq.range_of_child_at_index(i + 1).unwrap();
            assert_eq!(current.end_time_exclusive().unwrap(), next.start_time);
        }
    }

    #[test]
    fn test_transition_overlaps_neighbors() {
        let seq = clip_transition_clip();

        let transition = seq.range_of_child_at_index(1).unwrap();
        assert_eq!(transition, range(8, 4));
        assert_eq!(transition.start_time.rate(), RATE);

        // the transition does not advance the running start
        assert_eq!(seq.range_of_child_at_index(2).unwrap(), range(10, 10));
    }

    #[test]
    fn test_leading_transition_starts_before_zero() {
        let seq = Sequence::new("lead").with_children([dissolve(3, 1), clip("a", 10)]);
        assert_eq!(seq.range_of_child_at_index(0).unwrap(), range(-3, 4));
        assert_eq!(seq.range_of_child_at_index(1).unwrap(), range(0, 10));
    }

    #[test]
    fn test_range_of_all_children_matches_per_index() {
        let seq = Sequence::new("mixed").with_children([
            dissolve(1, 1),
            clip("a", 10),
            dissolve(2, 3),
            clip("b", 6),
            Gap::with_duration(rt(4)).into(),
            dissolve(1, 2),
        ]);

        let all = seq.range_of_all_children().unwrap();
        assert_eq!(all.len(), seq.len());
        for (index, range) in all.iter().enumerate() {
            assert_eq!(*range, seq.range_of_child_at_index(index).unwrap());
        }
    }

    #[test]
    fn test_range_of_child_out_of_bounds() {
        let seq = clip_transition_clip();
        let err = seq.range_of_child_at_index(3).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn test_range_of_child_propagates_leaf_failure() {
        let offline = Item::from(Clip {
            name: "offline".to_string(),
            ..Default::default()
        });
        let seq = Sequence::new("broken").with_children([offline, clip("a", 10)]);
        assert!(matches!(
            seq.range_of_child_at_index(1),
            Err(Error::MissingAvailableRange { .. })
        ));
    }

    #[test]
    fn test_trimmed_range_without_source_range_is_natural() {
        let seq = clip_transition_clip();
        assert_eq!(seq.trimmed_range_of_child_at_index(2).unwrap(), Some(range(10, 10)));
    }

    #[test]
    fn test_trimmed_range_crops_both_edges() {
        let seq = Sequence::new("one")
            .with_children([clip("a", 10)])
            .with_source_range(range(5, 3));
        assert_eq!(seq.trimmed_range_of_child_at_index(0).unwrap(), Some(range(5, 3)));
    }

    #[test]
    fn test_trimmed_range_crops_one_edge() {
        let seq = Sequence::new("two")
            .with_children([clip("a", 10), clip("b", 10)])
            .with_source_range(range(4, 10));

        assert_eq!(seq.trimmed_range_of_child_at_index(0).unwrap(), Some(range(4, 6)));
        assert_eq!(seq.trimmed_range_of_child_at_index(1).unwrap(), Some(range(10, 4)));
    }

    #[test]
    fn test_trimmed_range_disjoint_is_none() {
        let seq = Sequence::new("one")
            .with_children([clip("a", 10)])
            .with_source_range(range(20, 5));
        assert_eq!(seq.trimmed_range_of_child_at_index(0).unwrap(), None);
    }

    #[test]
    fn test_trimmed_range_touching_endpoint_is_none() {
        let after = Sequence::new("after")
            .with_children([clip("a", 10)])
            .with_source_range(range(10, 5));
        assert_eq!(after.trimmed_range_of_child_at_index(0).unwrap(), None);

        let before = Sequence::new("before")
            .with_children([clip("a", 10), clip("b", 10)])
            .with_source_range(range(0, 10));
        assert_eq!(before.trimmed_range_of_child_at_index(1).unwrap(), None);
        assert_eq!(before.trimmed_range_of_child_at_index(0).unwrap(), Some(range(0, 10)));
    }

    #[test]
    fn test_available_range_excludes_interior_transitions() {
        let seq = clip_transition_clip();
        assert_eq!(seq.available_range().unwrap(), range(0, 20));
    }

    #[test]
    fn test_available_range_counts_boundary_offsets() {
        let seq = Sequence::new("edges").with_children([
            dissolve(3, 1),
            clip("a", 10),
            dissolve(2, 5),
        ]);
        let available = seq.available_range().unwrap();
        assert_eq!(available.duration, rt(3 + 10 + 5));
        assert!(available.start_time.is_zero());
        assert_eq!(available.start_time.rate(), RATE);
    }

    #[test]
    fn test_available_range_single_transition_counts_both_offsets() {
        let seq = Sequence::new("lonely").with_children([dissolve(2, 3)]);
        assert_eq!(seq.available_range().unwrap().duration, rt(5));
    }

    #[test]
    fn test_available_range_empty() {
        let available = Sequence::new("empty").available_range().unwrap();
        assert!(available.duration.is_zero());
        assert!(available.start_time.is_zero());
    }

    #[test]
    fn test_trimmed_range_and_duration() {
        let seq = clip_transition_clip();
        assert_eq!(seq.trimmed_range().unwrap(), range(0, 20));

        let trimmed = seq.with_source_range(range(2, 6));
        assert_eq!(trimmed.trimmed_range().unwrap(), range(2, 6));
        assert_eq!(trimmed.duration().unwrap(), rt(6));
    }

    #[test]
    fn test_neighbors_interior() {
        let seq = clip_transition_clip();
        let transition = &seq.children()[1];

        let neighbors = seq.neighbors_of(transition, NeighborGapPolicy::Never).unwrap();
        assert_eq!(neighbors.len(), 3);
        assert!(matches!(neighbors[0], Cow::Borrowed(item) if std::ptr::eq(item, &seq.children()[0])));
        assert!(matches!(neighbors[1], Cow::Borrowed(item) if std::ptr::eq(item, transition)));
        assert!(matches!(neighbors[2], Cow::Borrowed(item) if std::ptr::eq(item, &seq.children()[2])));
    }

    #[test]
    fn test_neighbors_boundary_transition_never() {
        let seq = Sequence::new("edges").with_children([dissolve(3, 1), clip("a", 10)]);
        let neighbors = seq
            .neighbors_of(&seq.children()[0], NeighborGapPolicy::Never)
            .unwrap();

        assert_eq!(neighbors.len(), 2);
        assert!(neighbors[0].is_transition());
        assert!(neighbors[1].is_clip());
    }

    #[test]
    fn test_neighbors_boundary_transition_around_transitions() {
        let seq = Sequence::new("edges").with_children([dissolve(3, 1)]);
        let neighbors = seq
            .neighbors_of(&seq.children()[0], NeighborGapPolicy::AroundTransitions)
            .unwrap();

        assert_eq!(neighbors.len(), 3);
        assert!(matches!(neighbors[0], Cow::Owned(Item::Gap(_))));
        assert_eq!(neighbors[0].duration().unwrap(), rt(3));
        assert!(neighbors[1].is_transition());
        assert!(matches!(neighbors[2], Cow::Owned(Item::Gap(_))));
        assert_eq!(neighbors[2].duration().unwrap(), rt(1));
    }

    #[test]
    fn test_neighbors_policy_ignored_for_clips() {
        let seq = Sequence::new("one").with_children([clip("a", 10)]);
        let neighbors = seq
            .neighbors_of(&seq.children()[0], NeighborGapPolicy::AroundTransitions)
            .unwrap();
        assert_eq!(neighbors.len(), 1);
    }

    #[test]
    fn test_neighbors_trailing_transition_borrows_previous() {
        let seq = clip_transition_clip().with_children([dissolve(1, 4)]);
        let neighbors = seq
            .neighbors_of_index(3, NeighborGapPolicy::AroundTransitions)
            .unwrap();

        assert_eq!(neighbors.len(), 3);
        assert!(matches!(neighbors[0], Cow::Borrowed(item) if std::ptr::eq(item, &seq.children()[2])));
        assert_eq!(neighbors[2].duration().unwrap(), rt(4));
    }

    #[test]
    fn test_neighbors_of_foreign_item_fails() {
        let seq = clip_transition_clip();
        let lookalike = seq.children()[0].clone();

        let err = seq
            .neighbors_of(&lookalike, NeighborGapPolicy::Never)
            .unwrap_err();
        assert!(matches!(err, Error::ItemNotFound { .. }));
    }

    #[test]
    fn test_each_child_filters_kind_and_range() {
        let seq = Sequence::new("mixed")
            .with_children([
                clip("a", 10),
                dissolve(2, 2),
                clip("b", 10),
                Gap::with_duration(rt(5)).into(),
                clip("c", 10),
            ])
            .with_source_range(range(0, 25));

        let clips: Vec<usize> = seq.each_clip(None).unwrap().into_iter().map(|(i, _)| i).collect();
        assert_eq!(clips, vec![0, 2, 4]);

        // clip "c" starts at 25 and is cropped out by the sequence trim
        let visible: Vec<usize> = seq
            .each_clip(Some(range(0, 100)))
            .unwrap()
            .into_iter()
            .map(|(i, _)| i)
            .collect();
        assert_eq!(visible, vec![0, 2]);

        let around_cut: Vec<usize> = seq
            .each_child(Some(range(9, 2)), None)
            .unwrap()
            .into_iter()
            .map(|(i, _)| i)
            .collect();
        assert_eq!(around_cut, vec![0, 1, 2]);
    }

    #[test]
    fn test_insert_and_remove() {
        let mut seq = Sequence::new("edit");
        seq.push(clip("a", 10));
        seq.insert(0, dissolve(1, 1)).unwrap();
        assert_eq!(seq.len(), 2);
        assert!(seq.insert(5, clip("b", 1)).is_err());

        let removed = seq.remove(0).unwrap();
        assert!(removed.is_transition());
        assert!(matches!(seq.remove(1), Err(Error::IndexOutOfRange { index: 1, len: 1 })));
        assert_eq!(seq.iter().count(), 1);
    }

    #[test]
    fn test_mixed_rate_layout_is_exact() {
        let seq = Sequence::new("conform").with_children([
            Clip::new("film", TimeRange::from_duration(rt(12))).into(),
            Item::from(Transition::new(
                "dissolve",
                RationalTime::new(6, 30),
                RationalTime::new(3, 24),
            )),
            Clip::new("video", TimeRange::from_duration(RationalTime::new(45, 30))).into(),
            Gap::with_duration(rt(1)).into(),
        ]);

        let film = seq.range_of_child_at_index(0).unwrap();
        assert_eq!(film, range(0, 12));

        // 0.5s minus 0.2s, lasting 0.2s + 0.125s
        let dissolve = seq.range_of_child_at_index(1).unwrap();
        assert_eq!(dissolve.start_time, RationalTime::new(36, 120));
        assert_eq!(dissolve.duration, RationalTime::new(39, 120));

        let video = seq.range_of_child_at_index(2).unwrap();
        assert_eq!(video.start_time, RationalTime::new(15, 30));
        assert_eq!(video.start_time.rate(), 30);
        assert_eq!(film.end_time_exclusive().unwrap(), video.start_time);

        let gap = seq.range_of_child_at_index(3).unwrap();
        assert_eq!(gap.start_time, RationalTime::new(2, 1));
        assert_eq!(video.end_time_exclusive().unwrap(), gap.start_time);

        let all = seq.range_of_all_children().unwrap();
        assert_eq!(all, vec![film, dissolve, video, gap]);

        let available = seq.available_range().unwrap();
        assert_eq!(available.duration, RationalTime::new(49, 24));
        assert_eq!(available.end_time_exclusive().unwrap(), gap.end_time_exclusive().unwrap());
    }

    #[test]
    fn test_rate_overflow_is_reported() {
        let seq = Sequence::new("coprime").with_children([
            Gap::with_duration(RationalTime::new(5, 1_000_000_007)),
            Gap::with_duration(RationalTime::new(5, 998_244_353)),
            Gap::with_duration(RationalTime::new(5, 1_000_000_009)),
            Gap::with_duration(rt(1)),
        ]);

        assert!(matches!(seq.available_range(), Err(Error::TimeOverflow { .. })));
        assert!(matches!(
            seq.range_of_child_at_index(3),
            Err(Error::TimeOverflow { .. })
        ));
        assert!(seq.range_of_all_children().is_err());
        assert!(seq.range_of_child_at_index(2).is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_sequence_json_rejects_bad_rates() {
        for rate in [0, -24] {
            let json = format!(
                r#"{{"children": [
                    {{"type": "Gap", "source_range": {{
                        "start_time": {{"value": 0, "rate": 24}},
                        "duration": {{"value": 5, "rate": {rate}}}}}}},
                    {{"type": "Gap", "source_range": {{
                        "start_time": {{"value": 0, "rate": 24}},
                        "duration": {{"value": 5, "rate": 24}}}}}}
                ]}}"#
            );
            let err = serde_json::from_str::<Sequence>(&json).unwrap_err();
            assert!(err.to_string().contains(&format!("Invalid rate {rate}")), "{err}");
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_sequence_from_json() {
        let json = r#"{
            "name": "main",
            "children": [
                {"type": "Clip", "name": "a", "media_range": {
                    "start_time": {"value": 0, "rate": 24},
                    "duration": {"value": 10, "rate": 24}}},
                {"type": "Transition",
                    "in_offset": {"value": 2, "rate": 24},
                    "out_offset": {"value": 2, "rate": 24}},
                {"type": "Clip", "name": "b", "media_range": {
                    "start_time": {"value": 0, "rate": 24},
                    "duration": {"value": 10, "rate": 24}}}
            ]
        }"#;

        let seq: Sequence = serde_json::from_str(json).unwrap();
        assert_eq!(seq.kind, SequenceKind::Video);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.range_of_child_at_index(1).unwrap(), range(8, 4));
        assert_eq!(seq.available_range().unwrap(), range(0, 20));
    }
}
