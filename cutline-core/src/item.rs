//! Item variants that make up a sequence

use crate::{Error, RationalTime, Result, TimeRange};
use std::fmt;

/// Kind discriminant used to filter children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    Clip,
    Gap,
    Transition,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Clip => write!(f, "clip"),
            ItemKind::Gap => write!(f, "gap"),
            ItemKind::Transition => write!(f, "transition"),
        }
    }
}

/// A segment of media placed on the timeline
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clip {
    /// Display name
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Portion of the media used by this clip, if trimmed
    #[cfg_attr(feature = "serde", serde(default))]
    pub source_range: Option<TimeRange>,
    /// Full extent of the referenced media, if known
    #[cfg_attr(feature = "serde", serde(default))]
    pub media_range: Option<TimeRange>,
}

impl Clip {
    /// Creates a clip referencing media with the given extent
    pub fn new(name: impl Into<String>, media_range: TimeRange) -> Self {
        Self {
            name: name.into(),
            source_range: None,
            media_range: Some(media_range),
        }
    }

    /// Sets the portion of the media used by this clip
    pub fn with_source_range(mut self, source_range: TimeRange) -> Self {
        self.source_range = Some(source_range);
        self
    }

    /// Returns the full extent of the referenced media
    pub fn available_range(&self) -> Result<TimeRange> {
        self.media_range.ok_or_else(|| Error::MissingAvailableRange {
            name: self.name.clone(),
        })
    }

    /// Returns the portion of the media this clip plays
    pub fn trimmed_range(&self) -> Result<TimeRange> {
        match self.source_range {
            Some(range) => Ok(range),
            None => self.available_range(),
        }
    }
}

/// Empty space on the timeline
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gap {
    /// Display name
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Extent of the empty space, only its duration matters
    pub source_range: TimeRange,
}

impl Gap {
    /// Creates an unnamed gap lasting `duration`
    pub fn with_duration(duration: RationalTime) -> Self {
        Self {
            name: String::new(),
            source_range: TimeRange::from_duration(duration),
        }
    }
}

/// Effect applied while a transition plays
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionType {
    #[default]
    SmpteDissolve,
    Custom(String),
}

/// A blend between the items on either side of it
///
/// A transition does not occupy timeline space of its own. It borrows
/// `in_offset` from the item before it and `out_offset` from the item after
/// it, so its duration is the sum of both offsets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    /// Display name
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Effect applied over the overlap
    #[cfg_attr(feature = "serde", serde(default))]
    pub transition_type: TransitionType,
    /// Time borrowed from the preceding item
    pub in_offset: RationalTime,
    /// Time borrowed from the following item
    pub out_offset: RationalTime,
}

impl Transition {
    /// Creates a dissolve borrowing the given offsets
    pub fn new(name: impl Into<String>, in_offset: RationalTime, out_offset: RationalTime) -> Self {
        Self {
            name: name.into(),
            transition_type: TransitionType::SmpteDissolve,
            in_offset,
            out_offset,
        }
    }

    /// Returns the combined length of both borrowed offsets
    pub fn duration(&self) -> Result<RationalTime> {
        self.in_offset.try_add(self.out_offset)
    }
}

/// A child of a sequence
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum Item {
    Clip(Clip),
    Gap(Gap),
    Transition(Transition),
}

impl Item {
    /// Returns the display name of the item
    pub fn name(&self) -> &str {
        match self {
            Item::Clip(clip) => &clip.name,
            Item::Gap(gap) => &gap.name,
            Item::Transition(transition) => &transition.name,
        }
    }

    /// Returns the kind discriminant of the item
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Clip(_) => ItemKind::Clip,
            Item::Gap(_) => ItemKind::Gap,
            Item::Transition(_) => ItemKind::Transition,
        }
    }

    /// Returns how long the item plays
    ///
    /// Fails if a clip has neither a source range nor a media range.
    pub fn duration(&self) -> Result<RationalTime> {
        match self {
            Item::Clip(clip) => Ok(clip.trimmed_range()?.duration),
            Item::Gap(gap) => Ok(gap.source_range.duration),
            Item::Transition(transition) => transition.duration(),
        }
    }

    /// Checks if the item shares timeline space with its neighbors
    pub fn overlapping(&self) -> bool {
        match self {
            Item::Clip(_) | Item::Gap(_) => false,
            Item::Transition(_) => true,
        }
    }

    /// Returns the transition if the item is one
    pub fn as_transition(&self) -> Option<&Transition> {
        match self {
            Item::Transition(transition) => Some(transition),
            Item::Clip(_) | Item::Gap(_) => None,
        }
    }

    /// Checks if the item is a clip
    pub fn is_clip(&self) -> bool {
        matches!(self, Item::Clip(_))
    }

    /// Checks if the item is a gap
    pub fn is_gap(&self) -> bool {
        matches!(self, Item::Gap(_))
    }

    /// Checks if the item is a transition
    pub fn is_transition(&self) -> bool {
        matches!(self, Item::Transition(_))
    }
}

impl From<Clip> for Item {
    fn from(clip: Clip) -> Self {
        Item::Clip(clip)
    }
}

impl From<Gap> for Item {
    fn from(gap: Gap) -> Self {
        Item::Gap(gap)
    }
}

impl From<Transition> for Item {
    fn from(transition: Transition) -> Self {
        Item::Transition(transition)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name().is_empty() {
            write!(f, "<{}>", self.kind())
        } else {
            write!(f, "{} {:?}", self.kind(), self.name())
        }
    }
}
