/// Slide layout catalogue.
///
/// A [`LayoutKey`] names one template slide. The variants are listed in the
/// canonical template order, which is the order used by positional binding.
use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies one of the fixed template slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LayoutKey {
    WelcomePrior,
    LiturgyPrior,
    Theme,
    Welcome,
    Liturgy,
    PurpleWithTitle,
    Interlude,
    SongAnnouncement,
    SongAnnouncementOverlay,
    Subtitles,
    Prayer,
    BlueWithTitle,
    ListeningSongAnnouncement,
    WhiteWithLyrics,
    ChildrenMoment,
    BibleReadingAnnouncement,
    BibleText,
    CollectionOneGoal,
    CollectionTwoGoals,
    CollectionOneGoalPrior,
    CollectionTwoGoalsPrior,
    FarewellWithPrayer,
    Farewell,
}

/// Canonical names, indexed by [`LayoutKey::ordinal`].
const NAMES: [&str; 23] = [
    "WelcomePrior",
    "LiturgyPrior",
    "Theme",
    "Welcome",
    "Liturgy",
    "PurpleWithTitle",
    "Interlude",
    "SongAnnouncement",
    "SongAnnouncementOverlay",
    "Subtitles",
    "Prayer",
    "BlueWithTitle",
    "ListeningSongAnnouncement",
    "WhiteWithLyrics",
    "ChildrenMoment",
    "BibleReadingAnnouncement",
    "BibleText",
    "CollectionOneGoal",
    "CollectionTwoGoals",
    "CollectionOneGoalPrior",
    "CollectionTwoGoalsPrior",
    "FarewellWithPrayer",
    "Farewell",
];

impl LayoutKey {
    /// Every layout in canonical template order.
    pub const ALL: [LayoutKey; 23] = [
        LayoutKey::WelcomePrior,
        LayoutKey::LiturgyPrior,
        LayoutKey::Theme,
        LayoutKey::Welcome,
        LayoutKey::Liturgy,
        LayoutKey::PurpleWithTitle,
        LayoutKey::Interlude,
        LayoutKey::SongAnnouncement,
        LayoutKey::SongAnnouncementOverlay,
        LayoutKey::Subtitles,
        LayoutKey::Prayer,
        LayoutKey::BlueWithTitle,
        LayoutKey::ListeningSongAnnouncement,
        LayoutKey::WhiteWithLyrics,
        LayoutKey::ChildrenMoment,
        LayoutKey::BibleReadingAnnouncement,
        LayoutKey::BibleText,
        LayoutKey::CollectionOneGoal,
        LayoutKey::CollectionTwoGoals,
        LayoutKey::CollectionOneGoalPrior,
        LayoutKey::CollectionTwoGoalsPrior,
        LayoutKey::FarewellWithPrayer,
        LayoutKey::Farewell,
    ];

    /// Canonical name, as stored in a template slide's name.
    #[inline]
    pub fn name(self) -> &'static str {
        NAMES[self.ordinal()]
    }

    /// Position of this layout in the canonical template order.
    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for LayoutKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayoutKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        LayoutKey::ALL
            .into_iter()
            .find(|key| key.name() == name)
            .ok_or_else(|| Error::LayoutBinding(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for key in LayoutKey::ALL {
            assert_eq!(key.name().parse::<LayoutKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_ordinal_matches_canonical_order() {
        for (idx, key) in LayoutKey::ALL.iter().enumerate() {
            assert_eq!(key.ordinal(), idx);
        }
    }

    #[test]
    fn test_names_follow_variants() {
        for key in LayoutKey::ALL {
            assert_eq!(key.name(), format!("{:?}", key));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert!(matches!(
            "Intermission".parse::<LayoutKey>(),
            Err(Error::LayoutBinding(_))
        ));
    }
}
