//! The fixed question catalogue and the image-question pool partition.
//!
//! Steps 0-3 ask the tag questions below, each with its own option set.
//! Steps 4-7 ask image questions whose options come from splitting the
//! 18-tag pool into groups of 5, 5, 4 and 4.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

/// A categorical question with a fixed option set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagQuestion {
    pub id: u8,
    pub title: &'static str,
    pub options: &'static [&'static str],
}

/// A question whose options are images, one per tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageQuestion {
    pub id: u8,
    pub title: &'static str,
    pub images: Vec<&'static str>,
}

pub const TAG_QUESTIONS: [TagQuestion; 4] = [
    TagQuestion {
        id: 1,
        title: "What are your core gaming preferences?",
        options: &["Cooperative Play", "Indie", "Adventure", "Strategic Thinking", "Horror"],
    },
    TagQuestion {
        id: 2,
        title: "What gameplay style do you prefer?",
        options: &["Shooter", "Strategic Combat", "Clicker", "Simulation"],
    },
    TagQuestion {
        id: 3,
        title: "What aesthetic preferences appeal to you?",
        options: &["Visual Style", "Family Fun", "Dark Themes", "2D"],
    },
    TagQuestion {
        id: 4,
        title: "Which special features interest you most?",
        options: &[
            "Singleplayer",
            "Mystery",
            "Replayability",
            "Random Generation",
            "Roguelike Adventures",
        ],
    },
];

pub const IMAGE_QUESTION_TITLE: &str = "Which of these visual themes appeals to you most?";

/// Every tag offered as an image, in catalogue order
pub const IMAGE_TAG_POOL: [&str; 18] = [
    "Cooperative Play",
    "Visual Style",
    "Family Fun",
    "Indie",
    "Mystery",
    "2D",
    "Singleplayer",
    "Adventure",
    "Shooter",
    "Strategic Combat",
    "Replayability",
    "Strategic Thinking",
    "Horror",
    "Clicker",
    "Dark Themes",
    "Simulation",
    "Random Generation",
    // Spelled like the tag question option; the image file is
    // roguelike_adventures.jpeg, not the older rougelike_adventures.jpeg
    "Roguelike Adventures",
];

/// Group sizes for the four image questions; they sum to the pool size
pub const IMAGE_GROUP_SIZES: [usize; 4] = [5, 5, 4, 4];

/// Shuffle the tag pool with a seeded RNG and slice it into four questions.
///
/// The same seed always yields the same partition, so a session keeps its
/// questions across re-renders by keeping its seed (or the result).
pub fn partition_image_pool(seed: u64) -> Vec<ImageQuestion> {
    let mut pool: Vec<&'static str> = IMAGE_TAG_POOL.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    pool.shuffle(&mut rng);

    let mut rest = pool.as_slice();
    IMAGE_GROUP_SIZES
        .iter()
        .enumerate()
        .map(|(index, &size)| {
            let (group, tail) = rest.split_at(size);
            rest = tail;
            ImageQuestion {
                id: index as u8 + 1,
                title: IMAGE_QUESTION_TITLE,
                images: group.to_vec(),
            }
        })
        .collect()
}
