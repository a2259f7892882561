//! Product reviews and sentiment tallies.

use serde::{Deserialize, Serialize};

use crate::types::{ReviewIndex, Sentiment, SentimentTab};

/// A review as returned by the marketplace.
///
/// `index` is the review's position in the product's review list. The API
/// uses it as the edit/delete key, so it is only valid against the list it
/// was fetched with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub username: String,
    #[serde(rename = "review")]
    pub text: String,
    pub sentiment: Sentiment,
    #[serde(rename = "reviewIdx", alias = "review_idx")]
    pub index: ReviewIndex,
}

impl Review {
    /// Whether `username` wrote this review.
    #[must_use]
    pub fn is_by(&self, username: &str) -> bool {
        self.username == username
    }
}

/// Per-sentiment review counts for the tab bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentCounts {
    pub total: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    /// Count reviews by sentiment.
    #[must_use]
    pub fn tally(reviews: &[Review]) -> Self {
        reviews.iter().fold(Self::default(), |mut counts, review| {
            counts.total += 1;
            match review.sentiment {
                Sentiment::Positive => counts.positive += 1,
                Sentiment::Neutral => counts.neutral += 1,
                Sentiment::Negative => counts.negative += 1,
            }
            counts
        })
    }

    /// The count shown next to a tab.
    #[must_use]
    pub const fn for_tab(&self, tab: SentimentTab) -> usize {
        match tab {
            SentimentTab::All => self.total,
            SentimentTab::Only(Sentiment::Positive) => self.positive,
            SentimentTab::Only(Sentiment::Neutral) => self.neutral,
            SentimentTab::Only(Sentiment::Negative) => self.negative,
        }
    }
}

/// Reviews shown under a tab, in list order.
#[must_use]
pub fn visible_reviews(reviews: &[Review], tab: SentimentTab) -> Vec<&Review> {
    reviews
        .iter()
        .filter(|review| tab.matches(review.sentiment))
        .collect()
}

/// Placeholder text for a tab with no reviews.
#[must_use]
pub fn empty_message(tab: SentimentTab) -> String {
    match tab {
        SentimentTab::All => "No reviews available.".to_owned(),
        SentimentTab::Only(sentiment) => format!("No reviews with {sentiment} sentiment."),
    }
}
