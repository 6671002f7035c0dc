//! Keyword-lexicon sentiment scoring for buyer comments.

use super::ColumnRule;
use crate::error::Result;
use crate::types::RuleReport;
use crate::utils::{has_column, text_values};
use polars::prelude::*;
use tracing::debug;

pub const POSITIVE_KEYWORDS: [&str; 9] = [
    "good",
    "great",
    "love",
    "excellent",
    "friendly",
    "positive",
    "affordable",
    "yes",
    "interested",
];

pub const NEGATIVE_KEYWORDS: [&str; 10] = [
    "no",
    "not",
    "bad",
    "poor",
    "delay",
    "expensive",
    "complain",
    "negative",
    "dislike",
    "cancel",
];

/// Score a comment as positive keyword hits minus negative keyword hits.
///
/// Matching is case-insensitive substring containment and each keyword
/// counts at most once. A keyword whose every occurrence sits inside an
/// occurrence of a longer keyword is not counted, so `"not"` scores only
/// `not` and never `no` as well. Missing or blank text scores 0.0.
pub fn sentiment_score(text: Option<&str>) -> f64 {
    let Some(text) = text else {
        return 0.0;
    };
    if text.trim().is_empty() {
        return 0.0;
    }

    let lowered = text.to_lowercase();
    let spans = keyword_spans(&lowered);

    let hits = |keywords: &[&str]| -> i32 {
        keywords
            .iter()
            .filter(|kw| counts_as_hit(kw, &spans))
            .count() as i32
    };

    f64::from(hits(&POSITIVE_KEYWORDS) - hits(&NEGATIVE_KEYWORDS))
}

/// Every occurrence of every keyword as `(keyword, start, end)` byte spans.
fn keyword_spans(text: &str) -> Vec<(&'static str, usize, usize)> {
    POSITIVE_KEYWORDS
        .iter()
        .chain(NEGATIVE_KEYWORDS.iter())
        .flat_map(|&kw| {
            text.match_indices(kw)
                .map(move |(start, m)| (kw, start, start + m.len()))
        })
        .collect()
}

fn counts_as_hit(keyword: &str, spans: &[(&'static str, usize, usize)]) -> bool {
    spans
        .iter()
        .filter(|(kw, _, _)| *kw == keyword)
        .any(|&(_, start, end)| {
            !spans.iter().any(|&(other, o_start, o_end)| {
                other.len() > keyword.len() && o_start <= start && end <= o_end
            })
        })
}

/// Writes the `Float64` sentiment score column.
///
/// Every row scores 0.0 when the comments column does not exist.
pub struct SentimentScorer {
    source: String,
    output: String,
}

impl SentimentScorer {
    pub fn new(source: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
        }
    }
}

impl ColumnRule for SentimentScorer {
    fn name(&self) -> &'static str {
        "sentiment"
    }

    fn apply(&self, df: &mut DataFrame) -> Result<RuleReport> {
        let rows = df.height();

        let (scores, detail) = if has_column(df, &self.source) {
            let scores: Vec<f64> = text_values(df, &self.source)?
                .iter()
                .map(|v| sentiment_score(v.as_deref()))
                .collect();
            (scores, format!("Scored '{}'", self.source))
        } else {
            debug!("Comments column '{}' absent, scoring 0.0", self.source);
            (vec![0.0; rows], format!("'{}' absent, all rows 0.0", self.source))
        };

        df.with_column(Series::new(self.output.as_str().into(), scores))?;
        debug!("Wrote sentiment column '{}'", self.output);
        Ok(RuleReport::applied(
            self.name(),
            vec![self.output.clone()],
            detail,
            0,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_comment() {
        assert_eq!(sentiment_score(Some("great, not bad")), -1.0);
    }

    #[test]
    fn test_empty_and_missing_score_zero() {
        assert_eq!(sentiment_score(Some("")), 0.0);
        assert_eq!(sentiment_score(Some("   ")), 0.0);
        assert_eq!(sentiment_score(None), 0.0);
    }

    #[test]
    fn test_keywords_count_once() {
        assert_eq!(sentiment_score(Some("Good good GOOD")), 1.0);
        assert_eq!(sentiment_score(Some("Excellent and friendly staff")), 2.0);
    }

    #[test]
    fn test_substring_matching() {
        // "no" inside "know" still counts
        assert_eq!(sentiment_score(Some("I know")), -1.0);
        // "delay" inside "delayed"
        assert_eq!(sentiment_score(Some("possession delayed")), -1.0);
    }

    #[test]
    fn test_standalone_no_and_not_both_count() {
        assert_eq!(sentiment_score(Some("no, not now")), -2.0);
    }

    #[test]
    fn test_rule_writes_float_scores() {
        let mut df = df![
            "Buyer_Comments" => [Some("Love the amenities"), None, Some("too expensive")],
        ]
        .unwrap();

        SentimentScorer::new("Buyer_Comments", "Buyer_Comment_Sentiment")
            .apply(&mut df)
            .unwrap();

        let values: Vec<Option<f64>> = df
            .column("Buyer_Comment_Sentiment")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some(1.0), Some(0.0), Some(-1.0)]);
    }

    #[test]
    fn test_absent_source_scores_zero() {
        let mut df = df!["Builder" => ["A", "B"]].unwrap();
        SentimentScorer::new("Buyer_Comments", "Buyer_Comment_Sentiment")
            .apply(&mut df)
            .unwrap();
        let col = df.column("Buyer_Comment_Sentiment").unwrap();
        assert_eq!(col.null_count(), 0);
        assert_eq!(col.get(1).unwrap().try_extract::<f64>().unwrap(), 0.0);
    }
}
