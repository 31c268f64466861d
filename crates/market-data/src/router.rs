//! Keyword Router
//!
//! Maps the latest user message to the topics worth fetching. Matching is a
//! case-insensitive substring test against a static Thai + English keyword
//! table; topics come back in the order the message mentions them.

use serde::Serialize;

use crate::model::Domain;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Gold,
    ExchangeRate,
    LoanRate,
    Forecast,
    News,
}

/// Keyword table in tie-break order. Keywords are lowercase.
pub static ROUTES: [(Topic, &[&str]); 5] = [
    (
        Topic::Gold,
        &["ราคาทอง", "ทองคำ", "ทองแท่ง", "ทองรูปพรรณ", "gold", "xau"],
    ),
    (
        Topic::ExchangeRate,
        &["อัตราแลกเปลี่ยน", "ค่าเงิน", "ดอลลาร์", "exchange rate", "usd", "thb"],
    ),
    // "mor" alone matches too many English words
    (
        Topic::LoanRate,
        &["ดอกเบี้ย", "mlr", "mrr", "loan rate", "interest rate"],
    ),
    (
        Topic::Forecast,
        &["แนวโน้ม", "คาดการณ์", "พยากรณ์", "forecast", "prediction", "trend"],
    ),
    (Topic::News, &["ข่าว", "news"]),
];

impl Topic {
    /// Domains fetched to answer this topic, in block order
    pub fn domains(self) -> &'static [Domain] {
        match self {
            Self::Gold => &[Domain::ThaiGold, Domain::WorldGold],
            Self::ExchangeRate => &[Domain::ExchangeRate],
            Self::LoanRate => &[Domain::LoanRate],
            Self::Forecast => &[Domain::Forecast],
            Self::News => &[Domain::News],
        }
    }

    /// Thai heading used as the enrichment block delimiter
    pub fn label(self) -> &'static str {
        match self {
            Self::Gold => "ข้อมูลราคาทองคำ",
            Self::ExchangeRate => "ข้อมูลอัตราแลกเปลี่ยน",
            Self::LoanRate => "ข้อมูลอัตราดอกเบี้ยเงินกู้",
            Self::Forecast => "ข้อมูลแนวโน้มราคาทอง",
            Self::News => "ข่าวตลาดทองคำ",
        }
    }
}

/// Topics mentioned in `message`, each at most once, ordered by the
/// position of their earliest keyword (ties keep table order).
pub fn route(message: &str) -> Vec<Topic> {
    let haystack = message.to_lowercase();

    let mut hits: Vec<(usize, usize, Topic)> = ROUTES
        .iter()
        .enumerate()
        .filter_map(|(rank, (topic, keywords))| {
            keywords
                .iter()
                .filter_map(|keyword| haystack.find(keyword))
                .min()
                .map(|position| (position, rank, *topic))
        })
        .collect();

    hits.sort_unstable_by_key(|(position, rank, _)| (*position, *rank));
    hits.into_iter().map(|(_, _, topic)| topic).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_keywords_no_topics() {
        assert!(route("สวัสดีครับ").is_empty());
        assert!(route("").is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(route("What is the GOLD price?"), vec![Topic::Gold]);
        assert_eq!(route("Current MLR please"), vec![Topic::LoanRate]);
    }

    #[test]
    fn test_gold_question_routes_to_gold_only() {
        assert_eq!(route("ราคาทองคำวันนี้เป็นอย่างไร"), vec![Topic::Gold]);
    }

    #[test]
    fn test_loan_rate_thai() {
        assert_eq!(route("อัตราดอกเบี้ยเงินกู้ตอนนี้เท่าไหร่"), vec![Topic::LoanRate]);
    }

    #[test]
    fn test_ordered_by_first_mention() {
        assert_eq!(
            route("ค่าเงินบาทวันนี้ แล้วราคาทองล่ะ"),
            vec![Topic::ExchangeRate, Topic::Gold]
        );
        assert_eq!(
            route("ราคาทองคำกับค่าเงินบาท"),
            vec![Topic::Gold, Topic::ExchangeRate]
        );
    }

    #[test]
    fn test_each_topic_once() {
        let topics = route("gold gold ทองคำ ราคาทอง xau news ข่าว");
        assert_eq!(topics, vec![Topic::Gold, Topic::News]);
    }

    #[test]
    fn test_gold_trend_fetches_both_gold_domains_and_forecast() {
        let topics = route("แนวโน้มราคาทองเป็นยังไง");
        assert_eq!(topics, vec![Topic::Forecast, Topic::Gold]);

        let domains: Vec<Domain> = topics.iter().flat_map(|t| t.domains()).copied().collect();
        assert_eq!(domains, vec![Domain::Forecast, Domain::ThaiGold, Domain::WorldGold]);
    }

    #[test]
    fn test_keywords_are_lowercase() {
        for (_, keywords) in &ROUTES {
            for keyword in *keywords {
                assert_eq!(*keyword, keyword.to_lowercase());
            }
        }
    }
}
